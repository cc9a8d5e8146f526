use thiserror::Error;

/// Failures of the git boundary.
///
/// Malformed status or numstat lines are not represented here: the parsers
/// skip them and carry on.
#[derive(Error, Debug)]
pub enum GitError {
    /// The status query (or repository discovery) failed, usually because the
    /// working directory is not inside a repository.
    #[error("not a git repository or git error: {0}")]
    RepositoryUnavailable(#[source] Box<GitError>),

    #[error("{program} {} failed: {stderr}", .args.join(" "))]
    SubprocessFailure {
        program: String,
        args: Vec<String>,
        stderr: String,
    },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, GitError>;

impl GitError {
    pub fn subprocess_failure(program: &str, args: &[&str], stderr: impl Into<String>) -> Self {
        Self::SubprocessFailure {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            stderr: stderr.into(),
        }
    }

    pub fn repository_unavailable(source: GitError) -> Self {
        Self::RepositoryUnavailable(Box::new(source))
    }
}
