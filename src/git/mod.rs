use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{GitError, Result};

pub mod apply;
pub mod numstat;
pub mod reconcile;
pub mod status;

#[cfg(test)]
pub mod fake;

/// Which of the two numstat reports to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffSide {
    /// HEAD..index (`git diff --cached --numstat`)
    Staged,
    /// index..worktree (`git diff --numstat`)
    Unstaged,
}

/// `--untracked-files` mode for the status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum UntrackedMode {
    No,
    Normal,
    All,
}

impl UntrackedMode {
    /// Parses a config value; `None` for anything unrecognized.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "no" => Some(UntrackedMode::No),
            "normal" => Some(UntrackedMode::Normal),
            "all" => Some(UntrackedMode::All),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            UntrackedMode::No => "no",
            UntrackedMode::Normal => "normal",
            UntrackedMode::All => "all",
        }
    }
}

/// The git operations the rest of the program needs. Queries return the raw
/// text git prints; parsing happens in the callers.
pub trait Repository {
    fn status(&self) -> Result<String>;
    fn numstat(&self, side: DiffSide) -> Result<String>;
    fn add(&self, paths: &[String]) -> Result<()>;
    fn reset(&self, paths: &[String]) -> Result<()>;
}

/// `Repository` backed by the git executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    repo_root: PathBuf,
    untracked: UntrackedMode,
}

impl GitCli {
    pub fn new(program: impl Into<String>, repo_root: PathBuf, untracked: UntrackedMode) -> Self {
        Self {
            program: program.into(),
            repo_root,
            untracked,
        }
    }

    /// Finds the top level of the repository containing `start`.
    pub fn discover(program: &str, start: &Path, untracked: UntrackedMode) -> Result<Self> {
        let repo_root = get_repo_root(program, start)?;
        tracing::debug!(root = %repo_root.display(), "discovered repository");
        Ok(Self::new(program, repo_root, untracked))
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        run_git(&self.program, args, &self.repo_root)
    }

    fn run_with_paths(&self, base: &[&str], paths: &[String]) -> Result<()> {
        let mut args: Vec<&str> = base.to_vec();
        args.push("--");
        args.extend(paths.iter().map(String::as_str));
        self.run(&args)?;
        Ok(())
    }
}

// Keeps non-ASCII paths verbatim; git still quotes paths with control
// characters, quotes or backslashes, which `unquote_path` handles.
const NO_QUOTE_PATH: [&str; 2] = ["-c", "core.quotePath=false"];

impl Repository for GitCli {
    fn status(&self) -> Result<String> {
        let untracked = format!("--untracked-files={}", self.untracked.name());
        let [c, quote] = NO_QUOTE_PATH;
        self.run(&[c, quote, "status", "--porcelain", &untracked])
    }

    fn numstat(&self, side: DiffSide) -> Result<String> {
        let [c, quote] = NO_QUOTE_PATH;
        match side {
            DiffSide::Staged => self.run(&[c, quote, "diff", "--cached", "--numstat"]),
            DiffSide::Unstaged => self.run(&[c, quote, "diff", "--numstat"]),
        }
    }

    fn add(&self, paths: &[String]) -> Result<()> {
        self.run_with_paths(&["add"], paths)
    }

    fn reset(&self, paths: &[String]) -> Result<()> {
        self.run_with_paths(&["reset"], paths)
    }
}

pub fn run_git(program: &str, args: &[&str], cwd: &Path) -> Result<String> {
    tracing::debug!(program, args = %args.join(" "), "running git");
    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|source| GitError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let stderr = if stderr.trim().is_empty() {
            format!("exited with {}", output.status)
        } else {
            stderr.trim().to_string()
        };
        tracing::warn!(program, args = %args.join(" "), %stderr, "git failed");
        Err(GitError::subprocess_failure(program, args, stderr))
    }
}

/// Decodes a path as git prints it: a double-quoted path carries C-style
/// escapes (`\"`, `\\`, `\t`, `\n`, octal bytes such as `\303\251`).
/// Unquoted input is returned trimmed.
pub fn unquote_path(raw: &str) -> String {
    let raw = raw.trim();
    let inner = match raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) => inner,
        None => return raw.to_string(),
    };

    let bytes = inner.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b != b'\\' || i + 1 == bytes.len() {
            out.push(b);
            i += 1;
            continue;
        }
        let next = bytes[i + 1];
        i += 2;
        match next {
            b'n' => out.push(b'\n'),
            b't' => out.push(b'\t'),
            b'r' => out.push(b'\r'),
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'v' => out.push(0x0b),
            b'"' | b'\\' => out.push(next),
            b'0'..=b'7' => {
                let mut value = u32::from(next - b'0');
                let mut digits = 1;
                while digits < 3 && i < bytes.len() && (b'0'..=b'7').contains(&bytes[i]) {
                    value = value * 8 + u32::from(bytes[i] - b'0');
                    i += 1;
                    digits += 1;
                }
                out.push((value & 0xff) as u8);
            }
            other => {
                out.push(b'\\');
                out.push(other);
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

pub fn get_repo_root(program: &str, start: &Path) -> Result<PathBuf> {
    let output = run_git(program, &["rev-parse", "--show-toplevel"], start)
        .map_err(GitError::repository_unavailable)?;
    Ok(PathBuf::from(output.trim()))
}
