use std::fmt;

use crate::error::{GitError, Result};

use super::{unquote_path, Repository};

/// One column of a short-status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Modified,
    Added,
    Deleted,
    Renamed,
    Copied,
    Unmerged,
    Untracked,
    Clean,
    /// Anything outside the known alphabet (`T`, `!`, ...).
    Unknown(char),
}

impl StatusCode {
    pub fn from_char(c: char) -> Self {
        match c {
            'M' => StatusCode::Modified,
            'A' => StatusCode::Added,
            'D' => StatusCode::Deleted,
            'R' => StatusCode::Renamed,
            'C' => StatusCode::Copied,
            'U' => StatusCode::Unmerged,
            '?' => StatusCode::Untracked,
            ' ' => StatusCode::Clean,
            other => StatusCode::Unknown(other),
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            StatusCode::Modified => 'M',
            StatusCode::Added => 'A',
            StatusCode::Deleted => 'D',
            StatusCode::Renamed => 'R',
            StatusCode::Copied => 'C',
            StatusCode::Unmerged => 'U',
            StatusCode::Untracked => '?',
            StatusCode::Clean => ' ',
            StatusCode::Unknown(c) => *c,
        }
    }

    pub fn is_clean(&self) -> bool {
        *self == StatusCode::Clean
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // The legend shows clean columns as '-'
            StatusCode::Clean => write!(f, "-"),
            other => write!(f, "{}", other.as_char()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub path: String,
    pub index: StatusCode,
    pub worktree: StatusCode,
}

/// Runs the status query. Any failure here means there is no usable
/// repository, so it is reported as `RepositoryUnavailable`.
pub fn get_status<R: Repository + ?Sized>(repo: &R) -> Result<Vec<StatusEntry>> {
    let output = repo.status().map_err(GitError::repository_unavailable)?;
    Ok(parse_status(&output))
}

pub fn parse_status(output: &str) -> Vec<StatusEntry> {
    let mut entries = Vec::new();

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if line.len() < 3 {
            tracing::trace!(line, "skipping short status line");
            continue;
        }

        let mut chars = line.chars();
        let index = chars.next().unwrap_or(' ');
        let worktree = chars.next().unwrap_or(' ');
        let offset = index.len_utf8() + worktree.len_utf8() + 1;
        let Some(rest) = line.get(offset..) else {
            tracing::trace!(line, "skipping malformed status line");
            continue;
        };

        // Renames: "old -> new"
        let rest = rest.trim();
        let path = match rest.rfind(" -> ") {
            Some(i) => rest[i + 4..].trim(),
            None => rest,
        };

        let path = unquote_path(path);
        if path.is_empty() {
            tracing::trace!(line, "skipping status line without a path");
            continue;
        }

        entries.push(StatusEntry {
            path,
            index: StatusCode::from_char(index),
            worktree: StatusCode::from_char(worktree),
        });
    }

    entries
}
