use crate::error::Result;

use super::numstat::{get_numstat_totals, NumstatTotals};
use super::status::{get_status, StatusCode, StatusEntry};
use super::Repository;

/// A path with pending changes, as shown in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub index: StatusCode,
    pub worktree: StatusCode,
    pub added: usize,
    pub deleted: usize,
    pub binary: bool,
}

/// Joins the status listing with the numstat totals. The result has exactly
/// one record per status entry, in status order; numstat-only paths are dropped.
pub fn reconcile(entries: Vec<StatusEntry>, totals: &NumstatTotals) -> Vec<FileChange> {
    entries
        .into_iter()
        .map(|entry| FileChange {
            added: totals.added(&entry.path),
            deleted: totals.deleted(&entry.path),
            binary: totals.is_binary(&entry.path),
            path: entry.path,
            index: entry.index,
            worktree: entry.worktree,
        })
        .collect()
}

/// One full load cycle: status, staged numstat, unstaged numstat, join.
pub fn load_changes<R: Repository + ?Sized>(repo: &R) -> Result<Vec<FileChange>> {
    let entries = get_status(repo)?;
    let totals = get_numstat_totals(repo)?;
    let files = reconcile(entries, &totals);
    tracing::info!(files = files.len(), "loaded working tree changes");
    Ok(files)
}
