use crate::error::Result;

use super::Repository;

// These only talk to the repository. The caller reloads the model afterwards.

/// Add the given paths to the index (`git add -- <paths>`).
pub fn stage<R: Repository + ?Sized>(repo: &R, paths: &[String]) -> Result<()> {
    if paths.is_empty() {
        return Ok(());
    }
    tracing::info!(count = paths.len(), "staging paths");
    repo.add(paths)
}

/// Reset the given paths in the index back to HEAD (`git reset -- <paths>`).
pub fn unstage<R: Repository + ?Sized>(repo: &R, paths: &[String]) -> Result<()> {
    if paths.is_empty() {
        return Ok(());
    }
    tracing::info!(count = paths.len(), "unstaging paths");
    repo.reset(paths)
}
