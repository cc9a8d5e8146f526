use std::collections::HashMap;

use crate::error::Result;

use super::{unquote_path, DiffSide, Repository};

/// Marker numstat prints instead of a count for binary files.
const BINARY_SENTINEL: &str = "-";

/// Per-path line totals across the staged and unstaged diffs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumstatTotals {
    pub added: HashMap<String, usize>,
    pub deleted: HashMap<String, usize>,
    pub binary: HashMap<String, bool>,
}

impl NumstatTotals {
    pub fn added(&self, path: &str) -> usize {
        self.added.get(path).copied().unwrap_or(0)
    }

    pub fn deleted(&self, path: &str) -> usize {
        self.deleted.get(path).copied().unwrap_or(0)
    }

    pub fn is_binary(&self, path: &str) -> bool {
        self.binary.get(path).copied().unwrap_or(false)
    }

    /// Adds one numstat report on top of what is already collected.
    pub fn accumulate(&mut self, output: &str) {
        for line in output.lines() {
            // <added>\t<deleted>\t<path>, or <added>\t<deleted>\t<old>\t<new> for renames
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 3 {
                if !line.trim().is_empty() {
                    tracing::trace!(line, "skipping malformed numstat line");
                }
                continue;
            }

            let add_str = fields[0].trim();
            let del_str = fields[1].trim();
            let path = destination_path(fields[fields.len() - 1]);
            if path.is_empty() {
                continue;
            }

            if add_str == BINARY_SENTINEL || del_str == BINARY_SENTINEL {
                self.binary.insert(path.clone(), true);
            }
            if let Ok(a) = add_str.parse::<usize>() {
                *self.added.entry(path.clone()).or_insert(0) += a;
            }
            if let Ok(d) = del_str.parse::<usize>() {
                *self.deleted.entry(path).or_insert(0) += d;
            }
        }
    }
}

/// Collects both diffs (HEAD..index and index..worktree) into one set of
/// totals. Either query failing fails the whole aggregation.
pub fn get_numstat_totals<R: Repository + ?Sized>(repo: &R) -> Result<NumstatTotals> {
    let staged = repo.numstat(DiffSide::Staged)?;
    let unstaged = repo.numstat(DiffSide::Unstaged)?;

    let mut totals = NumstatTotals::default();
    totals.accumulate(&staged);
    totals.accumulate(&unstaged);
    Ok(totals)
}

/// Resolves git's inline rename notation to the new path:
/// `old => new` and `dir/{old => new}/file`.
fn destination_path(field: &str) -> String {
    let field = unquote_path(field);
    let Some(arrow) = field.find(" => ") else {
        return field;
    };

    if let (Some(open), Some(close)) = (field.find('{'), field.rfind('}')) {
        if open < arrow && arrow < close {
            let prefix = &field[..open];
            let new = &field[arrow + 4..close];
            let suffix = &field[close + 1..];
            // "{old => }" leaves a doubled separator behind
            let joined = format!("{}{}{}", prefix, new, suffix);
            return joined.replace("//", "/");
        }
    }

    field[arrow + 4..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fake::FakeRepo;

    #[test]
    fn test_sums_staged_and_unstaged() {
        let mut totals = NumstatTotals::default();
        totals.accumulate("3\t1\tfoo.go\n");
        totals.accumulate("2\t0\tfoo.go\n");
        assert_eq!(totals.added("foo.go"), 5);
        assert_eq!(totals.deleted("foo.go"), 1);
        assert!(!totals.is_binary("foo.go"));
    }

    #[test]
    fn test_binary_contributes_nothing() {
        let mut totals = NumstatTotals::default();
        totals.accumulate("-\t-\tbin.dat\n");
        assert!(totals.is_binary("bin.dat"));
        assert_eq!(totals.added("bin.dat"), 0);
        assert_eq!(totals.deleted("bin.dat"), 0);
    }

    #[test]
    fn test_mixed_binary_keeps_numeric_side() {
        let mut totals = NumstatTotals::default();
        totals.accumulate("-\t-\tasset.png\n");
        totals.accumulate("4\t-\tasset.png\n");
        assert!(totals.is_binary("asset.png"));
        assert_eq!(totals.added("asset.png"), 4);
        assert_eq!(totals.deleted("asset.png"), 0);
    }

    #[test]
    fn test_short_lines_are_skipped() {
        let mut totals = NumstatTotals::default();
        totals.accumulate("garbage\n1\t2\n7\t3\tok.rs\n");
        assert_eq!(totals.added.len(), 1);
        assert_eq!(totals.added("ok.rs"), 7);
        assert_eq!(totals.deleted("ok.rs"), 3);
    }

    #[test]
    fn test_tab_separated_rename_uses_rightmost_path() {
        let mut totals = NumstatTotals::default();
        totals.accumulate("1\t1\told.go\tnew.go\n");
        assert_eq!(totals.added("new.go"), 1);
        assert_eq!(totals.added("old.go"), 0);
    }

    #[test]
    fn test_inline_rename_notation() {
        assert_eq!(destination_path("old.go => new.go"), "new.go");
        assert_eq!(destination_path("src/{a => b}/lib.rs"), "src/b/lib.rs");
        assert_eq!(destination_path("src/{old => }/lib.rs"), "src/lib.rs");
        assert_eq!(destination_path("{lib => src}/mod.rs"), "src/mod.rs");
        assert_eq!(destination_path("plain.rs"), "plain.rs");
        assert_eq!(destination_path("\"caf\\303\\251.txt\""), "café.txt");
    }

    #[test]
    fn test_escaped_path_joins_on_decoded_name() {
        let mut totals = NumstatTotals::default();
        totals.accumulate("2\t0\t\"caf\\303\\251.txt\"\n");
        assert_eq!(totals.added("café.txt"), 2);
    }

    #[test]
    fn test_empty_report() {
        let mut totals = NumstatTotals::default();
        totals.accumulate("");
        assert_eq!(totals, NumstatTotals::default());
    }

    #[test]
    fn test_get_numstat_totals_reads_both_sides() {
        let repo = FakeRepo::new();
        repo.set_numstat(DiffSide::Staged, "3\t1\tfoo.go\n");
        repo.set_numstat(DiffSide::Unstaged, "2\t0\tfoo.go\n1\t1\tbar.go\n");
        let totals = get_numstat_totals(&repo).unwrap();
        assert_eq!(totals.added("foo.go"), 5);
        assert_eq!(totals.deleted("foo.go"), 1);
        assert_eq!(totals.added("bar.go"), 1);
    }

    #[test]
    fn test_get_numstat_totals_fails_as_a_whole() {
        let repo = FakeRepo::new();
        repo.set_numstat(DiffSide::Staged, "3\t1\tfoo.go\n");
        repo.fail_numstat(DiffSide::Unstaged, "fatal: bad object");
        assert!(get_numstat_totals(&repo).is_err());
    }
}
