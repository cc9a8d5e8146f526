//! In-memory `Repository` for tests.
//!
//! Keeps a list of `(path, index, worktree)` entries and renders them as
//! porcelain text. `add` and `reset` move entries between the two columns
//! roughly the way git does, so a stage followed by a reload shows the
//! new state.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{GitError, Result};

use super::{DiffSide, Repository};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Status,
    Numstat(DiffSide),
    Add(Vec<String>),
    Reset(Vec<String>),
}

#[derive(Debug, Default)]
pub struct FakeRepo {
    entries: RefCell<Vec<(String, char, char)>>,
    numstat: RefCell<HashMap<DiffSide, String>>,
    status_error: RefCell<Option<String>>,
    numstat_error: RefCell<HashMap<DiffSide, String>>,
    mutation_error: RefCell<Option<String>>,
    calls: RefCell<Vec<Call>>,
}

impl FakeRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(entries: &[(&str, char, char)]) -> Self {
        let repo = Self::new();
        repo.set_entries(entries);
        repo
    }

    pub fn set_entries(&self, entries: &[(&str, char, char)]) {
        *self.entries.borrow_mut() = entries
            .iter()
            .map(|(p, x, y)| (p.to_string(), *x, *y))
            .collect();
    }

    pub fn set_numstat(&self, side: DiffSide, text: &str) {
        self.numstat.borrow_mut().insert(side, text.to_string());
    }

    pub fn fail_status(&self, stderr: &str) {
        *self.status_error.borrow_mut() = Some(stderr.to_string());
    }

    pub fn fail_numstat(&self, side: DiffSide, stderr: &str) {
        self.numstat_error
            .borrow_mut()
            .insert(side, stderr.to_string());
    }

    pub fn fail_mutations(&self, stderr: &str) {
        *self.mutation_error.borrow_mut() = Some(stderr.to_string());
    }

    pub fn clear_failures(&self) {
        *self.status_error.borrow_mut() = None;
        self.numstat_error.borrow_mut().clear();
        *self.mutation_error.borrow_mut() = None;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Only the mutating calls, in order.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Add(_) | Call::Reset(_)))
            .collect()
    }

    fn check_mutation(&self, args: &[&str]) -> Result<()> {
        match self.mutation_error.borrow().as_ref() {
            Some(stderr) => Err(GitError::subprocess_failure("git", args, stderr.clone())),
            None => Ok(()),
        }
    }
}

impl Repository for FakeRepo {
    fn status(&self) -> Result<String> {
        self.calls.borrow_mut().push(Call::Status);
        if let Some(stderr) = self.status_error.borrow().as_ref() {
            return Err(GitError::subprocess_failure(
                "git",
                &["status", "--porcelain"],
                stderr.clone(),
            ));
        }
        Ok(self
            .entries
            .borrow()
            .iter()
            .map(|(p, x, y)| format!("{}{} {}\n", x, y, p))
            .collect())
    }

    fn numstat(&self, side: DiffSide) -> Result<String> {
        self.calls.borrow_mut().push(Call::Numstat(side));
        if let Some(stderr) = self.numstat_error.borrow().get(&side) {
            return Err(GitError::subprocess_failure(
                "git",
                &["diff", "--numstat"],
                stderr.clone(),
            ));
        }
        Ok(self.numstat.borrow().get(&side).cloned().unwrap_or_default())
    }

    fn add(&self, paths: &[String]) -> Result<()> {
        self.calls.borrow_mut().push(Call::Add(paths.to_vec()));
        self.check_mutation(&["add", "--"])?;
        for (path, x, y) in self.entries.borrow_mut().iter_mut() {
            if !paths.contains(path) || *y == ' ' {
                continue;
            }
            *x = match (*x, *y) {
                ('?', '?') => 'A',
                (' ', wt) => wt,
                (idx, _) => idx,
            };
            *y = ' ';
        }
        Ok(())
    }

    fn reset(&self, paths: &[String]) -> Result<()> {
        self.calls.borrow_mut().push(Call::Reset(paths.to_vec()));
        self.check_mutation(&["reset", "--"])?;
        for (path, x, y) in self.entries.borrow_mut().iter_mut() {
            if !paths.contains(path) || *x == ' ' || *x == '?' {
                continue;
            }
            if *x == 'A' && *y == ' ' {
                *x = '?';
                *y = '?';
            } else {
                if *y == ' ' {
                    *y = *x;
                }
                *x = ' ';
            }
        }
        Ok(())
    }
}
