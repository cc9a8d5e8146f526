use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Terminal};
use std::time::Duration;

use crate::git::apply;
use crate::git::reconcile::{load_changes, FileChange};
use crate::git::Repository;

// ─── Mode ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Browsing,
    /// Typing into the path filter.
    Filtering,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mutation {
    Stage,
    Unstage,
}

impl Mutation {
    fn describe(&self, paths: &[String]) -> String {
        let verb = match self {
            Mutation::Stage => "Staged",
            Mutation::Unstage => "Unstaged",
        };
        match paths {
            [single] => format!("{}: {}", verb, single),
            _ => format!("{} {} files", verb, paths.len()),
        }
    }
}

// ─── App ───────────────────────────────────────────────────────────────────

pub struct App<R: Repository> {
    pub should_quit: bool,
    pub mode: AppMode,
    pub show_legend: bool,
    repo: R,

    // List state, replaced wholesale on every load cycle
    pub files: Vec<FileChange>,
    pub visible: Vec<usize>,
    pub cursor: usize,
    pub filter: String,
    pub list_height: usize,

    // Status bar
    pub status_message: Option<String>,
    pub error_message: Option<String>,
}

impl<R: Repository> App<R> {
    /// Runs the first load cycle. Unlike later refreshes, a failure here is
    /// returned to the caller.
    pub fn new(repo: R, show_legend: bool) -> crate::error::Result<Self> {
        let files = load_changes(&repo)?;
        let mut app = App {
            should_quit: false,
            mode: AppMode::Browsing,
            show_legend,
            repo,
            files,
            visible: Vec::new(),
            cursor: 0,
            filter: String::new(),
            list_height: 20,
            status_message: None,
            error_message: None,
        };
        app.rebuild_visible();
        Ok(app)
    }

    // ─── Visible list ────────────────────────────────────────────────────

    pub fn rebuild_visible(&mut self) {
        let needle = self.filter.to_lowercase();
        self.visible = self
            .files
            .iter()
            .enumerate()
            .filter(|(_, f)| needle.is_empty() || f.path.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
    }

    fn clamp_cursor(&mut self) {
        if self.visible.is_empty() {
            self.cursor = 0;
        } else if self.cursor >= self.visible.len() {
            self.cursor = self.visible.len() - 1;
        }
    }

    /// Cursor position within the visible rows, `None` when nothing is shown.
    pub fn selected(&self) -> Option<usize> {
        if self.visible.is_empty() {
            None
        } else {
            Some(self.cursor)
        }
    }

    pub fn current_file(&self) -> Option<&FileChange> {
        self.visible
            .get(self.cursor)
            .and_then(|&idx| self.files.get(idx))
    }

    pub fn visible_files(&self) -> impl Iterator<Item = &FileChange> {
        self.visible.iter().filter_map(|&idx| self.files.get(idx))
    }

    fn visible_paths(&self) -> Vec<String> {
        self.visible_files().map(|f| f.path.clone()).collect()
    }

    // ─── Main event loop ─────────────────────────────────────────────────

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            let size = terminal.size()?;
            // title + error line + footer
            let footer = if self.show_legend { 2 } else { 1 };
            self.list_height = size.height.saturating_sub(2 + footer).max(1) as usize;

            terminal.draw(|f| crate::ui::render(f, self))?;

            if crossterm::event::poll(Duration::from_millis(50))? {
                if let crossterm::event::Event::Key(key) = crossterm::event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }
        Ok(())
    }

    // ─── Key handling ────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.error_message = None;
        self.status_message = None;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.mode {
            AppMode::Browsing => self.handle_key_browsing(key),
            AppMode::Filtering => self.handle_key_filtering(key),
        }
    }

    fn handle_key_browsing(&mut self, key: KeyEvent) {
        let page = self.list_height.max(1);
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                if self.filter.is_empty() {
                    self.should_quit = true;
                } else {
                    self.set_filter(String::new());
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(1),
            KeyCode::PageDown => self.move_down(page),
            KeyCode::PageUp => self.move_up(page),
            KeyCode::Char('g') | KeyCode::Home => self.cursor = 0,
            KeyCode::Char('G') | KeyCode::End => {
                self.cursor = self.visible.len().saturating_sub(1);
            }
            KeyCode::Char('r') => {
                if self.refresh() {
                    self.status_message = Some(format!("Refreshed ({} files)", self.files.len()));
                }
            }
            KeyCode::Char('l') | KeyCode::Right => self.stage_selected(),
            KeyCode::Char('h') | KeyCode::Left => self.unstage_selected(),
            KeyCode::Char('a') => self.stage_all(),
            KeyCode::Char('u') => self.unstage_all(),
            KeyCode::Char('/') => self.mode = AppMode::Filtering,
            _ => {}
        }
    }

    fn handle_key_filtering(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.mode = AppMode::Browsing,
            KeyCode::Esc => {
                self.mode = AppMode::Browsing;
                self.set_filter(String::new());
            }
            KeyCode::Backspace => {
                let mut filter = self.filter.clone();
                filter.pop();
                self.set_filter(filter);
            }
            KeyCode::Char(c) => {
                let mut filter = self.filter.clone();
                filter.push(c);
                self.set_filter(filter);
            }
            _ => {}
        }
    }

    fn set_filter(&mut self, filter: String) {
        self.filter = filter;
        self.cursor = 0;
        self.rebuild_visible();
    }

    fn move_down(&mut self, n: usize) {
        if !self.visible.is_empty() {
            self.cursor = (self.cursor + n).min(self.visible.len() - 1);
        }
    }

    fn move_up(&mut self, n: usize) {
        self.cursor = self.cursor.saturating_sub(n);
    }

    // ─── Load cycle ──────────────────────────────────────────────────────

    /// Reloads everything from the repository. On failure the previous list
    /// stays on screen and the error is shown.
    pub fn refresh(&mut self) -> bool {
        match load_changes(&self.repo) {
            Ok(files) => {
                self.files = files;
                self.rebuild_visible();
                self.clamp_cursor();
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "refresh failed");
                self.error_message = Some(e.to_string());
                false
            }
        }
    }

    // ─── Staging ─────────────────────────────────────────────────────────

    fn stage_selected(&mut self) {
        if let Some(path) = self.current_file().map(|f| f.path.clone()) {
            self.mutate(Mutation::Stage, vec![path]);
        }
    }

    fn unstage_selected(&mut self) {
        if let Some(path) = self.current_file().map(|f| f.path.clone()) {
            self.mutate(Mutation::Unstage, vec![path]);
        }
    }

    fn stage_all(&mut self) {
        let paths = self.visible_paths();
        self.mutate(Mutation::Stage, paths);
    }

    fn unstage_all(&mut self) {
        let paths = self.visible_paths();
        self.mutate(Mutation::Unstage, paths);
    }

    /// Applies the mutation, then reloads. A failed mutation skips the reload.
    /// A failed reload after a successful mutation leaves the old list shown.
    fn mutate(&mut self, mutation: Mutation, paths: Vec<String>) {
        if paths.is_empty() {
            return;
        }
        let result = match mutation {
            Mutation::Stage => apply::stage(&self.repo, &paths),
            Mutation::Unstage => apply::unstage(&self.repo, &paths),
        };
        match result {
            Ok(()) => {
                if self.refresh() {
                    self.status_message = Some(mutation.describe(&paths));
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, ?mutation, "git mutation failed");
                self.error_message = Some(e.to_string());
            }
        }
    }
}
