mod app;
mod config;
mod error;
mod git;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::git::{GitCli, UntrackedMode};

#[derive(Parser, Debug)]
#[command(
    name = "gitadd",
    about = "Interactive git add/reset for the files in your working tree",
    version
)]
struct Args {
    /// Untracked files to list
    #[arg(long, value_enum, value_name = "MODE")]
    untracked: Option<UntrackedMode>,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Directory inside the repository (default: current directory)
    path: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(err) => {
            eprintln!("gitadd: ignoring config: {:#}", err);
            (Config::default(), Some(format!("{:#}", err)))
        }
    };

    if let Some(log_file) = args.log_file.as_ref().or(config.log.file.as_ref()) {
        init_tracing(log_file)?;
    }
    if let Some(err) = config_error {
        tracing::warn!(error = %err, "ignoring config");
    }

    let untracked = resolve_untracked(args.untracked, &config.git.untracked);
    let start = args.path.unwrap_or_else(|| PathBuf::from("."));

    // ── Initial load: failure here ends the program ─────────────────────
    let app = GitCli::discover(&config.git.program, &start, untracked)
        .and_then(|repo| {
            tracing::info!(root = %repo.repo_root().display(), "opening repository");
            app::App::new(repo, config.ui.show_legend)
        });
    let mut app = match app {
        Ok(app) => app,
        Err(err) => {
            tracing::error!(error = %err, "initial load failed");
            eprintln!("gitadd: {}", err);
            std::process::exit(1);
        }
    };

    // ── Setup terminal ──────────────────────────────────────────────────
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    // ── Restore terminal (always, even on error) ────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("gitadd: {:#}", err);
        std::process::exit(1);
    }

    Ok(())
}

/// The flag wins over the config. An unrecognized config value falls back
/// to `normal` with a warning on stderr and in the log.
fn resolve_untracked(flag: Option<UntrackedMode>, configured: &str) -> UntrackedMode {
    if let Some(mode) = flag {
        return mode;
    }
    UntrackedMode::parse(configured).unwrap_or_else(|| {
        eprintln!(
            "gitadd: unknown [git] untracked = {:?} in config, using \"normal\"",
            configured
        );
        tracing::warn!(value = configured, "unknown untracked mode in config");
        UntrackedMode::Normal
    })
}

fn init_tracing(log_path: &Path) -> Result<()> {
    use std::fs::File;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let file = File::options()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file)),
        )
        .with(filter)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untracked_flag_rejects_unknown_mode() {
        assert!(Args::try_parse_from(["gitadd", "--untracked", "bogus"]).is_err());
        let args = Args::try_parse_from(["gitadd", "--untracked", "all"]).unwrap();
        assert_eq!(args.untracked, Some(UntrackedMode::All));
    }

    #[test]
    fn test_flag_overrides_config() {
        assert_eq!(resolve_untracked(Some(UntrackedMode::No), "all"), UntrackedMode::No);
        assert_eq!(resolve_untracked(None, "all"), UntrackedMode::All);
    }

    #[test]
    fn test_unknown_config_mode_falls_back_to_normal() {
        assert_eq!(resolve_untracked(None, "bogus"), UntrackedMode::Normal);
    }
}
