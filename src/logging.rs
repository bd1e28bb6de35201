//! Tracing setup.
//!
//! The CLI logs to stderr. The TUI owns the terminal, so it logs to a file
//! under the local data directory instead.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "summa-url.log";

fn filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "summa_url=debug" } else { "warn" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to stderr; returns false when a subscriber was already installed
pub fn init_stderr(verbose: bool) -> bool {
    match tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .try_init()
    {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(error = %e, "tracing subscriber already installed");
            false
        }
    }
}

/// Log to the data-dir log file; returns its path when logging was set up
pub fn init_file(verbose: bool) -> Option<PathBuf> {
    let path = log_path()?;
    let file = open_log(&path).ok()?;
    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .ok()?;
    Some(path)
}

fn log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("summa-url").join(LOG_FILE))
}

fn open_log(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
