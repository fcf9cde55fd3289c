//! Structured JSON logging
//!
//! CLI commands log to stderr. The TUI owns the terminal, so it logs to
//! `~/.acctdash/acctdash.log` instead.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::BaseDirs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::types::{DashboardError, Result};

const LOG_ENV: &str = "ACCTDASH_LOG";
const DEFAULT_FILTER: &str = "acctdash=info";

/// `ACCTDASH_LOG`, then `RUST_LOG`, then the default filter
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Default log file location
pub fn default_log_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new()
        .ok_or_else(|| DashboardError::Config("Cannot determine home directory".into()))?;
    Ok(base_dirs.home_dir().join(".acctdash").join("acctdash.log"))
}

/// Log JSON events to stderr
pub fn init_stderr() -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| DashboardError::Config(format!("logging already initialized: {}", e)))
}

/// Append JSON events to `path`, creating parent directories
pub fn init_file(path: &Path) -> Result<()> {
    let file = open_log_file(path)?;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| DashboardError::Config(format!("logging already initialized: {}", e)))
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_log_path() {
        if let Ok(path) = default_log_path() {
            assert!(path.ends_with(".acctdash/acctdash.log"));
        }
    }

    #[test]
    fn test_open_log_file_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("acctdash.log");

        open_log_file(&path).unwrap();

        assert!(path.exists());
    }
}
