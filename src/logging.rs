//! File logging
//!
//! The TUI owns stdout, so tracing output goes to
//! `<data_dir>/devops-gpt/devops-gpt.log`. Filter with `DEVOPS_GPT_LOG`
//! (same syntax as `RUST_LOG`), default `info`.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub const ENV_LOG_FILTER: &str = "DEVOPS_GPT_LOG";

pub fn log_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("devops-gpt").join("devops-gpt.log"))
}

/// Install the global subscriber. Returns the log file path.
pub fn init() -> Result<PathBuf> {
    let path = log_path().context("Could not determine data directory for logs")?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).context("Failed to create log directory")?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env(ENV_LOG_FILTER).unwrap_or_else(|_| "info".into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))?;

    Ok(path)
}
