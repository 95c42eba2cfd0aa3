//! File-backed tracing setup.
//!
//! The interactive client owns the terminal's alternate screen, so log lines
//! go to `<state_dir>/medigenius-chat.log` instead of stderr. Level comes
//! from `RUST_LOG`, defaulting to `info,medigenius_chat=debug`.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,medigenius_chat=debug";

/// Install the global subscriber writing to `log_path`.
///
/// Fails if the file cannot be opened or a subscriber is already installed.
pub fn init(log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent).context("Failed to create log directory")?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let fmt_layer = fmt::layer().with_target(true).with_ansi(false).with_writer(Mutex::new(file));
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
