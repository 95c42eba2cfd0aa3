//! Resolved runtime configuration.
//!
//! Command-line flags and their environment fallbacks are declared in
//! [`crate::cli`]; this module owns the defaults and the resolved shape the
//! rest of the client consumes.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const APP_DIR_NAME: &str = "medigenius-chat";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Prompts offered on the welcome screen (F1..F4)
pub const DEFAULT_QUICK_QUESTIONS: [&str; 4] = [
    "What are the symptoms of diabetes?",
    "How can I lower my blood pressure naturally?",
    "What should I do for a persistent headache?",
    "When should I see a doctor for a fever?",
];

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    /// Preferences and log file live here
    pub state_dir: PathBuf,
    /// Where chat exports are written
    pub download_dir: PathBuf,
    pub timeout: Duration,
    pub quick_questions: Vec<String>,
}

impl ClientConfig {
    pub fn log_path(&self) -> PathBuf {
        self.state_dir.join(format!("{}.log", APP_DIR_NAME))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            state_dir: PathBuf::from("."),
            download_dir: PathBuf::from("."),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            quick_questions: default_quick_questions(),
        }
    }
}

pub fn default_quick_questions() -> Vec<String> {
    DEFAULT_QUICK_QUESTIONS.iter().map(|q| q.to_string()).collect()
}

/// Platform config directory for the client (`~/.config/medigenius-chat` on Linux)
pub fn default_state_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Failed to get platform config directory")?;
    Ok(base.join(APP_DIR_NAME))
}

/// The user's download directory, or the working directory when the platform has none
pub fn default_download_dir() -> Result<PathBuf> {
    match dirs::download_dir() {
        Some(dir) => Ok(dir),
        None => env::current_dir().context("Failed to resolve current directory"),
    }
}
