//! Interactive chat window
mod app;
mod events;
mod layout;
mod rendering;
mod tasks;
mod terminal;
mod theme;
mod timestamps;

use std::sync::Arc;

use anyhow::Result;
pub use app::{App, AppOptions, SendState};
use tracing::info;

use crate::api::{ChatBackend, HttpBackend};
use crate::config::ClientConfig;
use crate::preferences::{PreferenceStore, ViewPreferences};
use terminal::TerminalManager;
pub use timestamps::{format_last_active, format_time_ago};

/// Run the interactive chat client until the user quits
pub fn run_interactive(config: &ClientConfig) -> Result<()> {
    let backend: Arc<dyn ChatBackend> =
        Arc::new(HttpBackend::new(&config.server_url, config.timeout)?);
    let store = PreferenceStore::open(&config.state_dir);
    info!(
        server = %config.server_url,
        preferences = %store.path().display(),
        "starting chat client"
    );
    let prefs = ViewPreferences::load(store);

    let mut app = App::new(backend, prefs, AppOptions::from(config));
    app.start();

    let mut manager = TerminalManager::new()?;
    let res = app.run(manager.terminal_mut());
    manager.restore()?;

    res
}
