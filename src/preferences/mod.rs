//! Persistent view preferences.
//!
//! A flat string key-value file plays the role a browser's local storage
//! would: `preferences.json` in the state directory holds `theme` and
//! `sidebarOpen`. Writes go through a temp file + rename so a crash never
//! leaves a half-written file behind.
//!
//! State location defaults to the platform config directory
//! - macOS: `~/Library/Application Support/medigenius-chat/`
//! - Linux: `~/.config/medigenius-chat/`
//! - Windows: `%APPDATA%\medigenius-chat\`

pub mod store;
pub mod view;

pub use store::PreferenceStore;
pub use view::{Theme, ViewPreferences};
