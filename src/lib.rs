//! MediGenius Chat - terminal client for the MediGenius medical assistant
//!
//! This library drives a chat backend's REST API from the terminal. It
//! provides:
//!
//! - A typed client for the backend (`/api/chat`, `/api/sessions`, ...)
//! - An interactive ratatui chat window with a session sidebar, toasts and
//!   persisted theme/sidebar preferences
//! - Plain-text transcript export
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use medigenius_chat::{ChatBackend, HttpBackend};
//!
//! let backend = HttpBackend::new("http://127.0.0.1:5000", Duration::from_secs(30))?;
//! for session in backend.list_sessions()?.sessions {
//!     println!("{}: {}", session.session_id, session.title());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod logging;
pub mod models;
pub mod preferences;
pub mod transcript;
pub mod tui;
pub mod utils;

// Re-export commonly used types
pub use api::{ApiError, ChatBackend, HttpBackend};
pub use config::ClientConfig;
pub use models::{ChatRecord, Message, Role, Session};
pub use transcript::{render_transcript, save_transcript};
pub use utils::paths::format_path_with_tilde;
