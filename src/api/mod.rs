//! Backend REST API access.
//!
//! [`ChatBackend`] is the seam between the chat view and the server: the TUI
//! and the CLI talk to it, [`HttpBackend`] implements it over reqwest, and the
//! controller tests substitute a scripted implementation.
//!
//! Non-success payloads (`"success": false`) are returned as values so the
//! caller decides how to surface them; only transport, status and decoding
//! failures become [`ApiError`]s.

pub mod client;
pub mod error;
#[cfg(test)]
pub(crate) mod mock;
pub mod wire;

pub use client::{ChatBackend, HttpBackend};
pub use error::{ApiError, ApiResult};
pub use wire::{ChatReply, ChatRequest, HealthStatus, MessagePage, NewChat, SessionList};
