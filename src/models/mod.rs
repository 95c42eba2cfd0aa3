//! Data models for the chat client.
//!
//! - [`Session`] - A persisted conversation thread as listed by the backend
//! - [`Message`] - A persisted message as returned by the history endpoints
//! - [`ChatRecord`] - A rendered message held in the client's ordered history
//! - [`Role`] - Author of a message
//!
//! Server timestamps arrive in several shapes (RFC 2822 from Flask, RFC 3339,
//! epoch milliseconds); the tolerant deserializers live in `deserializers`.

pub mod deserializers;
pub mod message;
pub mod session;

pub use message::{ChatRecord, Message, Role};
pub use session::Session;
