//! Request and response envelopes for the backend endpoints.
//!
//! The server omits `success` on some paths (e.g. `/api/history` with no
//! active session) and sends `{"error": ...}` bodies on failures, so every
//! flag defaults to `false` and every list defaults to empty.

use serde::{Deserialize, Serialize};

use crate::models::deserializers::null_as_default;
use crate::models::{Message, Session};

/// `POST /api/chat` body
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

/// `POST /api/chat` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub response: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /api/sessions` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SessionList {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sessions: Vec<Session>,
}

/// `GET /api/history` and `GET /api/session/:id` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessagePage {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// `POST /api/new-chat` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewChat {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// `GET /api/health` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}
