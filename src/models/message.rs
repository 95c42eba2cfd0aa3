use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::deserializers::{null_as_default, parse_timestamp_str};

/// Clock format used for message timestamps ("09:05 AM")
pub const CLOCK_FORMAT: &str = "%I:%M %p";

/// Author of a message. Any role other than `user` renders as the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Role {
    User,
    Assistant,
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("user") { Role::User } else { Role::Assistant }
    }
}

impl Role {
    /// Sender label used in rendered bubbles and transcripts
    pub fn sender_label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "MediGenius",
        }
    }
}

/// Persisted message as returned by `/api/history` and `/api/session/:id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    pub role: Role,
    #[serde(default, deserialize_with = "timestamp_as_text")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Timestamps may be strings or epoch numbers on the wire; keep the text form
fn timestamp_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// A message as rendered in the chat view and kept for export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRecord {
    pub content: String,
    pub role: Role,
    /// Display form of the timestamp
    pub timestamp: String,
    pub source: Option<String>,
}

impl ChatRecord {
    pub fn new(
        content: impl Into<String>,
        role: Role,
        timestamp: Option<&str>,
        source: Option<String>,
    ) -> Self {
        Self {
            content: content.into(),
            role,
            timestamp: display_timestamp(timestamp, Utc::now()),
            source: source.filter(|s| !s.is_empty()),
        }
    }
}

impl From<Message> for ChatRecord {
    fn from(message: Message) -> Self {
        ChatRecord::new(message.content, message.role, message.timestamp.as_deref(), message.source)
    }
}

/// Resolve the text shown next to a message.
///
/// Full dates are rendered as a local clock time; anything else the server
/// sends (it already formats chat replies as "09:05 AM") is shown verbatim.
/// A missing timestamp means "now".
pub fn display_timestamp(raw: Option<&str>, now: DateTime<Utc>) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(text) => match parse_timestamp_str(text) {
            Some(ts) => ts.with_timezone(&Local).format(CLOCK_FORMAT).to_string(),
            None => text.to_string(),
        },
        None => now.with_timezone(&Local).format(CLOCK_FORMAT).to_string(),
    }
}
