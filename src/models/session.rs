use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Preview shown for sessions the backend has no first user message for
pub const EMPTY_PREVIEW: &str = "New conversation";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default, deserialize_with = "crate::models::deserializers::deserialize_optional_timestamp")]
    pub last_active: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::models::deserializers::deserialize_optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Sidebar title: the preview, or a placeholder for empty sessions
    pub fn title(&self) -> &str {
        match self.preview.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => EMPTY_PREVIEW,
        }
    }
}
