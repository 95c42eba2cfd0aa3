//! Scripted in-memory backend for controller and task tests.

use std::collections::HashMap;
use std::sync::Mutex;

use super::client::ChatBackend;
use super::error::{ApiError, ApiResult};
use super::wire::{ChatReply, HealthStatus, MessagePage, NewChat, SessionList};

/// Each endpoint answers with its scripted value; `Err(code)` becomes an
/// [`ApiError::Status`] with that code.
pub(crate) struct MockBackend {
    pub sessions: Mutex<Result<SessionList, u16>>,
    pub session_pages: Mutex<HashMap<String, MessagePage>>,
    pub history: Mutex<Result<MessagePage, u16>>,
    pub chat: Mutex<Result<ChatReply, u16>>,
    pub new_chat: Mutex<Result<NewChat, u16>>,
    pub delete: Mutex<Result<(), u16>>,
    pub clear: Mutex<Result<(), u16>>,
    calls: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(Ok(SessionList { success: true, sessions: Vec::new() })),
            session_pages: Mutex::new(HashMap::new()),
            history: Mutex::new(Ok(MessagePage { success: true, ..Default::default() })),
            chat: Mutex::new(Ok(ChatReply {
                success: true,
                response: "Stay hydrated.".to_string(),
                timestamp: Some("09:05 AM".to_string()),
                source: Some("Medical Book".to_string()),
                error: None,
            })),
            new_chat: Mutex::new(Ok(NewChat { success: true, session_id: Some("fresh".to_string()) })),
            delete: Mutex::new(Ok(())),
            clear: Mutex::new(Ok(())),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

fn scripted<T: Clone>(endpoint: &str, slot: &Mutex<Result<T, u16>>) -> ApiResult<T> {
    slot.lock()
        .unwrap()
        .clone()
        .map_err(|status| ApiError::Status { endpoint: endpoint.to_string(), status })
}

impl ChatBackend for MockBackend {
    fn list_sessions(&self) -> ApiResult<SessionList> {
        self.record("list_sessions");
        scripted("/api/sessions", &self.sessions)
    }

    fn session_messages(&self, session_id: &str) -> ApiResult<MessagePage> {
        self.record(format!("session_messages:{}", session_id));
        self.session_pages
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .ok_or(ApiError::Status { endpoint: "/api/session".to_string(), status: 404 })
    }

    fn current_history(&self) -> ApiResult<MessagePage> {
        self.record("current_history");
        scripted("/api/history", &self.history)
    }

    fn delete_session(&self, session_id: &str) -> ApiResult<()> {
        self.record(format!("delete_session:{}", session_id));
        scripted("/api/session", &self.delete)
    }

    fn send_chat(&self, message: &str) -> ApiResult<ChatReply> {
        self.record(format!("send_chat:{}", message));
        scripted("/api/chat", &self.chat)
    }

    fn new_chat(&self) -> ApiResult<NewChat> {
        self.record("new_chat");
        scripted("/api/new-chat", &self.new_chat)
    }

    fn clear(&self) -> ApiResult<()> {
        self.record("clear");
        scripted("/api/clear", &self.clear)
    }

    fn health(&self) -> ApiResult<HealthStatus> {
        self.record("health");
        Ok(HealthStatus { status: "healthy".to_string(), service: Some("CareMate".to_string()) })
    }
}
