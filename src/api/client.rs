use std::time::Duration;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::{ApiError, ApiResult};
use super::wire::{ChatReply, ChatRequest, HealthStatus, MessagePage, NewChat, SessionList};

// Characters escaped when a session id is placed in a single path segment
const SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\');

/// Operations the chat view needs from the backend.
///
/// Implementations must be shareable across the worker threads that run
/// requests off the UI thread.
pub trait ChatBackend: Send + Sync {
    /// `GET /api/sessions`
    fn list_sessions(&self) -> ApiResult<SessionList>;
    /// `GET /api/session/:id`; also makes the session current server-side
    fn session_messages(&self, session_id: &str) -> ApiResult<MessagePage>;
    /// `GET /api/history` for the server's current session
    fn current_history(&self) -> ApiResult<MessagePage>;
    /// `DELETE /api/session/:id`
    fn delete_session(&self, session_id: &str) -> ApiResult<()>;
    /// `POST /api/chat`
    fn send_chat(&self, message: &str) -> ApiResult<ChatReply>;
    /// `POST /api/new-chat`
    fn new_chat(&self) -> ApiResult<NewChat>;
    /// `POST /api/clear`
    fn clear(&self) -> ApiResult<()>;
    /// `GET /api/health`
    fn health(&self) -> ApiResult<HealthStatus>;
}

/// Blocking HTTP implementation of [`ChatBackend`].
///
/// The server keeps the "current conversation" in a cookie-backed session,
/// so the client carries a cookie store for its whole lifetime.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    http: Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let base_url = normalize_base_url(base_url)?;
        let http = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(ApiError::Transport)?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> ApiResult<Url> {
        self.base_url.join(path).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// Send a request and decode its JSON body whatever the status code.
    ///
    /// The server answers failures with a JSON body that lacks `success`, which
    /// decodes to an unsuccessful envelope. A non-JSON body on an error status
    /// is reported as a status error.
    fn fetch_json<T: DeserializeOwned>(&self, endpoint: &str, request: RequestBuilder) -> ApiResult<T> {
        debug!(endpoint, "backend request");
        let response = request.send().map_err(|e| {
            warn!(endpoint, error = %e, "backend request failed");
            ApiError::Transport(e)
        })?;
        let status = response.status();
        let body = response.text().map_err(ApiError::Transport)?;

        match serde_json::from_str(&body) {
            Ok(value) => {
                debug!(endpoint, status = status.as_u16(), "backend response");
                Ok(value)
            }
            Err(_) if !status.is_success() => {
                warn!(endpoint, status = status.as_u16(), "backend returned error status");
                Err(ApiError::Status { endpoint: endpoint.to_string(), status: status.as_u16() })
            }
            Err(e) => {
                warn!(endpoint, error = %e, "backend response did not decode");
                Err(ApiError::Decode { endpoint: endpoint.to_string(), message: e.to_string() })
            }
        }
    }

    /// Send a request whose only contract is a 2xx status, returning the body
    fn expect_ok(&self, endpoint: &str, request: RequestBuilder) -> ApiResult<String> {
        debug!(endpoint, "backend request");
        let response = request.send().map_err(|e| {
            warn!(endpoint, error = %e, "backend request failed");
            ApiError::Transport(e)
        })?;
        let status = response.status();
        if !status.is_success() {
            warn!(endpoint, status = status.as_u16(), "backend returned error status");
            return Err(ApiError::Status { endpoint: endpoint.to_string(), status: status.as_u16() });
        }
        response.text().map_err(ApiError::Transport)
    }
}

impl ChatBackend for HttpBackend {
    fn list_sessions(&self) -> ApiResult<SessionList> {
        let url = self.url("api/sessions")?;
        self.fetch_json("/api/sessions", self.http.get(url))
    }

    fn session_messages(&self, session_id: &str) -> ApiResult<MessagePage> {
        let url = self.url(&session_path(session_id))?;
        self.fetch_json("/api/session", self.http.get(url))
    }

    fn current_history(&self) -> ApiResult<MessagePage> {
        let url = self.url("api/history")?;
        self.fetch_json("/api/history", self.http.get(url))
    }

    fn delete_session(&self, session_id: &str) -> ApiResult<()> {
        let url = self.url(&session_path(session_id))?;
        self.expect_ok("/api/session", self.http.delete(url)).map(|_| ())
    }

    fn send_chat(&self, message: &str) -> ApiResult<ChatReply> {
        let url = self.url("api/chat")?;
        self.fetch_json("/api/chat", self.http.post(url).json(&ChatRequest { message }))
    }

    fn new_chat(&self) -> ApiResult<NewChat> {
        let url = self.url("api/new-chat")?;
        let body = self.expect_ok("/api/new-chat", self.http.post(url))?;
        // A 2xx is the contract; the returned id is a bonus
        Ok(serde_json::from_str(&body).unwrap_or(NewChat { success: true, session_id: None }))
    }

    fn clear(&self) -> ApiResult<()> {
        let url = self.url("api/clear")?;
        self.expect_ok("/api/clear", self.http.post(url)).map(|_| ())
    }

    fn health(&self) -> ApiResult<HealthStatus> {
        let url = self.url("api/health")?;
        let body = self.expect_ok("/api/health", self.http.get(url))?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            endpoint: "/api/health".to_string(),
            message: e.to_string(),
        })
    }
}

/// Parse the server URL and make sure its path ends in `/` so relative joins
/// keep any mount prefix (`http://host/chat` + `api/x` → `http://host/chat/api/x`)
fn normalize_base_url(raw: &str) -> ApiResult<Url> {
    let mut url = Url::parse(raw.trim()).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl(format!("{}: not a base URL", raw)));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn session_path(session_id: &str) -> String {
    format!("api/session/{}", utf8_percent_encode(session_id, SEGMENT_ENCODE_SET))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url_adds_trailing_slash() {
        let url = normalize_base_url("http://localhost:5000").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/");

        let prefixed = normalize_base_url("http://localhost:5000/chat").unwrap();
        assert_eq!(prefixed.join("api/sessions").unwrap().as_str(), "http://localhost:5000/chat/api/sessions");
    }

    #[test]
    fn test_normalize_base_url_rejects_garbage() {
        assert!(matches!(normalize_base_url("not a url"), Err(ApiError::InvalidUrl(_))));
        assert!(matches!(normalize_base_url("mailto:someone@example.com"), Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_session_path_escapes_segment() {
        assert_eq!(session_path("abc-123"), "api/session/abc-123");
        assert_eq!(session_path("a/b?c"), "api/session/a%2Fb%3Fc");
        assert_eq!(session_path("../admin"), "api/session/..%2Fadmin");
    }

    #[test]
    fn test_http_backend_urls() {
        let backend = HttpBackend::new("http://127.0.0.1:5000", Duration::from_secs(5)).unwrap();
        assert_eq!(backend.base_url().as_str(), "http://127.0.0.1:5000/");
        assert_eq!(
            backend.url(&session_path("s1")).unwrap().as_str(),
            "http://127.0.0.1:5000/api/session/s1"
        );
    }
}
