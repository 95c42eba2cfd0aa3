//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};

/// One request as the stub server saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub cookie: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    path: String,
    status: StatusCode,
    body: String,
    set_cookie: Option<String>,
}

struct StubState {
    routes: Vec<Route>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Builder for a scripted HTTP backend
#[derive(Default)]
pub struct StubServerBuilder {
    routes: Vec<Route>,
}

impl StubServerBuilder {
    /// Answer `method path` with a JSON body
    pub fn route(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.push(method, path, status, body, None)
    }

    /// Like [`route`](Self::route), also setting a cookie
    pub fn route_with_cookie(
        self,
        method: &str,
        path: &str,
        status: u16,
        body: &str,
        cookie: &str,
    ) -> Self {
        self.push(method, path, status, body, Some(cookie))
    }

    fn push(mut self, method: &str, path: &str, status: u16, body: &str, cookie: Option<&str>) -> Self {
        self.routes.push(Route {
            method: Method::from_bytes(method.as_bytes()).expect("Invalid HTTP method"),
            path: path.to_string(),
            status: StatusCode::from_u16(status).expect("Invalid status code"),
            body: body.to_string(),
            set_cookie: cookie.map(str::to_string),
        });
        self
    }

    /// Bind to an ephemeral port and serve from a tokio runtime on a background thread
    pub fn start(self) -> StubServer {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = Arc::new(StubState { routes: self.routes, requests: Arc::clone(&requests) });
        // Paths are compared verbatim (still percent-encoded), so every
        // request goes through one handler rather than the path router
        let app = Router::new().fallback(respond).with_state(state);

        let (addr_tx, addr_rx) = mpsc::channel::<SocketAddr>();
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to build stub runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("Failed to bind stub server");
                let addr = listener.local_addr().expect("Failed to read stub address");
                addr_tx.send(addr).expect("Test dropped before stub started");
                axum::serve(listener, app).await.expect("stub server failed");
            });
        });

        let addr = addr_rx.recv().expect("Stub server did not start");
        StubServer { base_url: format!("http://{}", addr), requests }
    }
}

/// Scripted HTTP backend; unmatched requests get a 404 JSON error
pub struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub fn builder() -> StubServerBuilder {
        StubServerBuilder::default()
    }

    pub fn url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// "METHOD path" for every request received, in order
    pub fn request_lines(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| format!("{} {}", r.method, r.path)).collect()
    }
}

async fn respond(
    State(stub): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let cookie = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()).map(str::to_string);
    stub.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        cookie,
        body,
    });

    let Some(route) = stub.routes.iter().find(|r| r.method == method && r.path == uri.path())
    else {
        return json_response(StatusCode::NOT_FOUND, r#"{"error": "Not found"}"#.to_string());
    };

    let mut response = json_response(route.status, route.body.clone());
    if let Some(cookie) = &route.set_cookie {
        let value = HeaderValue::from_str(cookie).expect("Invalid cookie header");
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}

fn json_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// A URL nothing is listening on
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read address");
    drop(listener);
    format!("http://{}", addr)
}

/// Flask-style session list with two sessions
pub const SESSIONS_BODY: &str = r#"{
    "success": true,
    "sessions": [
        {
            "session_id": "2f0b7c52-3c1e-4f0e-9d1a-2b8f1c7e5a10",
            "created_at": "Tue, 13 Oct 2026 09:00:00 GMT",
            "last_active": "Tue, 13 Oct 2026 09:05:00 GMT",
            "preview": "I have a headache"
        },
        {
            "session_id": "9a4e1d20-77c3-4b59-8f0e-51a2c6d3b7e4",
            "created_at": "Mon, 12 Oct 2026 18:00:00 GMT",
            "last_active": null,
            "preview": null
        }
    ]
}"#;

/// Flask-style message page for one session
pub const SESSION_BODY: &str = r#"{
    "success": true,
    "session_id": "2f0b7c52-3c1e-4f0e-9d1a-2b8f1c7e5a10",
    "messages": [
        {"role": "user", "content": "I have a headache", "timestamp": "09:04 AM"},
        {"role": "assistant", "content": "Rest and drink water.", "timestamp": "09:05 AM", "source": "Medical Book"}
    ]
}"#;
