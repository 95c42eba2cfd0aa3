use thiserror::Error;

/// Failure talking to the chat backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection refused, timeout, TLS or other transport failure
    #[error("connection error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Endpoint answered with a non-2xx status where the contract requires 2xx
    #[error("server returned {status} for {endpoint}")]
    Status { endpoint: String, status: u16 },

    /// Body was not the JSON document the endpoint promises
    #[error("unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    /// Base URL could not be parsed or joined
    #[error("invalid server URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Whether the failure happened before the server produced a response
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
