/*
[INPUT]:  Error sources (HTTP, API, serialization, auth, WebSocket)
[OUTPUT]: Structured error types with context and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the cleanline adapter
#[derive(Error, Debug)]
pub enum AdapterError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error (code {code}): {message}")]
    Api { code: u16, message: String },

    /// Credentials were refused
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Session token is expired
    #[error("Session expired, please sign in again")]
    TokenExpired,

    /// The signed-in role may not perform the action
    #[error("Not permitted: {0}")]
    Forbidden(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// WebSocket error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Realtime channel used before connect or after close
    #[error("Realtime channel not connected")]
    NotConnected,

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rejected locally before reaching the server
    #[error("{0}")]
    InvalidInput(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after}s")]
    RateLimit { retry_after: u64 },

    /// Connection timeout
    #[error("Connection timeout after {duration}s")]
    Timeout { duration: u64 },
}

impl AdapterError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AdapterError::Http(_)
                | AdapterError::RateLimit { .. }
                | AdapterError::Timeout { .. }
                | AdapterError::WebSocket(_)
                | AdapterError::NotConnected
        )
    }

    /// Get retry delay in seconds (if retryable)
    pub fn retry_delay(&self) -> Option<u64> {
        match self {
            AdapterError::RateLimit { retry_after } => Some(*retry_after),
            AdapterError::Timeout { .. } => Some(1),
            _ => None,
        }
    }

    /// Check if error indicates authentication failure
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            AdapterError::Authentication { .. } | AdapterError::TokenExpired
        )
    }

    /// Message suitable for an inline banner
    pub fn user_message(&self) -> String {
        match self {
            AdapterError::Api { message, .. } | AdapterError::Authentication { message } => {
                message.clone()
            }
            AdapterError::InvalidInput(message) => message.clone(),
            other => other.to_string(),
        }
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        AdapterError::Api {
            code: status.as_u16(),
            message: message.into(),
        }
    }
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, AdapterError>;
