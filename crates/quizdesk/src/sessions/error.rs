//! Session API client error types.

use thiserror::Error;

/// Result type for session API operations.
pub type SessionApiResult<T> = Result<T, SessionApiError>;

/// Errors that can occur while talking to the session API.
#[derive(Debug, Error)]
pub enum SessionApiError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("Session API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Session not found.
    #[error("Session not found: {0}")]
    NotFound(String),

    /// Token rejected.
    #[error("Unauthorized: session API rejected the token")]
    Unauthorized,

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Bad client configuration (e.g. an unusable base URL).
    #[error("Invalid session API configuration: {0}")]
    InvalidConfig(String),
}
