//! Queue publishing error types.

use thiserror::Error;

/// Result type for publish operations.
pub type PublishResult<T> = Result<T, PublishError>;

/// Errors that can occur while publishing a session event.
#[derive(Debug, Error)]
pub enum PublishError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The queue gateway refused the message.
    #[error("Queue rejected message ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Bad publisher configuration.
    #[error("Invalid queue configuration: {0}")]
    InvalidConfig(String),
}
