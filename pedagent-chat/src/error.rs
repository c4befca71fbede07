//! Typed errors for chat backend calls.

use thiserror::Error;

/// Failure of a single chat round trip.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The configured endpoint is not an absolute http(s) URL.
    #[error("Invalid chat endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// The rejected endpoint string.
        endpoint: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The message was empty after trimming; nothing was sent.
    #[error("Refusing to send an empty chat message")]
    EmptyMessage,

    /// The backend answered with a non-success status code.
    #[error("Chat backend returned HTTP {0}")]
    Status(u16),

    /// Connection, TLS, timeout, or other transport failure.
    #[error("Chat request failed: {0}")]
    Transport(String),

    /// The response body could not be read or decoded.
    #[error("Malformed chat response: {0}")]
    Decode(String),
}

impl From<ureq::Error> for ChatError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(code) => ChatError::Status(code),
            other => ChatError::Transport(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::Decode(e.to_string())
    }
}
