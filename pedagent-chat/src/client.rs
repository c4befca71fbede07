//! The [`ChatBackend`] contract and the HTTP implementation used in
//! production.

use crate::error::ChatError;
use crate::http::{self, MAX_RESPONSE_SIZE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequestBody {
    pub message_content: String,
}

/// Response body from `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponseBody {
    pub response: String,
}

/// A single request/response chat round trip.
///
/// Calls block; async callers run them on a blocking worker.
pub trait ChatBackend: Send + Sync {
    /// Send one user message and return the assistant's reply.
    fn send(&self, message: &str) -> Result<String, ChatError>;
}

/// Chat backend speaking JSON over HTTP.
pub struct HttpChatBackend {
    agent: ureq::Agent,
    endpoint: String,
}

impl std::fmt::Debug for HttpChatBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpChatBackend")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl HttpChatBackend {
    /// Create a backend for `endpoint`, validating it up front so a bad
    /// configuration surfaces at startup instead of on the first send.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, ChatError> {
        let parsed = http::validate_endpoint(endpoint)?;
        log::info!(
            "Chat backend at {} (timeout: {:?})",
            parsed.as_str(),
            timeout
        );
        Ok(Self {
            agent: http::agent(timeout),
            endpoint: parsed.to_string(),
        })
    }

    /// The validated endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ChatBackend for HttpChatBackend {
    fn send(&self, message: &str) -> Result<String, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let body = encode_request(message)?;
        log::debug!("POST {} ({} bytes)", self.endpoint, body.len());

        let text = self
            .agent
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(body.as_bytes())?
            .into_body()
            .with_config()
            .limit(MAX_RESPONSE_SIZE)
            .read_to_string()
            .map_err(|e| ChatError::Decode(e.to_string()))?;

        decode_response(&text)
    }
}

/// Serialize a user message into the request body JSON.
pub fn encode_request(message: &str) -> Result<String, ChatError> {
    let body = ChatRequestBody {
        message_content: message.to_string(),
    };
    Ok(serde_json::to_string(&body)?)
}

/// Extract the assistant reply from a response body.
pub fn decode_response(text: &str) -> Result<String, ChatError> {
    let body: ChatResponseBody = serde_json::from_str(text)?;
    Ok(body.response)
}
