//! Agent chat variant: transcript, input buffer, and the single in-flight
//! request guard.
//!
//! At most one request is in flight per [`AgentChat`]. A send while one is
//! pending is queued and dispatched, in order, when the pending request
//! completes, so the transcript always alternates user/assistant turns.

use super::variant::VariantId;
use serde::Serialize;
use std::collections::VecDeque;

/// Shown in an agent pane before the first message.
pub const AGENT_GREETING: &str = "Ask me questions!";

/// Who wrote a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    /// Notices from the panel itself, such as request failures.
    System,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// A request the caller must deliver to the chat backend, then report back
/// through [`AgentChat::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    /// The agent instance that issued the request.
    pub variant: VariantId,
    /// Request generation; stale completions carry an old value.
    pub generation: u64,
    pub message: String,
}

/// Result of handing a message to [`AgentChat::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing was in flight; deliver this request now.
    Dispatch(ChatRequest),
    /// A request is in flight; the message waits at this queue position
    /// (1-based).
    Queued(usize),
    /// Empty message, or the agent has been torn down.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct AgentChat {
    id: VariantId,
    transcript: Vec<ChatMessage>,
    /// Text typed but not yet submitted.
    input: String,
    /// Generation of the request currently in flight.
    in_flight: Option<u64>,
    queued: VecDeque<String>,
    generation: u64,
    /// Set once the first message is sent; the greeting hides afterwards.
    initialized: bool,
    torn_down: bool,
}

impl AgentChat {
    pub fn new(id: VariantId) -> Self {
        Self {
            id,
            transcript: Vec::new(),
            input: String::new(),
            in_flight: None,
            queued: VecDeque::new(),
            generation: 0,
            initialized: false,
            torn_down: false,
        }
    }

    pub fn id(&self) -> VariantId {
        self.id
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn is_request_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// The greeting to render, until the conversation starts.
    pub fn greeting(&self) -> Option<&'static str> {
        (!self.initialized).then_some(AGENT_GREETING)
    }

    /// Send a message, dispatching it immediately or queueing it behind the
    /// request already in flight.
    pub fn send(&mut self, text: &str) -> SendOutcome {
        if self.torn_down {
            log::debug!("Agent {}: send after teardown ignored", self.id);
            return SendOutcome::Ignored;
        }
        if text.trim().is_empty() {
            return SendOutcome::Ignored;
        }

        if self.in_flight.is_some() {
            self.queued.push_back(text.to_string());
            log::debug!(
                "Agent {}: request pending, queued message ({} waiting)",
                self.id,
                self.queued.len()
            );
            return SendOutcome::Queued(self.queued.len());
        }

        SendOutcome::Dispatch(self.begin(text.to_string()))
    }

    /// Submit the input buffer (Send button or Enter) and clear it.
    pub fn submit_input(&mut self) -> SendOutcome {
        let text = std::mem::take(&mut self.input);
        self.send(&text)
    }

    /// Handle Enter in the input box. Shift+Enter inserts a newline instead
    /// of submitting.
    pub fn handle_enter(&mut self, shift: bool) -> SendOutcome {
        if shift {
            self.input.push('\n');
            SendOutcome::Ignored
        } else {
            self.submit_input()
        }
    }

    fn begin(&mut self, text: String) -> ChatRequest {
        self.generation += 1;
        self.initialized = true;
        self.in_flight = Some(self.generation);
        self.transcript
            .push(ChatMessage::new(ChatRole::User, text.clone()));
        ChatRequest {
            variant: self.id,
            generation: self.generation,
            message: text,
        }
    }

    /// Record the outcome of the in-flight request.
    ///
    /// A failure is appended as a `System` entry and the failed text is put
    /// back into an empty input buffer so the user can resend it. Returns the
    /// next queued request, if any, which the caller must dispatch.
    /// Completions for an older generation, or after teardown, are dropped.
    pub fn complete(
        &mut self,
        generation: u64,
        result: Result<String, String>,
    ) -> Option<ChatRequest> {
        if self.torn_down || self.in_flight != Some(generation) {
            log::debug!(
                "Agent {}: dropping stale completion (generation {}, in flight {:?})",
                self.id,
                generation,
                self.in_flight
            );
            return None;
        }
        self.in_flight = None;

        match result {
            Ok(reply) => {
                self.transcript
                    .push(ChatMessage::new(ChatRole::Assistant, reply));
            }
            Err(reason) => {
                log::error!("Agent {}: chat request failed: {}", self.id, reason);
                self.transcript.push(ChatMessage::new(
                    ChatRole::System,
                    format!("Message could not be delivered: {reason}"),
                ));
                if self.input.is_empty()
                    && let Some(failed) = self
                        .transcript
                        .iter()
                        .rev()
                        .find(|m| m.role == ChatRole::User)
                {
                    self.input = failed.text.clone();
                }
            }
        }

        let next = self.queued.pop_front()?;
        Some(self.begin(next))
    }

    /// Drop queued messages and invalidate the in-flight request.
    pub fn teardown(&mut self) {
        if !self.queued.is_empty() {
            log::debug!(
                "Agent {}: discarding {} queued message(s)",
                self.id,
                self.queued.len()
            );
        }
        self.queued.clear();
        self.in_flight = None;
        self.generation += 1;
        self.torn_down = true;
    }
}
