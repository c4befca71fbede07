//! Chat backend client for the pedagent notebook agent panel.
//!
//! The panel talks to one endpoint, `POST /api/chat`, sending
//! `{"message_content": ...}` and receiving `{"response": ...}`.
//!
//! # Module layout
//!
//! - [`client`]: the [`ChatBackend`] trait and its HTTP implementation
//! - [`http`]: ureq agent construction and endpoint validation
//! - [`error`]: [`ChatError`]

pub mod client;
pub mod error;
pub mod http;

pub use client::{ChatBackend, ChatRequestBody, ChatResponseBody, HttpChatBackend};
pub use error::ChatError;
