//! Content shown inside a tab.
//!
//! - [`variant`]: `ContentVariant`, the tagged union of slot occupants
//! - [`slot`]: `ContentSlot`, the single-occupant swap state machine
//! - [`agent`]: `AgentChat`, the chat transcript and request guard
//! - [`cell`]: `CellView` and the dropped `CellSnapshot` payload

pub mod agent;
pub mod cell;
pub mod slot;
pub mod variant;

pub use agent::{AGENT_GREETING, AgentChat, ChatMessage, ChatRequest, ChatRole, SendOutcome};
pub use cell::{CellKind, CellSnapshot, CellView};
pub use slot::{ContentSlot, DropOutcome, DropRejection, SwapOutcome};
pub use variant::{ContentVariant, Dropzone, VariantId, VariantIds, VariantKind};
