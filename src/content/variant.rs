//! The tagged union of slot occupants.

use super::agent::AgentChat;
use super::cell::{CellSnapshot, CellView};
use serde::Serialize;

/// Instance identity of a variant. Two variants with the same id are the same
/// instance, which is what `ContentSlot::swap` uses to reject re-entrant swaps.
pub type VariantId = u64;

/// Allocates [`VariantId`]s. Owned by the tab manager and passed explicitly
/// wherever a new variant is built.
#[derive(Debug, Clone)]
pub struct VariantIds {
    next: VariantId,
}

impl VariantIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> VariantId {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for VariantIds {
    fn default() -> Self {
        Self::new()
    }
}

/// Discriminant of a [`ContentVariant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    Empty,
    Agent,
    Cell,
}

/// The empty "dropzone" state: waits for a cell to be dropped.
#[derive(Debug, Clone)]
pub struct Dropzone {
    id: VariantId,
    torn_down: bool,
}

impl Dropzone {
    pub fn new(id: VariantId) -> Self {
        Self {
            id,
            torn_down: false,
        }
    }
}

/// The occupant of a content slot.
#[derive(Debug, Clone)]
pub enum ContentVariant {
    Empty(Dropzone),
    Agent(AgentChat),
    Cell(CellView),
}

impl ContentVariant {
    pub fn empty(ids: &mut VariantIds) -> Self {
        ContentVariant::Empty(Dropzone::new(ids.next_id()))
    }

    pub fn agent(ids: &mut VariantIds) -> Self {
        ContentVariant::Agent(AgentChat::new(ids.next_id()))
    }

    pub fn cell(ids: &mut VariantIds, snapshot: CellSnapshot, index: usize) -> Self {
        ContentVariant::Cell(CellView::new(ids.next_id(), snapshot, index))
    }

    pub fn id(&self) -> VariantId {
        match self {
            ContentVariant::Empty(dz) => dz.id,
            ContentVariant::Agent(agent) => agent.id(),
            ContentVariant::Cell(cell) => cell.id(),
        }
    }

    pub fn kind(&self) -> VariantKind {
        match self {
            ContentVariant::Empty(_) => VariantKind::Empty,
            ContentVariant::Agent(_) => VariantKind::Agent,
            ContentVariant::Cell(_) => VariantKind::Cell,
        }
    }

    /// Whether this occupant reacts to drag-and-drop of notebook cells.
    pub fn accepts_cell_drops(&self) -> bool {
        matches!(self, ContentVariant::Empty(_) | ContentVariant::Agent(_))
    }

    /// Release the variant's resources. Agent chats drop queued messages and
    /// invalidate their in-flight request; cells stop mirroring the host cell.
    pub fn teardown(&mut self) {
        match self {
            ContentVariant::Empty(dz) => dz.torn_down = true,
            ContentVariant::Agent(agent) => agent.teardown(),
            ContentVariant::Cell(cell) => cell.teardown(),
        }
    }

    pub fn is_torn_down(&self) -> bool {
        match self {
            ContentVariant::Empty(dz) => dz.torn_down,
            ContentVariant::Agent(agent) => agent.is_torn_down(),
            ContentVariant::Cell(cell) => cell.is_torn_down(),
        }
    }

    pub fn as_agent(&self) -> Option<&AgentChat> {
        match self {
            ContentVariant::Agent(agent) => Some(agent),
            _ => None,
        }
    }

    pub fn as_agent_mut(&mut self) -> Option<&mut AgentChat> {
        match self {
            ContentVariant::Agent(agent) => Some(agent),
            _ => None,
        }
    }

    pub fn as_cell(&self) -> Option<&CellView> {
        match self {
            ContentVariant::Cell(cell) => Some(cell),
            _ => None,
        }
    }

    pub fn as_cell_mut(&mut self) -> Option<&mut CellView> {
        match self {
            ContentVariant::Cell(cell) => Some(cell),
            _ => None,
        }
    }
}
