//! Tabs of the agent panel
//!
//! This module provides the tab infrastructure:
//! - `Tab`: one pane, wrapping a single `ContentSlot`
//! - `TabManager`: owns the ordered tab list and the active tab
//! - `TabEvent`: label/activity notifications for the host view

mod manager;

pub use manager::{CloseOutcome, TabManager};

use crate::content::{ContentSlot, ContentVariant, VariantIds, VariantKind};
use serde::Serialize;

/// Unique identifier for a tab (never reused within a manager)
pub type TabId = u64;

/// A single tab in the panel
#[derive(Debug)]
pub struct Tab {
    /// Unique identifier for this tab
    pub id: TabId,
    /// The content occupying this tab
    pub slot: ContentSlot,
    /// Display label shown in the tab strip
    pub label: String,
    /// Set when content changes while the tab is not active
    pub has_new_update: bool,
}

impl Tab {
    /// Create a tab with a fresh slot (which starts in Agent mode)
    pub(crate) fn new(id: TabId, ids: &mut VariantIds) -> Self {
        let slot = ContentSlot::new(ids);
        let label = label_for(slot.variant());
        Self {
            id,
            slot,
            label,
            has_new_update: false,
        }
    }

    /// Kind of content currently in this tab
    pub fn variant_kind(&self) -> VariantKind {
        self.slot.kind()
    }

    /// Recompute the label from the current content; returns true if it changed
    pub(crate) fn refresh_label(&mut self) -> bool {
        let label = label_for(self.slot.variant());
        if label == self.label {
            return false;
        }
        self.label = label;
        true
    }
}

/// Display label for a slot occupant
pub fn label_for(variant: &ContentVariant) -> String {
    match variant {
        ContentVariant::Empty(_) => "New".to_string(),
        ContentVariant::Agent(_) => "Agent".to_string(),
        ContentVariant::Cell(cell) => cell.label(),
    }
}

/// Notification for the host view, drained with [`TabManager::drain_events`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TabEvent {
    /// A tab was appended to the strip
    Created { id: TabId },
    /// A tab was removed from the strip
    Closed { id: TabId },
    /// The last tab was reset instead of removed
    Reset { id: TabId },
    /// Activation moved; `previous` is deactivated in the same step
    ActiveChanged { previous: Option<TabId>, current: TabId },
    /// A tab's label changed
    LabelChanged { id: TabId, label: String },
    /// An inactive tab received new content
    UpdateFlagged { id: TabId },
}
