//! Single-occupant content slot and its swap lifecycle.
//!
//! Transitions: `Empty -> Agent` on creation, `Agent|Empty -> Cell` on an
//! accepted drop, `Cell -> Empty` on an explicit close, and a reset back to
//! a fresh Agent when the last tab is closed. [`ContentSlot::swap`] is the
//! only mutator of the occupant.

use super::cell::CellSnapshot;
use super::variant::{ContentVariant, VariantIds, VariantKind};

/// Result of [`ContentSlot::swap`].
///
/// The incoming variant moves into the slot, so a successful swap hands
/// back the outgoing one instead; read the new occupant through
/// [`ContentSlot::variant`].
#[derive(Debug)]
pub enum SwapOutcome {
    /// The previous occupant, already torn down. The incoming variant is
    /// now installed.
    Swapped(ContentVariant),
    /// The incoming variant is the instance already installed.
    Rejected,
}

impl SwapOutcome {
    pub fn is_swapped(&self) -> bool {
        matches!(self, SwapOutcome::Swapped(_))
    }
}

/// Why a drop was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropRejection {
    /// A drop from this gesture was already consumed, or the slot holds a
    /// cell.
    NotAccepting,
    /// The payload is not a serialized notebook cell.
    UnrecognizedPayload,
}

/// Result of [`ContentSlot::drop_cell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Accepted,
    Rejected(DropRejection),
}

#[derive(Debug)]
pub struct ContentSlot {
    variant: ContentVariant,
    /// Cleared by the first accepted drop so a duplicated drop event from
    /// the same gesture cannot be consumed twice.
    accepts_drops: bool,
    /// Drag-over highlight.
    drag_over: bool,
}

impl ContentSlot {
    /// A new slot. It passes through Empty and settles in Agent mode.
    pub fn new(ids: &mut VariantIds) -> Self {
        let mut slot = Self {
            variant: ContentVariant::empty(ids),
            accepts_drops: true,
            drag_over: false,
        };
        slot.swap(ContentVariant::agent(ids));
        slot
    }

    pub fn variant(&self) -> &ContentVariant {
        &self.variant
    }

    pub fn variant_mut(&mut self) -> &mut ContentVariant {
        &mut self.variant
    }

    pub fn kind(&self) -> VariantKind {
        self.variant.kind()
    }

    pub fn accepts_drops(&self) -> bool {
        self.accepts_drops
    }

    pub fn is_drag_over(&self) -> bool {
        self.drag_over
    }

    /// Tear down the current occupant and install `incoming`.
    ///
    /// On success `incoming` becomes [`variant`](Self::variant) and the torn
    /// down previous occupant is returned in [`SwapOutcome::Swapped`].
    /// Swapping in the instance that is already installed is rejected
    /// without effect.
    pub fn swap(&mut self, incoming: ContentVariant) -> SwapOutcome {
        if incoming.id() == self.variant.id() {
            log::debug!(
                "Rejected re-entrant swap of variant {} ({:?})",
                incoming.id(),
                incoming.kind()
            );
            return SwapOutcome::Rejected;
        }

        log::debug!(
            "Slot swap {:?}#{} -> {:?}#{}",
            self.variant.kind(),
            self.variant.id(),
            incoming.kind(),
            incoming.id()
        );
        let mut outgoing = std::mem::replace(&mut self.variant, incoming);
        outgoing.teardown();
        self.drag_over = false;
        SwapOutcome::Swapped(outgoing)
    }

    /// Return to the initial state: a fresh Agent with drops re-armed.
    pub fn reset(&mut self, ids: &mut VariantIds) {
        self.swap(ContentVariant::empty(ids));
        self.accepts_drops = true;
        self.swap(ContentVariant::agent(ids));
    }

    /// Close the occupant, leaving an Empty dropzone that accepts drops.
    /// Returns `false` when the slot is already empty.
    pub fn clear(&mut self, ids: &mut VariantIds) -> bool {
        if self.kind() == VariantKind::Empty {
            return false;
        }
        self.swap(ContentVariant::empty(ids));
        self.accepts_drops = true;
        true
    }

    /// Release the occupant for good, e.g. when the owning tab is removed.
    pub fn teardown(&mut self) {
        self.variant.teardown();
        self.accepts_drops = false;
        self.drag_over = false;
    }

    fn can_receive_drag(&self) -> bool {
        self.accepts_drops && self.variant.accepts_cell_drops()
    }

    pub fn drag_enter(&mut self) {
        if self.can_receive_drag() {
            self.drag_over = true;
        }
    }

    pub fn drag_over(&mut self) {
        self.drag_enter();
    }

    pub fn drag_leave(&mut self) {
        self.drag_over = false;
    }

    /// Handle a drop. An accepted drop swaps the occupant for a cell view
    /// seeded from the payload; rejected drops leave the slot untouched.
    pub fn drop_cell(
        &mut self,
        payload: &serde_json::Value,
        index: usize,
        ids: &mut VariantIds,
    ) -> DropOutcome {
        self.drag_over = false;

        if !self.can_receive_drag() {
            log::debug!("Drop ignored: slot is not accepting drops");
            return DropOutcome::Rejected(DropRejection::NotAccepting);
        }

        let Some(snapshot) = CellSnapshot::from_drop_payload(payload) else {
            return DropOutcome::Rejected(DropRejection::UnrecognizedPayload);
        };

        self.accepts_drops = false;
        log::info!("Accepted drop of cell {} (index {})", snapshot.id, index);
        self.swap(ContentVariant::cell(ids, snapshot, index));
        DropOutcome::Accepted
    }
}
