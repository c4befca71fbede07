//! Tab manager for coordinating the panes of one agent panel

use super::{Tab, TabEvent, TabId};
use crate::content::{
    ContentVariant, DropOutcome, SwapOutcome, VariantId, VariantIds, VariantKind,
};

/// What [`TabManager::close_tab`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// It was the only tab; its slot was reset and the tab kept
    Reset(TabId),
    /// The tab was removed and `activated` became the active tab
    Removed { closed: TabId, activated: TabId },
    /// No tab with that ID
    NotFound,
}

/// Manages the tabs of a single panel.
///
/// The tab list is never empty and the active tab is always a member of it.
pub struct TabManager {
    /// All tabs, in insertion order
    tabs: Vec<Tab>,
    /// Currently active tab ID
    active_tab_id: TabId,
    /// Counter for generating unique tab IDs
    next_tab_id: TabId,
    /// Counter for content variant instances
    variant_ids: VariantIds,
    /// Pending notifications for the host view
    events: Vec<TabEvent>,
}

impl TabManager {
    /// Create a manager holding one fresh tab
    pub fn new() -> Self {
        let mut variant_ids = VariantIds::new();
        let first = Tab::new(1, &mut variant_ids);
        Self {
            tabs: vec![first],
            active_tab_id: 1,
            next_tab_id: 2,
            variant_ids,
            events: vec![
                TabEvent::Created { id: 1 },
                TabEvent::ActiveChanged {
                    previous: None,
                    current: 1,
                },
            ],
        }
    }

    /// Create a new tab, append it, and make it active
    pub fn create_tab(&mut self) -> TabId {
        let id = self.next_tab_id;
        self.next_tab_id += 1;

        let tab = Tab::new(id, &mut self.variant_ids);
        self.tabs.push(tab);
        self.events.push(TabEvent::Created { id });

        // Always switch to the new tab
        self.switch_active_tab(id);

        log::info!("Created new tab {} (total: {})", id, self.tabs.len());
        id
    }

    /// Close a tab by ID.
    ///
    /// The last remaining tab is never removed: its slot is reset to a fresh
    /// agent. Otherwise the tab to the left becomes active (or the tab to the
    /// right when closing the first tab) before the tab is torn down and
    /// removed.
    pub fn close_tab(&mut self, id: TabId) -> CloseOutcome {
        let Some(idx) = self.index_of(id) else {
            log::debug!("close_tab: no tab {}", id);
            return CloseOutcome::NotFound;
        };

        if self.tabs.len() == 1 {
            log::info!("Closing last tab {}: resetting its content", id);
            self.tabs[idx].slot.reset(&mut self.variant_ids);
            self.tabs[idx].has_new_update = false;
            self.events.push(TabEvent::Reset { id });
            self.refresh_label(id);
            return CloseOutcome::Reset(id);
        }

        log::info!("Closing tab {} (index {})", id, idx);

        let neighbor = if idx > 0 { idx - 1 } else { idx + 1 };
        let activated = self.tabs[neighbor].id;
        self.switch_active_tab(activated);

        self.tabs[idx].slot.teardown();
        self.tabs.remove(idx);
        self.events.push(TabEvent::Closed { id });

        CloseOutcome::Removed {
            closed: id,
            activated,
        }
    }

    /// Make `id` the active tab and clear its update flag.
    /// Returns false if no such tab exists.
    pub fn switch_active_tab(&mut self, id: TabId) -> bool {
        let Some(tab) = self.tabs.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        tab.has_new_update = false;

        if self.active_tab_id != id {
            let previous = self.active_tab_id;
            self.active_tab_id = id;
            self.events.push(TabEvent::ActiveChanged {
                previous: Some(previous),
                current: id,
            });
            log::debug!("Switched to tab {} (from {})", id, previous);
        }
        true
    }

    /// Recompute the active tab's label from its content
    pub fn update_active_tab(&mut self) {
        self.refresh_label(self.active_tab_id);
    }

    /// Recompute a tab's label, emitting an event when it changed
    pub fn refresh_label(&mut self, id: TabId) {
        if let Some(tab) = self.get_tab_mut(id)
            && tab.refresh_label()
        {
            let label = tab.label.clone();
            self.events.push(TabEvent::LabelChanged { id, label });
        }
    }

    /// Swap a tab's content and refresh its label
    pub fn swap_content(&mut self, id: TabId, variant: ContentVariant) -> Option<SwapOutcome> {
        let tab = self.get_tab_mut(id)?;
        let outcome = tab.slot.swap(variant);
        if outcome.is_swapped() {
            self.refresh_label(id);
        }
        Some(outcome)
    }

    /// Deliver a drop to a tab's slot
    pub fn drop_on_tab(
        &mut self,
        id: TabId,
        payload: &serde_json::Value,
        index: usize,
    ) -> Option<DropOutcome> {
        let tab = self.tabs.iter_mut().find(|t| t.id == id)?;
        let outcome = tab.slot.drop_cell(payload, index, &mut self.variant_ids);
        if outcome == DropOutcome::Accepted {
            self.refresh_label(id);
        }
        Some(outcome)
    }

    /// Close a tab's cell content, leaving an empty dropzone.
    /// Returns false if the tab does not exist or holds no cell.
    pub fn close_content(&mut self, id: TabId) -> bool {
        let Some(tab) = self.tabs.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if tab.variant_kind() != VariantKind::Cell {
            return false;
        }
        let cleared = tab.slot.clear(&mut self.variant_ids);
        self.refresh_label(id);
        cleared
    }

    /// Allocate an ID for a variant built outside the manager
    pub fn next_variant_id(&mut self) -> VariantId {
        self.variant_ids.next_id()
    }

    /// Variant ID allocator, for building variants passed to
    /// [`swap_content`](Self::swap_content)
    pub fn variant_ids_mut(&mut self) -> &mut VariantIds {
        &mut self.variant_ids
    }

    /// Flag an inactive tab as having new content
    pub fn mark_update(&mut self, id: TabId) {
        if id == self.active_tab_id {
            return;
        }
        if let Some(tab) = self.get_tab_mut(id)
            && !tab.has_new_update
        {
            tab.has_new_update = true;
            self.events.push(TabEvent::UpdateFlagged { id });
        }
    }

    /// Switch to the next tab (wraps around)
    pub fn next_tab(&mut self) {
        if self.tabs.len() <= 1 {
            return;
        }
        let current_idx = self.active_tab_index();
        let next_idx = (current_idx + 1) % self.tabs.len();
        let next_id = self.tabs[next_idx].id;
        self.switch_active_tab(next_id);
    }

    /// Switch to the previous tab (wraps around)
    pub fn prev_tab(&mut self) {
        if self.tabs.len() <= 1 {
            return;
        }
        let current_idx = self.active_tab_index();
        let prev_idx = if current_idx == 0 {
            self.tabs.len() - 1
        } else {
            current_idx - 1
        };
        let prev_id = self.tabs[prev_idx].id;
        self.switch_active_tab(prev_id);
    }

    /// Switch to tab by index (1-based for keyboard shortcuts)
    pub fn switch_to_index(&mut self, index: usize) {
        if index > 0 && index <= self.tabs.len() {
            let id = self.tabs[index - 1].id;
            self.switch_active_tab(id);
        }
    }

    /// Get a reference to the active tab
    pub fn active_tab(&self) -> &Tab {
        &self.tabs[self.active_tab_index()]
    }

    /// Get a mutable reference to the active tab
    pub fn active_tab_mut(&mut self) -> &mut Tab {
        let idx = self.active_tab_index();
        &mut self.tabs[idx]
    }

    /// Get the active tab ID
    pub fn active_tab_id(&self) -> TabId {
        self.active_tab_id
    }

    /// Get index of active tab (0-based)
    pub fn active_tab_index(&self) -> usize {
        self.index_of(self.active_tab_id).unwrap_or(0)
    }

    fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    /// Get the number of tabs
    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// Get all tabs as a slice
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Get all tabs as a mutable slice
    pub fn tabs_mut(&mut self) -> &mut [Tab] {
        &mut self.tabs
    }

    /// Get a tab by ID
    pub fn get_tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    /// Get a mutable reference to a tab by ID
    pub fn get_tab_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    /// Take the pending host-view notifications
    pub fn drain_events(&mut self) -> Vec<TabEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Create a manager with `count` tabs; the last one created is active
    fn manager_with_tabs(count: usize) -> TabManager {
        let mut mgr = TabManager::new();
        for _ in 1..count {
            mgr.create_tab();
        }
        mgr.drain_events();
        mgr
    }

    fn ids(mgr: &TabManager) -> Vec<TabId> {
        mgr.tabs().iter().map(|t| t.id).collect()
    }

    #[test]
    fn new_manager_has_one_active_agent_tab() {
        let mgr = TabManager::new();
        assert_eq!(mgr.tab_count(), 1);
        assert_eq!(mgr.active_tab_id(), 1);
        assert_eq!(mgr.active_tab().variant_kind(), VariantKind::Agent);
        assert_eq!(mgr.active_tab().label, "Agent");
    }

    #[test]
    fn create_tab_appends_and_activates() {
        let mut mgr = manager_with_tabs(1);
        let id = mgr.create_tab();
        assert_eq!(ids(&mgr), vec![1, id]);
        assert_eq!(mgr.active_tab_id(), id);

        let events = mgr.drain_events();
        assert_eq!(
            events,
            vec![
                TabEvent::Created { id },
                TabEvent::ActiveChanged {
                    previous: Some(1),
                    current: id
                },
            ]
        );
    }

    #[test]
    fn close_middle_tab_activates_left_neighbor() {
        let mut mgr = manager_with_tabs(4);
        let outcome = mgr.close_tab(3);
        assert_eq!(
            outcome,
            CloseOutcome::Removed {
                closed: 3,
                activated: 2
            }
        );
        assert_eq!(ids(&mgr), vec![1, 2, 4]);
        assert_eq!(mgr.active_tab_id(), 2);
    }

    #[test]
    fn close_first_tab_activates_right_neighbor() {
        let mut mgr = manager_with_tabs(3);
        let outcome = mgr.close_tab(1);
        assert_eq!(
            outcome,
            CloseOutcome::Removed {
                closed: 1,
                activated: 2
            }
        );
        assert_eq!(ids(&mgr), vec![2, 3]);
        assert_eq!(mgr.active_tab_index(), 0);
    }

    #[test]
    fn close_last_remaining_tab_resets_instead_of_removing() {
        let mut mgr = manager_with_tabs(1);
        mgr.drop_on_tab(1, &json!({"id": "c", "source": "print(1)"}), 3);
        assert_eq!(mgr.active_tab().label, "Code-3");

        assert_eq!(mgr.close_tab(1), CloseOutcome::Reset(1));
        assert_eq!(mgr.tab_count(), 1);
        assert_eq!(mgr.active_tab().variant_kind(), VariantKind::Agent);
        assert_eq!(mgr.active_tab().label, "Agent");
        assert!(mgr.active_tab().slot.accepts_drops());
    }

    #[test]
    fn close_unknown_tab_is_not_found() {
        let mut mgr = manager_with_tabs(2);
        assert_eq!(mgr.close_tab(99), CloseOutcome::NotFound);
        assert_eq!(mgr.tab_count(), 2);
    }

    #[test]
    fn closing_inactive_tab_still_moves_activation_to_neighbor() {
        let mut mgr = manager_with_tabs(3);
        mgr.switch_active_tab(3);
        mgr.close_tab(2);
        assert_eq!(mgr.active_tab_id(), 1);
    }

    #[test]
    fn switch_clears_update_flag() {
        let mut mgr = manager_with_tabs(2);
        mgr.mark_update(1);
        assert!(mgr.get_tab(1).unwrap().has_new_update);

        // Active tab is never flagged
        mgr.mark_update(2);
        assert!(!mgr.get_tab(2).unwrap().has_new_update);

        assert!(mgr.switch_active_tab(1));
        assert!(!mgr.get_tab(1).unwrap().has_new_update);
        assert!(!mgr.switch_active_tab(42));
    }

    #[test]
    fn activation_does_not_reorder() {
        let mut mgr = manager_with_tabs(3);
        mgr.switch_active_tab(1);
        mgr.switch_to_index(2);
        mgr.next_tab();
        mgr.prev_tab();
        assert_eq!(ids(&mgr), vec![1, 2, 3]);
        assert_eq!(mgr.active_tab_id(), 2);
    }

    #[test]
    fn next_and_prev_wrap_around() {
        let mut mgr = manager_with_tabs(3);
        assert_eq!(mgr.active_tab_id(), 3);
        mgr.next_tab();
        assert_eq!(mgr.active_tab_id(), 1);
        mgr.prev_tab();
        assert_eq!(mgr.active_tab_id(), 3);
    }

    #[test]
    fn drop_updates_label() {
        let mut mgr = manager_with_tabs(1);
        let payload = json!({"id": "m", "cell_type": "markdown", "source": "# Intro"});
        assert_eq!(mgr.drop_on_tab(1, &payload, 0), Some(DropOutcome::Accepted));
        assert_eq!(mgr.active_tab().label, "Markdown-0");
        assert!(mgr.drain_events().contains(&TabEvent::LabelChanged {
            id: 1,
            label: "Markdown-0".to_string()
        }));
    }

    #[test]
    fn close_content_leaves_dropzone() {
        let mut mgr = manager_with_tabs(1);
        assert!(!mgr.close_content(1));
        mgr.drop_on_tab(1, &json!({"id": "c", "source": ""}), 1);
        assert!(mgr.close_content(1));
        assert_eq!(mgr.active_tab().variant_kind(), VariantKind::Empty);
        assert_eq!(mgr.active_tab().label, "New");
    }

    #[test]
    fn swap_content_rejects_installed_instance() {
        let mut mgr = manager_with_tabs(1);
        let installed = mgr.active_tab().slot.variant().clone();
        let outcome = mgr.swap_content(1, installed).unwrap();
        assert!(!outcome.is_swapped());

        let fresh = ContentVariant::empty(mgr.variant_ids_mut());
        assert!(mgr.swap_content(1, fresh).unwrap().is_swapped());
        mgr.update_active_tab();
        assert_eq!(mgr.active_tab().label, "New");
    }
}
