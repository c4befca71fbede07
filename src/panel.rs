//! `AgentPanel`: one notebook's side panel.
//!
//! Ties the tab manager, the floating windows, and the auto-run coordinator
//! together and turns user actions into state changes. Chat requests are not
//! sent from here; the panel hands back a [`ChatDispatch`] for the caller to
//! deliver, and the caller reports the result through
//! [`AgentPanel::complete_chat`].

use crate::auto_run::{AutoRunCoordinator, ExecutionSignal};
use crate::content::{
    CellSnapshot, ChatRequest, ContentVariant, DropOutcome, SendOutcome, VariantKind,
};
use crate::floating::{FloatingSettings, FloatingWindowController, FloatingWindowId, HostContainers};
use crate::geometry::{Point, Size};
use crate::tab::{CloseOutcome, TabEvent, TabId, TabManager};
use pedagent_config::Config;
use serde::Serialize;
use std::time::Instant;

/// A chat request to deliver on behalf of a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatDispatch {
    pub tab: TabId,
    pub request: ChatRequest,
}

/// Cells to re-run after an execution burst settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutoRunPlan {
    pub notebook: String,
    /// Host cell IDs, deduplicated, in tab order
    pub cells: Vec<String>,
    /// Auto-run tabs covered by the plan
    pub tabs: Vec<TabId>,
}

pub struct AgentPanel {
    notebook: String,
    visible: bool,
    tabs: TabManager,
    floating: FloatingWindowController,
    auto_run: AutoRunCoordinator,
}

impl AgentPanel {
    pub fn new(notebook: impl Into<String>, config: &Config, containers: HostContainers) -> Self {
        let notebook = notebook.into();
        log::info!("Creating agent panel for {}", notebook);
        Self {
            auto_run: AutoRunCoordinator::new(notebook.clone(), config.auto_run_debounce()),
            floating: FloatingWindowController::new(
                FloatingSettings::from_config(config),
                containers,
            ),
            tabs: TabManager::new(),
            visible: true,
            notebook,
        }
    }

    pub fn notebook(&self) -> &str {
        &self.notebook
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Flip visibility; returns the new state
    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        log::debug!(
            "Panel {} is now {}",
            self.notebook,
            if self.visible { "shown" } else { "hidden" }
        );
        self.visible
    }

    pub fn tabs(&self) -> &TabManager {
        &self.tabs
    }

    pub fn tabs_mut(&mut self) -> &mut TabManager {
        &mut self.tabs
    }

    pub fn floating(&self) -> &FloatingWindowController {
        &self.floating
    }

    pub fn floating_mut(&mut self) -> &mut FloatingWindowController {
        &mut self.floating
    }

    pub fn auto_run(&self) -> &AutoRunCoordinator {
        &self.auto_run
    }

    pub fn drain_events(&mut self) -> Vec<TabEvent> {
        self.tabs.drain_events()
    }

    // ── Tabs ───────────────────────────────────────────────────────────────

    pub fn create_tab(&mut self) -> TabId {
        self.tabs.create_tab()
    }

    /// Close a tab along with its floating window
    pub fn close_tab(&mut self, id: TabId) -> CloseOutcome {
        let outcome = self.tabs.close_tab(id);
        if outcome != CloseOutcome::NotFound {
            self.floating.close_for_tab(id);
        }
        outcome
    }

    pub fn switch_tab(&mut self, id: TabId) -> bool {
        self.tabs.switch_active_tab(id)
    }

    pub fn next_tab(&mut self) {
        self.tabs.next_tab();
    }

    pub fn prev_tab(&mut self) {
        self.tabs.prev_tab();
    }

    pub fn switch_to_index(&mut self, index: usize) {
        self.tabs.switch_to_index(index);
    }

    // ── Drag and drop ──────────────────────────────────────────────────────

    pub fn drag_enter(&mut self, tab: TabId) {
        if let Some(tab) = self.tabs.get_tab_mut(tab) {
            tab.slot.drag_enter();
        }
    }

    pub fn drag_leave(&mut self, tab: TabId) {
        if let Some(tab) = self.tabs.get_tab_mut(tab) {
            tab.slot.drag_leave();
        }
    }

    pub fn drop_cell(
        &mut self,
        tab: TabId,
        payload: &serde_json::Value,
        index: usize,
    ) -> Option<DropOutcome> {
        let outcome = self.tabs.drop_on_tab(tab, payload, index)?;
        if outcome == DropOutcome::Accepted {
            self.sync_window_title(tab);
        }
        Some(outcome)
    }

    /// Close a tab's cell content and any window showing it
    pub fn close_content(&mut self, tab: TabId) -> bool {
        if !self.tabs.close_content(tab) {
            return false;
        }
        self.floating.close_for_tab(tab);
        true
    }

    /// Flag a cell tab for auto-run. Returns false for non-cell tabs.
    pub fn set_auto_run(&mut self, tab: TabId, enabled: bool) -> bool {
        let Some(cell) = self
            .tabs
            .get_tab_mut(tab)
            .and_then(|t| t.slot.variant_mut().as_cell_mut())
        else {
            return false;
        };
        cell.set_auto_run(enabled);
        log::debug!(
            "Auto-run {} for cell {} (tab {})",
            if enabled { "enabled" } else { "disabled" },
            cell.cell_id(),
            tab
        );
        true
    }

    fn sync_window_title(&mut self, tab: TabId) {
        if let Some(label) = self.tabs.get_tab(tab).map(|t| t.label.clone()) {
            self.floating.set_title(tab, &label);
        }
    }

    // ── Chat ───────────────────────────────────────────────────────────────

    /// Replace the input buffer of an agent tab
    pub fn set_input(&mut self, tab: TabId, text: &str) -> bool {
        match self.agent_mut(tab) {
            Some(agent) => {
                agent.set_input(text);
                true
            }
            None => false,
        }
    }

    /// Send `text` from an agent tab
    pub fn send(&mut self, tab: TabId, text: &str) -> Option<ChatDispatch> {
        let outcome = self.agent_mut(tab)?.send(text);
        Self::dispatch(tab, outcome)
    }

    /// Submit the input buffer of an agent tab
    pub fn submit_input(&mut self, tab: TabId) -> Option<ChatDispatch> {
        let outcome = self.agent_mut(tab)?.submit_input();
        Self::dispatch(tab, outcome)
    }

    /// Enter in an agent tab's input; Shift+Enter adds a newline
    pub fn handle_enter(&mut self, tab: TabId, shift: bool) -> Option<ChatDispatch> {
        let outcome = self.agent_mut(tab)?.handle_enter(shift);
        Self::dispatch(tab, outcome)
    }

    fn dispatch(tab: TabId, outcome: SendOutcome) -> Option<ChatDispatch> {
        match outcome {
            SendOutcome::Dispatch(request) => Some(ChatDispatch { tab, request }),
            SendOutcome::Queued(position) => {
                log::debug!("Tab {}: message queued at position {}", tab, position);
                None
            }
            SendOutcome::Ignored => None,
        }
    }

    /// Report the result of a dispatched request.
    ///
    /// Results for an agent that has since been swapped out, or for a tab
    /// that no longer exists, are dropped. A reply landing on an inactive tab
    /// flags it as updated. Returns the next queued request, if any.
    pub fn complete_chat(
        &mut self,
        dispatch: &ChatDispatch,
        result: Result<String, String>,
    ) -> Option<ChatDispatch> {
        let tab = dispatch.tab;
        let Some(agent) = self.agent_mut(tab) else {
            log::debug!("Chat completion for tab {} without an agent dropped", tab);
            return None;
        };
        if agent.id() != dispatch.request.variant {
            log::debug!(
                "Chat completion for replaced agent {} on tab {} dropped",
                dispatch.request.variant,
                tab
            );
            return None;
        }

        let next = agent.complete(dispatch.request.generation, result);
        self.tabs.mark_update(tab);
        next.map(|request| ChatDispatch { tab, request })
    }

    fn agent_mut(&mut self, tab: TabId) -> Option<&mut crate::content::AgentChat> {
        self.tabs
            .get_tab_mut(tab)
            .and_then(|t| t.slot.variant_mut().as_agent_mut())
    }

    // ── Floating windows ───────────────────────────────────────────────────

    /// Pop a tab out into a floating window titled with the tab label
    pub fn detach(
        &mut self,
        tab: TabId,
        origin: Point,
        requested_size: Size,
    ) -> Option<FloatingWindowId> {
        let label = self.tabs.get_tab(tab)?.label.clone();
        Some(self.floating.detach(tab, label, origin, requested_size))
    }

    pub fn update_containers(&mut self, containers: HostContainers) {
        self.floating.update_containers(containers);
    }

    // ── Auto-run ───────────────────────────────────────────────────────────

    pub fn execution_scheduled(&mut self, signal: &ExecutionSignal, now: Instant) -> bool {
        self.auto_run.execution_scheduled(signal, now)
    }

    /// Handle "execution finished".
    ///
    /// A snapshot of the finished cell refreshes every tab mirroring it;
    /// refreshed tabs that are not active get flagged. Returns the refreshed
    /// tabs.
    pub fn execution_finished(
        &mut self,
        signal: &ExecutionSignal,
        snapshot: Option<&CellSnapshot>,
    ) -> Vec<TabId> {
        if signal.notebook != self.notebook {
            return Vec::new();
        }
        self.auto_run.execution_finished(signal);

        let Some(snapshot) = snapshot else {
            return Vec::new();
        };

        let mut refreshed = Vec::new();
        for tab in self.tabs.tabs_mut() {
            if let ContentVariant::Cell(cell) = tab.slot.variant_mut()
                && cell.cell_id() == signal.cell_id
                && cell.refresh(snapshot.clone())
            {
                refreshed.push(tab.id);
            }
        }
        for &id in &refreshed {
            self.tabs.mark_update(id);
        }
        refreshed
    }

    pub fn next_auto_run_deadline(&self) -> Option<Instant> {
        self.auto_run.next_deadline()
    }

    /// Collect the auto-run plan once the pending burst has settled.
    ///
    /// Cells the user just ran are left out. Returns `None` while the burst
    /// is still open or when no auto-run tab needs a re-run.
    pub fn poll_auto_run(&mut self, now: Instant) -> Option<AutoRunPlan> {
        let burst = self.auto_run.poll(now)?;

        let mut cells: Vec<String> = Vec::new();
        let mut tabs = Vec::new();
        for tab in self.tabs.tabs() {
            let Some(cell) = tab.slot.variant().as_cell() else {
                continue;
            };
            if !cell.auto_run() || burst.contains(cell.cell_id()) {
                continue;
            }
            tabs.push(tab.id);
            if !cells.iter().any(|c| c == cell.cell_id()) {
                cells.push(cell.cell_id().to_string());
            }
        }

        if cells.is_empty() {
            log::debug!("Execution burst settled with nothing to auto-run");
            return None;
        }

        self.auto_run.mark_triggered(cells.iter().cloned());
        log::info!(
            "Auto-running {} cell(s) in {}",
            cells.len(),
            self.notebook
        );
        Some(AutoRunPlan {
            notebook: self.notebook.clone(),
            cells,
            tabs,
        })
    }

    /// Number of tabs holding each kind of content
    pub fn count_kind(&self, kind: VariantKind) -> usize {
        self.tabs
            .tabs()
            .iter()
            .filter(|t| t.variant_kind() == kind)
            .count()
    }
}
