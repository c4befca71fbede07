//! Wire types for the stdio host bridge.
//!
//! Each line on stdin is one [`HostMessage`]; each line on stdout is one
//! [`PanelMessage`]. Both are JSON objects discriminated by a `type` field.

use crate::auto_run::ExecutionSignal;
use crate::content::{CellSnapshot, ChatMessage, ContentVariant, VariantKind};
use crate::floating::{ContainerSource, CursorStyle, FloatingWindow, FloatingWindowId, HostContainers};
use crate::geometry::{Point, Size};
use crate::panel::{AgentPanel, AutoRunPlan};
use crate::tab::{Tab, TabEvent, TabId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Host -> panel
// ---------------------------------------------------------------------------

/// A message from the host notebook, addressed to one notebook's panel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HostMessage {
    pub notebook: String,
    #[serde(flatten)]
    pub action: HostAction,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostAction {
    /// Toolbar button: create the panel or flip its visibility
    Toggle {
        #[serde(default)]
        containers: HostContainers,
    },
    /// The notebook was closed
    CloseNotebook,
    CreateTab,
    CloseTab {
        tab: TabId,
    },
    SwitchTab {
        tab: TabId,
    },
    NextTab,
    PrevTab,
    /// 1-based, as keyboard shortcuts number tabs
    SwitchToIndex {
        index: usize,
    },
    DragEnter {
        tab: TabId,
    },
    DragLeave {
        tab: TabId,
    },
    Drop {
        tab: TabId,
        payload: serde_json::Value,
        /// Position of the dragged cell in the notebook
        index: usize,
    },
    CloseContent {
        tab: TabId,
    },
    SetAutoRun {
        tab: TabId,
        enabled: bool,
    },
    SetInput {
        tab: TabId,
        text: String,
    },
    /// Send `text`, or the tab's input buffer when `text` is absent
    Send {
        tab: TabId,
        #[serde(default)]
        text: Option<String>,
    },
    KeyEnter {
        tab: TabId,
        #[serde(default)]
        shift: bool,
    },
    Detach {
        tab: TabId,
        origin: Point,
        size: Size,
    },
    ResizeWindow {
        window: FloatingWindowId,
        size: Size,
    },
    CloseWindow {
        window: FloatingWindowId,
    },
    PointerDown {
        window: FloatingWindowId,
        pointer: Point,
    },
    PointerMove {
        pointer: Point,
    },
    PointerUp,
    PointerCancel,
    FocusLost,
    /// Host layout changed; re-read container bounds
    ContainersChanged {
        containers: HostContainers,
    },
    ExecutionScheduled {
        cell_id: String,
    },
    ExecutionFinished {
        cell_id: String,
        #[serde(default)]
        cell: Option<CellSnapshot>,
    },
    /// Ask for the current panel state
    Snapshot,
}

impl HostMessage {
    /// Execution signal for the scheduled/finished actions
    pub fn execution_signal(&self) -> Option<ExecutionSignal> {
        match &self.action {
            HostAction::ExecutionScheduled { cell_id }
            | HostAction::ExecutionFinished { cell_id, .. } => {
                Some(ExecutionSignal::new(self.notebook.clone(), cell_id.clone()))
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Panel -> host
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PanelMessage {
    /// Full state of one panel, sent after every change
    Panel(PanelSnapshot),
    /// Tab notifications since the previous message
    Events {
        notebook: String,
        events: Vec<TabEvent>,
    },
    /// Cells the host should re-run
    RunCells(AutoRunPlan),
    /// The panel was discarded
    Closed { notebook: String },
    Error { message: String },
}

impl PanelMessage {
    pub fn error(message: impl Into<String>) -> Self {
        PanelMessage::Error {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSnapshot {
    pub notebook: String,
    pub visible: bool,
    pub active_tab: TabId,
    pub tabs: Vec<TabSnapshot>,
    /// Floating windows, bottom of the z-order first
    pub windows: Vec<FloatingWindow>,
    pub container: Size,
    pub container_source: ContainerSource,
    pub cursor: CursorStyle,
    pub overlay: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabSnapshot {
    pub id: TabId,
    pub label: String,
    pub kind: VariantKind,
    pub active: bool,
    pub has_new_update: bool,
    pub drag_over: bool,
    pub accepts_drops: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell: Option<CellViewSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting: Option<&'static str>,
    pub transcript: Vec<ChatMessage>,
    pub input: String,
    pub pending: bool,
    pub queued: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellViewSnapshot {
    pub cell_id: String,
    pub index: usize,
    pub auto_run: bool,
    pub cell: CellSnapshot,
}

impl PanelSnapshot {
    pub fn capture(panel: &AgentPanel) -> Self {
        let active = panel.tabs().active_tab_id();
        let floating = panel.floating();
        Self {
            notebook: panel.notebook().to_string(),
            visible: panel.is_visible(),
            active_tab: active,
            tabs: panel
                .tabs()
                .tabs()
                .iter()
                .map(|tab| TabSnapshot::capture(tab, tab.id == active))
                .collect(),
            windows: floating.windows().to_vec(),
            container: floating.container_bounds(),
            container_source: floating.container_source(),
            cursor: floating.cursor(),
            overlay: floating.is_overlay_active(),
        }
    }
}

impl TabSnapshot {
    fn capture(tab: &Tab, active: bool) -> Self {
        let (agent, cell) = match tab.slot.variant() {
            ContentVariant::Empty(_) => (None, None),
            ContentVariant::Agent(agent) => (
                Some(AgentSnapshot {
                    greeting: agent.greeting(),
                    transcript: agent.transcript().to_vec(),
                    input: agent.input().to_string(),
                    pending: agent.is_request_pending(),
                    queued: agent.queued_len(),
                }),
                None,
            ),
            ContentVariant::Cell(view) => (
                None,
                Some(CellViewSnapshot {
                    cell_id: view.cell_id().to_string(),
                    index: view.index(),
                    auto_run: view.auto_run(),
                    cell: view.snapshot().clone(),
                }),
            ),
        };
        Self {
            id: tab.id,
            label: tab.label.clone(),
            kind: tab.variant_kind(),
            active,
            has_new_update: tab.has_new_update,
            drag_over: tab.slot.is_drag_over(),
            accepts_drops: tab.slot.accepts_drops(),
            agent,
            cell,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedagent_config::Config;

    #[test]
    fn test_parse_flattened_action() {
        let msg: HostMessage = serde_json::from_str(
            r#"{"notebook":"a.ipynb","type":"drop","tab":1,"index":3,"payload":{"id":"c","source":""}}"#,
        )
        .unwrap();
        assert_eq!(msg.notebook, "a.ipynb");
        match msg.action {
            HostAction::Drop { tab, index, .. } => {
                assert_eq!(tab, 1);
                assert_eq!(index, 3);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_parse_defaults() {
        let msg: HostMessage =
            serde_json::from_str(r#"{"notebook":"a.ipynb","type":"toggle"}"#).unwrap();
        assert_eq!(
            msg.action,
            HostAction::Toggle {
                containers: HostContainers::default()
            }
        );

        let msg: HostMessage =
            serde_json::from_str(r#"{"notebook":"a.ipynb","type":"send","tab":2}"#).unwrap();
        assert_eq!(msg.action, HostAction::Send { tab: 2, text: None });
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(serde_json::from_str::<HostMessage>(r#"{"notebook":"a","type":"explode"}"#).is_err());
        assert!(serde_json::from_str::<HostMessage>(r#"{"type":"create_tab"}"#).is_err());
    }

    #[test]
    fn test_execution_signal_extraction() {
        let msg: HostMessage = serde_json::from_str(
            r#"{"notebook":"a.ipynb","type":"execution_scheduled","cell_id":"c1"}"#,
        )
        .unwrap();
        assert_eq!(
            msg.execution_signal(),
            Some(ExecutionSignal::new("a.ipynb", "c1"))
        );
    }

    #[test]
    fn test_snapshot_serializes_agent_tab() {
        let panel = AgentPanel::new("a.ipynb", &Config::default(), HostContainers::default());
        let value = serde_json::to_value(PanelMessage::Panel(PanelSnapshot::capture(&panel))).unwrap();

        assert_eq!(value["type"], "panel");
        assert_eq!(value["container_source"], "default");
        let tab = &value["tabs"][0];
        assert_eq!(tab["label"], "Agent");
        assert_eq!(tab["kind"], "agent");
        assert_eq!(tab["agent"]["greeting"], "Ask me questions!");
        assert!(tab.get("cell").is_none());
    }

    #[test]
    fn test_error_message_shape() {
        let value = serde_json::to_value(PanelMessage::error("bad line")).unwrap();
        assert_eq!(value, serde_json::json!({"type": "error", "message": "bad line"}));
    }
}
