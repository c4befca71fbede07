//! Synchronous core of the host bridge: applies host messages to the panel
//! registry and collects the replies and chat requests they produce.

use super::protocol::{HostAction, HostMessage, PanelMessage, PanelSnapshot};
use crate::panel::{AgentPanel, ChatDispatch};
use crate::registry::PanelRegistry;
use pedagent_config::Config;
use std::time::Instant;

/// A chat request waiting on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChat {
    pub notebook: String,
    pub dispatch: ChatDispatch,
}

/// Replies and work produced by one step of the bridge.
#[derive(Debug, Default)]
pub struct Step {
    pub messages: Vec<PanelMessage>,
    pub chats: Vec<PendingChat>,
}

impl Step {
    fn error(message: impl Into<String>) -> Self {
        Self {
            messages: vec![PanelMessage::error(message)],
            chats: Vec::new(),
        }
    }
}

pub struct BridgeSession {
    registry: PanelRegistry,
}

impl BridgeSession {
    pub fn new(config: Config) -> Self {
        Self {
            registry: PanelRegistry::new(config),
        }
    }

    pub fn registry(&self) -> &PanelRegistry {
        &self.registry
    }

    /// Parse and apply one input line
    pub fn handle_line(&mut self, line: &str, now: Instant) -> Step {
        match serde_json::from_str::<HostMessage>(line) {
            Ok(msg) => self.handle(msg, now),
            Err(e) => {
                log::warn!("Malformed host message: {}", e);
                Step::error(format!("malformed message: {e}"))
            }
        }
    }

    pub fn handle(&mut self, msg: HostMessage, now: Instant) -> Step {
        let notebook = msg.notebook.clone();
        log::debug!("Host message for {}: {:?}", notebook, msg.action);

        match &msg.action {
            HostAction::Toggle { containers } => {
                self.registry.toggle(&notebook, *containers);
                return self.panel_step(&notebook, Vec::new());
            }
            HostAction::CloseNotebook => {
                return match self.registry.remove(&notebook) {
                    Some(_) => Step {
                        messages: vec![PanelMessage::Closed { notebook }],
                        chats: Vec::new(),
                    },
                    None => Step::error(format!("no panel for {notebook}")),
                };
            }
            _ => {}
        }

        let signal = msg.execution_signal();
        let Some(panel) = self.registry.get_mut(&notebook) else {
            // Execution signals for notebooks without a panel are expected.
            if signal.is_some() {
                return Step::default();
            }
            return Step::error(format!("no panel for {notebook}"));
        };

        let mut chats = Vec::new();
        match msg.action {
            HostAction::Toggle { .. } | HostAction::CloseNotebook => {}
            HostAction::CreateTab => {
                panel.create_tab();
            }
            HostAction::CloseTab { tab } => {
                panel.close_tab(tab);
            }
            HostAction::SwitchTab { tab } => {
                panel.switch_tab(tab);
            }
            HostAction::NextTab => panel.next_tab(),
            HostAction::PrevTab => panel.prev_tab(),
            HostAction::SwitchToIndex { index } => panel.switch_to_index(index),
            HostAction::DragEnter { tab } => panel.drag_enter(tab),
            HostAction::DragLeave { tab } => panel.drag_leave(tab),
            HostAction::Drop {
                tab,
                payload,
                index,
            } => {
                panel.drop_cell(tab, &payload, index);
            }
            HostAction::CloseContent { tab } => {
                panel.close_content(tab);
            }
            HostAction::SetAutoRun { tab, enabled } => {
                panel.set_auto_run(tab, enabled);
            }
            HostAction::SetInput { tab, text } => {
                panel.set_input(tab, &text);
            }
            HostAction::Send { tab, text } => {
                let dispatch = match text {
                    Some(text) => panel.send(tab, &text),
                    None => panel.submit_input(tab),
                };
                chats.extend(dispatch);
            }
            HostAction::KeyEnter { tab, shift } => {
                chats.extend(panel.handle_enter(tab, shift));
            }
            HostAction::Detach { tab, origin, size } => {
                panel.detach(tab, origin, size);
            }
            HostAction::ResizeWindow { window, size } => {
                panel.floating_mut().resize_window(window, size);
            }
            HostAction::CloseWindow { window } => {
                panel.floating_mut().close_window(window);
            }
            HostAction::PointerDown { window, pointer } => {
                panel.floating_mut().pointer_down(window, pointer);
            }
            HostAction::PointerMove { pointer } => {
                panel.floating_mut().pointer_move(pointer);
            }
            HostAction::PointerUp => panel.floating_mut().pointer_up(),
            HostAction::PointerCancel => panel.floating_mut().pointer_cancel(),
            HostAction::FocusLost => panel.floating_mut().focus_lost(),
            HostAction::ContainersChanged { containers } => {
                panel.update_containers(containers);
            }
            HostAction::ExecutionScheduled { .. } => {
                if let Some(signal) = &signal {
                    panel.execution_scheduled(signal, now);
                }
            }
            HostAction::ExecutionFinished { cell, .. } => {
                if let Some(signal) = &signal {
                    panel.execution_finished(signal, cell.as_ref());
                }
            }
            HostAction::Snapshot => {}
        }

        let chats = chats
            .into_iter()
            .map(|dispatch| PendingChat {
                notebook: notebook.clone(),
                dispatch,
            })
            .collect();
        self.panel_step(&notebook, chats)
    }

    /// Apply a backend result to the panel that requested it
    pub fn complete_chat(&mut self, pending: &PendingChat, result: Result<String, String>) -> Step {
        let Some(panel) = self.registry.get_mut(&pending.notebook) else {
            log::debug!(
                "Chat completion for closed notebook {} dropped",
                pending.notebook
            );
            return Step::default();
        };
        let next = panel.complete_chat(&pending.dispatch, result);
        let chats = next
            .into_iter()
            .map(|dispatch| PendingChat {
                notebook: pending.notebook.clone(),
                dispatch,
            })
            .collect();
        self.panel_step(&pending.notebook, chats)
    }

    /// Earliest auto-run deadline across all panels
    pub fn next_deadline(&self) -> Option<Instant> {
        self.registry.next_deadline()
    }

    /// Emit auto-run plans for every settled burst
    pub fn poll(&mut self, now: Instant) -> Step {
        let mut step = Step::default();
        for panel in self.registry.panels_mut() {
            if let Some(plan) = panel.poll_auto_run(now) {
                step.messages.push(PanelMessage::RunCells(plan));
            }
        }
        step
    }

    fn panel_step(&mut self, notebook: &str, chats: Vec<PendingChat>) -> Step {
        let Some(panel) = self.registry.get_mut(notebook) else {
            return Step::default();
        };
        Step {
            messages: panel_messages(panel),
            chats,
        }
    }
}

fn panel_messages(panel: &mut AgentPanel) -> Vec<PanelMessage> {
    let mut messages = Vec::with_capacity(2);
    let events = panel.drain_events();
    if !events.is_empty() {
        messages.push(PanelMessage::Events {
            notebook: panel.notebook().to_string(),
            events,
        });
    }
    messages.push(PanelMessage::Panel(PanelSnapshot::capture(panel)));
    messages
}
