//! Auto-run coordination
//!
//! Watches the host's execution signals for one notebook and decides when
//! auto-run cell tabs should be re-run. A burst of "execution scheduled"
//! signals is coalesced into one decision: every new signal cancels and
//! replaces the pending deadline, so running several cells in quick
//! succession yields a single re-run pass.
//!
//! Cells the coordinator triggered itself are remembered until their
//! "execution finished" signal arrives, and their scheduled signals are not
//! treated as user activity. Without that, every re-run would start a new
//! burst.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// A host execution signal for one cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSignal {
    /// Notebook path the cell belongs to
    pub notebook: String,
    /// Host cell ID
    pub cell_id: String,
}

impl ExecutionSignal {
    pub fn new(notebook: impl Into<String>, cell_id: impl Into<String>) -> Self {
        Self {
            notebook: notebook.into(),
            cell_id: cell_id.into(),
        }
    }
}

/// A settled burst of user-initiated executions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoRunBurst {
    /// Cells the user executed during the burst, in first-seen order
    pub executed: Vec<String>,
}

impl AutoRunBurst {
    pub fn contains(&self, cell_id: &str) -> bool {
        self.executed.iter().any(|c| c == cell_id)
    }
}

/// Debounces execution bursts for a single notebook
#[derive(Debug)]
pub struct AutoRunCoordinator {
    notebook: String,
    debounce: Duration,
    /// When the pending burst settles
    deadline: Option<Instant>,
    burst: Vec<String>,
    /// Cells whose runs this coordinator requested and that have not finished
    self_triggered: HashSet<String>,
}

impl AutoRunCoordinator {
    pub fn new(notebook: impl Into<String>, debounce: Duration) -> Self {
        Self {
            notebook: notebook.into(),
            debounce,
            deadline: None,
            burst: Vec::new(),
            self_triggered: HashSet::new(),
        }
    }

    pub fn notebook(&self) -> &str {
        &self.notebook
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Handle "execution scheduled".
    ///
    /// Returns true if the signal counted as user activity and (re)armed the
    /// deadline.
    pub fn execution_scheduled(&mut self, signal: &ExecutionSignal, now: Instant) -> bool {
        if signal.notebook != self.notebook {
            log::trace!(
                "Ignoring execution signal for other notebook {}",
                signal.notebook
            );
            return false;
        }
        if self.self_triggered.contains(&signal.cell_id) {
            log::trace!("Ignoring self-triggered run of cell {}", signal.cell_id);
            return false;
        }

        if !self.burst.contains(&signal.cell_id) {
            self.burst.push(signal.cell_id.clone());
        }
        if self.deadline.is_some() {
            log::trace!("Auto-run deadline replaced by cell {}", signal.cell_id);
        }
        self.deadline = Some(now + self.debounce);
        true
    }

    /// Handle "execution finished".
    ///
    /// Returns true if the finished cell was one this coordinator triggered.
    pub fn execution_finished(&mut self, signal: &ExecutionSignal) -> bool {
        if signal.notebook != self.notebook {
            return false;
        }
        let was_ours = self.self_triggered.remove(&signal.cell_id);
        if was_ours {
            log::debug!("Auto-run of cell {} finished", signal.cell_id);
        }
        was_ours
    }

    /// When [`poll`](Self::poll) should next be called
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Take the settled burst once its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<AutoRunBurst> {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                let executed = std::mem::take(&mut self.burst);
                log::debug!(
                    "Execution burst settled in {} ({} cell(s))",
                    self.notebook,
                    executed.len()
                );
                Some(AutoRunBurst { executed })
            }
            _ => None,
        }
    }

    /// Remember cells about to be re-run on the coordinator's behalf
    pub fn mark_triggered<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.self_triggered.extend(cells);
    }

    pub fn is_self_triggered(&self, cell_id: &str) -> bool {
        self.self_triggered.contains(cell_id)
    }

    /// Drop any pending burst
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.burst.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NB: &str = "analysis.ipynb";

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_burst_within_window_yields_one_decision() {
        let t0 = Instant::now();
        let mut coord = AutoRunCoordinator::new(NB, ms(300));

        assert!(coord.execution_scheduled(&ExecutionSignal::new(NB, "a"), t0));
        assert!(coord.execution_scheduled(&ExecutionSignal::new(NB, "b"), t0 + ms(20)));
        assert!(coord.execution_scheduled(&ExecutionSignal::new(NB, "c"), t0 + ms(50)));

        // Deadline was replaced by the last signal.
        assert_eq!(coord.next_deadline(), Some(t0 + ms(350)));
        assert!(coord.poll(t0 + ms(349)).is_none());

        let mut decisions = Vec::new();
        for step in 0..10 {
            if let Some(burst) = coord.poll(t0 + ms(350 + step * 100)) {
                decisions.push(burst);
            }
        }
        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].executed, vec!["a", "b", "c"]);
        assert!(!coord.is_pending());
    }

    #[test]
    fn test_separate_bursts_yield_separate_decisions() {
        let t0 = Instant::now();
        let mut coord = AutoRunCoordinator::new(NB, ms(100));
        coord.execution_scheduled(&ExecutionSignal::new(NB, "a"), t0);
        assert!(coord.poll(t0 + ms(100)).is_some());

        coord.execution_scheduled(&ExecutionSignal::new(NB, "a"), t0 + ms(500));
        let burst = coord.poll(t0 + ms(600)).unwrap();
        assert_eq!(burst.executed, vec!["a"]);
    }

    #[test]
    fn test_repeated_cell_recorded_once() {
        let t0 = Instant::now();
        let mut coord = AutoRunCoordinator::new(NB, ms(10));
        coord.execution_scheduled(&ExecutionSignal::new(NB, "a"), t0);
        coord.execution_scheduled(&ExecutionSignal::new(NB, "a"), t0);
        assert_eq!(coord.poll(t0 + ms(10)).unwrap().executed, vec!["a"]);
    }

    #[test]
    fn test_other_notebook_ignored() {
        let t0 = Instant::now();
        let mut coord = AutoRunCoordinator::new(NB, ms(10));
        assert!(!coord.execution_scheduled(&ExecutionSignal::new("other.ipynb", "a"), t0));
        assert!(!coord.is_pending());
        coord.mark_triggered(["a".to_string()]);
        assert!(!coord.execution_finished(&ExecutionSignal::new("other.ipynb", "a")));
        assert!(coord.is_self_triggered("a"));
    }

    #[test]
    fn test_self_triggered_runs_do_not_start_a_burst() {
        let t0 = Instant::now();
        let mut coord = AutoRunCoordinator::new(NB, ms(10));
        coord.mark_triggered(["dep".to_string()]);

        assert!(!coord.execution_scheduled(&ExecutionSignal::new(NB, "dep"), t0));
        assert!(!coord.is_pending());

        assert!(coord.execution_finished(&ExecutionSignal::new(NB, "dep")));
        assert!(!coord.is_self_triggered("dep"));

        // A later user run of the same cell counts again.
        assert!(coord.execution_scheduled(&ExecutionSignal::new(NB, "dep"), t0 + ms(50)));
    }

    #[test]
    fn test_cancel_drops_pending_burst() {
        let t0 = Instant::now();
        let mut coord = AutoRunCoordinator::new(NB, ms(10));
        coord.execution_scheduled(&ExecutionSignal::new(NB, "a"), t0);
        coord.cancel();
        assert!(coord.poll(t0 + ms(1000)).is_none());
    }
}
