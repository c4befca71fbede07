//! One agent panel per open notebook.

use crate::floating::HostContainers;
use crate::panel::AgentPanel;
use pedagent_config::Config;
use std::collections::HashMap;

/// Maps notebook paths to their panels.
pub struct PanelRegistry {
    config: Config,
    panels: HashMap<String, AgentPanel>,
}

impl PanelRegistry {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            panels: HashMap::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Toolbar toggle: creates the notebook's panel on first use, flips its
    /// visibility afterwards. Returns whether the panel is now visible.
    pub fn toggle(&mut self, notebook: &str, containers: HostContainers) -> bool {
        if let Some(panel) = self.panels.get_mut(notebook) {
            return panel.toggle_visibility();
        }
        let panel = AgentPanel::new(notebook, &self.config, containers);
        self.panels.insert(notebook.to_string(), panel);
        true
    }

    pub fn get(&self, notebook: &str) -> Option<&AgentPanel> {
        self.panels.get(notebook)
    }

    pub fn get_mut(&mut self, notebook: &str) -> Option<&mut AgentPanel> {
        self.panels.get_mut(notebook)
    }

    /// Discard a notebook's panel when the notebook closes
    pub fn remove(&mut self, notebook: &str) -> Option<AgentPanel> {
        let panel = self.panels.remove(notebook);
        if panel.is_some() {
            log::info!("Discarded agent panel for {}", notebook);
        }
        panel
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn panels_mut(&mut self) -> impl Iterator<Item = &mut AgentPanel> {
        self.panels.values_mut()
    }

    /// Earliest pending auto-run deadline over all panels
    pub fn next_deadline(&self) -> Option<std::time::Instant> {
        self.panels
            .values()
            .filter_map(|p| p.next_auto_run_deadline())
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_creates_then_flips() {
        let mut registry = PanelRegistry::new(Config::default());
        assert!(registry.toggle("a.ipynb", HostContainers::default()));
        assert_eq!(registry.len(), 1);
        assert!(!registry.toggle("a.ipynb", HostContainers::default()));
        assert!(registry.toggle("a.ipynb", HostContainers::default()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_panels_are_independent_per_notebook() {
        let mut registry = PanelRegistry::new(Config::default());
        registry.toggle("a.ipynb", HostContainers::default());
        registry.toggle("b.ipynb", HostContainers::default());
        registry.get_mut("a.ipynb").unwrap().create_tab();

        assert_eq!(registry.get("a.ipynb").unwrap().tabs().tab_count(), 2);
        assert_eq!(registry.get("b.ipynb").unwrap().tabs().tab_count(), 1);
        assert!(registry.remove("b.ipynb").is_some());
        assert!(registry.get("b.ipynb").is_none());
    }
}
