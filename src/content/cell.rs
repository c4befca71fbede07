//! Cell-backed variant and the drag-and-drop payload it is seeded from.

use super::variant::VariantId;
use serde::{Deserialize, Deserializer, Serialize};

/// nbformat cell type of a dropped cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    #[default]
    Code,
    Markdown,
}

impl CellKind {
    pub fn label_prefix(self) -> &'static str {
        match self {
            CellKind::Code => "Code",
            CellKind::Markdown => "Markdown",
        }
    }
}

/// Serialized notebook cell, as carried by a drop event or an execution
/// signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub id: String,
    #[serde(default)]
    pub cell_type: CellKind,
    /// nbformat allows a single string or a list of lines.
    #[serde(deserialize_with = "deserialize_source")]
    pub source: String,
    #[serde(default)]
    pub execution_count: Option<u64>,
    #[serde(default)]
    pub outputs: Vec<serde_json::Value>,
}

fn deserialize_source<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Source {
        Text(String),
        Lines(Vec<String>),
    }

    Ok(match Source::deserialize(deserializer)? {
        Source::Text(text) => text,
        Source::Lines(lines) => lines.concat(),
    })
}

impl CellSnapshot {
    /// Interpret a drop payload. Returns `None` for anything that is not a
    /// serialized cell; callers treat that as a silent rejection.
    pub fn from_drop_payload(payload: &serde_json::Value) -> Option<Self> {
        match serde_json::from_value::<CellSnapshot>(payload.clone()) {
            Ok(snapshot) if !snapshot.id.is_empty() => Some(snapshot),
            Ok(_) => {
                log::debug!("Drop payload has an empty cell id");
                None
            }
            Err(e) => {
                log::debug!("Drop payload is not a cell: {}", e);
                None
            }
        }
    }
}

/// A pane mirroring one host notebook cell.
#[derive(Debug, Clone)]
pub struct CellView {
    id: VariantId,
    snapshot: CellSnapshot,
    /// Position of the cell in its notebook when it was dropped.
    index: usize,
    auto_run: bool,
    torn_down: bool,
}

impl CellView {
    pub fn new(id: VariantId, snapshot: CellSnapshot, index: usize) -> Self {
        Self {
            id,
            snapshot,
            index,
            auto_run: false,
            torn_down: false,
        }
    }

    pub fn id(&self) -> VariantId {
        self.id
    }

    pub fn cell_id(&self) -> &str {
        &self.snapshot.id
    }

    pub fn kind(&self) -> CellKind {
        self.snapshot.cell_type
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn snapshot(&self) -> &CellSnapshot {
        &self.snapshot
    }

    /// `Code-3`, `Markdown-1`, ...
    pub fn label(&self) -> String {
        format!("{}-{}", self.kind().label_prefix(), self.index)
    }

    pub fn auto_run(&self) -> bool {
        self.auto_run
    }

    pub fn set_auto_run(&mut self, enabled: bool) {
        self.auto_run = enabled;
    }

    /// Replace the mirrored content after the host re-executed the cell.
    /// Snapshots for a different cell are ignored.
    pub fn refresh(&mut self, snapshot: CellSnapshot) -> bool {
        if self.torn_down || snapshot.id != self.snapshot.id {
            return false;
        }
        self.snapshot = snapshot;
        true
    }

    pub fn teardown(&mut self) {
        self.auto_run = false;
        self.torn_down = true;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}
