// Library exports for the binary, the integration tests, and embedding hosts.
//
// # Threading
//
// Panel state (`registry`, `panel`, `tab`, `content`, `floating`, `auto_run`)
// is single-threaded and owned by one event loop. The only work that leaves
// the loop is the blocking chat call, which hands its result back through a
// channel (see `bridge`). `parking_lot::Mutex` is used for the debug log
// file, the one piece of state shared across threads.

pub mod debug;

pub mod auto_run;
pub mod bridge;
pub mod cli;
pub mod content;
pub mod floating;
pub mod geometry;
pub mod panel;
pub mod registry;
pub mod tab;

pub use auto_run::{AutoRunBurst, AutoRunCoordinator, ExecutionSignal};
pub use content::{ContentSlot, ContentVariant, VariantKind};
pub use floating::{FloatingWindowController, HostContainers};
pub use panel::{AgentPanel, AutoRunPlan, ChatDispatch};
pub use registry::PanelRegistry;
pub use tab::{CloseOutcome, Tab, TabEvent, TabId, TabManager};
