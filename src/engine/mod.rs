//! Engine - control arena, tree structure and event plumbing.
//!
//! - Registry: generational handles for every control
//! - Events: the queue controls raise into
//! - Tree: parent/child structure, input routing, dirty propagation, redraw
//! - Config: serde snapshot of a control's settings
//!
//! # Architecture
//!
//! Controls are NOT linked objects. They live in one arena and refer to each
//! other by `ControlId`:
//!
//! ```text
//! id 0: Panel     (parent=None,  children=[1, 2])
//! id 1: Button    (parent=0,     children=[])
//! id 2: ListBox   (parent=0,     children=[3])
//! id 3: ScrollBar (parent=2,     owned)
//! ```
//!
//! A control only ever mutates itself while handling input. Effects on other
//! controls (dirty propagation, focus moves, scroll bar sync) are queued and
//! applied by the tree right after, so there is never more than one mutable
//! borrow into the arena.

mod config;
mod events;
mod registry;
mod tree;

pub use config::ControlConfig;
pub use events::{ControlEvent, EventKind, EventQueue};
pub use registry::{ControlId, Registry};
pub use tree::ControlTree;
