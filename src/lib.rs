//! # console-controls
//!
//! Retained-mode interactive controls for cell-addressed console surfaces.
//!
//! ## Architecture
//!
//! Controls live in an arena ([`ControlTree`]) and refer to each other by
//! [`ControlId`]. Every frame the host loop hands the tree one mouse snapshot
//! and one keyboard snapshot; controls update their own state and raise
//! events into a queue; dirty controls then redraw onto a [`Surface`].
//!
//! ```text
//! MouseState ─┐
//!             ├→ routing (topmost child first) → control state machines
//! KeyboardState┘                                        │
//!                                  events, dirty flags ←┘
//!                                         │
//!                    update_and_redraw → Surface
//! ```
//!
//! Focus and mouse capture are single slots on a [`Host`], passed explicitly
//! to every routing call. [`Ui`] bundles a tree, a host and a root panel.
//!
//! ## Modules
//!
//! - [`types`] - Points, rects, colors, glyphs, state flags
//! - [`controls`] - The control kinds and their shared base
//! - [`table`] - Sparse virtualized grid behind the table control
//! - [`engine`] - Arena, tree routing, dirty propagation, events
//! - [`state`] - Input snapshots, crossterm adapter, host
//! - [`renderer`] - Surface contract and in-memory frame buffer
//! - [`theme`] - Appearance per control state

pub mod controls;
pub mod engine;
pub mod error;
pub mod renderer;
pub mod state;
pub mod table;
pub mod theme;
pub mod types;
mod ui;

pub use controls::{
    Button, Capabilities, Control, ControlBase, ControlKind, ListBox, Panel, ScrollBar, TabControl, Toggle,
    ToggleStyle,
};
pub use engine::{ControlConfig, ControlEvent, ControlId, ControlTree, EventKind};
pub use error::{ControlError, Result};
pub use renderer::{Canvas, FrameBuffer, Surface};
pub use state::{Host, InputTracker, Key, KeyboardState, Modifiers, MouseButton, MouseState};
pub use table::{Cell, CellOptions, Cells, Layout, SelectionMode, Table};
pub use theme::{Appearance, Theme, ThemeStates};
pub use types::*;
pub use ui::Ui;
