//! State Module - Input snapshots and host state
//!
//! - **Mouse** - per-frame `MouseState` snapshot
//! - **Keyboard** - per-frame `KeyboardState` snapshot
//! - **Input** - crossterm events folded into snapshots
//! - **Focus** - the `Host`: focus and capture slots, tab order stepping

pub mod focus;
pub mod input;
pub mod keyboard;
pub mod mouse;

pub use focus::Host;
pub use input::{InputEvent, InputTracker, KeyboardTracker, MouseTracker};
pub use keyboard::{Key, KeyState, KeyboardState, Modifiers};
pub use mouse::{MouseButton, MouseState};
