//! Mouse Module - Per-frame mouse snapshots
//!
//! A `MouseState` is an immutable picture of the pointer for one frame:
//! where it is, which buttons are held, which buttons completed a click this
//! frame, how far the wheel moved and whether the pointer is over the surface
//! that hosts the control tree at all.
//!
//! Snapshots are built by `state::input::MouseTracker` from terminal events,
//! or directly in tests with the builder methods.
//!
//! # Example
//!
//! ```ignore
//! use console_controls::state::mouse::MouseState;
//!
//! // Left button released over (4, 2) after being pressed there
//! let frame = MouseState::at(4, 2).left_click();
//! assert!(frame.left_clicked);
//! ```

use std::time::Duration;

use crate::types::Point;

// =============================================================================
// Types
// =============================================================================

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    #[default]
    None,
}

/// Snapshot of the mouse for one frame.
///
/// Positions are surface cell coordinates. `left_clicked` / `right_clicked`
/// are true only on the frame the button was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseState {
    pub position: Point,
    pub left_down: bool,
    pub right_down: bool,
    pub left_clicked: bool,
    pub right_clicked: bool,
    /// How long the left button has been held (zero when up).
    pub left_down_duration: Duration,
    /// How long the right button has been held (zero when up).
    pub right_down_duration: Duration,
    /// Wheel movement this frame, positive is down/away from the user.
    pub scroll_delta: i32,
    /// The pointer is over the surface hosting the tree.
    pub on_surface: bool,
    /// Host clock when the snapshot was taken.
    pub time: Duration,
}

impl Default for MouseState {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            left_down: false,
            right_down: false,
            left_clicked: false,
            right_clicked: false,
            left_down_duration: Duration::ZERO,
            right_down_duration: Duration::ZERO,
            scroll_delta: 0,
            on_surface: true,
            time: Duration::ZERO,
        }
    }
}

impl MouseState {
    /// Pointer at (x, y), no buttons.
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            position: Point::new(x, y),
            ..Self::default()
        }
    }

    /// Hold the given button.
    pub fn pressed(mut self, button: MouseButton) -> Self {
        match button {
            MouseButton::Left => self.left_down = true,
            MouseButton::Right => self.right_down = true,
            _ => {}
        }
        self
    }

    /// Left button released this frame.
    pub fn left_click(mut self) -> Self {
        self.left_down = false;
        self.left_clicked = true;
        self
    }

    /// Right button released this frame.
    pub fn right_click(mut self) -> Self {
        self.right_down = false;
        self.right_clicked = true;
        self
    }

    /// Wheel moved by `delta` notches.
    pub fn scrolled(mut self, delta: i32) -> Self {
        self.scroll_delta = delta;
        self
    }

    /// Set the snapshot clock.
    pub fn at_time(mut self, time: Duration) -> Self {
        self.time = time;
        self
    }

    /// Same frame, but the pointer is claimed by something above.
    ///
    /// Controls receiving an occluded snapshot see it as "not over me", so
    /// they still get their exit edge but cannot hover or click.
    pub fn occluded(&self) -> Self {
        Self {
            on_surface: false,
            ..*self
        }
    }

    /// Either button held.
    #[inline]
    pub fn any_button_down(&self) -> bool {
        self.left_down || self.right_down
    }
}

// =============================================================================
// TESTS
// =============================================================================
