//! Ui - one control tree driven by a host loop.
//!
//! `Ui` bundles a [`ControlTree`], the [`Host`] holding focus and capture,
//! and a root panel covering the surface. Each frame the loop hands it one
//! mouse snapshot and one keyboard snapshot, in that order, and then lets it
//! redraw.
//!
//! # Example
//!
//! ```ignore
//! let mut ui = Ui::new(80, 24);
//! let ok = ui.add(Control::button("OK").with_position(2, 2))?;
//!
//! let mut input = InputTracker::new();
//! let mut screen = FrameBuffer::new(80, 24);
//! loop {
//!     if let Some(event) = poll_event(Duration::from_millis(16))? {
//!         input.handle(event, clock.elapsed());
//!     }
//!     let (mouse, keyboard) = input.frame(clock.elapsed());
//!     ui.tick(&mouse, &keyboard, Duration::from_millis(16), &mut screen)?;
//!     for event in ui.drain_events() {
//!         // react to clicks, value changes, ...
//!     }
//! }
//! ```

use std::time::Duration;

use tracing::{debug, trace};

use crate::controls::Control;
use crate::engine::{ControlEvent, ControlId, ControlTree};
use crate::error::Result;
use crate::renderer::Surface;
use crate::state::focus::step_tab_order;
use crate::state::{Host, Key, KeyboardState, MouseState};
use crate::theme::Theme;

/// A control tree with its host and root panel.
#[derive(Debug, Clone)]
pub struct Ui {
    tree: ControlTree,
    host: Host,
    root: ControlId,
}

impl Ui {
    /// A ui whose root panel covers a `width` x `height` surface.
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_theme(width, height, Theme::default())
    }

    pub fn with_theme(width: i32, height: i32, theme: Theme) -> Self {
        let mut tree = ControlTree::with_theme(theme);
        let root = tree.insert(Control::panel(width, height));
        Self {
            tree,
            host: Host::new(),
            root,
        }
    }

    pub fn root(&self) -> ControlId {
        self.root
    }

    pub fn tree(&self) -> &ControlTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ControlTree {
        &mut self.tree
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Add a control to the root panel.
    pub fn add(&mut self, control: Control) -> Result<ControlId> {
        self.tree.add(self.root, control)
    }

    /// Add a control to any container of the tree.
    pub fn add_to(&mut self, parent: ControlId, control: Control) -> Result<ControlId> {
        self.tree.add(parent, control)
    }

    /// Remove a control and its subtree.
    ///
    /// When focus was inside the removed subtree it moves on to the next tab
    /// stop that survived.
    pub fn remove(&mut self, id: ControlId) -> Result<Control> {
        let order = self.tree.tab_order(self.root);
        let focused = self.host.focused_control();
        let control = self.tree.remove(id, Some(&mut self.host))?;

        if let Some(focused) = focused.filter(|_| self.host.focused_control().is_none()) {
            let start = order.iter().position(|&entry| entry == focused).unwrap_or(0);
            let next = order
                .iter()
                .cycle()
                .skip(start + 1)
                .take(order.len())
                .copied()
                .find(|&entry| self.tree.contains(entry));
            if let Some(next) = next {
                debug!(removed = ?id, ?next, "focus moved off removed control");
                self.tree.set_focused(next, true, Some(&mut self.host))?;
            }
        }
        Ok(control)
    }

    /// Resize the root panel, e.g. after the terminal was resized.
    pub fn resize(&mut self, width: i32, height: i32) -> Result<()> {
        self.tree.resize(self.root, width, height)
    }

    pub fn drain_events(&mut self) -> Vec<ControlEvent> {
        self.tree.drain_events()
    }

    // =========================================================================
    // Focus
    // =========================================================================

    pub fn focused_control(&self) -> Option<ControlId> {
        self.host.focused_control()
    }

    pub fn focus(&mut self, id: ControlId) -> Result<()> {
        self.tree.set_focused(id, true, Some(&mut self.host))
    }

    pub fn unfocus(&mut self, id: ControlId) -> Result<()> {
        self.tree.set_focused(id, false, Some(&mut self.host))
    }

    /// Move focus to the next tab stop, wrapping. Returns the new holder.
    pub fn focus_next(&mut self) -> Result<Option<ControlId>> {
        self.step_focus(1)
    }

    /// Move focus to the previous tab stop, wrapping.
    pub fn focus_previous(&mut self) -> Result<Option<ControlId>> {
        self.step_focus(-1)
    }

    fn step_focus(&mut self, direction: i32) -> Result<Option<ControlId>> {
        let order = self.tree.tab_order(self.root);
        let next = step_tab_order(&order, self.host.focused_control(), direction);
        if let Some(next) = next {
            self.tree.set_focused(next, true, Some(&mut self.host))?;
        }
        Ok(next)
    }

    /// Whether the surface hosting the tree has focus. Changing it
    /// recomputes every control's state.
    pub fn set_parent_focused(&mut self, focused: bool) {
        if self.host.set_parent_focused(focused) {
            debug!(focused, "parent surface focus changed");
            self.tree.refresh_states(&self.host);
        }
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// One frame: mouse, then keyboard, then redraw.
    pub fn tick(&mut self, mouse: &MouseState, keyboard: &KeyboardState, delta: Duration, surface: &mut dyn Surface) -> Result<()> {
        self.process_mouse(mouse)?;
        self.process_keyboard(keyboard)?;
        self.tree.update_and_redraw(self.root, delta, surface)
    }

    /// Route a mouse frame. A captured control gets it exclusively.
    pub fn process_mouse(&mut self, mouse: &MouseState) -> Result<bool> {
        match self.host.captured_control() {
            Some(captured) if self.tree.contains(captured) => {
                trace!(control = ?captured, "mouse frame to captured control");
                self.tree.process_mouse(captured, mouse, &mut self.host)
            }
            Some(stale) => {
                debug!(control = ?stale, "dropping capture of removed control");
                self.host.release_control();
                self.tree.process_mouse(self.root, mouse, &mut self.host)
            }
            None => self.tree.process_mouse(self.root, mouse, &mut self.host),
        }
    }

    /// Route a keyboard frame.
    ///
    /// A released `Tab` moves focus (`Shift+Tab` backwards). Anything else
    /// goes to the focused control when it is enabled and uses the
    /// keyboard, otherwise through the root.
    pub fn process_keyboard(&mut self, keyboard: &KeyboardState) -> Result<bool> {
        if keyboard.is_empty() {
            return Ok(false);
        }
        if keyboard.is_key_released(Key::Tab) {
            let direction = if keyboard.modifiers.shift { -1 } else { 1 };
            self.step_focus(direction)?;
            return Ok(true);
        }

        let focused = self
            .host
            .focused_control()
            .filter(|&id| {
                self.tree
                    .get(id)
                    .is_some_and(|control| control.base().is_enabled() && control.base().use_keyboard())
            });
        match focused {
            Some(id) => self.tree.process_keyboard(id, keyboard, &mut self.host),
            None => self.tree.process_keyboard(self.root, keyboard, &mut self.host),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EventKind;
    use crate::renderer::FrameBuffer;
    use crate::state::{Modifiers, MouseButton};
    use crate::types::{Orientation, Point};

    fn clicked(events: &[ControlEvent], id: ControlId) -> bool {
        events.iter().any(|event| event.source == id && event.kind == EventKind::Click)
    }

    #[test]
    fn test_tab_cycles_focus() {
        let mut ui = Ui::new(20, 5);
        let a = ui.add(Control::button("A")).unwrap();
        let b = ui.add(Control::button("B").with_position(0, 1)).unwrap();

        let tab = KeyboardState::new().release(Key::Tab);
        ui.process_keyboard(&tab).unwrap();
        assert_eq!(ui.focused_control(), Some(a));
        ui.process_keyboard(&tab).unwrap();
        assert_eq!(ui.focused_control(), Some(b));
        ui.process_keyboard(&tab).unwrap();
        assert_eq!(ui.focused_control(), Some(a));

        let back = KeyboardState::new().release(Key::Tab).with_modifiers(Modifiers::shift());
        ui.process_keyboard(&back).unwrap();
        assert_eq!(ui.focused_control(), Some(b));
    }

    #[test]
    fn test_keys_go_to_focused_control() {
        let mut ui = Ui::new(20, 5);
        let a = ui.add(Control::button("A")).unwrap();
        let b = ui.add(Control::button("B").with_position(0, 1)).unwrap();
        ui.focus(a).unwrap();

        ui.process_keyboard(&KeyboardState::new().release(Key::Enter)).unwrap();
        let events = ui.drain_events();
        assert!(clicked(&events, a));
        assert!(!clicked(&events, b));
    }

    #[test]
    fn test_capture_gets_frames_off_control() {
        let mut ui = Ui::new(20, 12);
        let bar = ui.add(Control::scroll_bar(Orientation::Vertical, 10).unwrap()).unwrap();
        let button = ui.add(Control::button("Far").with_position(5, 5)).unwrap();

        // Press on the slider (track cell 0 is y = 1)
        ui.process_mouse(&MouseState::at(0, 1).pressed(MouseButton::Left)).unwrap();
        assert_eq!(ui.host().captured_control(), Some(bar));

        // Dragging over the button does not reach it
        ui.process_mouse(&MouseState::at(6, 5).pressed(MouseButton::Left)).unwrap();
        assert!(!ui.tree().control(button).unwrap().base().is_mouse_over());
        assert!(ui.tree().control(bar).unwrap().as_scroll_bar().unwrap().value() > 0);

        ui.process_mouse(&MouseState::at(6, 5).left_click()).unwrap();
        assert_eq!(ui.host().captured_control(), None);
    }

    #[test]
    fn test_removing_focused_moves_focus_on() {
        let mut ui = Ui::new(20, 5);
        let a = ui.add(Control::button("A")).unwrap();
        let b = ui.add(Control::button("B").with_position(0, 1)).unwrap();
        let c = ui.add(Control::button("C").with_position(0, 2)).unwrap();
        ui.focus(b).unwrap();

        ui.remove(b).unwrap();
        assert_eq!(ui.focused_control(), Some(c));
        ui.remove(c).unwrap();
        assert_eq!(ui.focused_control(), Some(a));
    }

    #[test]
    fn test_parent_focus_toggles_focused_state() {
        let mut ui = Ui::new(20, 5);
        let a = ui.add(Control::button("A")).unwrap();
        ui.focus(a).unwrap();

        ui.set_parent_focused(false);
        assert!(!ui.tree().control(a).unwrap().base().states().contains(crate::types::ControlStates::FOCUSED));
        ui.set_parent_focused(true);
        assert!(ui.tree().control(a).unwrap().base().states().contains(crate::types::ControlStates::FOCUSED));
    }

    #[test]
    fn test_tick_draws_and_cleans() {
        let mut ui = Ui::new(10, 2);
        let ok = ui.add(Control::button("OK").with_position(1, 1)).unwrap();
        let mut screen = FrameBuffer::new(10, 2);

        ui.tick(&MouseState::default(), &KeyboardState::new(), Duration::from_millis(16), &mut screen)
            .unwrap();
        assert!(screen.row_text(1).contains("OK"));
        assert!(!ui.tree().is_dirty(ok).unwrap());
        assert_eq!(ui.tree().absolute_position(ok).unwrap(), Point::new(1, 1));
    }
}
