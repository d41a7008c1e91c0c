//! Focus Module - Host-owned focus and capture slots
//!
//! A `Host` is the single authority for one control tree:
//!
//! - **Focus** - at most one focused control
//! - **Capture** - at most one control receiving every mouse frame
//! - **Parent focus** - whether the surface hosting the tree has focus
//!
//! The host only stores handles. Swapping focus also has to notify the old
//! and new controls, so it goes through `ControlTree::set_focused`, which
//! calls back into the crate-private setters here.
//!
//! # Example
//!
//! ```ignore
//! let mut host = Host::new();
//! assert!(host.capture_control(bar));
//! assert!(!host.capture_control(other_bar)); // one capture per host
//! host.release_control();
//! ```

use tracing::debug;

use crate::engine::ControlId;

// =============================================================================
// Host
// =============================================================================

/// Focus and capture state for one control tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    focused: Option<ControlId>,
    captured: Option<ControlId>,
    parent_focused: bool,
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

impl Host {
    /// A host whose surface starts focused.
    pub fn new() -> Self {
        Self {
            focused: None,
            captured: None,
            parent_focused: true,
        }
    }

    /// The control holding focus, if any.
    pub fn focused_control(&self) -> Option<ControlId> {
        self.focused
    }

    /// Whether `id` holds focus.
    pub fn is_focused(&self, id: ControlId) -> bool {
        self.focused == Some(id)
    }

    /// Replace the focused handle, returning the previous one.
    pub(crate) fn replace_focused(&mut self, id: Option<ControlId>) -> Option<ControlId> {
        let previous = std::mem::replace(&mut self.focused, id);
        if previous != id {
            debug!(?previous, current = ?id, "focus changed");
        }
        previous
    }

    // =========================================================================
    // Capture
    // =========================================================================

    /// The control receiving every mouse frame, if any.
    pub fn captured_control(&self) -> Option<ControlId> {
        self.captured
    }

    /// Whether `id` holds the capture.
    pub fn is_captured(&self, id: ControlId) -> bool {
        self.captured == Some(id)
    }

    /// Route every mouse frame to `id` until released.
    ///
    /// Returns false when another control already holds the capture.
    pub fn capture_control(&mut self, id: ControlId) -> bool {
        match self.captured {
            Some(current) if current != id => false,
            Some(_) => true,
            None => {
                debug!(control = ?id, "mouse captured");
                self.captured = Some(id);
                true
            }
        }
    }

    /// Release the capture, returning the control that held it.
    pub fn release_control(&mut self) -> Option<ControlId> {
        let released = self.captured.take();
        if let Some(id) = released {
            debug!(control = ?id, "mouse released");
        }
        released
    }

    // =========================================================================
    // Parent surface
    // =========================================================================

    /// Whether the surface hosting the tree is focused.
    pub fn is_parent_focused(&self) -> bool {
        self.parent_focused
    }

    /// Returns true when the flag changed.
    pub(crate) fn set_parent_focused(&mut self, focused: bool) -> bool {
        let changed = self.parent_focused != focused;
        self.parent_focused = focused;
        changed
    }

    /// Drop any reference to a removed control.
    ///
    /// Returns (was_focused, was_captured).
    pub(crate) fn forget(&mut self, id: ControlId) -> (bool, bool) {
        let was_focused = self.focused == Some(id);
        let was_captured = self.captured == Some(id);
        if was_focused {
            self.focused = None;
        }
        if was_captured {
            self.captured = None;
        }
        (was_focused, was_captured)
    }
}

// =============================================================================
// FOCUS NAVIGATION
// =============================================================================

/// Next entry of `order` after `current`, wrapping.
///
/// `direction` is 1 for forward, -1 for backward. With no current entry,
/// forward starts at the first and backward at the last.
pub(crate) fn step_tab_order(order: &[ControlId], current: Option<ControlId>, direction: i32) -> Option<ControlId> {
    if order.is_empty() {
        return None;
    }

    let current_pos = current.and_then(|id| order.iter().position(|&c| c == id));

    match current_pos {
        None => {
            if direction >= 0 {
                order.first().copied()
            } else {
                order.last().copied()
            }
        }
        Some(pos) => {
            let len = order.len() as i32;
            let next_pos = ((pos as i32 + direction) % len + len) % len;
            order.get(next_pos as usize).copied()
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Registry;

    fn ids(n: usize) -> Vec<ControlId> {
        let mut registry: Registry<()> = Registry::new();
        (0..n).map(|_| registry.insert(())).collect()
    }

    #[test]
    fn test_initial_state() {
        let host = Host::new();
        assert_eq!(host.focused_control(), None);
        assert_eq!(host.captured_control(), None);
        assert!(host.is_parent_focused());
    }

    #[test]
    fn test_capture_is_exclusive() {
        let ids = ids(2);
        let mut host = Host::new();

        assert!(host.capture_control(ids[0]));
        assert!(host.capture_control(ids[0]));
        assert!(!host.capture_control(ids[1]));
        assert!(host.is_captured(ids[0]));

        assert_eq!(host.release_control(), Some(ids[0]));
        assert!(host.capture_control(ids[1]));
    }

    #[test]
    fn test_replace_focused_returns_previous() {
        let ids = ids(2);
        let mut host = Host::new();
        assert_eq!(host.replace_focused(Some(ids[0])), None);
        assert_eq!(host.replace_focused(Some(ids[1])), Some(ids[0]));
        assert!(host.is_focused(ids[1]));
    }

    #[test]
    fn test_forget_clears_both_slots() {
        let ids = ids(2);
        let mut host = Host::new();
        host.replace_focused(Some(ids[0]));
        host.capture_control(ids[0]);

        assert_eq!(host.forget(ids[1]), (false, false));
        assert_eq!(host.forget(ids[0]), (true, true));
        assert_eq!(host.focused_control(), None);
        assert_eq!(host.captured_control(), None);
    }

    #[test]
    fn test_parent_focus_change_reporting() {
        let mut host = Host::new();
        assert!(!host.set_parent_focused(true));
        assert!(host.set_parent_focused(false));
        assert!(!host.is_parent_focused());
    }

    // -------------------------------------------------------------------------
    // Tab order
    // -------------------------------------------------------------------------

    #[test]
    fn test_step_tab_order_wraps() {
        let ids = ids(3);
        assert_eq!(step_tab_order(&ids, None, 1), Some(ids[0]));
        assert_eq!(step_tab_order(&ids, None, -1), Some(ids[2]));
        assert_eq!(step_tab_order(&ids, Some(ids[0]), 1), Some(ids[1]));
        assert_eq!(step_tab_order(&ids, Some(ids[2]), 1), Some(ids[0]));
        assert_eq!(step_tab_order(&ids, Some(ids[0]), -1), Some(ids[2]));
        assert_eq!(step_tab_order(&[], None, 1), None);
    }
}
