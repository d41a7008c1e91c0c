//! Control base - the state machine every control shares.
//!
//! `ControlBase` holds geometry, settings and the cached interaction flags
//! (hover, buttons, focus) from which `ControlStates` is derived. It never
//! touches other controls: anything that has to reach the tree (events,
//! redraw requests, focus requests) is queued in its `Outbox` and applied by
//! the tree once the control is done.

use crate::engine::EventKind;
use crate::state::MouseState;
use crate::theme::ThemeStates;
use crate::types::{ControlStates, Orientation, Point, Rect};

// =============================================================================
// Outbox
// =============================================================================

/// Work a control asks the tree to do on its behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Request {
    /// Give this control focus.
    Focus,
    /// Move the owned scroll bar of this orientation by `delta` values.
    ScrollBy { orientation: Orientation, delta: i32 },
    /// Set the owned scroll bar of this orientation to `value`.
    ScrollTo { orientation: Orientation, value: i32 },
    /// Recompute owned scroll bars after content or size changed.
    SyncParts,
}

/// Queued events and requests, drained by the tree after every operation.
#[derive(Debug, Clone, Default)]
pub(crate) struct Outbox {
    pub events: Vec<EventKind>,
    pub requests: Vec<Request>,
    pub invalidated: bool,
}

impl Outbox {
    pub fn raise(&mut self, kind: EventKind) {
        self.events.push(kind);
    }

    pub fn request(&mut self, request: Request) {
        if !self.requests.contains(&request) {
            self.requests.push(request);
        }
    }

    /// Ask for a redraw.
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    pub fn take(&mut self) -> Outbox {
        std::mem::take(self)
    }
}

// =============================================================================
// Mouse frame result
// =============================================================================

/// What the hover state machine decided for one mouse frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MouseFrame {
    pub over: bool,
    pub exited: bool,
    /// Clicks in this frame may fire (button state was clean before it).
    pub click_allowed: bool,
}

// =============================================================================
// ControlBase
// =============================================================================

/// Geometry, settings and interaction state shared by every control.
#[derive(Debug, Clone)]
pub struct ControlBase {
    pub(crate) name: Option<String>,
    pub(crate) position: Point,
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) mouse_area: Rect,
    pub(crate) min_width: i32,
    pub(crate) min_height: i32,
    pub(crate) can_resize: bool,
    pub(crate) can_focus: bool,
    pub(crate) is_enabled: bool,
    pub(crate) is_visible: bool,
    pub(crate) use_mouse: bool,
    pub(crate) use_keyboard: bool,
    pub(crate) focus_on_click: bool,
    pub(crate) tab_stop: bool,
    pub(crate) tab_index: i32,
    pub(crate) theme: Option<ThemeStates>,
    /// Created and managed by its container.
    pub(crate) owned: bool,

    states: ControlStates,
    pub(crate) is_focused: bool,
    /// Host surface focus as last seen by this control.
    pub(crate) parent_focused: bool,
    is_mouse_over: bool,
    left_down: bool,
    right_down: bool,
    entered_with_button_down: bool,
    last_mouse: Option<Point>,
    pub(crate) is_dirty: bool,
    pub(crate) outbox: Outbox,
}

impl ControlBase {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            name: None,
            position: Point::ZERO,
            width,
            height,
            mouse_area: Rect::sized(width, height),
            min_width: 1,
            min_height: 1,
            can_resize: true,
            can_focus: true,
            is_enabled: true,
            is_visible: true,
            use_mouse: true,
            use_keyboard: true,
            focus_on_click: true,
            tab_stop: true,
            tab_index: 0,
            theme: None,
            owned: false,
            states: ControlStates::empty(),
            is_focused: false,
            parent_focused: false,
            is_mouse_over: false,
            left_down: false,
            right_down: false,
            entered_with_button_down: false,
            last_mouse: None,
            is_dirty: true,
            outbox: Outbox::default(),
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Position relative to the parent.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Position plus size, in parent coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }

    /// Hit-test rectangle relative to the control.
    pub fn mouse_area(&self) -> Rect {
        self.mouse_area
    }

    pub fn states(&self) -> ControlStates {
        self.states
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Holds focus (locally or via its host).
    pub fn is_focused(&self) -> bool {
        self.is_focused
    }

    pub fn is_mouse_over(&self) -> bool {
        self.is_mouse_over
    }

    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    pub fn can_resize(&self) -> bool {
        self.can_resize
    }

    pub fn use_mouse(&self) -> bool {
        self.use_mouse
    }

    pub fn use_keyboard(&self) -> bool {
        self.use_keyboard
    }

    pub fn focus_on_click(&self) -> bool {
        self.focus_on_click
    }

    pub fn tab_stop(&self) -> bool {
        self.tab_stop
    }

    pub fn tab_index(&self) -> i32 {
        self.tab_index
    }

    /// Theme override, if any.
    pub fn theme(&self) -> Option<&ThemeStates> {
        self.theme.as_ref()
    }

    /// False while a press that started outside the control is still held.
    pub fn is_mouse_button_state_clean(&self) -> bool {
        !self.entered_with_button_down
    }

    // =========================================================================
    // State machine
    // =========================================================================

    /// Recompose the state set from the cached flags.
    ///
    /// Raises `StateChanged` and asks for a redraw when the set changes.
    pub(crate) fn determine_state(&mut self, selected: bool) {
        let clean = self.is_mouse_button_state_clean();
        let mut states = ControlStates::empty();

        states.set(ControlStates::DISABLED, !self.is_enabled);
        states.set(ControlStates::MOUSE_OVER, self.is_mouse_over);
        states.set(ControlStates::FOCUSED, self.is_focused && self.parent_focused);
        states.set(ControlStates::MOUSE_LEFT_BUTTON_DOWN, self.left_down && clean);
        states.set(ControlStates::MOUSE_RIGHT_BUTTON_DOWN, self.right_down && clean);
        states.set(ControlStates::SELECTED, selected);

        if states != self.states {
            let previous = std::mem::replace(&mut self.states, states);
            self.outbox.raise(EventKind::StateChanged {
                previous,
                current: states,
            });
            self.outbox.invalidate();
        }
    }

    /// Run the hover/button state machine for one frame.
    ///
    /// `relative` is the pointer position relative to the control.
    pub(crate) fn track_mouse(&mut self, relative: Point, mouse: &MouseState, selected: bool) -> MouseFrame {
        let over = mouse.on_surface && self.mouse_area.contains(relative);
        let mut frame = MouseFrame {
            over,
            exited: false,
            click_allowed: false,
        };

        if over {
            if !self.is_mouse_over {
                self.is_mouse_over = true;
                self.entered_with_button_down = mouse.any_button_down();
                self.outbox.raise(EventKind::MouseEnter);
            }

            // Sampled before this frame's buttons can clean the state
            frame.click_allowed = !self.entered_with_button_down;

            self.left_down = mouse.left_down;
            self.right_down = mouse.right_down;
            if !mouse.any_button_down() {
                self.entered_with_button_down = false;
            }

            if self.last_mouse != Some(relative) {
                self.last_mouse = Some(relative);
                self.outbox.raise(EventKind::MouseMove(relative));
            }
        } else if self.is_mouse_over {
            self.reset_mouse();
            frame.exited = true;
            self.outbox.raise(EventKind::MouseExit);
        }

        self.determine_state(selected);
        frame
    }

    /// Forget hover and button caches.
    pub(crate) fn reset_mouse(&mut self) {
        self.is_mouse_over = false;
        self.left_down = false;
        self.right_down = false;
        self.entered_with_button_down = false;
        self.last_mouse = None;
    }

    /// Store a new size, keeping a full-size mouse area in sync.
    pub(crate) fn apply_size(&mut self, width: i32, height: i32) {
        if self.mouse_area == Rect::sized(self.width, self.height) {
            self.mouse_area = Rect::sized(width, height);
        }
        self.width = width;
        self.height = height;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MouseButton;

    fn events(base: &mut ControlBase) -> Vec<EventKind> {
        base.outbox.take().events
    }

    fn base() -> ControlBase {
        let mut base = ControlBase::new(4, 2);
        base.parent_focused = true;
        base
    }

    // -------------------------------------------------------------------------
    // determine_state
    // -------------------------------------------------------------------------

    #[test]
    fn test_determine_state_composes_flags() {
        let mut base = base();
        base.is_enabled = false;
        base.is_focused = true;
        base.determine_state(true);

        let states = base.states();
        assert!(states.contains(ControlStates::DISABLED));
        assert!(states.contains(ControlStates::FOCUSED));
        assert!(states.contains(ControlStates::SELECTED));
        assert!(!states.contains(ControlStates::MOUSE_OVER));
    }

    #[test]
    fn test_focused_requires_parent_focus() {
        let mut base = base();
        base.is_focused = true;
        base.parent_focused = false;
        base.determine_state(false);
        assert!(!base.states().contains(ControlStates::FOCUSED));

        base.parent_focused = true;
        base.determine_state(false);
        assert!(base.states().contains(ControlStates::FOCUSED));
    }

    #[test]
    fn test_state_change_raises_once() {
        let mut base = base();
        base.is_enabled = false;
        base.determine_state(false);
        base.determine_state(false);

        let raised = events(&mut base);
        assert_eq!(
            raised,
            vec![EventKind::StateChanged {
                previous: ControlStates::empty(),
                current: ControlStates::DISABLED,
            }]
        );
    }

    // -------------------------------------------------------------------------
    // track_mouse
    // -------------------------------------------------------------------------

    #[test]
    fn test_enter_and_exit_fire_on_edges_only() {
        let mut base = base();
        let inside = MouseState::at(1, 1);

        base.track_mouse(Point::new(1, 1), &inside, false);
        base.track_mouse(Point::new(1, 1), &inside, false);
        let raised = events(&mut base);
        assert_eq!(raised.iter().filter(|e| **e == EventKind::MouseEnter).count(), 1);
        assert_eq!(raised.iter().filter(|e| matches!(e, EventKind::MouseMove(_))).count(), 1);
        assert!(base.is_mouse_over());

        let outside = MouseState::at(9, 9);
        base.track_mouse(Point::new(9, 9), &outside, false);
        base.track_mouse(Point::new(9, 9), &outside, false);
        let raised = events(&mut base);
        assert_eq!(raised.iter().filter(|e| **e == EventKind::MouseExit).count(), 1);
        assert!(!base.is_mouse_over());
        assert!(base.states().is_empty());
    }

    #[test]
    fn test_entering_with_button_down_suppresses_click() {
        let mut base = base();
        let p = Point::new(0, 0);

        // Arrives already pressed
        let frame = base.track_mouse(p, &MouseState::at(0, 0).pressed(MouseButton::Left), false);
        assert!(!frame.click_allowed);
        assert!(!base.is_mouse_button_state_clean());
        assert!(!base.states().contains(ControlStates::MOUSE_LEFT_BUTTON_DOWN));

        // Release of that same press
        let frame = base.track_mouse(p, &MouseState::at(0, 0).left_click(), false);
        assert!(!frame.click_allowed);
        assert!(base.is_mouse_button_state_clean());

        // Fresh press and release
        base.track_mouse(p, &MouseState::at(0, 0).pressed(MouseButton::Left), false);
        assert!(base.states().contains(ControlStates::MOUSE_LEFT_BUTTON_DOWN));
        let frame = base.track_mouse(p, &MouseState::at(0, 0).left_click(), false);
        assert!(frame.click_allowed);
    }

    #[test]
    fn test_exit_resets_button_caches_even_if_held() {
        let mut base = base();
        base.track_mouse(Point::new(0, 0), &MouseState::at(0, 0), false);
        base.track_mouse(Point::new(0, 0), &MouseState::at(0, 0).pressed(MouseButton::Right), false);
        assert!(base.states().contains(ControlStates::MOUSE_RIGHT_BUTTON_DOWN));

        let frame = base.track_mouse(
            Point::new(8, 0),
            &MouseState::at(8, 0).pressed(MouseButton::Right),
            false,
        );
        assert!(frame.exited);
        assert!(!base.states().is_mouse_down());
    }

    #[test]
    fn test_occluded_frame_is_not_over() {
        let mut base = base();
        let frame = base.track_mouse(Point::new(1, 0), &MouseState::at(1, 0).occluded(), false);
        assert!(!frame.over);
        assert!(!base.is_mouse_over());
    }

    #[test]
    fn test_mouse_area_is_independent_of_bounds() {
        let mut base = base();
        base.mouse_area = Rect::new(1, 0, 1, 1);
        assert!(!base.track_mouse(Point::new(0, 0), &MouseState::default(), false).over);
        assert!(base.track_mouse(Point::new(1, 0), &MouseState::default(), false).over);
    }

    #[test]
    fn test_apply_size_tracks_full_mouse_area() {
        let mut base = base();
        base.apply_size(6, 3);
        assert_eq!(base.mouse_area(), Rect::sized(6, 3));

        base.mouse_area = Rect::new(0, 0, 2, 1);
        base.apply_size(8, 8);
        assert_eq!(base.mouse_area(), Rect::new(0, 0, 2, 1));
    }
}
