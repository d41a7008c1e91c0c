//! Controls - the closed set of widget kinds.
//!
//! A [`Control`] is a [`ControlBase`] (geometry, settings, interaction state)
//! plus a [`ControlKind`] carrying the kind-specific data. Dispatch is a
//! plain `match`: mouse frames first run the shared hover state machine in
//! the base, then reach the kind hooks (clicks, wheel, drag).
//!
//! Kind-specific operations that raise events are inherent methods on
//! `Control` living next to each kind, e.g. [`Control::set_value`] in
//! `scroll_bar.rs`. They return [`ControlError::WrongKind`] when called on
//! the wrong kind.

pub(crate) mod base;
mod button;
mod list_box;
mod panel;
pub(crate) mod scroll_bar;
mod tab_control;
mod toggle;

pub use base::ControlBase;
pub use button::Button;
pub use list_box::ListBox;
pub use panel::Panel;
pub use scroll_bar::{ScrollBar, slider_position_for, value_for_position};
pub use tab_control::TabControl;
pub use toggle::{Toggle, ToggleStyle};

pub(crate) use base::{Outbox, Request};

use crate::engine::{ControlId, EventKind};
use crate::error::ControlError;
use crate::renderer::Canvas;
use crate::state::{Host, Key, KeyboardState, MouseState};
use crate::table::Table;
use crate::theme::Theme;
use crate::types::Point;

bitflags::bitflags! {
    /// What a control kind can do.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Can hold keyboard focus.
        const CAN_FOCUS = 1 << 0;
        /// Has a selected/unselected state toggled by activation.
        const IS_TOGGLE = 1 << 1;
        /// Sizes itself from its content.
        const AUTO_SIZE = 1 << 2;
        /// Routes input to children and propagates dirtiness.
        const CONTAINER = 1 << 3;
    }
}

// =============================================================================
// ControlKind
// =============================================================================

/// Kind-specific data.
#[derive(Debug, Clone)]
pub enum ControlKind {
    Button(Button),
    Toggle(Toggle),
    ListBox(ListBox),
    ScrollBar(ScrollBar),
    Panel(Panel),
    TabControl(TabControl),
    Table(Box<Table>),
}

impl ControlKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Button(_) => "button",
            Self::Toggle(toggle) => match toggle.style() {
                ToggleStyle::CheckBox => "check box",
                ToggleStyle::Radio { .. } => "radio button",
            },
            Self::ListBox(_) => "list box",
            Self::ScrollBar(_) => "scroll bar",
            Self::Panel(_) => "panel",
            Self::TabControl(_) => "tab control",
            Self::Table(_) => "table",
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        match self {
            Self::Button(button) if button.auto_size() => Capabilities::CAN_FOCUS | Capabilities::AUTO_SIZE,
            Self::Button(_) | Self::ScrollBar(_) => Capabilities::CAN_FOCUS,
            Self::Toggle(_) => Capabilities::CAN_FOCUS | Capabilities::IS_TOGGLE,
            Self::Panel(_) => Capabilities::CONTAINER,
            Self::ListBox(_) | Self::TabControl(_) | Self::Table(_) => {
                Capabilities::CAN_FOCUS | Capabilities::CONTAINER
            }
        }
    }

    /// Whether callers may attach their own children.
    pub(crate) fn accepts_children(&self) -> bool {
        matches!(self, Self::Panel(_))
    }

    /// Drives the SELECTED state bit.
    pub(crate) fn is_selected(&self) -> bool {
        match self {
            Self::Toggle(toggle) => toggle.is_selected(),
            _ => false,
        }
    }

    // =========================================================================
    // Hooks
    // =========================================================================

    fn on_mouse_in(&mut self, relative: Point, mouse: &MouseState, out: &mut Outbox) {
        match self {
            Self::ListBox(list) => list.on_mouse_in(relative, mouse, out),
            Self::TabControl(tabs) => tabs.on_mouse_in(relative, out),
            Self::Table(table) => table.on_mouse_in(relative, mouse, out),
            _ => {}
        }
    }

    fn on_mouse_exit(&mut self, out: &mut Outbox) {
        match self {
            Self::ListBox(list) => list.on_mouse_exit(out),
            Self::TabControl(tabs) => tabs.on_mouse_exit(out),
            Self::Table(table) => table.on_mouse_exit(out),
            _ => {}
        }
    }

    fn on_left_clicked(&mut self, relative: Point, mouse: &MouseState, out: &mut Outbox) {
        match self {
            Self::Toggle(toggle) => toggle.activate(out),
            Self::ListBox(list) => list.on_left_clicked(relative, mouse, out),
            Self::TabControl(tabs) => tabs.on_left_clicked(relative, out),
            Self::Table(table) => table.on_left_clicked(relative, mouse, out),
            _ => {}
        }
    }

    fn on_right_clicked(&mut self, relative: Point, out: &mut Outbox) {
        if let Self::Table(table) = self {
            table.on_right_clicked(relative, out);
        }
    }

    fn process_keyboard(&mut self, keyboard: &KeyboardState, out: &mut Outbox) -> bool {
        match self {
            Self::Button(_) => {
                let activated = keyboard.is_key_released(Key::SPACE) || keyboard.is_key_released(Key::Enter);
                if activated {
                    out.raise(EventKind::Click);
                }
                activated
            }
            Self::Toggle(toggle) => {
                let activated = keyboard.is_key_released(Key::SPACE) || keyboard.is_key_released(Key::Enter);
                if activated {
                    toggle.activate(out);
                }
                activated
            }
            Self::ListBox(list) => list.process_keyboard(keyboard, out),
            Self::TabControl(tabs) => tabs.process_keyboard(keyboard, out),
            Self::ScrollBar(_) | Self::Panel(_) | Self::Table(_) => false,
        }
    }
}

// =============================================================================
// Control
// =============================================================================

/// One node's control: shared base plus kind data.
#[derive(Debug, Clone)]
pub struct Control {
    pub(crate) base: ControlBase,
    pub(crate) kind: ControlKind,
}

impl Control {
    pub(crate) fn new(kind: ControlKind, width: i32, height: i32) -> Self {
        let mut base = ControlBase::new(width, height);
        if !kind.capabilities().contains(Capabilities::CAN_FOCUS) {
            base.can_focus = false;
            base.tab_stop = false;
            base.focus_on_click = false;
        }
        Self { base, kind }
    }

    // =========================================================================
    // Builders
    // =========================================================================

    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.base.position = Point::new(x, y);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.base.name = Some(name.into());
        self
    }

    pub fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.base.tab_index = tab_index;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn base(&self) -> &ControlBase {
        &self.base
    }

    pub fn kind(&self) -> &ControlKind {
        &self.kind
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.kind.capabilities()
    }

    /// Focusable right now (kind allows it, setting allows it, enabled).
    pub fn can_focus(&self) -> bool {
        self.capabilities().contains(Capabilities::CAN_FOCUS) && self.base.can_focus && self.base.is_enabled
    }

    pub(crate) fn wrong_kind(&self, expected: &'static str) -> ControlError {
        ControlError::WrongKind {
            expected,
            found: self.kind_name(),
        }
    }

    // =========================================================================
    // Settings (no tree bookkeeping needed)
    // =========================================================================

    pub fn set_use_mouse(&mut self, use_mouse: bool) {
        self.base.use_mouse = use_mouse;
    }

    pub fn set_use_keyboard(&mut self, use_keyboard: bool) {
        self.base.use_keyboard = use_keyboard;
    }

    pub fn set_focus_on_click(&mut self, focus_on_click: bool) {
        self.base.focus_on_click = focus_on_click;
    }

    pub fn set_can_focus(&mut self, can_focus: bool) {
        self.base.can_focus = can_focus;
    }

    pub fn set_tab_stop(&mut self, tab_stop: bool) {
        self.base.tab_stop = tab_stop;
    }

    pub fn set_tab_index(&mut self, tab_index: i32) {
        self.base.tab_index = tab_index;
    }

    pub fn set_can_resize(&mut self, can_resize: bool) {
        self.base.can_resize = can_resize;
    }

    pub fn set_minimum_size(&mut self, width: i32, height: i32) {
        self.base.min_width = width.max(0);
        self.base.min_height = height.max(0);
    }

    /// Restrict hit testing to part of the control (relative coordinates).
    pub fn set_mouse_area(&mut self, area: crate::types::Rect) {
        self.base.mouse_area = area;
    }

    /// Per-control theme override; `None` falls back to the tree theme.
    pub fn set_theme(&mut self, theme: Option<crate::theme::ThemeStates>) {
        self.base.theme = theme;
        self.base.outbox.invalidate();
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    pub(crate) fn determine_state(&mut self) {
        let selected = self.kind.is_selected();
        self.base.determine_state(selected);
    }

    /// One mouse frame. `absolute` is the control's surface position.
    pub(crate) fn process_mouse(&mut self, id: ControlId, absolute: Point, mouse: &MouseState, host: &mut Host) -> bool {
        self.base.parent_focused = host.is_parent_focused();
        if !self.base.is_enabled || !self.base.use_mouse {
            return false;
        }

        let relative = mouse.position - absolute;
        let frame = self.base.track_mouse(relative, mouse, self.kind.is_selected());
        let Control { base, kind } = self;

        if frame.over {
            kind.on_mouse_in(relative, mouse, &mut base.outbox);
            if mouse.left_clicked && frame.click_allowed {
                if base.focus_on_click {
                    base.outbox.request(Request::Focus);
                }
                base.outbox.raise(EventKind::Click);
                kind.on_left_clicked(relative, mouse, &mut base.outbox);
            }
            if mouse.right_clicked && frame.click_allowed {
                base.outbox.raise(EventKind::RightClick);
                kind.on_right_clicked(relative, &mut base.outbox);
            }
        } else if frame.exited {
            kind.on_mouse_exit(&mut base.outbox);
        }

        let handled = match kind {
            ControlKind::ScrollBar(bar) => bar.process_mouse(id, frame, relative, mouse, host, &mut base.outbox),
            _ => frame.over,
        };

        self.determine_state();
        handled
    }

    pub(crate) fn process_keyboard(&mut self, keyboard: &KeyboardState) -> bool {
        if !self.base.is_enabled || !self.base.use_keyboard {
            return false;
        }
        let handled = self.kind.process_keyboard(keyboard, &mut self.base.outbox);
        self.determine_state();
        handled
    }

    pub(crate) fn redraw(&self, canvas: &mut Canvas<'_>, theme: &Theme) {
        let states = self.base.states();
        let custom = self.base.theme.as_ref();
        match &self.kind {
            ControlKind::Button(button) => button.redraw(canvas, states, theme, custom),
            ControlKind::Toggle(toggle) => toggle.redraw(canvas, states, theme, custom),
            ControlKind::ListBox(list) => list.redraw(canvas, states, theme, custom),
            ControlKind::ScrollBar(bar) => bar.redraw(canvas, states, theme, custom),
            ControlKind::Panel(panel) => panel.redraw(canvas, states, theme, custom),
            ControlKind::TabControl(tabs) => tabs.redraw(canvas, states, theme, custom),
            ControlKind::Table(table) => table.redraw(canvas, states, theme, custom),
        }
    }

    pub(crate) fn take_outbox(&mut self) -> Outbox {
        self.base.outbox.take()
    }
}

// =============================================================================
// Tests
// =============================================================================
