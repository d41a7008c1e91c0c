//! ControlTree - the arena plus everything that spans more than one control.
//!
//! The tree owns every control, the parent/child links, the event queue and
//! the theme. It is the only place that touches two controls at once:
//!
//! - **Routing** - mouse frames go to children in reverse order (topmost
//!   first), keyboard frames to the first child that handles them
//! - **Commit** - after a control ran, its outbox is drained: events are
//!   queued, redraw requests become dirty flags, and requests (focus, scroll,
//!   part sync) plus reactions (scroll bar to owner, radio groups, tab pages)
//!   are applied
//! - **Parts** - scroll bars of list boxes and tables, and tab pages, are
//!   owned children created and kept in sync by the tree
//! - **Redraw** - dirty controls are drawn through a clipped canvas, parents
//!   before children
//!
//! # Dirty propagation
//!
//! A control going clean → dirty marks every descendant and every ancestor
//! dirty. Each node flips at most once, so the cascade terminates.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, trace};

use super::{ControlConfig, ControlEvent, ControlId, EventKind, EventQueue, Registry};
use crate::controls::scroll_bar::MIN_LENGTH;
use crate::controls::{Capabilities, Control, ControlKind, Request};
use crate::error::{ControlError, Result};
use crate::renderer::{Canvas, Surface};
use crate::state::{Host, KeyboardState, MouseState};
use crate::theme::Theme;
use crate::types::{Orientation, Point, Rect};

// =============================================================================
// Node
// =============================================================================

#[derive(Debug, Clone)]
struct Node {
    control: Control,
    parent: Option<ControlId>,
    /// Insertion order; the last child is drawn last and hit first.
    children: Vec<ControlId>,
    names: HashMap<String, ControlId>,
}

impl Node {
    fn new(control: Control, parent: Option<ControlId>) -> Self {
        Self {
            control,
            parent,
            children: Vec::new(),
            names: HashMap::new(),
        }
    }
}

// =============================================================================
// ControlTree
// =============================================================================

/// Arena of controls with their structure, events and theme.
#[derive(Debug, Clone, Default)]
pub struct ControlTree {
    nodes: Registry<Node>,
    events: EventQueue,
    theme: Theme,
}

impl ControlTree {
    pub fn new() -> Self {
        Self::with_theme(Theme::default())
    }

    pub fn with_theme(theme: Theme) -> Self {
        Self {
            nodes: Registry::new(),
            events: EventQueue::new(),
            theme,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Swap the theme; everything redraws.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        let ids: Vec<ControlId> = self.nodes.ids().collect();
        for id in ids {
            self.mark_dirty(id, true);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: ControlId) -> bool {
        self.nodes.contains(id)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    fn node(&self, id: ControlId) -> Result<&Node> {
        self.nodes.get(id).ok_or(ControlError::UnknownControl(id))
    }

    pub fn get(&self, id: ControlId) -> Option<&Control> {
        self.nodes.get(id).map(|node| &node.control)
    }

    pub fn control(&self, id: ControlId) -> Result<&Control> {
        self.node(id).map(|node| &node.control)
    }

    pub fn parent(&self, id: ControlId) -> Result<Option<ControlId>> {
        self.node(id).map(|node| node.parent)
    }

    /// Children in insertion order, owned parts included.
    pub fn children(&self, id: ControlId) -> Result<&[ControlId]> {
        self.node(id).map(|node| node.children.as_slice())
    }

    /// Direct child of `parent` named `name`.
    pub fn find(&self, parent: ControlId, name: &str) -> Option<ControlId> {
        self.nodes.get(parent)?.names.get(name).copied()
    }

    /// Position on the surface: own position plus every ancestor's.
    pub fn absolute_position(&self, id: ControlId) -> Result<Point> {
        let mut node = self.node(id)?;
        let mut position = node.control.base.position;
        while let Some(parent) = node.parent {
            node = self.node(parent)?;
            position = position + node.control.base.position;
        }
        Ok(position)
    }

    fn parent_origin(&self, id: ControlId) -> Result<Point> {
        match self.node(id)?.parent {
            Some(parent) => self.absolute_position(parent),
            None => Ok(Point::ZERO),
        }
    }

    fn is_ancestor(&self, ancestor: ControlId, id: ControlId) -> bool {
        let mut current = self.nodes.get(id).and_then(|node| node.parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.nodes.get(parent).and_then(|node| node.parent);
        }
        false
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Events raised since the last drain.
    pub fn events(&self) -> &[ControlEvent] {
        self.events.as_slice()
    }

    pub fn drain_events(&mut self) -> Vec<ControlEvent> {
        self.events.drain()
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Add a control without a parent.
    pub fn insert(&mut self, control: Control) -> ControlId {
        let id = self.nodes.insert(Node::new(control, None));
        self.sync_parts(id);
        self.commit(id, None);
        trace!(control = ?id, "root control inserted");
        id
    }

    /// Create `control` as the last child of `parent`.
    pub fn add(&mut self, parent: ControlId, control: Control) -> Result<ControlId> {
        let parent_node = self.node(parent)?;
        if !parent_node.control.kind.accepts_children() {
            return Err(ControlError::NotAContainer(parent));
        }
        if let Some(name) = control.base.name.as_deref() {
            if parent_node.names.contains_key(name) {
                return Err(ControlError::DuplicateName(name.to_string()));
            }
        }

        let name = control.base.name.clone();
        let id = self.nodes.insert(Node::new(control, Some(parent)));
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(id);
            if let Some(name) = name {
                node.names.insert(name, id);
            }
        }
        self.sync_parts(id);
        self.commit(id, None);
        self.mark_dirty(parent, true);
        debug!(?parent, child = ?id, "control added");
        Ok(id)
    }

    /// Move an existing control under `parent`.
    ///
    /// All checks run before anything is unlinked, so a failed attach leaves
    /// the control where it was.
    pub fn attach(&mut self, parent: ControlId, child: ControlId) -> Result<()> {
        let parent_node = self.node(parent)?;
        let child_node = self.node(child)?;
        if !parent_node.control.kind.accepts_children() {
            return Err(ControlError::NotAContainer(parent));
        }
        if child_node.control.base.owned {
            return Err(ControlError::OwnedChild(child));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(ControlError::Cycle { parent, child });
        }
        if child_node.parent == Some(parent) {
            return Ok(());
        }
        if let Some(name) = child_node.control.base.name.as_deref() {
            if parent_node.names.contains_key(name) {
                return Err(ControlError::DuplicateName(name.to_string()));
            }
        }

        self.unlink(child);
        let name = self.nodes.get(child).and_then(|node| node.control.base.name.clone());
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
            if let Some(name) = name {
                node.names.insert(name, child);
            }
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        self.mark_dirty(child, true);
        self.mark_dirty(parent, true);
        debug!(?parent, ?child, "control attached");
        Ok(())
    }

    /// Make a control a root again.
    pub fn detach(&mut self, child: ControlId) -> Result<()> {
        if self.node(child)?.control.base.owned {
            return Err(ControlError::OwnedChild(child));
        }
        self.unlink(child);
        self.mark_dirty(child, true);
        debug!(?child, "control detached");
        Ok(())
    }

    fn unlink(&mut self, child: ControlId) {
        let Some(node) = self.nodes.get_mut(child) else {
            return;
        };
        let Some(parent) = node.parent.take() else {
            return;
        };
        let name = node.control.base.name.clone();
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|&id| id != child);
            if let Some(name) = name {
                if parent_node.names.get(&name) == Some(&child) {
                    parent_node.names.remove(&name);
                }
            }
        }
        self.mark_dirty(parent, true);
    }

    /// Remove a control and its subtree, returning the control.
    ///
    /// With a host, focus and capture held inside the subtree are cleared.
    pub fn remove(&mut self, id: ControlId, mut host: Option<&mut Host>) -> Result<Control> {
        if self.node(id)?.control.base.owned {
            return Err(ControlError::OwnedChild(id));
        }
        self.unlink(id);
        let control = self
            .remove_subtree(id, host.as_deref_mut())
            .ok_or(ControlError::UnknownControl(id))?;
        debug!(control = ?id, kind = control.kind_name(), "control removed");
        Ok(control)
    }

    fn remove_subtree(&mut self, id: ControlId, mut host: Option<&mut Host>) -> Option<Control> {
        let node = self.nodes.remove(id)?;
        if let Some(host) = host.as_deref_mut() {
            let (was_focused, was_captured) = host.forget(id);
            if was_focused || was_captured {
                debug!(control = ?id, was_focused, was_captured, "removed control released host slots");
            }
        }
        for child in node.children {
            self.remove_subtree(child, host.as_deref_mut());
        }
        Some(node.control)
    }

    /// Rename a control; names are unique among siblings.
    pub fn set_name(&mut self, id: ControlId, name: Option<&str>) -> Result<()> {
        self.check_name(id, name)?;
        self.rename(id, name.map(str::to_string));
        Ok(())
    }

    fn check_name(&self, id: ControlId, name: Option<&str>) -> Result<()> {
        let node = self.node(id)?;
        let (Some(parent), Some(name)) = (node.parent, name) else {
            return Ok(());
        };
        match self.node(parent)?.names.get(name) {
            Some(&other) if other != id => Err(ControlError::DuplicateName(name.to_string())),
            _ => Ok(()),
        }
    }

    fn rename(&mut self, id: ControlId, name: Option<String>) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let previous = std::mem::replace(&mut node.control.base.name, name.clone());
        let Some(parent) = node.parent else {
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            if let Some(previous) = previous {
                if parent_node.names.get(&previous) == Some(&id) {
                    parent_node.names.remove(&previous);
                }
            }
            if let Some(name) = name {
                parent_node.names.insert(name, id);
            }
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Run `f` on a control, then redraw it and apply whatever it queued.
    ///
    /// This is the way to call the kind-specific `Control` methods
    /// (`set_value`, `add_item`, `select_cell`, ...) on a control in a tree.
    pub fn update<R>(&mut self, id: ControlId, f: impl FnOnce(&mut Control) -> R) -> Result<R> {
        let node = self.nodes.get_mut(id).ok_or(ControlError::UnknownControl(id))?;
        let result = f(&mut node.control);
        node.control.determine_state();
        node.control.base.outbox.invalidate();
        self.commit(id, None);
        Ok(result)
    }

    fn with_control<R>(&mut self, id: ControlId, f: impl FnOnce(&mut Control) -> R) -> Option<R> {
        self.nodes.get_mut(id).map(|node| f(&mut node.control))
    }

    pub fn set_position(&mut self, id: ControlId, position: Point) -> Result<()> {
        self.node(id)?;
        self.apply_position(id, position);
        self.commit(id, None);
        Ok(())
    }

    fn apply_position(&mut self, id: ControlId, position: Point) {
        let changed = self
            .with_control(id, |control| {
                let base = &mut control.base;
                if base.position == position {
                    return false;
                }
                let previous = std::mem::replace(&mut base.position, position);
                base.outbox.raise(EventKind::PositionChanged {
                    previous,
                    current: position,
                });
                true
            })
            .unwrap_or(false);
        if changed {
            self.mark_dirty(id, true);
            if let Some(parent) = self.nodes.get(id).and_then(|node| node.parent) {
                self.mark_dirty(parent, true);
            }
        }
    }

    /// Resize a control, validating its resize settings and minimum size.
    ///
    /// A scroll bar only takes the length along its orientation; it is
    /// always one cell thick.
    pub fn resize(&mut self, id: ControlId, width: i32, height: i32) -> Result<()> {
        let can_resize = self.node(id)?.control.base.can_resize;
        self.check_resize(id, width, height, can_resize)?;
        self.resize_internal(id, width, height);
        Ok(())
    }

    fn check_resize(&self, id: ControlId, width: i32, height: i32, can_resize: bool) -> Result<()> {
        let control = &self.node(id)?.control;
        if !can_resize {
            return Err(ControlError::NotResizable(id));
        }
        if let ControlKind::ScrollBar(bar) = &control.kind {
            let length = match bar.orientation() {
                Orientation::Vertical => height,
                Orientation::Horizontal => width,
            };
            if length < MIN_LENGTH {
                return Err(ControlError::ScrollBarTooShort {
                    length,
                    minimum: MIN_LENGTH,
                });
            }
            return Ok(());
        }
        let base = &control.base;
        if width < base.min_width || height < base.min_height {
            return Err(ControlError::BelowMinimumSize {
                width,
                height,
                min_width: base.min_width,
                min_height: base.min_height,
            });
        }
        Ok(())
    }

    fn resize_internal(&mut self, id: ControlId, width: i32, height: i32) {
        let resized = self
            .with_control(id, |control| {
                let Control { base, kind } = control;
                let target = match kind {
                    ControlKind::ScrollBar(bar) => match bar.orientation() {
                        Orientation::Vertical => (1, height),
                        Orientation::Horizontal => (width, 1),
                    },
                    _ => (width, height),
                };
                if target == (base.width, base.height) {
                    return false;
                }
                if let ControlKind::ScrollBar(bar) = kind {
                    let length = target.0.max(target.1);
                    if bar.change_length(length, &mut base.outbox).is_err() {
                        return false;
                    }
                }

                let (width, height) = target;
                base.apply_size(width, height);
                match kind {
                    ControlKind::ListBox(list) => {
                        list.set_size(width, height);
                        base.outbox.request(Request::SyncParts);
                    }
                    ControlKind::Table(table) => {
                        table.set_size(width, height);
                        base.outbox.request(Request::SyncParts);
                    }
                    ControlKind::TabControl(_) => base.outbox.request(Request::SyncParts),
                    _ => {}
                }
                base.outbox.raise(EventKind::Resized { width, height });
                base.outbox.invalidate();
                true
            })
            .unwrap_or(false);
        if resized {
            if let Some(parent) = self.nodes.get(id).and_then(|node| node.parent) {
                self.mark_dirty(parent, true);
            }
            self.commit(id, None);
        }
    }

    pub fn set_enabled(&mut self, id: ControlId, enabled: bool) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(ControlError::UnknownControl(id))?;
        node.control.base.is_enabled = enabled;
        node.control.determine_state();
        self.commit(id, None);
        Ok(())
    }

    /// Show or hide a control. Hidden controls are skipped by routing and
    /// redraw; hiding forgets hover and button state.
    pub fn set_visible(&mut self, id: ControlId, visible: bool) -> Result<()> {
        self.node(id)?;
        self.apply_visible(id, visible);
        Ok(())
    }

    fn apply_visible(&mut self, id: ControlId, visible: bool) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.control.base.is_visible == visible {
            return;
        }
        node.control.base.is_visible = visible;
        if !visible {
            node.control.base.reset_mouse();
            node.control.determine_state();
        }
        let parent = node.parent;
        self.mark_dirty(id, true);
        if let Some(parent) = parent {
            self.mark_dirty(parent, true);
        }
        self.commit(id, None);
    }

    pub fn is_dirty(&self, id: ControlId) -> Result<bool> {
        self.node(id).map(|node| node.control.base.is_dirty)
    }

    /// Set the redraw flag. Setting it propagates down to every descendant
    /// and up to every ancestor; clearing it only affects `id`.
    pub fn set_dirty(&mut self, id: ControlId, dirty: bool) -> Result<()> {
        self.node(id)?;
        self.mark_dirty(id, dirty);
        Ok(())
    }

    fn mark_dirty(&mut self, id: ControlId, dirty: bool) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.control.base.is_dirty == dirty {
            return;
        }
        node.control.base.is_dirty = dirty;
        self.events.push(id, EventKind::IsDirtyChanged(dirty));
        if !dirty {
            return;
        }

        let children = node.children.clone();
        let parent = node.parent;
        for child in children {
            self.mark_dirty(child, true);
        }
        if let Some(parent) = parent {
            self.mark_dirty(parent, true);
        }
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Focus or unfocus a control.
    ///
    /// With a host, focusing swaps the host's focused handle: the previous
    /// holder is unfocused first. Controls that cannot take focus (kind,
    /// setting, or disabled) are ignored. Without a host only the control's
    /// own flag changes.
    pub fn set_focused(&mut self, id: ControlId, focused: bool, host: Option<&mut Host>) -> Result<()> {
        let control = &self.node(id)?.control;
        let Some(host) = host else {
            self.apply_focus(id, focused, true);
            self.commit(id, None);
            return Ok(());
        };

        if !focused {
            if host.is_focused(id) {
                host.replace_focused(None);
            }
            self.apply_focus(id, false, host.is_parent_focused());
            self.commit(id, Some(host));
            return Ok(());
        }

        if !control.can_focus() {
            trace!(control = ?id, "focus ignored");
            return Ok(());
        }
        let previous = host.replace_focused(Some(id));
        if let Some(previous) = previous.filter(|&previous| previous != id) {
            self.apply_focus(previous, false, host.is_parent_focused());
            self.commit(previous, Some(&mut *host));
        }
        self.apply_focus(id, true, host.is_parent_focused());
        self.commit(id, Some(host));
        Ok(())
    }

    fn apply_focus(&mut self, id: ControlId, focused: bool, parent_focused: bool) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let base = &mut node.control.base;
        base.parent_focused = parent_focused;
        if base.is_focused != focused {
            base.is_focused = focused;
            base.outbox.raise(if focused { EventKind::Focused } else { EventKind::Unfocused });
        }
        node.control.determine_state();
    }

    /// Recompute every control's state after the host's surface focus
    /// changed.
    pub fn refresh_states(&mut self, host: &Host) {
        let ids: Vec<ControlId> = self.nodes.ids().collect();
        for id in ids {
            if let Some(node) = self.nodes.get_mut(id) {
                node.control.base.parent_focused = host.is_parent_focused();
                node.control.determine_state();
            }
            self.commit(id, None);
        }
    }

    /// Visible, enabled, focusable tab stops under `root`, ordered by tab
    /// index and then tree order.
    pub fn tab_order(&self, root: ControlId) -> Vec<ControlId> {
        let mut order = Vec::new();
        self.collect_tab_stops(root, &mut order);
        order.sort_by_key(|&id| self.nodes.get(id).map_or(0, |node| node.control.base.tab_index));
        order
    }

    fn collect_tab_stops(&self, id: ControlId, order: &mut Vec<ControlId>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let base = &node.control.base;
        if !base.is_visible || !base.is_enabled {
            return;
        }
        if base.tab_stop && node.control.can_focus() {
            order.push(id);
        }
        for &child in &node.children {
            self.collect_tab_stops(child, order);
        }
    }

    // =========================================================================
    // Input routing
    // =========================================================================

    /// Route one mouse frame into the subtree at `id`.
    ///
    /// Returns true when some control in the subtree claimed the pointer.
    pub fn process_mouse(&mut self, id: ControlId, mouse: &MouseState, host: &mut Host) -> Result<bool> {
        let origin = self.parent_origin(id)?;
        Ok(self.route_mouse(id, origin, mouse, host))
    }

    fn route_mouse(&mut self, id: ControlId, origin: Point, mouse: &MouseState, host: &mut Host) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        let base = &node.control.base;
        if !base.is_visible {
            return false;
        }
        let absolute = origin + base.position;
        let routes_children =
            node.control.capabilities().contains(Capabilities::CONTAINER) && base.is_enabled;
        let children = if routes_children { node.children.clone() } else { Vec::new() };

        // Topmost child first; once one claims the pointer the rest only see
        // an occluded frame
        let mut frame = *mouse;
        let mut claimed = false;
        for &child in children.iter().rev() {
            if self.route_mouse(child, absolute, &frame, host) && !claimed {
                trace!(control = ?child, "pointer claimed");
                claimed = true;
                frame = mouse.occluded();
            }
        }

        let handled = self
            .with_control(id, |control| control.process_mouse(id, absolute, &frame, host))
            .unwrap_or(false);
        self.commit(id, Some(host));
        claimed || handled
    }

    /// Route one keyboard frame into the subtree at `id`.
    pub fn process_keyboard(&mut self, id: ControlId, keyboard: &KeyboardState, host: &mut Host) -> Result<bool> {
        self.node(id)?;
        Ok(self.route_keyboard(id, keyboard, host))
    }

    fn route_keyboard(&mut self, id: ControlId, keyboard: &KeyboardState, host: &mut Host) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        let base = &node.control.base;
        if !base.is_visible || !base.is_enabled {
            return false;
        }
        let children = if node.control.capabilities().contains(Capabilities::CONTAINER) {
            node.children.clone()
        } else {
            Vec::new()
        };
        for &child in children.iter().rev() {
            if self.route_keyboard(child, keyboard, host) {
                return true;
            }
        }

        let handled = self
            .with_control(id, |control| control.process_keyboard(keyboard))
            .unwrap_or(false);
        self.commit(id, Some(host));
        handled
    }

    // =========================================================================
    // Redraw
    // =========================================================================

    /// Draw every dirty control of the subtree at `id` onto `surface`.
    ///
    /// Children are clipped to their parent's area. Visible children are
    /// visited every frame; clean ones draw nothing.
    pub fn update_and_redraw(&mut self, id: ControlId, delta: Duration, surface: &mut dyn Surface) -> Result<()> {
        let origin = self.parent_origin(id)?;
        let clip = Rect::sized(surface.width(), surface.height());
        trace!(control = ?id, ?delta, "update and redraw");
        self.redraw_node(id, origin, clip, surface);
        Ok(())
    }

    fn redraw_node(&mut self, id: ControlId, origin: Point, clip: Rect, surface: &mut dyn Surface) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let base = &node.control.base;
        if !base.is_visible {
            return;
        }
        let absolute = origin + base.position;
        let area = Rect::new(absolute.x, absolute.y, base.width, base.height);
        let Some(clip) = clip.intersect(&area) else {
            return;
        };

        let dirty = base.is_dirty;
        if dirty {
            let size = Point::new(base.width, base.height);
            let mut canvas = Canvas::new(&mut *surface, absolute, size, clip);
            node.control.redraw(&mut canvas, &self.theme);
        }
        let children = node.children.clone();
        if dirty {
            self.mark_dirty(id, false);
        }
        for child in children {
            self.redraw_node(child, absolute, clip, surface);
        }
    }

    // =========================================================================
    // Tabs
    // =========================================================================

    /// Append a tab and create its page, returning the page panel.
    ///
    /// Pages sit below the header row and fill the rest of the control;
    /// add the tab's content to the page.
    pub fn add_tab(&mut self, id: ControlId, title: impl Into<String>) -> Result<ControlId> {
        let control = &self.node(id)?.control;
        if control.as_tab_control().is_none() {
            return Err(control.wrong_kind("tab control"));
        }
        let (width, height) = (control.base.width, control.base.height);

        let page = self.create_part(id, Control::panel(width, (height - 1).max(0)).with_position(0, 1));
        let title = title.into();
        debug!(control = ?id, ?page, %title, "tab added");
        self.with_control(id, |control| {
            let Control { base, kind } = control;
            if let ControlKind::TabControl(tabs) = kind {
                tabs.push(title, page, &mut base.outbox);
            }
        });
        self.sync_tab_pages(id);
        self.commit(id, None);
        Ok(page)
    }

    /// Remove a tab and its page subtree.
    pub fn remove_tab(&mut self, id: ControlId, index: usize, mut host: Option<&mut Host>) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(ControlError::UnknownControl(id))?;
        let wrong = node.control.wrong_kind("tab control");
        let Control { base, kind } = &mut node.control;
        let ControlKind::TabControl(tabs) = kind else {
            return Err(wrong);
        };
        let page = tabs.take(index, &mut base.outbox)?;
        node.children.retain(|&child| child != page);

        self.remove_subtree(page, host.as_deref_mut());
        debug!(control = ?id, index, ?page, "tab removed");
        self.sync_tab_pages(id);
        self.commit(id, host);
        Ok(())
    }

    // =========================================================================
    // Config
    // =========================================================================

    /// Snapshot of a control's persisted settings.
    pub fn config(&self, id: ControlId) -> Result<ControlConfig> {
        self.control(id).map(ControlConfig::from)
    }

    /// Apply persisted settings. Name and size are validated first; on error
    /// nothing changes.
    pub fn apply_config(&mut self, id: ControlId, config: &ControlConfig) -> Result<()> {
        let base = &self.node(id)?.control.base;
        let resized = (config.width, config.height) != (base.width, base.height);
        let renamed = config.name != base.name;
        if resized {
            self.check_resize(id, config.width, config.height, config.can_resize)?;
        }
        if renamed {
            self.check_name(id, config.name.as_deref())?;
        }

        self.with_control(id, |control| {
            control.set_can_resize(config.can_resize);
            control.set_tab_stop(config.tab_stop);
            control.set_tab_index(config.tab_index);
            if control.base.theme != config.theme {
                control.set_theme(config.theme);
            }
        });
        if renamed {
            self.rename(id, config.name.clone());
        }
        if resized {
            self.resize_internal(id, config.width, config.height);
        }
        self.apply_position(id, config.position);
        self.set_enabled(id, config.enabled)?;
        self.apply_visible(id, config.visible);
        self.commit(id, None);
        Ok(())
    }

    // =========================================================================
    // Commit
    // =========================================================================

    /// Apply everything `id` queued, then whatever that triggered.
    fn commit(&mut self, id: ControlId, mut host: Option<&mut Host>) {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let Some(node) = self.nodes.get_mut(current) else {
                continue;
            };
            if node.control.take_table_changes() {
                self.sync_table(current);
            }
            let Some(node) = self.nodes.get_mut(current) else {
                continue;
            };
            let mut outbox = node.control.take_outbox();

            for kind in outbox.events {
                self.events.push(current, kind.clone());
                self.react(current, &kind, &mut pending);
            }
            if outbox.invalidated {
                self.mark_dirty(current, true);
            }
            // Parts first so scroll requests see the new ranges
            outbox.requests.sort_by_key(|request| !matches!(request, Request::SyncParts));
            for request in outbox.requests {
                self.apply_request(current, request, host.as_deref_mut(), &mut pending);
            }
        }
    }

    fn apply_request(&mut self, source: ControlId, request: Request, host: Option<&mut Host>, pending: &mut Vec<ControlId>) {
        match request {
            Request::Focus => {
                // Source is live; nothing to report
                let _ = self.set_focused(source, true, host);
            }
            Request::ScrollBy { orientation, delta } => self.scroll(source, orientation, |value| value + delta, pending),
            Request::ScrollTo { orientation, value } => self.scroll(source, orientation, |_| value, pending),
            Request::SyncParts => {
                self.sync_parts(source);
                pending.push(source);
            }
        }
    }

    /// Move the owner's visible scroll bar; lists without one scroll
    /// directly.
    fn scroll(&mut self, source: ControlId, orientation: Orientation, target: impl Fn(i32) -> i32, pending: &mut Vec<ControlId>) {
        if let Some(bar) = self.visible_bar(source, orientation) {
            self.with_control(bar, |control| {
                let value = control.as_scroll_bar().map_or(0, |bar| bar.value());
                let _ = control.set_value(target(value));
            });
            pending.push(bar);
            return;
        }

        let scrolled = self
            .with_control(source, |control| {
                let Control { base, kind } = control;
                match kind {
                    ControlKind::ListBox(list) if orientation == Orientation::Vertical => {
                        let offset = target(list.scroll_offset() as i32).max(0) as usize;
                        list.set_scroll_offset(offset, &mut base.outbox);
                        true
                    }
                    _ => false,
                }
            })
            .unwrap_or(false);
        if scrolled {
            pending.push(source);
        }
    }

    fn visible_bar(&self, owner: ControlId, orientation: Orientation) -> Option<ControlId> {
        let node = self.nodes.get(owner)?;
        let bar = match (&node.control.kind, orientation) {
            (ControlKind::ListBox(list), Orientation::Vertical) => list.scroll_bar?,
            (ControlKind::Table(table), Orientation::Vertical) => table.vertical_bar?,
            (ControlKind::Table(table), Orientation::Horizontal) => table.horizontal_bar?,
            _ => return None,
        };
        self.nodes
            .get(bar)
            .filter(|node| node.control.base.is_visible)
            .map(|_| bar)
    }

    /// Effects of one event on other controls.
    fn react(&mut self, source: ControlId, kind: &EventKind, pending: &mut Vec<ControlId>) {
        match kind {
            EventKind::ValueChanged { current, .. } => self.bar_moved(source, *current, pending),
            EventKind::IsSelectedChanged(true) => self.select_in_group(source, pending),
            EventKind::ActiveTabChanged { current, .. } => {
                debug!(control = ?source, tab = current, "active tab changed");
                self.sync_tab_pages(source);
            }
            _ => {}
        }
    }

    /// An owned scroll bar moved: scroll its owner.
    fn bar_moved(&mut self, bar: ControlId, value: i32, pending: &mut Vec<ControlId>) {
        let Some(owner) = self.nodes.get(bar).and_then(|node| node.parent) else {
            return;
        };
        let scrolled = self
            .with_control(owner, |control| {
                let Control { base, kind } = control;
                match kind {
                    ControlKind::ListBox(list) if list.scroll_bar == Some(bar) => {
                        list.set_scroll_offset(value.max(0) as usize, &mut base.outbox);
                        true
                    }
                    ControlKind::Table(table) if table.vertical_bar == Some(bar) => {
                        table.apply_scroll(Orientation::Vertical, value, &mut base.outbox);
                        true
                    }
                    ControlKind::Table(table) if table.horizontal_bar == Some(bar) => {
                        table.apply_scroll(Orientation::Horizontal, value, &mut base.outbox);
                        true
                    }
                    _ => false,
                }
            })
            .unwrap_or(false);
        if scrolled {
            pending.push(owner);
        }
    }

    /// A radio button turned on: turn off the others of its group among
    /// its siblings.
    fn select_in_group(&mut self, source: ControlId, pending: &mut Vec<ControlId>) {
        let Some(node) = self.nodes.get(source) else {
            return;
        };
        let Some(toggle) = node.control.as_toggle().filter(|toggle| toggle.is_radio()) else {
            return;
        };
        let group = toggle.group().map(str::to_string);
        let Some(siblings) = node.parent.and_then(|parent| self.nodes.get(parent)).map(|parent| parent.children.clone()) else {
            return;
        };

        for sibling in siblings {
            if sibling == source {
                continue;
            }
            let in_group = self
                .get(sibling)
                .and_then(Control::as_toggle)
                .is_some_and(|other| other.is_radio() && other.is_selected() && other.group() == group.as_deref());
            if in_group {
                self.with_control(sibling, |control| {
                    let _ = control.set_selected(false);
                });
                pending.push(sibling);
            }
        }
    }

    // =========================================================================
    // Owned parts
    // =========================================================================

    fn create_part(&mut self, owner: ControlId, mut control: Control) -> ControlId {
        control.base.owned = true;
        control.base.can_resize = false;
        control.base.tab_stop = false;
        control.base.focus_on_click = false;
        let id = self.nodes.insert(Node::new(control, Some(owner)));
        if let Some(node) = self.nodes.get_mut(owner) {
            node.children.push(id);
        }
        trace!(?owner, part = ?id, "part created");
        id
    }

    fn create_bar(&mut self, owner: ControlId, orientation: Orientation, length: i32) -> Option<ControlId> {
        let bar = Control::scroll_bar(orientation, length).ok()?;
        let id = self.create_part(owner, bar);
        // Shown once the owner's content overflows
        if let Some(node) = self.nodes.get_mut(id) {
            node.control.base.is_visible = false;
        }
        Some(id)
    }

    fn sync_parts(&mut self, id: ControlId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        match node.control.kind {
            ControlKind::ListBox(_) => self.sync_list_box(id),
            ControlKind::Table(_) => self.sync_table(id),
            ControlKind::TabControl(_) => self.sync_tab_pages(id),
            _ => {}
        }
    }

    /// Keep a list box's bar on its right edge, ranged to its items.
    fn sync_list_box(&mut self, id: ControlId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let (width, height) = (node.control.base.width, node.control.base.height);
        let Some(list) = node.control.as_list_box() else {
            return;
        };

        if list.scroll_bar.is_none() && height >= MIN_LENGTH {
            if let Some(bar) = self.create_bar(id, Orientation::Vertical, height) {
                self.with_control(id, |control| {
                    if let ControlKind::ListBox(list) = &mut control.kind {
                        list.scroll_bar = Some(bar);
                    }
                });
            }
        }

        let synced = self
            .with_control(id, |control| {
                let Control { base, kind } = control;
                let ControlKind::ListBox(list) = kind else {
                    return None;
                };
                list.set_size(base.width, base.height);
                let show = list.needs_scroll_bar() && base.height >= MIN_LENGTH;
                if list.scroll_bar_visible != show {
                    list.scroll_bar_visible = show;
                    base.outbox.invalidate();
                }
                list.set_scroll_offset(list.scroll_offset(), &mut base.outbox);
                Some((list.scroll_bar?, show, list.scroll_range(), list.scroll_offset()))
            })
            .flatten();
        let Some((bar, show, range, offset)) = synced else {
            return;
        };

        if height >= MIN_LENGTH {
            self.resize_internal(bar, 1, height);
        }
        self.apply_position(bar, Point::new(width - 1, 0));
        self.with_control(bar, |control| {
            let _ = control.set_maximum(range as i32);
            let _ = control.set_value(offset as i32);
        });
        self.apply_visible(bar, show);
        self.commit(bar, None);
    }

    /// Recompute a table's scroll stops and fit its bars to them.
    fn sync_table(&mut self, id: ControlId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let (width, height) = (node.control.base.width, node.control.base.height);
        let Some(table) = node.control.as_table() else {
            return;
        };
        let (mut vertical, mut horizontal) = (table.vertical_bar, table.horizontal_bar);
        if vertical.is_none() && height >= MIN_LENGTH {
            vertical = self.create_bar(id, Orientation::Vertical, height);
        }
        if horizontal.is_none() && width >= MIN_LENGTH {
            horizontal = self.create_bar(id, Orientation::Horizontal, width);
        }

        let synced = self
            .with_control(id, |control| {
                let Control { base, kind } = control;
                let ControlKind::Table(table) = kind else {
                    return None;
                };
                table.vertical_bar = vertical;
                table.horizontal_bar = horizontal;
                table.set_size(base.width, base.height);
                table.sync();
                base.outbox.invalidate();
                Some([Orientation::Vertical, Orientation::Horizontal].map(|orientation| {
                    (
                        orientation,
                        table.is_scroll_bar_visible(orientation),
                        table.scroll_stops(orientation).len(),
                        table.stop_index(orientation),
                    )
                }))
            })
            .flatten();
        let Some(axes) = synced else {
            return;
        };
        let viewport = self
            .get(id)
            .and_then(Control::as_table)
            .map_or((width, height), |table| table.viewport());

        for (orientation, visible, stops, index) in axes {
            let (bar, size, position) = match orientation {
                Orientation::Vertical => (vertical, (1, viewport.1.max(MIN_LENGTH)), Point::new(width - 1, 0)),
                Orientation::Horizontal => (horizontal, (viewport.0.max(MIN_LENGTH), 1), Point::new(0, height - 1)),
            };
            let Some(bar) = bar else {
                continue;
            };
            self.resize_internal(bar, size.0, size.1);
            self.apply_position(bar, position);
            self.with_control(bar, |control| {
                let _ = control.set_maximum(stops as i32 - 1);
                let _ = control.set_value(index as i32);
            });
            self.apply_visible(bar, visible);
            self.commit(bar, None);
        }
    }

    /// Size every page below the header row; show only the active one.
    fn sync_tab_pages(&mut self, id: ControlId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let (width, height) = (node.control.base.width, node.control.base.height);
        let Some(tabs) = node.control.as_tab_control() else {
            return;
        };
        let active = tabs.active_tab();
        let pages: Vec<ControlId> = tabs.tabs.iter().map(|tab| tab.page).collect();

        for (index, page) in pages.into_iter().enumerate() {
            self.resize_internal(page, width, (height - 1).max(0));
            self.apply_position(page, Point::new(0, 1));
            self.apply_visible(page, active == Some(index));
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
