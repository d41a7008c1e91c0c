//! ListBox - scrollable single-selection list of text items.
//!
//! Items are drawn one per row starting at `scroll_offset`. When the items
//! do not fit, an owned vertical scroll bar occupies the right column and
//! the tree keeps `scroll_offset` equal to the bar's value.

use std::time::Duration;

use super::base::{Outbox, Request};
use super::{Control, ControlKind};
use crate::engine::{ControlId, EventKind};
use crate::error::{ControlError, Result};
use crate::renderer::Surface;
use crate::state::{Key, KeyboardState, MouseState};
use crate::theme::{Theme, ThemeStates};
use crate::types::{ControlStates, HorizontalAlign, Orientation, Point, Rect};

/// Two clicks on one item within this window execute it.
pub const DOUBLE_CLICK: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct ListBox {
    items: Vec<String>,
    selected: Option<usize>,
    scroll_offset: usize,
    hovered: Option<usize>,
    single_click_execute: bool,
    last_click: Option<(Duration, usize)>,
    width: i32,
    height: i32,
    pub(crate) scroll_bar: Option<ControlId>,
    pub(crate) scroll_bar_visible: bool,
}

impl ListBox {
    fn new(width: i32, height: i32) -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            scroll_offset: 0,
            hovered: None,
            single_click_execute: false,
            last_click: None,
            width,
            height,
            scroll_bar: None,
            scroll_bar_visible: false,
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&str> {
        self.selected.and_then(|i| self.items.get(i)).map(String::as_str)
    }

    /// First visible item.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Item under the pointer.
    pub fn hovered_index(&self) -> Option<usize> {
        self.hovered
    }

    pub fn single_click_execute(&self) -> bool {
        self.single_click_execute
    }

    /// Owned vertical scroll bar, if the list is tall enough for one.
    pub fn scroll_bar(&self) -> Option<ControlId> {
        self.scroll_bar
    }

    /// Rows available for items.
    pub fn visible_rows(&self) -> usize {
        self.height.max(0) as usize
    }

    /// Scroll bar maximum needed to reach the last item.
    pub(crate) fn scroll_range(&self) -> usize {
        self.items.len().saturating_sub(self.visible_rows())
    }

    pub(crate) fn needs_scroll_bar(&self) -> bool {
        self.scroll_bar.is_some() && self.scroll_range() > 0
    }

    fn item_width(&self) -> i32 {
        if self.scroll_bar_visible { self.width - 1 } else { self.width }
    }

    pub(crate) fn set_size(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }

    pub(crate) fn set_scroll_offset(&mut self, offset: usize, out: &mut Outbox) {
        let offset = offset.min(self.scroll_range());
        if offset != self.scroll_offset {
            self.scroll_offset = offset;
            out.invalidate();
        }
    }

    fn item_at(&self, relative: Point) -> Option<usize> {
        if relative.x < 0 || relative.x >= self.item_width() || relative.y < 0 || relative.y >= self.height {
            return None;
        }
        let index = self.scroll_offset + relative.y as usize;
        (index < self.items.len()).then_some(index)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    fn change_selected(&mut self, index: Option<usize>, out: &mut Outbox) {
        if self.selected == index {
            return;
        }
        self.selected = index;
        out.raise(EventKind::SelectedItemChanged { index });
        out.invalidate();
    }

    /// Scroll just enough to show the selected item.
    pub(crate) fn scroll_to_selected(&self, out: &mut Outbox) {
        let Some(index) = self.selected else {
            return;
        };
        let rows = self.visible_rows().max(1);
        let target = if index < self.scroll_offset {
            index
        } else if index >= self.scroll_offset + rows {
            index + 1 - rows
        } else {
            return;
        };
        out.request(Request::ScrollTo {
            orientation: Orientation::Vertical,
            value: target as i32,
        });
    }

    // =========================================================================
    // Input hooks
    // =========================================================================

    pub(crate) fn on_mouse_in(&mut self, relative: Point, mouse: &MouseState, out: &mut Outbox) {
        let hovered = self.item_at(relative);
        if hovered != self.hovered {
            self.hovered = hovered;
            out.invalidate();
        }
        if mouse.scroll_delta != 0 && self.scroll_bar_visible {
            out.request(Request::ScrollBy {
                orientation: Orientation::Vertical,
                delta: mouse.scroll_delta.signum(),
            });
        }
    }

    pub(crate) fn on_mouse_exit(&mut self, out: &mut Outbox) {
        if self.hovered.take().is_some() {
            out.invalidate();
        }
    }

    pub(crate) fn on_left_clicked(&mut self, relative: Point, mouse: &MouseState, out: &mut Outbox) {
        let Some(index) = self.item_at(relative) else {
            return;
        };
        self.change_selected(Some(index), out);

        let double = matches!(
            self.last_click,
            Some((time, clicked)) if clicked == index && mouse.time.saturating_sub(time) <= DOUBLE_CLICK
        );
        if self.single_click_execute || double {
            self.last_click = None;
            out.raise(EventKind::SelectedItemExecuted { index });
        } else {
            self.last_click = Some((mouse.time, index));
        }
    }

    pub(crate) fn process_keyboard(&mut self, keyboard: &KeyboardState, out: &mut Outbox) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let last = self.items.len() - 1;

        if keyboard.is_key_released(Key::Up) {
            let index = self.selected.map_or(0, |i| i.saturating_sub(1));
            self.change_selected(Some(index), out);
            self.scroll_to_selected(out);
            true
        } else if keyboard.is_key_released(Key::Down) {
            let index = self.selected.map_or(0, |i| (i + 1).min(last));
            self.change_selected(Some(index), out);
            self.scroll_to_selected(out);
            true
        } else if keyboard.is_key_released(Key::Enter) {
            if let Some(index) = self.selected {
                out.raise(EventKind::SelectedItemExecuted { index });
            }
            true
        } else {
            false
        }
    }

    // =========================================================================
    // Redraw
    // =========================================================================

    pub(crate) fn redraw(&self, surface: &mut dyn Surface, states: ControlStates, theme: &Theme, custom: Option<&ThemeStates>) {
        let look = custom.unwrap_or(&theme.list_item).appearance(states);
        surface.fill(
            Rect::sized(surface.width(), surface.height()),
            look.foreground,
            look.background,
            look.glyph,
        );

        let width = self.item_width();
        let items = &theme.list_item;
        for (row, (index, item)) in self
            .items
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(self.visible_rows())
            .enumerate()
        {
            let mut item_states = ControlStates::empty();
            item_states.set(ControlStates::SELECTED, self.selected == Some(index));
            item_states.set(ControlStates::MOUSE_OVER, self.hovered == Some(index));
            item_states.set(ControlStates::DISABLED, states.contains(ControlStates::DISABLED));
            let item_look = items.appearance(item_states);

            let y = row as i32;
            surface.fill(Rect::new(0, y, width, 1), item_look.foreground, item_look.background, ' ');
            surface.print_aligned(
                0,
                y,
                width,
                item,
                HorizontalAlign::Left,
                item_look.foreground,
                item_look.background,
            );
        }
    }
}

// =============================================================================
// Control API
// =============================================================================

impl Control {
    /// An empty list. Lists at least three rows tall get a scroll bar.
    pub fn list_box(width: i32, height: i32) -> Control {
        Control::new(ControlKind::ListBox(ListBox::new(width, height)), width, height)
    }

    pub fn as_list_box(&self) -> Option<&ListBox> {
        match &self.kind {
            ControlKind::ListBox(list) => Some(list),
            _ => None,
        }
    }

    fn list_parts(&mut self) -> Result<(&mut ListBox, &mut Outbox)> {
        let wrong = self.wrong_kind("list box");
        match &mut self.kind {
            ControlKind::ListBox(list) => Ok((list, &mut self.base.outbox)),
            _ => Err(wrong),
        }
    }

    pub fn add_item(&mut self, item: impl Into<String>) -> Result<()> {
        let (list, out) = self.list_parts()?;
        list.items.push(item.into());
        out.request(Request::SyncParts);
        out.invalidate();
        Ok(())
    }

    pub fn insert_item(&mut self, index: usize, item: impl Into<String>) -> Result<()> {
        let (list, out) = self.list_parts()?;
        let len = list.items.len();
        if index > len {
            return Err(ControlError::ItemOutOfRange { index, len });
        }
        list.items.insert(index, item.into());
        if let Some(selected) = list.selected.filter(|&s| s >= index) {
            // Same item stays selected at its new index
            list.selected = Some(selected + 1);
        }
        out.request(Request::SyncParts);
        out.invalidate();
        Ok(())
    }

    /// Remove an item; removing the selected one clears the selection.
    pub fn remove_item(&mut self, index: usize) -> Result<String> {
        let (list, out) = self.list_parts()?;
        let len = list.items.len();
        if index >= len {
            return Err(ControlError::ItemOutOfRange { index, len });
        }
        let item = list.items.remove(index);
        let selected = list.selected;
        match selected {
            Some(selected) if selected == index => list.change_selected(None, out),
            Some(selected) if selected > index => list.selected = Some(selected - 1),
            _ => {}
        }
        list.hovered = None;
        list.last_click = None;
        out.request(Request::SyncParts);
        out.invalidate();
        Ok(item)
    }

    pub fn clear_items(&mut self) -> Result<()> {
        let (list, out) = self.list_parts()?;
        list.items.clear();
        list.change_selected(None, out);
        list.hovered = None;
        list.last_click = None;
        out.request(Request::SyncParts);
        out.invalidate();
        Ok(())
    }

    /// Select by index; `None` clears the selection.
    pub fn select_index(&mut self, index: Option<usize>) -> Result<()> {
        let (list, out) = self.list_parts()?;
        if let Some(index) = index {
            let len = list.items.len();
            if index >= len {
                return Err(ControlError::ItemOutOfRange { index, len });
            }
        }
        list.change_selected(index, out);
        Ok(())
    }

    /// Select the first item equal to `item`.
    pub fn select_item(&mut self, item: &str) -> Result<()> {
        let (list, out) = self.list_parts()?;
        let index = list
            .items
            .iter()
            .position(|i| i == item)
            .ok_or_else(|| ControlError::ItemNotFound(item.to_string()))?;
        list.change_selected(Some(index), out);
        Ok(())
    }

    /// Scroll so the selected item is visible.
    pub fn scroll_to_selected_item(&mut self) -> Result<()> {
        let (list, out) = self.list_parts()?;
        list.scroll_to_selected(out);
        Ok(())
    }

    pub fn set_single_click_execute(&mut self, enabled: bool) -> Result<()> {
        let (list, _) = self.list_parts()?;
        list.single_click_execute = enabled;
        Ok(())
    }
}
