//! TabControl - header strip plus one page panel per tab.
//!
//! Row 0 holds the headers, each ` title ` wide, left to right. Every tab
//! owns a page panel covering the rest of the control; only the active page
//! is visible. Pages are created and removed by the tree
//! (`ControlTree::add_tab` / `remove_tab`) since they are real controls.

use super::base::Outbox;
use super::{Control, ControlKind};
use crate::engine::{ControlId, EventKind};
use crate::error::{ControlError, Result};
use crate::renderer::Surface;
use crate::state::{Key, KeyboardState};
use crate::theme::{Theme, ThemeStates};
use crate::types::{ControlStates, Point, Rect};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tab {
    pub title: String,
    pub page: ControlId,
}

#[derive(Debug, Clone, Default)]
pub struct TabControl {
    pub(crate) tabs: Vec<Tab>,
    active: usize,
    hovered: Option<usize>,
}

impl TabControl {
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Index of the shown tab; `None` when there are no tabs.
    pub fn active_tab(&self) -> Option<usize> {
        (!self.tabs.is_empty()).then_some(self.active)
    }

    pub fn title(&self, index: usize) -> Option<&str> {
        self.tabs.get(index).map(|tab| tab.title.as_str())
    }

    /// Page panel of a tab; attach tab content here.
    pub fn page(&self, index: usize) -> Option<ControlId> {
        self.tabs.get(index).map(|tab| tab.page)
    }

    /// Header spans as (start column, width).
    fn headers(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.tabs.iter().scan(0, |x, tab| {
            let width = tab.title.chars().count() as i32 + 2;
            let start = *x;
            *x += width;
            Some((start, width))
        })
    }

    fn header_at(&self, relative: Point) -> Option<usize> {
        if relative.y != 0 {
            return None;
        }
        self.headers()
            .position(|(start, width)| relative.x >= start && relative.x < start + width)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.tabs.len() {
            return Err(ControlError::TabOutOfRange {
                index,
                len: self.tabs.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn change_active(&mut self, index: usize, out: &mut Outbox) {
        if index == self.active || index >= self.tabs.len() {
            return;
        }
        let previous = std::mem::replace(&mut self.active, index);
        out.raise(EventKind::ActiveTabChanged { previous, current: index });
        out.invalidate();
    }

    pub(crate) fn push(&mut self, title: String, page: ControlId, out: &mut Outbox) {
        self.tabs.push(Tab { title, page });
        out.invalidate();
    }

    /// Drop a tab, keeping the same page shown when it survives.
    pub(crate) fn take(&mut self, index: usize, out: &mut Outbox) -> Result<ControlId> {
        self.check_index(index)?;
        let tab = self.tabs.remove(index);
        self.hovered = None;
        out.invalidate();

        if index < self.active {
            self.active -= 1;
        } else if index == self.active {
            let current = self.active.min(self.tabs.len().saturating_sub(1));
            self.active = current;
            if !self.tabs.is_empty() {
                out.raise(EventKind::ActiveTabChanged {
                    previous: index,
                    current,
                });
            }
        }
        Ok(tab.page)
    }

    // =========================================================================
    // Input hooks
    // =========================================================================

    pub(crate) fn on_mouse_in(&mut self, relative: Point, out: &mut Outbox) {
        let hovered = self.header_at(relative);
        if hovered != self.hovered {
            self.hovered = hovered;
            out.invalidate();
        }
    }

    pub(crate) fn on_mouse_exit(&mut self, out: &mut Outbox) {
        if self.hovered.take().is_some() {
            out.invalidate();
        }
    }

    pub(crate) fn on_left_clicked(&mut self, relative: Point, out: &mut Outbox) {
        if let Some(index) = self.header_at(relative) {
            self.change_active(index, out);
        }
    }

    pub(crate) fn process_keyboard(&mut self, keyboard: &KeyboardState, out: &mut Outbox) -> bool {
        if self.tabs.is_empty() {
            return false;
        }
        if keyboard.is_key_released(Key::Left) {
            self.change_active(self.active.saturating_sub(1), out);
            true
        } else if keyboard.is_key_released(Key::Right) {
            self.change_active((self.active + 1).min(self.tabs.len() - 1), out);
            true
        } else {
            false
        }
    }

    // =========================================================================
    // Redraw
    // =========================================================================

    pub(crate) fn redraw(&self, surface: &mut dyn Surface, states: ControlStates, theme: &Theme, custom: Option<&ThemeStates>) {
        let look = custom.unwrap_or(&theme.panel).appearance(states);
        surface.fill(
            Rect::sized(surface.width(), surface.height()),
            look.foreground,
            look.background,
            look.glyph,
        );

        for (index, (start, width)) in self.headers().enumerate() {
            let mut header_states = ControlStates::empty();
            header_states.set(ControlStates::SELECTED, index == self.active);
            header_states.set(ControlStates::MOUSE_OVER, self.hovered == Some(index));
            header_states.set(ControlStates::DISABLED, states.contains(ControlStates::DISABLED));
            header_states.set(
                ControlStates::FOCUSED,
                index == self.active && states.contains(ControlStates::FOCUSED),
            );
            let header = theme.tab_header.appearance(header_states);

            surface.fill(Rect::new(start, 0, width, 1), header.foreground, header.background, ' ');
            surface.print(start + 1, 0, &self.tabs[index].title, header.foreground, header.background);
        }
    }
}

// =============================================================================
// Control API
// =============================================================================

impl Control {
    /// A tab control without tabs; add them with `ControlTree::add_tab`.
    pub fn tab_control(width: i32, height: i32) -> Control {
        let mut control = Control::new(ControlKind::TabControl(TabControl::default()), width, height);
        control.base.min_height = 2;
        control
    }

    pub fn as_tab_control(&self) -> Option<&TabControl> {
        match &self.kind {
            ControlKind::TabControl(tabs) => Some(tabs),
            _ => None,
        }
    }

    fn tab_parts(&mut self) -> Result<(&mut TabControl, &mut Outbox)> {
        let wrong = self.wrong_kind("tab control");
        match &mut self.kind {
            ControlKind::TabControl(tabs) => Ok((tabs, &mut self.base.outbox)),
            _ => Err(wrong),
        }
    }

    pub fn set_active_tab(&mut self, index: usize) -> Result<()> {
        let (tabs, out) = self.tab_parts()?;
        tabs.check_index(index)?;
        tabs.change_active(index, out);
        Ok(())
    }

    /// Show the next tab, staying on the last one.
    pub fn next_tab(&mut self) -> Result<()> {
        let (tabs, out) = self.tab_parts()?;
        if let Some(active) = tabs.active_tab() {
            tabs.change_active((active + 1).min(tabs.len() - 1), out);
        }
        Ok(())
    }

    /// Show the previous tab, staying on the first one.
    pub fn previous_tab(&mut self) -> Result<()> {
        let (tabs, out) = self.tab_parts()?;
        if let Some(active) = tabs.active_tab() {
            tabs.change_active(active.saturating_sub(1), out);
        }
        Ok(())
    }

    pub fn rename_tab(&mut self, index: usize, title: impl Into<String>) -> Result<()> {
        let (tabs, out) = self.tab_parts()?;
        tabs.check_index(index)?;
        tabs.tabs[index].title = title.into();
        out.invalidate();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Registry;

    fn with_tabs(titles: &[&str]) -> Control {
        let mut registry = Registry::new();
        let mut control = Control::tab_control(20, 5);
        if let ControlKind::TabControl(tabs) = &mut control.kind {
            let mut out = Outbox::default();
            for title in titles {
                tabs.push(title.to_string(), registry.insert(()), &mut out);
            }
        }
        control
    }

    #[test]
    fn test_header_hit_test() {
        let control = with_tabs(&["One", "Two"]);
        let tabs = control.as_tab_control().unwrap();
        // " One " spans 0..5, " Two " spans 5..10
        assert_eq!(tabs.header_at(Point::new(0, 0)), Some(0));
        assert_eq!(tabs.header_at(Point::new(5, 0)), Some(1));
        assert_eq!(tabs.header_at(Point::new(10, 0)), None);
        assert_eq!(tabs.header_at(Point::new(1, 1)), None);
    }

    #[test]
    fn test_set_active_tab_bounds() {
        let mut control = with_tabs(&["One", "Two"]);
        control.set_active_tab(1).unwrap();
        assert_eq!(control.as_tab_control().unwrap().active_tab(), Some(1));
        assert_eq!(
            control.set_active_tab(2),
            Err(ControlError::TabOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            control.take_outbox().events,
            vec![EventKind::ActiveTabChanged { previous: 0, current: 1 }]
        );
    }

    #[test]
    fn test_next_and_previous_stop_at_ends() {
        let mut control = with_tabs(&["a", "b", "c"]);
        control.previous_tab().unwrap();
        assert_eq!(control.as_tab_control().unwrap().active_tab(), Some(0));
        for _ in 0..5 {
            control.next_tab().unwrap();
        }
        assert_eq!(control.as_tab_control().unwrap().active_tab(), Some(2));
    }

    #[test]
    fn test_removing_active_tab_moves_to_neighbor() {
        let mut control = with_tabs(&["a", "b"]);
        control.set_active_tab(1).unwrap();
        let ControlKind::TabControl(tabs) = &mut control.kind else {
            unreachable!()
        };
        let mut out = Outbox::default();
        tabs.take(1, &mut out).unwrap();
        assert_eq!(tabs.active_tab(), Some(0));
        assert_eq!(out.events, vec![EventKind::ActiveTabChanged { previous: 1, current: 0 }]);
    }

    #[test]
    fn test_empty_tab_control() {
        let mut control = Control::tab_control(10, 4);
        assert_eq!(control.as_tab_control().unwrap().active_tab(), None);
        assert!(control.set_active_tab(0).is_err());
        assert!(control.next_tab().is_ok());
    }
}
