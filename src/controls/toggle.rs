//! Check boxes and radio buttons.
//!
//! Both are a caption plus a selected flag that activation (click, Space,
//! Enter) toggles. A radio button only ever turns itself on; turning it on
//! makes the tree clear every sibling radio button of the same group.

use super::base::Outbox;
use super::{Control, ControlKind};
use crate::engine::EventKind;
use crate::error::Result;
use crate::renderer::Surface;
use crate::theme::{Theme, ThemeStates};
use crate::types::{ControlStates, Rect};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleStyle {
    CheckBox,
    /// Radio buttons with the same group under one parent are exclusive.
    Radio { group: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggle {
    text: String,
    style: ToggleStyle,
    is_selected: bool,
}

impl Toggle {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &ToggleStyle {
        &self.style
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    pub fn is_radio(&self) -> bool {
        matches!(self.style, ToggleStyle::Radio { .. })
    }

    /// Group name of a radio button.
    pub fn group(&self) -> Option<&str> {
        match &self.style {
            ToggleStyle::Radio { group } => group.as_deref(),
            ToggleStyle::CheckBox => None,
        }
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
    }

    /// Mark plus space plus caption.
    pub(crate) fn fitted_width(&self) -> i32 {
        self.text.chars().count() as i32 + 4
    }

    pub(crate) fn change_selected(&mut self, selected: bool, out: &mut Outbox) {
        if self.is_selected == selected {
            return;
        }
        self.is_selected = selected;
        out.raise(EventKind::IsSelectedChanged(selected));
        out.invalidate();
    }

    pub(crate) fn activate(&mut self, out: &mut Outbox) {
        let selected = match self.style {
            ToggleStyle::CheckBox => !self.is_selected,
            ToggleStyle::Radio { .. } => true,
        };
        self.change_selected(selected, out);
    }

    pub(crate) fn redraw(&self, surface: &mut dyn Surface, states: ControlStates, theme: &Theme, custom: Option<&ThemeStates>) {
        let look = custom.unwrap_or(&theme.control).appearance(states);
        surface.fill(
            Rect::sized(surface.width(), surface.height()),
            look.foreground,
            look.background,
            look.glyph,
        );

        let glyphs = &theme.toggle_glyphs;
        let mark = match (self.is_radio(), self.is_selected) {
            (false, true) => &glyphs.checked,
            (false, false) => &glyphs.unchecked,
            (true, true) => &glyphs.radio_on,
            (true, false) => &glyphs.radio_off,
        };
        let written = surface.print(0, 0, mark, look.foreground, look.background);
        surface.print(written + 1, 0, &self.text, look.foreground, look.background);
    }
}

impl Control {
    pub fn check_box(text: impl Into<String>) -> Control {
        Self::toggle(text.into(), ToggleStyle::CheckBox)
    }

    pub fn radio_button(text: impl Into<String>, group: Option<&str>) -> Control {
        Self::toggle(
            text.into(),
            ToggleStyle::Radio {
                group: group.map(str::to_string),
            },
        )
    }

    fn toggle(text: String, style: ToggleStyle) -> Control {
        let toggle = Toggle {
            text,
            style,
            is_selected: false,
        };
        let width = toggle.fitted_width();
        Control::new(ControlKind::Toggle(toggle), width, 1)
    }

    pub fn as_toggle(&self) -> Option<&Toggle> {
        match &self.kind {
            ControlKind::Toggle(toggle) => Some(toggle),
            _ => None,
        }
    }

    /// Selected flag of a check box or radio button; false for other kinds.
    pub fn is_selected(&self) -> bool {
        self.kind.is_selected()
    }

    pub fn set_selected(&mut self, selected: bool) -> Result<()> {
        let wrong = self.wrong_kind("check box or radio button");
        match &mut self.kind {
            ControlKind::Toggle(toggle) => {
                toggle.change_selected(selected, &mut self.base.outbox);
                self.determine_state();
                Ok(())
            }
            _ => Err(wrong),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::FrameBuffer;
    use crate::state::{Key, KeyboardState};

    #[test]
    fn test_check_box_toggles() {
        let mut check = Control::check_box("Wrap");
        assert!(check.process_keyboard(&KeyboardState::new().release(Key::SPACE)));
        assert!(check.is_selected());
        assert!(check.base().states().contains(ControlStates::SELECTED));

        assert!(check.process_keyboard(&KeyboardState::new().release(Key::Enter)));
        assert!(!check.is_selected());

        let events = check.take_outbox().events;
        assert!(events.contains(&EventKind::IsSelectedChanged(true)));
        assert!(events.contains(&EventKind::IsSelectedChanged(false)));
    }

    #[test]
    fn test_radio_stays_on() {
        let mut radio = Control::radio_button("A", Some("letters"));
        radio.set_selected(true).unwrap();
        radio.take_outbox();

        assert!(radio.process_keyboard(&KeyboardState::new().release(Key::SPACE)));
        assert!(radio.is_selected());
        assert!(
            !radio
                .take_outbox()
                .events
                .iter()
                .any(|e| matches!(e, EventKind::IsSelectedChanged(_)))
        );
        assert_eq!(radio.as_toggle().unwrap().group(), Some("letters"));
    }

    #[test]
    fn test_set_selected_on_button_is_wrong_kind() {
        let mut button = Control::button("OK");
        assert!(button.set_selected(true).is_err());
        assert!(!button.is_selected());
    }

    #[test]
    fn test_redraw_marks() {
        let mut check = Control::check_box("Go");
        check.set_selected(true).unwrap();
        let mut buffer = FrameBuffer::new(6, 1);
        if let ControlKind::Toggle(toggle) = check.kind() {
            toggle.redraw(&mut buffer, ControlStates::empty(), &Theme::default(), None);
        }
        assert_eq!(buffer.row_text(0), "[X] Go");
    }
}
