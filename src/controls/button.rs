//! Button - raises `Click` on activation.

use super::{Control, ControlKind};
use crate::engine::EventKind;
use crate::error::Result;
use crate::renderer::Surface;
use crate::theme::{Theme, ThemeStates};
use crate::types::{ControlStates, HorizontalAlign, Rect};

/// Cells added around the text when auto-sizing.
const PADDING: i32 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    text: String,
    auto_size: bool,
    align: HorizontalAlign,
}

impl Button {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn auto_size(&self) -> bool {
        self.auto_size
    }

    pub fn align(&self) -> HorizontalAlign {
        self.align
    }

    fn fitted_width(&self) -> i32 {
        self.text.chars().count() as i32 + PADDING
    }

    pub(crate) fn redraw(&self, surface: &mut dyn Surface, states: ControlStates, theme: &Theme, custom: Option<&ThemeStates>) {
        let look = custom.unwrap_or(&theme.control).appearance(states);
        let area = Rect::sized(surface.width(), surface.height());
        surface.fill(area, look.foreground, look.background, look.glyph);

        let y = (area.height - 1) / 2;
        surface.print_aligned(1, y, area.width - 2, &self.text, self.align, look.foreground, look.background);
    }
}

impl Control {
    /// One-row button sized to its text.
    pub fn button(text: impl Into<String>) -> Control {
        let button = Button {
            text: text.into(),
            auto_size: true,
            align: HorizontalAlign::Center,
        };
        let width = button.fitted_width();
        Control::new(ControlKind::Button(button), width, 1)
    }

    /// Fixed-size button.
    pub fn button_sized(text: impl Into<String>, width: i32, height: i32) -> Control {
        let button = Button {
            text: text.into(),
            auto_size: false,
            align: HorizontalAlign::Center,
        };
        Control::new(ControlKind::Button(button), width, height)
    }

    pub fn as_button(&self) -> Option<&Button> {
        match &self.kind {
            ControlKind::Button(button) => Some(button),
            _ => None,
        }
    }

    /// Caption of a button, check box or radio button.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            ControlKind::Button(button) => Some(button.text()),
            ControlKind::Toggle(toggle) => Some(toggle.text()),
            _ => None,
        }
    }

    /// Replace the caption; auto-sized buttons follow the new text.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        let wrong = self.wrong_kind("button");
        let resized = match &mut self.kind {
            ControlKind::Button(button) => {
                button.text = text;
                button.auto_size.then(|| button.fitted_width())
            }
            ControlKind::Toggle(toggle) => {
                toggle.set_text(text);
                Some(toggle.fitted_width())
            }
            _ => return Err(wrong),
        };

        if let Some(width) = resized {
            if width != self.base.width {
                let height = self.base.height;
                self.base.apply_size(width, height);
                self.base.outbox.raise(EventKind::Resized { width, height });
            }
        }
        self.base.outbox.invalidate();
        Ok(())
    }

    pub fn set_text_align(&mut self, align: HorizontalAlign) -> Result<()> {
        let wrong = self.wrong_kind("button");
        match &mut self.kind {
            ControlKind::Button(button) => {
                button.align = align;
                self.base.outbox.invalidate();
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

    #[test]
    fn test_auto_size_follows_text() {
        let mut button = Control::button("OK");
        assert_eq!(button.base().width(), 6);

        button.set_text("Cancel").unwrap();
        assert_eq!(button.base().width(), 10);
        assert_eq!(button.text(), Some("Cancel"));
        assert!(button.take_outbox().events.contains(&EventKind::Resized { width: 10, height: 1 }));
    }

    #[test]
    fn test_fixed_size_keeps_width() {
        let mut button = Control::button_sized("OK", 12, 3);
        button.set_text("A much longer caption").unwrap();
        assert_eq!(button.base().width(), 12);
    }

    #[test]
    fn test_set_text_on_panel_is_wrong_kind() {
        let mut panel = Control::panel(3, 3);
        assert!(panel.set_text("x").is_err());
    }

    #[test]
    fn test_redraw_centers_caption() {
        let button = Control::button("OK");
        let mut buffer = FrameBuffer::new(6, 1);
        if let ControlKind::Button(inner) = button.kind() {
            inner.redraw(&mut buffer, ControlStates::empty(), &Theme::default(), None);
        }
        assert_eq!(buffer.row_text(0), "  OK  ");
    }
}
