//! Panel - plain container for other controls.

use super::{Control, ControlKind};
use crate::error::Result;
use crate::renderer::Surface;
use crate::theme::{Theme, ThemeStates};
use crate::types::{BorderStyle, ControlStates, Rect};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panel {
    /// `None` uses the theme's panel border.
    border: Option<BorderStyle>,
}

impl Panel {
    pub fn border(&self) -> Option<BorderStyle> {
        self.border
    }

    pub(crate) fn redraw(&self, surface: &mut dyn Surface, states: ControlStates, theme: &Theme, custom: Option<&ThemeStates>) {
        let look = custom.unwrap_or(&theme.panel).appearance(states);
        let area = Rect::sized(surface.width(), surface.height());
        surface.fill(area, look.foreground, look.background, look.glyph);
        let border = self.border.unwrap_or(theme.panel_border);
        surface.draw_box(area, border, look.foreground, look.background);
    }
}

impl Control {
    pub fn panel(width: i32, height: i32) -> Control {
        let mut control = Control::new(ControlKind::Panel(Panel::default()), width, height);
        control.base.min_width = 0;
        control.base.min_height = 0;
        control
    }

    pub fn set_border(&mut self, border: Option<BorderStyle>) -> Result<()> {
        let wrong = self.wrong_kind("panel");
        match &mut self.kind {
            ControlKind::Panel(panel) => {
                panel.border = border;
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
    fn test_border_override() {
        let mut panel = Control::panel(3, 3);
        panel.set_border(Some(BorderStyle::Ascii)).unwrap();

        let mut buffer = FrameBuffer::new(3, 3);
        if let ControlKind::Panel(inner) = panel.kind() {
            inner.redraw(&mut buffer, ControlStates::empty(), &Theme::default(), None);
        }
        assert_eq!(buffer.row_text(0), "+-+");
        assert_eq!(buffer.row_text(1), "| |");
    }

    #[test]
    fn test_panel_is_not_focusable() {
        let panel = Control::panel(3, 3);
        assert!(!panel.can_focus());
        assert!(!panel.base().tab_stop());
    }
}
