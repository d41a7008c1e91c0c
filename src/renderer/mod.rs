//! Rendering - surfaces controls draw onto.
//!
//! The core never looks inside a surface. It only needs per-cell glyph access
//! plus a few drawing primitives, all of which have default implementations
//! in terms of `glyph` / `set_glyph`.
//!
//! - [`Surface`] - the drawing contract
//! - [`FrameBuffer`] - flat in-memory surface
//! - [`Canvas`] - a translated, clipped view handed to one control's redraw

mod buffer;

pub use buffer::FrameBuffer;

use crate::types::{Attr, BorderStyle, Glyph, HorizontalAlign, Point, Rect, Rgba};

// =============================================================================
// Surface
// =============================================================================

/// An addressable 2-D cell buffer.
///
/// Out-of-range writes are ignored; out-of-range reads return `None`.
pub trait Surface {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    /// Read a cell.
    fn glyph(&self, x: i32, y: i32) -> Option<Glyph>;

    /// Write a cell. Returns true if the cell was inside the surface.
    fn set_glyph(&mut self, x: i32, y: i32, glyph: Glyph) -> bool;

    fn set_foreground(&mut self, x: i32, y: i32, fg: Rgba) -> bool {
        match self.glyph(x, y) {
            Some(mut glyph) => {
                glyph.fg = fg;
                self.set_glyph(x, y, glyph)
            }
            None => false,
        }
    }

    fn set_background(&mut self, x: i32, y: i32, bg: Rgba) -> bool {
        match self.glyph(x, y) {
            Some(mut glyph) => {
                glyph.bg = bg;
                self.set_glyph(x, y, glyph)
            }
            None => false,
        }
    }

    /// Fill a rectangle with one glyph and color pair.
    fn fill(&mut self, area: Rect, fg: Rgba, bg: Rgba, glyph: char) {
        let cell = Glyph {
            char: glyph as u32,
            fg,
            bg,
            attrs: Attr::NONE,
        };
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.set_glyph(x, y, cell);
            }
        }
    }

    /// Print text left to right. Returns the number of cells written.
    fn print(&mut self, x: i32, y: i32, text: &str, fg: Rgba, bg: Rgba) -> i32 {
        let mut col = x;
        for ch in text.chars() {
            if col >= self.width() {
                break;
            }
            self.set_glyph(
                col,
                y,
                Glyph {
                    char: ch as u32,
                    fg,
                    bg,
                    attrs: Attr::NONE,
                },
            );
            col += 1;
        }
        col - x
    }

    /// Print text aligned inside `width` cells, truncating when it does not fit.
    fn print_aligned(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        text: &str,
        align: HorizontalAlign,
        fg: Rgba,
        bg: Rgba,
    ) -> i32 {
        if width <= 0 {
            return 0;
        }
        let text_width = text.chars().count() as i32;
        if text_width >= width {
            let clipped: String = text.chars().take(width as usize).collect();
            return self.print(x, y, &clipped, fg, bg);
        }
        let offset = match align {
            HorizontalAlign::Left => 0,
            HorizontalAlign::Center => (width - text_width) / 2,
            HorizontalAlign::Right => width - text_width,
        };
        self.print(x + offset, y, text, fg, bg)
    }

    /// Draw a border around a rectangle.
    fn draw_box(&mut self, area: Rect, style: BorderStyle, fg: Rgba, bg: Rgba) {
        if area.width < 2 || area.height < 2 || style == BorderStyle::None {
            return;
        }

        let (horiz, vert, tl, tr, br, bl) = style.chars();
        let cell = |ch: char| Glyph {
            char: ch as u32,
            fg,
            bg,
            attrs: Attr::NONE,
        };

        let x2 = area.right() - 1;
        let y2 = area.bottom() - 1;

        self.set_glyph(area.x, area.y, cell(tl));
        self.set_glyph(x2, area.y, cell(tr));
        self.set_glyph(x2, y2, cell(br));
        self.set_glyph(area.x, y2, cell(bl));

        for col in (area.x + 1)..x2 {
            self.set_glyph(col, area.y, cell(horiz));
            self.set_glyph(col, y2, cell(horiz));
        }
        for row in (area.y + 1)..y2 {
            self.set_glyph(area.x, row, cell(vert));
            self.set_glyph(x2, row, cell(vert));
        }
    }
}

// =============================================================================
// Canvas
// =============================================================================

/// A control-local view of a surface.
///
/// Coordinates are relative to `origin`; writes outside `clip` (absolute
/// surface coordinates) are dropped.
pub struct Canvas<'a> {
    surface: &'a mut dyn Surface,
    origin: Point,
    size: Point,
    clip: Rect,
}

impl<'a> Canvas<'a> {
    pub fn new(surface: &'a mut dyn Surface, origin: Point, size: Point, clip: Rect) -> Self {
        Self {
            surface,
            origin,
            size,
            clip,
        }
    }

    /// Absolute position of the local origin.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Local extent as a rect at (0, 0).
    pub fn area(&self) -> Rect {
        Rect::sized(self.size.x, self.size.y)
    }

    fn to_surface(&self, x: i32, y: i32) -> Option<Point> {
        let point = Point::new(x, y) + self.origin;
        self.clip.contains(point).then_some(point)
    }
}

impl Surface for Canvas<'_> {
    fn width(&self) -> i32 {
        self.size.x
    }

    fn height(&self) -> i32 {
        self.size.y
    }

    fn glyph(&self, x: i32, y: i32) -> Option<Glyph> {
        let point = self.to_surface(x, y)?;
        self.surface.glyph(point.x, point.y)
    }

    fn set_glyph(&mut self, x: i32, y: i32, glyph: Glyph) -> bool {
        match self.to_surface(x, y) {
            Some(point) => self.surface.set_glyph(point.x, point.y, glyph),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_translates_and_clips() {
        let mut buffer = FrameBuffer::new(10, 5);
        {
            let mut canvas = Canvas::new(&mut buffer, Point::new(2, 1), Point::new(4, 2), Rect::new(2, 1, 3, 2));
            canvas.fill(canvas.area(), Rgba::WHITE, Rgba::BLUE, '#');
        }
        assert_eq!(buffer.row_text(1), "  ###     ");
        assert_eq!(buffer.row_text(2), "  ###     ");
        assert_eq!(buffer.row_text(0), "          ");
    }

    #[test]
    fn test_print_aligned() {
        let mut buffer = FrameBuffer::new(9, 3);
        buffer.print_aligned(0, 0, 9, "abc", HorizontalAlign::Center, Rgba::WHITE, Rgba::BLACK);
        buffer.print_aligned(0, 1, 9, "abc", HorizontalAlign::Right, Rgba::WHITE, Rgba::BLACK);
        buffer.print_aligned(0, 2, 2, "abc", HorizontalAlign::Left, Rgba::WHITE, Rgba::BLACK);
        assert_eq!(buffer.row_text(0), "   abc   ");
        assert_eq!(buffer.row_text(1), "      abc");
        assert_eq!(buffer.row_text(2), "ab       ");
    }

    #[test]
    fn test_draw_box() {
        let mut buffer = FrameBuffer::new(4, 3);
        buffer.draw_box(Rect::sized(4, 3), BorderStyle::Ascii, Rgba::WHITE, Rgba::BLACK);
        assert_eq!(buffer.row_text(0), "+--+");
        assert_eq!(buffer.row_text(1), "|  |");
        assert_eq!(buffer.row_text(2), "+--+");
    }

    #[test]
    fn test_set_colors_keep_glyph() {
        let mut buffer = FrameBuffer::new(2, 1);
        buffer.print(0, 0, "x", Rgba::WHITE, Rgba::BLACK);
        assert!(buffer.set_background(0, 0, Rgba::RED));
        assert!(buffer.set_foreground(0, 0, Rgba::GREEN));
        let glyph = buffer.glyph(0, 0).unwrap();
        assert_eq!(glyph.as_char(), 'x');
        assert_eq!(glyph.bg, Rgba::RED);
        assert_eq!(glyph.fg, Rgba::GREEN);
        assert!(!buffer.set_background(5, 0, Rgba::RED));
    }
}
