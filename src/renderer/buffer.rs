//! FrameBuffer - flat in-memory surface.
//!
//! A 2D grid of glyphs that controls draw into. The host presents it however
//! it likes (terminal, image, test assertion).
//!
//! # Design Decisions
//!
//! - **Flat storage**: `Vec<Glyph>` with row-major indexing.
//! - **Alpha blending**: Transparent backgrounds blend with existing cells.

use super::Surface;
use crate::types::{Glyph, Rgba};

// =============================================================================
// FrameBuffer
// =============================================================================

/// A 2D buffer of glyphs.
///
/// Uses flat storage with row-major indexing: `index = y * width + x`
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Glyph>,
}

impl FrameBuffer {
    /// Create a new buffer filled with default glyphs.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Glyph::default(); size],
        }
    }

    /// Convert (x, y) to flat index.
    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Get a cell reference (returns None if out of bounds).
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&Glyph> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Get raw cells slice.
    #[inline]
    pub fn cells(&self) -> &[Glyph] {
        &self.cells
    }

    /// Clear the entire buffer to default glyphs.
    pub fn clear(&mut self) {
        self.cells.fill(Glyph::default());
    }

    /// Resize the buffer (clears content).
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.resize(width as usize * height as usize, Glyph::default());
        self.clear();
    }

    /// The characters of one row, for assertions and debugging.
    pub fn row_text(&self, y: i32) -> String {
        (0..self.width as i32)
            .filter_map(|x| self.get(x, y))
            .map(Glyph::as_char)
            .collect()
    }
}

impl Surface for FrameBuffer {
    fn width(&self) -> i32 {
        self.width as i32
    }

    fn height(&self) -> i32 {
        self.height as i32
    }

    fn glyph(&self, x: i32, y: i32) -> Option<Glyph> {
        self.get(x, y).copied()
    }

    fn set_glyph(&mut self, x: i32, y: i32, glyph: Glyph) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        let cell = &mut self.cells[idx];

        // Alpha blend background if not opaque
        let bg = if glyph.bg.is_opaque() || glyph.bg.is_terminal_default() {
            glyph.bg
        } else {
            Rgba::blend(glyph.bg, cell.bg)
        };

        *cell = Glyph { bg, ..glyph };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Attr, Rect};

    #[test]
    fn test_new_buffer_is_blank() {
        let buffer = FrameBuffer::new(3, 2);
        assert_eq!(buffer.cells().len(), 6);
        assert_eq!(buffer.row_text(0), "   ");
        assert_eq!(buffer.width(), 3);
        assert_eq!(buffer.height(), 2);
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut buffer = FrameBuffer::new(2, 2);
        let glyph = Glyph {
            char: 'x' as u32,
            fg: Rgba::WHITE,
            bg: Rgba::BLACK,
            attrs: Attr::NONE,
        };
        assert!(!buffer.set_glyph(-1, 0, glyph));
        assert!(!buffer.set_glyph(0, 2, glyph));
        assert!(buffer.glyph(2, 0).is_none());
        assert!(buffer.set_glyph(1, 1, glyph));
        assert_eq!(buffer.row_text(1), " x");
    }

    #[test]
    fn test_transparent_background_keeps_existing() {
        let mut buffer = FrameBuffer::new(1, 1);
        buffer.fill(Rect::sized(1, 1), Rgba::WHITE, Rgba::BLUE, ' ');
        buffer.print(0, 0, "a", Rgba::WHITE, Rgba::TRANSPARENT);
        let glyph = buffer.glyph(0, 0).unwrap();
        assert_eq!(glyph.bg, Rgba::BLUE);
        assert_eq!(glyph.as_char(), 'a');
    }

    #[test]
    fn test_resize_clears() {
        let mut buffer = FrameBuffer::new(2, 1);
        buffer.print(0, 0, "ab", Rgba::WHITE, Rgba::BLACK);
        buffer.resize(3, 2);
        assert_eq!(buffer.row_text(0), "   ");
        assert_eq!(buffer.row_text(1), "   ");
    }
}
