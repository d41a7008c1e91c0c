//! Sparse cell storage.
//!
//! Only cells that were written to exist. Reading an absent cell hands back
//! a transient default (built from the row/column layouts) and stores
//! nothing; writing through any mutator materializes the cell first. Row and
//! column layouts (size, colors, options) and hidden rows/columns live in
//! their own maps, so a 100k x 100k table with ten cells costs ten cells.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::{HorizontalAlign, Orientation, Point, Rgba, VerticalAlign};

// =============================================================================
// Options and layouts
// =============================================================================

/// Per-cell presentation and interaction options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellOptions {
    pub horizontal_align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
    /// Receives clicks at all.
    pub interactable: bool,
    /// Clicks may select it.
    pub selectable: bool,
    /// Drawn; hidden cells keep their space.
    pub visible: bool,
}

impl Default for CellOptions {
    fn default() -> Self {
        Self {
            horizontal_align: HorizontalAlign::Left,
            vertical_align: VerticalAlign::Top,
            interactable: true,
            selectable: true,
            visible: true,
        }
    }
}

/// Settings shared by a whole row or column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Height of a row / width of a column; `None` uses the default size.
    pub size: Option<i32>,
    pub foreground: Option<Rgba>,
    pub background: Option<Rgba>,
    pub options: Option<CellOptions>,
}

// =============================================================================
// Cell
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    row: usize,
    column: usize,
    pub(crate) position: Point,
    pub foreground: Rgba,
    pub background: Rgba,
    pub text: String,
    options: Option<CellOptions>,
}

impl Cell {
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Logical top-left, before scrolling.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Options set on this cell, if any.
    pub fn options(&self) -> Option<&CellOptions> {
        self.options.as_ref()
    }

    /// Options in effect (own or defaults).
    pub fn effective_options(&self) -> CellOptions {
        self.options.clone().unwrap_or_default()
    }

    /// Own options, allocated on first use.
    pub fn options_mut(&mut self) -> &mut CellOptions {
        self.options.get_or_insert_with(CellOptions::default)
    }

    pub fn set_options(&mut self, options: Option<CellOptions>) {
        self.options = options;
    }
}

// =============================================================================
// Cells
// =============================================================================

#[derive(Debug, Clone)]
pub struct Cells {
    cells: HashMap<(usize, usize), Cell>,
    rows: HashMap<usize, Layout>,
    columns: HashMap<usize, Layout>,
    hidden_rows: HashSet<usize>,
    hidden_columns: HashSet<usize>,
    default_width: i32,
    default_height: i32,
    default_foreground: Rgba,
    default_background: Rgba,
    changed: bool,
}

impl Cells {
    /// Empty storage; absent rows are `default_height` tall and absent
    /// columns `default_width` wide.
    pub fn new(default_width: i32, default_height: i32) -> Self {
        Self {
            cells: HashMap::new(),
            rows: HashMap::new(),
            columns: HashMap::new(),
            hidden_rows: HashSet::new(),
            hidden_columns: HashSet::new(),
            default_width: default_width.max(0),
            default_height: default_height.max(0),
            default_foreground: Rgba::TERMINAL_DEFAULT,
            default_background: Rgba::TRANSPARENT,
            changed: false,
        }
    }

    /// Stored cells only.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, row: usize, column: usize) -> bool {
        self.cells.contains_key(&(row, column))
    }

    /// The stored cell, or a transient default that is not stored.
    pub fn get(&self, row: usize, column: usize) -> Cell {
        match self.cells.get(&(row, column)) {
            Some(cell) => cell.clone(),
            None => self.blank(row, column),
        }
    }

    pub fn try_get(&self, row: usize, column: usize) -> Option<&Cell> {
        self.cells.get(&(row, column))
    }

    /// Stored cells in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    /// Materialize a cell and edit it.
    pub fn update<R>(&mut self, row: usize, column: usize, edit: impl FnOnce(&mut Cell) -> R) -> R {
        self.changed = true;
        let Self {
            cells,
            rows,
            columns,
            default_foreground,
            default_background,
            ..
        } = self;
        let cell = cells.entry((row, column)).or_insert_with(|| {
            blank_cell(
                row,
                column,
                [columns.get(&column), rows.get(&row)],
                (*default_foreground, *default_background),
            )
        });
        edit(cell)
    }

    pub fn set_text(&mut self, row: usize, column: usize, text: impl Into<String>) {
        let text = text.into();
        self.update(row, column, |cell| cell.text = text);
    }

    pub fn set_foreground(&mut self, row: usize, column: usize, color: Rgba) {
        self.update(row, column, |cell| cell.foreground = color);
    }

    pub fn set_background(&mut self, row: usize, column: usize, color: Rgba) {
        self.update(row, column, |cell| cell.background = color);
    }

    pub fn set_options(&mut self, row: usize, column: usize, options: CellOptions) {
        self.update(row, column, |cell| cell.options = Some(options));
    }

    pub fn remove(&mut self, row: usize, column: usize) -> Option<Cell> {
        let removed = self.cells.remove(&(row, column));
        self.changed |= removed.is_some();
        removed
    }

    /// Drop every cell, layout and hidden flag.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.rows.clear();
        self.columns.clear();
        self.hidden_rows.clear();
        self.hidden_columns.clear();
        self.changed = true;
    }

    /// Blank the text of every stored cell, keeping colors and options.
    pub fn clear_content(&mut self) {
        for cell in self.cells.values_mut() {
            cell.text.clear();
        }
        self.changed = true;
    }

    /// Every cell of an inclusive rectangle, row by row. Absent cells are
    /// transient defaults.
    pub fn range(&self, start: (usize, usize), end: (usize, usize)) -> Vec<Cell> {
        let (top, bottom) = (start.0.min(end.0), start.0.max(end.0));
        let (left, right) = (start.1.min(end.1), start.1.max(end.1));
        (top..=bottom)
            .flat_map(|row| (left..=right).map(move |column| (row, column)))
            .map(|(row, column)| self.get(row, column))
            .collect()
    }

    // =========================================================================
    // Extent
    // =========================================================================

    /// Highest row index used by a cell or an explicit row layout.
    pub fn max_row(&self) -> Option<usize> {
        let cells = self.cells.keys().map(|&(row, _)| row);
        let layouts = self.rows.iter().filter(|(_, l)| l.size.is_some()).map(|(&i, _)| i);
        cells.chain(layouts).max()
    }

    /// Highest column index used by a cell or an explicit column layout.
    pub fn max_column(&self) -> Option<usize> {
        let cells = self.cells.keys().map(|&(_, column)| column);
        let layouts = self.columns.iter().filter(|(_, l)| l.size.is_some()).map(|(&i, _)| i);
        cells.chain(layouts).max()
    }

    /// Rows (or columns) up to and including the highest used index.
    pub fn count(&self, orientation: Orientation) -> usize {
        let max = match orientation {
            Orientation::Vertical => self.max_row(),
            Orientation::Horizontal => self.max_column(),
        };
        max.map_or(0, |m| m + 1)
    }

    // =========================================================================
    // Layouts
    // =========================================================================

    pub fn default_size(&self) -> (i32, i32) {
        (self.default_width, self.default_height)
    }

    pub fn set_default_size(&mut self, width: i32, height: i32) {
        self.default_width = width.max(0);
        self.default_height = height.max(0);
        self.changed = true;
    }

    pub fn default_colors(&self) -> (Rgba, Rgba) {
        (self.default_foreground, self.default_background)
    }

    /// Colors for cells without layout or own colors.
    pub fn set_default_colors(&mut self, foreground: Rgba, background: Rgba) {
        self.default_foreground = foreground;
        self.default_background = background;
        self.changed = true;
    }

    pub fn row_layout(&self, row: usize) -> Option<&Layout> {
        self.rows.get(&row)
    }

    pub fn column_layout(&self, column: usize) -> Option<&Layout> {
        self.columns.get(&column)
    }

    pub fn set_row_layout(&mut self, row: usize, layout: Layout) {
        self.rows.insert(row, layout);
        self.changed = true;
    }

    pub fn set_column_layout(&mut self, column: usize, layout: Layout) {
        self.columns.insert(column, layout);
        self.changed = true;
    }

    pub fn set_row_size(&mut self, row: usize, height: i32) {
        self.rows.entry(row).or_default().size = Some(height.max(0));
        self.changed = true;
    }

    pub fn set_column_size(&mut self, column: usize, width: i32) {
        self.columns.entry(column).or_default().size = Some(width.max(0));
        self.changed = true;
    }

    pub fn set_row_visible(&mut self, row: usize, visible: bool) {
        self.changed |= if visible {
            self.hidden_rows.remove(&row)
        } else {
            self.hidden_rows.insert(row)
        };
    }

    pub fn set_column_visible(&mut self, column: usize, visible: bool) {
        self.changed |= if visible {
            self.hidden_columns.remove(&column)
        } else {
            self.hidden_columns.insert(column)
        };
    }

    pub fn is_row_visible(&self, row: usize) -> bool {
        !self.hidden_rows.contains(&row)
    }

    pub fn is_column_visible(&self, column: usize) -> bool {
        !self.hidden_columns.contains(&column)
    }

    /// Height of a row or width of a column; hidden ones take no space.
    pub fn size_of(&self, orientation: Orientation, index: usize) -> i32 {
        match orientation {
            Orientation::Vertical if self.is_row_visible(index) => self
                .rows
                .get(&index)
                .and_then(|l| l.size)
                .unwrap_or(self.default_height),
            Orientation::Horizontal if self.is_column_visible(index) => self
                .columns
                .get(&index)
                .and_then(|l| l.size)
                .unwrap_or(self.default_width),
            _ => 0,
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn blank(&self, row: usize, column: usize) -> Cell {
        blank_cell(
            row,
            column,
            [self.columns.get(&column), self.rows.get(&row)],
            (self.default_foreground, self.default_background),
        )
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.values_mut()
    }

    /// True once after any structural or content change.
    pub(crate) fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}

/// Default cell for an address. Layouts apply in order, so the row layout
/// (last) wins over the column layout.
fn blank_cell(row: usize, column: usize, layouts: [Option<&Layout>; 2], colors: (Rgba, Rgba)) -> Cell {
    let mut cell = Cell {
        row,
        column,
        position: Point::ZERO,
        foreground: colors.0,
        background: colors.1,
        text: String::new(),
        options: None,
    };
    for layout in layouts.into_iter().flatten() {
        if let Some(fg) = layout.foreground {
            cell.foreground = fg;
        }
        if let Some(bg) = layout.background {
            cell.background = bg;
        }
        if let Some(options) = &layout.options {
            cell.options = Some(options.clone());
        }
    }
    cell
}
