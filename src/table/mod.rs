//! Table - virtualized grid over sparse cells.
//!
//! The table draws only the rows and columns intersecting its viewport,
//! reading absent cells as transient defaults. Scrolling is driven by two
//! owned scroll bars (vertical on the right edge, horizontal on the bottom
//! edge) whose values are indices into the precomputed scroll stops, see
//! [`scroll`](self::scroll).
//!
//! # Interaction
//!
//! - Hover raises `CellEnter` / `CellExit` when the hovered cell changes.
//! - Left click raises `CellLeftClick`, toggles selection of selectable
//!   cells and raises `CellDoubleClick` on a second click of the same cell
//!   within the double-click threshold. A click that selects nothing clears
//!   the selection.
//! - Cell events fire only for cells that are visible and interactable.
//! - The wheel scrolls the vertical bar, or the horizontal one when there is
//!   no vertical bar.

mod cells;
pub(crate) mod scroll;

pub use cells::{Cell, CellOptions, Cells, Layout};

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::controls::{Control, ControlKind, Outbox, Request};
use crate::engine::{ControlId, EventKind};
use crate::error::Result;
use crate::renderer::Surface;
use crate::state::MouseState;
use crate::theme::{Appearance, Theme, ThemeStates};
use crate::types::{ControlStates, Orientation, Point, Rect, Rgba, VerticalAlign};

use self::scroll::Track;

/// Default window for a second click on the same cell.
pub const DOUBLE_CLICK: Duration = Duration::from_millis(250);

/// How much of the grid selection (or hover) highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Only the cell itself.
    #[default]
    Single,
    /// Nothing; for selection this also disables selecting.
    None,
    EntireRow,
    EntireColumn,
}

impl SelectionMode {
    fn covers(&self, target: (usize, usize), cell: (usize, usize)) -> bool {
        match self {
            Self::Single => target == cell,
            Self::None => false,
            Self::EntireRow => target.0 == cell.0,
            Self::EntireColumn => target.1 == cell.1,
        }
    }
}

// =============================================================================
// Table
// =============================================================================

#[derive(Debug, Clone)]
pub struct Table {
    cells: Cells,
    width: i32,
    height: i32,
    viewport: (i32, i32),
    row_track: Track,
    column_track: Track,
    row_stops: Vec<i32>,
    column_stops: Vec<i32>,
    row_stop: usize,
    column_stop: usize,
    pub(crate) vertical_bar: Option<ControlId>,
    pub(crate) horizontal_bar: Option<ControlId>,
    vertical_visible: bool,
    horizontal_visible: bool,
    draw_fake_cells: bool,
    auto_scroll_on_selection: bool,
    double_click_threshold: Duration,
    selection_mode: SelectionMode,
    hover_mode: SelectionMode,
    selected: Option<(usize, usize)>,
    hovered: Option<(usize, usize)>,
    last_click: Option<(Duration, (usize, usize))>,
}

impl Table {
    /// A table `width` x `height` cells, with 1x1 default cells.
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_cell_size(width, height, 1, 1)
    }

    pub fn with_cell_size(width: i32, height: i32, cell_width: i32, cell_height: i32) -> Self {
        let mut table = Self {
            cells: Cells::new(cell_width, cell_height),
            width,
            height,
            viewport: (width, height),
            row_track: Track::default(),
            column_track: Track::default(),
            row_stops: vec![0],
            column_stops: vec![0],
            row_stop: 0,
            column_stop: 0,
            vertical_bar: None,
            horizontal_bar: None,
            vertical_visible: false,
            horizontal_visible: false,
            draw_fake_cells: false,
            auto_scroll_on_selection: true,
            double_click_threshold: DOUBLE_CLICK,
            selection_mode: SelectionMode::Single,
            hover_mode: SelectionMode::Single,
            selected: None,
            hovered: None,
            last_click: None,
        };
        table.sync();
        table
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn cells(&self) -> &Cells {
        &self.cells
    }

    /// Edit cells and layouts; the tree resyncs scrolling afterwards.
    pub fn cells_mut(&mut self) -> &mut Cells {
        &mut self.cells
    }

    /// Logical offset of the first rendered column.
    pub fn start_render_x(&self) -> i32 {
        self.column_stops.get(self.column_stop).copied().unwrap_or(0)
    }

    /// Logical offset of the first rendered row.
    pub fn start_render_y(&self) -> i32 {
        self.row_stops.get(self.row_stop).copied().unwrap_or(0)
    }

    /// Cell area, excluding visible scroll bars.
    pub fn viewport(&self) -> (i32, i32) {
        self.viewport
    }

    pub fn scroll_stops(&self, orientation: Orientation) -> &[i32] {
        match orientation {
            Orientation::Vertical => &self.row_stops,
            Orientation::Horizontal => &self.column_stops,
        }
    }

    pub fn selected(&self) -> Option<(usize, usize)> {
        self.selected
    }

    pub fn hovered(&self) -> Option<(usize, usize)> {
        self.hovered
    }

    pub fn vertical_scroll_bar(&self) -> Option<ControlId> {
        self.vertical_bar
    }

    pub fn horizontal_scroll_bar(&self) -> Option<ControlId> {
        self.horizontal_bar
    }

    pub fn is_scroll_bar_visible(&self, orientation: Orientation) -> bool {
        match orientation {
            Orientation::Vertical => self.vertical_visible,
            Orientation::Horizontal => self.horizontal_visible,
        }
    }

    pub fn draw_fake_cells(&self) -> bool {
        self.draw_fake_cells
    }

    /// Draw default cells past the used grid up to the viewport edge.
    pub fn set_draw_fake_cells(&mut self, enabled: bool) {
        self.draw_fake_cells = enabled;
    }

    pub fn auto_scroll_on_selection(&self) -> bool {
        self.auto_scroll_on_selection
    }

    pub fn set_auto_scroll_on_selection(&mut self, enabled: bool) {
        self.auto_scroll_on_selection = enabled;
    }

    pub fn double_click_threshold(&self) -> Duration {
        self.double_click_threshold
    }

    pub fn set_double_click_threshold(&mut self, threshold: Duration) {
        self.double_click_threshold = threshold;
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection_mode
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.selection_mode = mode;
    }

    pub fn hover_mode(&self) -> SelectionMode {
        self.hover_mode
    }

    pub fn set_hover_mode(&mut self, mode: SelectionMode) {
        self.hover_mode = mode;
    }

    /// Whether selection highlights this cell.
    pub fn is_cell_selected(&self, row: usize, column: usize) -> bool {
        self.selected
            .is_some_and(|target| self.selection_mode.covers(target, (row, column)))
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    fn track(&self, orientation: Orientation) -> &Track {
        match orientation {
            Orientation::Vertical => &self.row_track,
            Orientation::Horizontal => &self.column_track,
        }
    }

    /// Rendered rectangle of a cell, relative to the table, as of the last
    /// sync.
    pub fn cell_rect(&self, row: usize, column: usize) -> Rect {
        let x = self.column_track.offset_of(column) - self.start_render_x();
        let y = self.row_track.offset_of(row) - self.start_render_y();
        Rect::new(x, y, self.column_track.size_of(column), self.row_track.size_of(row))
    }

    /// Cell under a point relative to the table, if any.
    pub fn cell_at(&self, point: Point) -> Option<(usize, usize)> {
        let (width, height) = self.viewport;
        if point.x < 0 || point.y < 0 || point.x >= width || point.y >= height {
            return None;
        }
        let (row_limit, column_limit) = if self.draw_fake_cells {
            (None, None)
        } else {
            (Some(self.row_track.count()), Some(self.column_track.count()))
        };
        let row = self.row_track.index_at(point.y + self.start_render_y(), row_limit)?;
        let column = self.column_track.index_at(point.x + self.start_render_x(), column_limit)?;
        Some((row, column))
    }

    /// Signed distance to the neighboring scroll stop.
    ///
    /// Forward distances are computed from the current render start; going
    /// back returns the distance to the previous stop.
    pub fn next_scroll_pos(&self, increment: bool, orientation: Orientation) -> i32 {
        let (stops, current) = match orientation {
            Orientation::Vertical => (&self.row_stops, self.row_stop),
            Orientation::Horizontal => (&self.column_stops, self.column_stop),
        };
        let start = stops.get(current).copied().unwrap_or(0);
        if increment {
            let viewport = match orientation {
                Orientation::Vertical => self.viewport.1,
                Orientation::Horizontal => self.viewport.0,
            };
            self.track(orientation).forward_amount(start, viewport)
        } else {
            match current.checked_sub(1).and_then(|i| stops.get(i)) {
                Some(previous) => previous - start,
                None => 0,
            }
        }
    }

    /// Refresh every stored cell's cached logical position.
    pub fn adjust_cell_positions(&mut self) {
        let (rows, columns) = (&self.row_track, &self.column_track);
        for cell in self.cells.cells_mut() {
            cell.position = Point::new(columns.offset_of(cell.column()), rows.offset_of(cell.row()));
        }
    }

    // =========================================================================
    // Sync
    // =========================================================================

    pub(crate) fn set_size(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }

    /// Recompute viewport, scroll stops and bar visibility from the cells.
    ///
    /// The current stop indices are clamped so the view never scrolls past
    /// the new end.
    pub(crate) fn sync(&mut self) {
        self.row_track = Track::new(&self.cells, Orientation::Vertical);
        self.column_track = Track::new(&self.cells, Orientation::Horizontal);
        let (rows_extent, columns_extent) = (self.row_track.extent(), self.column_track.extent());

        // A bar costs one cell of the other axis; two passes settle it
        let can_show = |length: i32| length >= crate::controls::scroll_bar::MIN_LENGTH;
        let mut vertical = false;
        let mut horizontal = false;
        for _ in 0..2 {
            let width = self.width - i32::from(vertical);
            let height = self.height - i32::from(horizontal);
            vertical = self.vertical_bar.is_some() && can_show(height) && rows_extent > height;
            horizontal = self.horizontal_bar.is_some() && can_show(width) && columns_extent > width;
        }

        self.vertical_visible = vertical;
        self.horizontal_visible = horizontal;
        self.viewport = (
            (self.width - i32::from(vertical)).max(0),
            (self.height - i32::from(horizontal)).max(0),
        );
        self.row_stops = self.row_track.scroll_stops(self.viewport.1);
        self.column_stops = self.column_track.scroll_stops(self.viewport.0);
        self.row_stop = self.row_stop.min(self.row_stops.len() - 1);
        self.column_stop = self.column_stop.min(self.column_stops.len() - 1);
        self.adjust_cell_positions();

        trace!(
            rows = self.row_stops.len(),
            columns = self.column_stops.len(),
            vertical,
            horizontal,
            "table scroll stops recomputed"
        );
    }

    /// Current stop index for a bar.
    pub(crate) fn stop_index(&self, orientation: Orientation) -> usize {
        match orientation {
            Orientation::Vertical => self.row_stop,
            Orientation::Horizontal => self.column_stop,
        }
    }

    /// Bar value changed: jump to that stop.
    pub(crate) fn apply_scroll(&mut self, orientation: Orientation, value: i32, out: &mut Outbox) {
        let (stops, current) = match orientation {
            Orientation::Vertical => (&self.row_stops, &mut self.row_stop),
            Orientation::Horizontal => (&self.column_stops, &mut self.column_stop),
        };
        let index = (value.max(0) as usize).min(stops.len() - 1);
        if index != *current {
            *current = index;
            out.invalidate();
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub(crate) fn change_selected(&mut self, cell: Option<(usize, usize)>, out: &mut Outbox) {
        if self.selected == cell {
            return;
        }
        let previous = std::mem::replace(&mut self.selected, cell);
        out.raise(EventKind::SelectedCellChanged { previous, current: cell });
        out.invalidate();
        if self.auto_scroll_on_selection {
            self.scroll_to_selected(out);
        }
    }

    /// Ask the bars to scroll until the selected cell is fully shown.
    pub(crate) fn scroll_to_selected(&self, out: &mut Outbox) {
        let Some((row, column)) = self.selected else {
            return;
        };
        for (orientation, index, visible) in [
            (Orientation::Vertical, row, self.vertical_visible),
            (Orientation::Horizontal, column, self.horizontal_visible),
        ] {
            if !visible {
                continue;
            }
            let viewport = match orientation {
                Orientation::Vertical => self.viewport.1,
                Orientation::Horizontal => self.viewport.0,
            };
            let track = self.track(orientation);
            let (start, size) = (track.offset_of(index), track.size_of(index));
            let current = self.stop_index(orientation);
            let target = scroll::stop_showing(self.scroll_stops(orientation), current, start, size, viewport);
            if target != current {
                out.request(Request::ScrollTo {
                    orientation,
                    value: target as i32,
                });
            }
        }
    }

    // =========================================================================
    // Input hooks
    // =========================================================================

    /// Whether a cell reacts to the pointer: drawn and interactable.
    fn is_live(&self, (row, column): (usize, usize)) -> bool {
        let options = self.cells.get(row, column).effective_options();
        options.visible && options.interactable
    }

    pub(crate) fn on_mouse_in(&mut self, relative: Point, mouse: &MouseState, out: &mut Outbox) {
        let hovered = self.cell_at(relative);
        if hovered != self.hovered {
            if let Some((row, column)) = self.hovered.filter(|&cell| self.is_live(cell)) {
                out.raise(EventKind::CellExit { row, column });
            }
            if let Some((row, column)) = hovered.filter(|&cell| self.is_live(cell)) {
                out.raise(EventKind::CellEnter { row, column });
            }
            self.hovered = hovered;
            out.invalidate();
        }

        if mouse.scroll_delta != 0 {
            let orientation = if self.vertical_visible {
                Some(Orientation::Vertical)
            } else if self.horizontal_visible {
                Some(Orientation::Horizontal)
            } else {
                None
            };
            if let Some(orientation) = orientation {
                out.request(Request::ScrollBy {
                    orientation,
                    delta: mouse.scroll_delta.signum(),
                });
            }
        }
    }

    pub(crate) fn on_mouse_exit(&mut self, out: &mut Outbox) {
        if let Some(cell) = self.hovered.take() {
            if self.is_live(cell) {
                out.raise(EventKind::CellExit { row: cell.0, column: cell.1 });
            }
            out.invalidate();
        }
    }

    /// Selects a live, selectable cell; anything else (the selected cell
    /// again, a dead cell, empty space) clears the selection.
    pub(crate) fn on_left_clicked(&mut self, relative: Point, mouse: &MouseState, out: &mut Outbox) {
        let Some(cell) = self.cell_at(relative) else {
            self.change_selected(None, out);
            return;
        };
        let (row, column) = cell;
        let options = self.cells.get(row, column).effective_options();
        let live = options.visible && options.interactable;

        let selectable = live && options.selectable && self.selection_mode != SelectionMode::None;
        let target = (selectable && self.selected != Some(cell)).then_some(cell);
        self.change_selected(target, out);

        if live {
            out.raise(EventKind::CellLeftClick { row, column });
        }

        let double = matches!(
            self.last_click,
            Some((time, last)) if last == cell
                && mouse.time.saturating_sub(time) <= self.double_click_threshold
        );
        if double {
            self.last_click = None;
            if live {
                out.raise(EventKind::CellDoubleClick { row, column });
            }
        } else {
            self.last_click = Some((mouse.time, cell));
        }
    }

    pub(crate) fn on_right_clicked(&mut self, relative: Point, out: &mut Outbox) {
        if let Some((row, column)) = self.cell_at(relative).filter(|&cell| self.is_live(cell)) {
            out.raise(EventKind::CellRightClick { row, column });
        }
    }

    // =========================================================================
    // Redraw
    // =========================================================================

    /// Indices intersecting `0..viewport` along one axis.
    fn visible_indices(&self, orientation: Orientation) -> Vec<(usize, i32, i32)> {
        let (start, viewport) = match orientation {
            Orientation::Vertical => (self.start_render_y(), self.viewport.1),
            Orientation::Horizontal => (self.start_render_x(), self.viewport.0),
        };
        let track = self.track(orientation);
        let count = track.count();
        let mut visible = Vec::new();
        let Some(mut index) = track.index_at(start, None).or((start == 0).then_some(0)) else {
            return visible;
        };
        let mut offset = track.offset_of(index) - start;
        while offset < viewport {
            if index >= count && !self.draw_fake_cells {
                break;
            }
            let size = track.size_of(index);
            if index >= count && size <= 0 {
                break;
            }
            if size > 0 && offset + size > 0 {
                visible.push((index, offset, size));
            }
            offset += size;
            index += 1;
        }
        visible
    }

    pub(crate) fn redraw(&self, surface: &mut dyn Surface, states: ControlStates, theme: &Theme, custom: Option<&ThemeStates>) {
        let base = custom.map_or(theme.table.cell, |c| c.appearance(states));
        surface.fill(
            Rect::sized(surface.width(), surface.height()),
            base.foreground,
            base.background,
            base.glyph,
        );

        let rows = self.visible_indices(Orientation::Vertical);
        let columns = self.visible_indices(Orientation::Horizontal);
        let (view_width, view_height) = self.viewport;

        for &(row, y, height) in &rows {
            for &(column, x, width) in &columns {
                if !self.draw_fake_cells && !self.cells.contains(row, column) {
                    continue;
                }
                let cell = self.cells.get(row, column);
                let options = cell.effective_options();
                if !options.visible {
                    continue;
                }

                let look = self.cell_appearance(&cell, base, theme);
                let area = Rect::new(x, y, width, height)
                    .intersect(&Rect::sized(view_width, view_height));
                let Some(area) = area else {
                    continue;
                };
                surface.fill(area, look.foreground, look.background, ' ');

                let lines: Vec<&str> = cell.text.lines().take(height as usize).collect();
                let block = lines.len() as i32;
                let top = match options.vertical_align {
                    VerticalAlign::Top => 0,
                    VerticalAlign::Center => (height - block) / 2,
                    VerticalAlign::Bottom => height - block,
                };
                for (i, line) in lines.iter().enumerate() {
                    let line_y = y + top + i as i32;
                    if line_y < 0 || line_y >= view_height {
                        continue;
                    }
                    let clipped_width = width.min(view_width - x);
                    surface.print_aligned(
                        x,
                        line_y,
                        clipped_width,
                        line,
                        options.horizontal_align,
                        look.foreground,
                        look.background,
                    );
                }
            }
        }
    }

    fn cell_appearance(&self, cell: &Cell, base: Appearance, theme: &Theme) -> Appearance {
        let address = (cell.row(), cell.column());
        if self.is_cell_selected(address.0, address.1) {
            return theme.table.selected;
        }
        if self.hovered.is_some_and(|target| self.hover_mode.covers(target, address)) {
            return theme.table.hover;
        }
        let pick = |color: Rgba, fallback: Rgba| {
            if color.is_transparent() || color.is_terminal_default() {
                fallback
            } else {
                color
            }
        };
        Appearance {
            foreground: pick(cell.foreground, base.foreground),
            background: pick(cell.background, base.background),
            glyph: ' ',
        }
    }
}

// =============================================================================
// Control API
// =============================================================================

impl Control {
    /// A table; the tree adds its scroll bars when it is inserted.
    pub fn table(width: i32, height: i32) -> Control {
        Self::from_table(Table::new(width, height))
    }

    pub fn from_table(table: Table) -> Control {
        let (width, height) = (table.width, table.height);
        let mut control = Control::new(ControlKind::Table(Box::new(table)), width, height);
        control.base.min_width = 1;
        control.base.min_height = 1;
        control
    }

    pub fn as_table(&self) -> Option<&Table> {
        match &self.kind {
            ControlKind::Table(table) => Some(&**table),
            _ => None,
        }
    }

    /// Table data and settings. Cell edits are picked up when the tree
    /// commits the update.
    pub fn table_mut(&mut self) -> Result<&mut Table> {
        let wrong = self.wrong_kind("table");
        match &mut self.kind {
            ControlKind::Table(table) => Ok(&mut **table),
            _ => Err(wrong),
        }
    }

    fn table_parts(&mut self) -> Result<(&mut Table, &mut Outbox)> {
        let wrong = self.wrong_kind("table");
        match &mut self.kind {
            ControlKind::Table(table) => Ok((&mut **table, &mut self.base.outbox)),
            _ => Err(wrong),
        }
    }

    /// Select a cell (`None` clears), raising `SelectedCellChanged`.
    pub fn select_cell(&mut self, cell: Option<(usize, usize)>) -> Result<()> {
        let (table, out) = self.table_parts()?;
        table.change_selected(cell, out);
        Ok(())
    }

    /// Scroll until the selected cell is fully visible.
    pub fn scroll_to_selected_cell(&mut self) -> Result<()> {
        let (table, out) = self.table_parts()?;
        table.scroll_to_selected(out);
        Ok(())
    }

    /// Table content changed: resync scrolling and redraw.
    pub(crate) fn take_table_changes(&mut self) -> bool {
        match &mut self.kind {
            ControlKind::Table(table) => table.cells.take_changed(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: usize, columns: usize) -> Table {
        let mut table = Table::new(5, 4);
        for row in 0..rows {
            for column in 0..columns {
                table.cells_mut().set_text(row, column, format!("{row}{column}"));
            }
        }
        table.sync();
        table
    }

    #[test]
    fn test_reading_cells_does_not_store() {
        let mut table = Table::new(10, 10);
        let _ = table.cells().get(0, 0);
        assert_eq!(table.cells().len(), 0);
        table.cells_mut().set_text(5, 5, "x");
        assert_eq!(table.cells().len(), 1);
    }

    #[test]
    fn test_cell_at_respects_grid_extent() {
        let mut table = grid(2, 2);
        assert_eq!(table.cell_at(Point::new(1, 1)), Some((1, 1)));
        assert_eq!(table.cell_at(Point::new(3, 0)), None);

        table.set_draw_fake_cells(true);
        assert_eq!(table.cell_at(Point::new(3, 2)), Some((2, 3)));
        assert_eq!(table.cell_at(Point::new(5, 0)), None);
    }

    #[test]
    fn test_cell_rect_follows_sizes_and_scroll() {
        let mut table = grid(3, 3);
        table.cells_mut().set_column_size(0, 2);
        table.sync();
        assert_eq!(table.cell_rect(1, 1), Rect::new(2, 1, 1, 1));
        table.adjust_cell_positions();
        assert_eq!(table.cells().get(1, 1).position(), Point::new(2, 1));
    }

    #[test]
    fn test_no_bars_means_single_stop() {
        let table = grid(10, 10);
        // No bars installed: nothing scrolls
        assert_eq!(table.scroll_stops(Orientation::Vertical), &[0]);
        assert_eq!(table.viewport(), (5, 4));
    }

    #[test]
    fn test_click_toggles_selection_and_double_click() {
        let mut table = grid(2, 2);
        let mut out = Outbox::default();
        let at = |ms| MouseState::at(0, 0).left_click().at_time(Duration::from_millis(ms));

        table.on_left_clicked(Point::new(0, 0), &at(0), &mut out);
        assert_eq!(table.selected(), Some((0, 0)));
        table.on_left_clicked(Point::new(0, 0), &at(100), &mut out);
        assert_eq!(table.selected(), None);

        assert!(out.events.contains(&EventKind::CellDoubleClick { row: 0, column: 0 }));
        assert_eq!(
            out.events
                .iter()
                .filter(|e| matches!(e, EventKind::CellLeftClick { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_unselectable_cells_still_click() {
        let mut table = grid(1, 1);
        table.cells_mut().update(0, 0, |cell| cell.options_mut().selectable = false);
        let mut out = Outbox::default();
        table.on_left_clicked(Point::new(0, 0), &MouseState::at(0, 0).left_click(), &mut out);
        assert_eq!(table.selected(), None);
        assert!(out.events.contains(&EventKind::CellLeftClick { row: 0, column: 0 }));

        table.cells_mut().update(0, 0, |cell| cell.options_mut().interactable = false);
        let mut out = Outbox::default();
        table.on_left_clicked(Point::new(0, 0), &MouseState::at(0, 0).left_click(), &mut out);
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_clicks_that_select_nothing_clear_selection() {
        let mut table = grid(2, 2);
        let mut out = Outbox::default();
        let click = MouseState::at(0, 0).left_click();

        table.change_selected(Some((0, 0)), &mut out);
        table.on_left_clicked(Point::new(4, 3), &click, &mut out);
        assert_eq!(table.selected(), None);

        table.change_selected(Some((0, 0)), &mut out);
        table.cells_mut().update(1, 1, |cell| cell.options_mut().selectable = false);
        let mut out = Outbox::default();
        table.on_left_clicked(Point::new(1, 1), &click, &mut out);
        assert_eq!(table.selected(), None);
        assert_eq!(
            out.events,
            vec![
                EventKind::SelectedCellChanged {
                    previous: Some((0, 0)),
                    current: None,
                },
                EventKind::CellLeftClick { row: 1, column: 1 },
            ]
        );
    }

    #[test]
    fn test_hidden_and_dead_cells_raise_nothing() {
        let mut table = grid(1, 3);
        table.cells_mut().update(0, 1, |cell| cell.options_mut().visible = false);
        table.cells_mut().update(0, 2, |cell| cell.options_mut().interactable = false);
        let mut out = Outbox::default();
        let at = |ms| MouseState::at(0, 0).left_click().at_time(Duration::from_millis(ms));

        for column in [1, 2] {
            let point = Point::new(column, 0);
            table.on_mouse_in(point, &MouseState::default(), &mut out);
            table.on_left_clicked(point, &at(0), &mut out);
            table.on_left_clicked(point, &at(50), &mut out);
            table.on_right_clicked(point, &mut out);
        }
        table.on_mouse_exit(&mut out);

        assert!(out.events.is_empty());
        assert_eq!(table.selected(), None);
        assert_eq!(table.hovered(), None);
    }

    #[test]
    fn test_hover_edges() {
        let mut table = grid(2, 2);
        let mut out = Outbox::default();
        table.on_mouse_in(Point::new(0, 0), &MouseState::default(), &mut out);
        table.on_mouse_in(Point::new(0, 0), &MouseState::default(), &mut out);
        table.on_mouse_in(Point::new(1, 0), &MouseState::default(), &mut out);
        table.on_mouse_exit(&mut out);
        assert_eq!(
            out.events,
            vec![
                EventKind::CellEnter { row: 0, column: 0 },
                EventKind::CellExit { row: 0, column: 0 },
                EventKind::CellEnter { row: 0, column: 1 },
                EventKind::CellExit { row: 0, column: 1 },
            ]
        );
    }

    #[test]
    fn test_selection_modes() {
        let mut table = grid(3, 3);
        let mut out = Outbox::default();
        table.change_selected(Some((1, 1)), &mut out);
        assert!(table.is_cell_selected(1, 1));
        assert!(!table.is_cell_selected(1, 2));

        table.set_selection_mode(SelectionMode::EntireRow);
        assert!(table.is_cell_selected(1, 2));
        table.set_selection_mode(SelectionMode::EntireColumn);
        assert!(table.is_cell_selected(2, 1));
        assert!(!table.is_cell_selected(1, 2));
    }

    #[test]
    fn test_redraw_draws_stored_cells_only() {
        let mut table = Table::with_cell_size(5, 4, 2, 1);
        table.cells_mut().set_text(0, 0, "00");
        table.cells_mut().set_text(0, 1, "01");
        table.cells_mut().set_text(1, 0, "z");
        table.sync();
        let mut buffer = crate::renderer::FrameBuffer::new(5, 4);
        table.redraw(&mut buffer, ControlStates::empty(), &Theme::default(), None);
        assert_eq!(buffer.row_text(0), "0001 ");
        assert_eq!(buffer.row_text(1), "z    ");
    }
}
