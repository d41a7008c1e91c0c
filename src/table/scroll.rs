//! Table geometry: logical offsets, hit testing and scroll stops.
//!
//! Rows stack vertically and columns horizontally; both are handled by the
//! same [`Track`], selected by `Orientation` (`Vertical` walks rows,
//! `Horizontal` walks columns). Offsets are logical, i.e. before the render
//! start is subtracted.
//!
//! Scrolling moves between precomputed stops. From any stop, the next one
//! is reached by scrolling the first row that ends past the viewport either
//! until its bottom is flush with the viewport (when it is partly visible)
//! or by its full size (when it is entirely below). The scroll bar value is
//! the stop index, so scrolling back retraces the same offsets exactly.

use crate::table::cells::Cells;
use crate::types::Orientation;

/// Prefix sums of row heights (or column widths) over the used grid.
///
/// Built once per sync; every lookup afterwards is a slice access or a
/// binary search. Past the used grid every size is the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Track {
    /// `offsets[i]` is the logical start of index `i`; one extra entry holds
    /// the extent.
    offsets: Vec<i32>,
    default: i32,
}

impl Default for Track {
    fn default() -> Self {
        Self {
            offsets: vec![0],
            default: 0,
        }
    }
}

impl Track {
    pub(crate) fn new(cells: &Cells, orientation: Orientation) -> Self {
        let count = cells.count(orientation);
        let mut offsets = Vec::with_capacity(count + 1);
        let mut offset = 0;
        offsets.push(offset);
        for index in 0..count {
            offset += cells.size_of(orientation, index);
            offsets.push(offset);
        }
        let default = match orientation {
            Orientation::Vertical => cells.default_size().1,
            Orientation::Horizontal => cells.default_size().0,
        };
        Self { offsets, default }
    }

    /// Rows (or columns) in the used grid.
    pub(crate) fn count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Logical extent of the used grid.
    pub(crate) fn extent(&self) -> i32 {
        self.offsets[self.count()]
    }

    /// Logical start of `index`: the sum of all preceding sizes.
    pub(crate) fn offset_of(&self, index: usize) -> i32 {
        match self.offsets.get(index) {
            Some(&offset) => offset,
            None => self.extent() + (index - self.count()) as i32 * self.default,
        }
    }

    pub(crate) fn size_of(&self, index: usize) -> i32 {
        match (self.offsets.get(index), self.offsets.get(index + 1)) {
            (Some(start), Some(end)) => end - start,
            _ => self.default,
        }
    }

    /// First index of the used grid ending past `logical`.
    fn first_ending_after(&self, logical: i32) -> usize {
        self.offsets[1..].partition_point(|&end| end <= logical)
    }

    /// Distance to scroll forward from `start` so the next clipped row becomes
    /// fully visible. Zero when everything past `start` already fits.
    pub(crate) fn forward_amount(&self, start: i32, viewport: i32) -> i32 {
        let edge = start + viewport;
        let index = self.first_ending_after(edge);
        if index >= self.count() {
            return 0;
        }
        self.step_past(index, edge)
    }

    fn step_past(&self, index: usize, edge: i32) -> i32 {
        let (row_start, row_end) = (self.offsets[index], self.offsets[index + 1]);
        if row_start < edge { row_end - edge } else { row_end - row_start }
    }

    /// Every reachable render start, beginning with 0.
    pub(crate) fn scroll_stops(&self, viewport: i32) -> Vec<i32> {
        let mut stops = vec![0];
        if viewport <= 0 {
            return stops;
        }
        // The edge only moves forward, so the clipped row is searched for
        // from the previous one
        let count = self.count();
        let mut current = 0;
        let mut index = 0;
        loop {
            let edge = current + viewport;
            while index < count && self.offsets[index + 1] <= edge {
                index += 1;
            }
            if index >= count {
                break;
            }
            current += self.step_past(index, edge);
            stops.push(current);
        }
        stops
    }

    /// Index covering logical coordinate `logical`.
    ///
    /// With `limit`, indices at or past it do not exist. Without, the grid
    /// continues with default-sized rows forever.
    pub(crate) fn index_at(&self, logical: i32, limit: Option<usize>) -> Option<usize> {
        if logical < 0 {
            return None;
        }
        let index = if logical < self.extent() {
            self.first_ending_after(logical)
        } else if self.default > 0 {
            self.count() + ((logical - self.extent()) / self.default) as usize
        } else {
            return None;
        };
        match limit {
            Some(limit) if index >= limit => None,
            _ => Some(index),
        }
    }
}

/// Stop index bringing a row at `start` of `size` cells into full view from
/// stop `current`.
///
/// Scrolls back to the last stop at or before the row start when the row
/// begins above the viewport; scrolls forward to the first stop whose
/// viewport holds the whole row (or at least its start, for rows taller
/// than the viewport) when it ends below.
pub(crate) fn stop_showing(stops: &[i32], current: usize, start: i32, size: i32, viewport: i32) -> usize {
    let last = stops.len().saturating_sub(1);
    let current = current.min(last);
    let render_start = stops.get(current).copied().unwrap_or(0);

    if start < render_start {
        return stops.partition_point(|&stop| stop <= start).saturating_sub(1);
    }
    if start + size > render_start + viewport {
        let needed = (start + size - viewport).min(start);
        return stops.partition_point(|&stop| stop < needed).min(last);
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rows(sizes: &[i32]) -> Cells {
        let mut cells = Cells::new(1, 1);
        for (row, size) in sizes.iter().enumerate() {
            cells.set_row_size(row, *size);
        }
        cells
    }

    fn track(sizes: &[i32]) -> Track {
        Track::new(&rows(sizes), Orientation::Vertical)
    }

    #[test]
    fn test_offsets() {
        let track = track(&[2, 3, 1]);
        assert_eq!(track.offset_of(0), 0);
        assert_eq!(track.offset_of(2), 5);
        assert_eq!(track.extent(), 6);
        // Past the grid, default height 1
        assert_eq!(track.offset_of(5), 8);
        assert_eq!(track.size_of(1), 3);
        assert_eq!(track.size_of(9), 1);
    }

    #[test]
    fn test_forward_amount_partial_then_hidden() {
        // Viewport 4: rows 0..2, 2..5 (partial), 5..6 (hidden)
        let track = track(&[2, 3, 1]);
        assert_eq!(track.forward_amount(0, 4), 1);
        assert_eq!(track.forward_amount(1, 4), 1);
        assert_eq!(track.forward_amount(2, 4), 0);
    }

    #[test]
    fn test_stops_end_flush() {
        let track = track(&[2, 3, 1]);
        let stops = track.scroll_stops(4);
        assert_eq!(stops, vec![0, 1, 2]);
        assert_eq!(*stops.last().unwrap() + 4, track.extent());
    }

    #[test]
    fn test_entirely_hidden_row_scrolls_by_its_size() {
        // Viewport 2 at start 0: row 2..5 starts exactly at the edge
        let track = track(&[1, 1, 3]);
        assert_eq!(track.forward_amount(0, 2), 3);
        assert_eq!(track.scroll_stops(2), vec![0, 3]);
    }

    #[test]
    fn test_everything_fits() {
        assert_eq!(track(&[1, 1]).scroll_stops(10), vec![0]);
        assert_eq!(Track::new(&Cells::new(1, 1), Orientation::Vertical).scroll_stops(0), vec![0]);
    }

    #[test]
    fn test_hidden_rows_take_no_space() {
        let mut cells = rows(&[1, 1, 1, 1]);
        cells.set_row_visible(1, false);
        let track = Track::new(&cells, Orientation::Vertical);
        assert_eq!(track.extent(), 3);
        assert_eq!(track.index_at(1, Some(4)), Some(2));
    }

    #[test]
    fn test_index_at_limits() {
        let track = track(&[2, 2]);
        assert_eq!(track.index_at(3, Some(2)), Some(1));
        assert_eq!(track.index_at(4, Some(2)), None);
        assert_eq!(track.index_at(6, None), Some(4));
        assert_eq!(track.index_at(-1, None), None);
    }

    #[test]
    fn test_far_sparse_row_is_linear() {
        let mut cells = Cells::new(1, 1);
        cells.set_text(100_000, 0, "x");
        let track = Track::new(&cells, Orientation::Vertical);
        let stops = track.scroll_stops(10);

        assert_eq!(track.count(), 100_001);
        assert_eq!(stops.len(), 99_992);
        assert_eq!(*stops.last().unwrap(), 99_991);
        assert_eq!(track.index_at(99_995, None), Some(99_995));
        assert_eq!(stop_showing(&stops, 0, 100_000, 1, 10), 99_991);
    }

    #[test]
    fn test_stop_showing() {
        let stops = [0, 2, 4, 6];
        // Row 7..8 with viewport 3 at stop 0: needs render start >= 5
        assert_eq!(stop_showing(&stops, 0, 7, 1, 3), 3);
        // Row 1..2 while at stop 3: back to the stop at or before 1
        assert_eq!(stop_showing(&stops, 3, 1, 1, 3), 0);
        // Already visible
        assert_eq!(stop_showing(&stops, 1, 3, 1, 3), 1);
        // Past the last stop: clamp to it
        assert_eq!(stop_showing(&stops, 0, 20, 1, 3), 3);
    }

    proptest! {
        #[test]
        fn prop_last_stop_is_flush(sizes in prop::collection::vec(0i32..6, 1..40), viewport in 1i32..20) {
            let track = track(&sizes);
            let stops = track.scroll_stops(viewport);
            let total = track.extent();

            prop_assert!(stops.windows(2).all(|w| w[0] < w[1]));
            let last = *stops.last().unwrap();
            if total > viewport {
                prop_assert_eq!(last + viewport, total);
            } else {
                prop_assert_eq!(last, 0);
            }
        }

        #[test]
        fn prop_each_stop_reveals_the_clipped_row(
            sizes in prop::collection::vec(0i32..6, 1..40),
            hidden in prop::collection::vec(any::<bool>(), 40),
            viewport in 1i32..20,
        ) {
            let mut cells = rows(&sizes);
            for (row, hide) in hidden.iter().take(sizes.len()).enumerate() {
                cells.set_row_visible(row, !hide);
            }
            let track = Track::new(&cells, Orientation::Vertical);
            let stops = track.scroll_stops(viewport);

            for pair in stops.windows(2) {
                let (from, to) = (pair[0], pair[1]);
                let edge = from + viewport;
                // First row of nonzero size not fully inside the viewport at `from`
                let clipped = (0..track.count())
                    .find(|&i| track.size_of(i) > 0 && track.offset_of(i + 1) > edge);
                prop_assert!(clipped.is_some());
                let row = clipped.unwrap_or_default();
                let (start, end) = (track.offset_of(row), track.offset_of(row + 1));

                if start < edge {
                    // Straddled the edge: now ends exactly on it
                    prop_assert_eq!(end, to + viewport);
                } else {
                    // Entirely below: scrolled by its full height
                    prop_assert_eq!(to - from, end - start);
                }
                prop_assert!(hidden.get(row).is_none_or(|hide| !hide));
            }
        }
    }
}
