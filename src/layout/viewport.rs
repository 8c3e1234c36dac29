//! Viewport bookkeeping: scroll position, visible range and hit testing.
//!
//! Content coordinates start at the top-left of the whole matrix. The host
//! scrolls the content; sticky panes stay pinned at the viewport edges, so
//! a client point falling inside a pane maps to that pane's rows/columns
//! whatever the scroll position is.

use super::{CellMatrix, Location, PointerLocation, Range};

/// Visible area of the grid
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Horizontal scroll position in content coordinates
    pub scroll_x: f64,
    /// Vertical scroll position in content coordinates
    pub scroll_y: f64,
    /// Viewport width in pixels
    pub width: f64,
    /// Viewport height in pixels
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Sizes of the four sticky panes in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Panes {
    top: f64,
    bottom: f64,
    left: f64,
    right: f64,
}

impl Panes {
    fn of(matrix: &CellMatrix) -> Self {
        Self {
            top: matrix.ranges.top.height,
            bottom: matrix.ranges.bottom.height,
            left: matrix.ranges.left.width,
            right: matrix.ranges.right.width,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width,
            height,
        }
    }

    /// Visible scrollable row range (inclusive)
    pub fn visible_rows(&self, matrix: &CellMatrix) -> Option<(usize, usize)> {
        let panes = Panes::of(matrix);
        let range = &matrix.scrollable_range;
        let (first, last) = range.row_bounds()?;
        let top = self.scroll_y + panes.top;
        let bottom = self.scroll_y + (self.height - panes.bottom).max(panes.top);
        let start = matrix.row_at_y_clamped(top)?.clamp(first, last);
        let end = matrix.row_at_y_clamped(bottom)?.clamp(start, last);
        Some((start, end))
    }

    /// Visible scrollable column range (inclusive)
    pub fn visible_cols(&self, matrix: &CellMatrix) -> Option<(usize, usize)> {
        let panes = Panes::of(matrix);
        let range = &matrix.scrollable_range;
        let (first, last) = range.column_bounds()?;
        let left = self.scroll_x + panes.left;
        let right = self.scroll_x + (self.width - panes.right).max(panes.left);
        let start = matrix.col_at_x_clamped(left)?.clamp(first, last);
        let end = matrix.col_at_x_clamped(right)?.clamp(start, last);
        Some((start, end))
    }

    /// Part of the scrollable range a virtualizing renderer has to draw.
    ///
    /// With `disable_virtualization` the whole scrollable range is returned.
    pub fn visible_range(&self, matrix: &CellMatrix, disable_virtualization: bool) -> Range {
        if disable_virtualization {
            return matrix.scrollable_range.clone();
        }
        let (Some((top, bottom)), Some((left, right))) =
            (self.visible_rows(matrix), self.visible_cols(matrix))
        else {
            return Range::default();
        };
        let rows = matrix.rows.get(top..=bottom).map(<[_]>::to_vec);
        let columns = matrix.columns.get(left..=right).map(<[_]>::to_vec);
        Range::new(rows.unwrap_or_default(), columns.unwrap_or_default())
    }

    /// Convert a viewport-relative point to content coordinates, resolving
    /// sticky panes.
    pub fn to_content(&self, matrix: &CellMatrix, x: f64, y: f64) -> (f64, f64) {
        let panes = Panes::of(matrix);
        let visible_width = self.width.min(matrix.width);
        let visible_height = self.height.min(matrix.height);

        let content_x = if x < panes.left {
            x
        } else if panes.right > 0.0 && x >= visible_width - panes.right {
            matrix.width - (visible_width - x)
        } else {
            x + self.scroll_x
        };

        let content_y = if y < panes.top {
            y
        } else if panes.bottom > 0.0 && y >= visible_height - panes.bottom {
            matrix.height - (visible_height - y)
        } else {
            y + self.scroll_y
        };

        (content_x, content_y)
    }

    /// Hit test a viewport-relative point. Points outside the content clamp
    /// to the nearest edge cell.
    pub fn location_from_client(&self, matrix: &CellMatrix, x: f64, y: f64) -> Option<PointerLocation> {
        let (content_x, content_y) = self.to_content(matrix, x, y);
        matrix.location_at(content_x, content_y)
    }

    /// Maximum scroll offsets for this matrix
    pub fn max_scroll(&self, matrix: &CellMatrix) -> (f64, f64) {
        (
            (matrix.width - self.width).max(0.0),
            (matrix.height - self.height).max(0.0),
        )
    }

    /// Clamp scroll position to valid range
    pub fn clamp_scroll(&mut self, matrix: &CellMatrix) {
        let (max_x, max_y) = self.max_scroll(matrix);
        self.scroll_x = self.scroll_x.clamp(0.0, max_x);
        self.scroll_y = self.scroll_y.clamp(0.0, max_y);
    }

    /// Scroll by delta amounts
    pub fn scroll_by(&mut self, delta_x: f64, delta_y: f64, matrix: &CellMatrix) {
        self.scroll_x += delta_x;
        self.scroll_y += delta_y;
        self.clamp_scroll(matrix);
    }

    /// Set absolute scroll position
    pub fn set_scroll(&mut self, x: f64, y: f64, matrix: &CellMatrix) {
        self.scroll_x = x;
        self.scroll_y = y;
        self.clamp_scroll(matrix);
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Scroll offsets that bring `location` fully into view.
    ///
    /// Cells inside a sticky pane are always visible on that axis, so the
    /// corresponding offset is left alone.
    pub fn scroll_into_view(&self, matrix: &CellMatrix, location: &Location) -> (f64, f64) {
        let panes = Panes::of(matrix);
        let scrollable = &matrix.scrollable_range;

        let mut scroll_y = self.scroll_y;
        if scrollable
            .row_bounds()
            .is_some_and(|(a, b)| (a..=b).contains(&location.row.idx))
        {
            let visible_top = self.scroll_y + panes.top;
            let visible_bottom = self.scroll_y + self.height - panes.bottom;
            if location.row.top < visible_top {
                scroll_y = location.row.top - panes.top;
            } else if location.row.bottom() > visible_bottom {
                scroll_y = location.row.bottom() - (self.height - panes.bottom);
            }
        }

        let mut scroll_x = self.scroll_x;
        if scrollable
            .column_bounds()
            .is_some_and(|(a, b)| (a..=b).contains(&location.column.idx))
        {
            let visible_left = self.scroll_x + panes.left;
            let visible_right = self.scroll_x + self.width - panes.right;
            if location.column.left < visible_left {
                scroll_x = location.column.left - panes.left;
            } else if location.column.right() > visible_right {
                scroll_x = location.column.right() - (self.width - panes.right);
            }
        }

        let (max_x, max_y) = self.max_scroll(matrix);
        (scroll_x.clamp(0.0, max_x), scroll_y.clamp(0.0, max_y))
    }

    /// Scroll step to apply while a drag pointer sits beyond the viewport
    /// edge: the overshoot distance, zero when inside.
    pub fn auto_scroll_delta(&self, x: f64, y: f64) -> (f64, f64) {
        let dx = if x < 0.0 {
            x
        } else if x > self.width {
            x - self.width
        } else {
            0.0
        };
        let dy = if y < 0.0 {
            y
        } else if y > self.height {
            y - self.height
        } else {
            0.0
        };
        (dx, dy)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::layout::{CellMatrixBuilder, CellMatrixProps};
    use crate::types::{Cell, Column, Row};

    fn matrix(rows: usize, cols: usize, sticky_top: usize, sticky_left: usize) -> CellMatrix {
        let columns = (0..cols)
            .map(|c| Column::new(format!("c{c}")).with_width(100.0))
            .collect();
        let rows = (0..rows)
            .map(|r| Row::new(format!("r{r}"), (0..cols).map(|_| Cell::text("")).collect()))
            .collect();
        let props = CellMatrixProps::new(columns, rows).with_sticky(sticky_top, sticky_left, 0, 0);
        CellMatrixBuilder::new(&props).build()
    }

    #[test]
    fn test_visible_rows_after_scroll() {
        let m = matrix(100, 3, 0, 0);
        let mut vp = Viewport::new(300.0, 250.0);
        assert_eq!(vp.visible_rows(&m), Some((0, 10)));
        vp.set_scroll(0.0, 500.0, &m);
        assert_eq!(vp.visible_rows(&m), Some((20, 30)));
    }

    #[test]
    fn test_clamp_scroll() {
        let m = matrix(10, 3, 0, 0);
        let mut vp = Viewport::new(200.0, 100.0);
        vp.set_scroll(-50.0, 1e6, &m);
        assert_eq!(vp.scroll_x, 0.0);
        assert_eq!(vp.scroll_y, 250.0 - 100.0);
    }

    #[test]
    fn test_hit_test_sticky_pane_ignores_scroll() {
        let m = matrix(100, 10, 1, 1);
        let mut vp = Viewport::new(400.0, 300.0);
        vp.set_scroll(300.0, 500.0, &m);

        let sticky = vp.location_from_client(&m, 10.0, 10.0).unwrap();
        assert_eq!(sticky.row.idx, 0);
        assert_eq!(sticky.column.idx, 0);

        let scrolled = vp.location_from_client(&m, 150.0, 30.0).unwrap();
        assert_eq!(scrolled.column.idx, 4);
        assert_eq!(scrolled.row.idx, 21);
        assert_eq!(scrolled.cell_x, 50.0);
    }

    #[test]
    fn test_scroll_into_view_below() {
        let m = matrix(100, 3, 1, 0);
        let vp = Viewport::new(300.0, 100.0);
        let loc = m.get_location(10, 0).unwrap();
        let (_, y) = vp.scroll_into_view(&m, &loc);
        assert_eq!(y, loc.row.bottom() - 100.0);
    }

    #[test]
    fn test_scroll_into_view_above_sticky() {
        let m = matrix(100, 3, 1, 0);
        let mut vp = Viewport::new(300.0, 100.0);
        vp.set_scroll(0.0, 500.0, &m);
        let loc = m.get_location(5, 0).unwrap();
        let (_, y) = vp.scroll_into_view(&m, &loc);
        assert_eq!(y, loc.row.top - 25.0);

        // sticky rows never scroll
        let sticky = m.get_location(0, 0).unwrap();
        assert_eq!(vp.scroll_into_view(&m, &sticky).1, 500.0);
    }

    #[test]
    fn test_auto_scroll_delta() {
        let vp = Viewport::new(200.0, 100.0);
        assert_eq!(vp.auto_scroll_delta(50.0, 50.0), (0.0, 0.0));
        assert_eq!(vp.auto_scroll_delta(-10.0, 130.0), (-10.0, 30.0));
    }

    #[test]
    fn test_visible_range_virtualization_toggle() {
        let m = matrix(100, 3, 0, 0);
        let vp = Viewport::new(300.0, 100.0);
        assert_eq!(vp.visible_range(&m, false).rows.len(), 5);
        assert_eq!(vp.visible_range(&m, true).rows.len(), 100);
    }
}
