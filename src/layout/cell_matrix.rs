//! Cell matrix geometry and location queries.
//!
//! Row and column offsets are computed once by [`CellMatrixBuilder`] so
//! that hit testing is an O(log n) binary search and Id lookups are O(1).
//!
//! [`CellMatrixBuilder`]: super::CellMatrixBuilder

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::ops::Deref;
use std::sync::Arc;

use serde::Serialize;

use super::Range;
use crate::error::{GridError, Result};
use crate::types::{Cell, CellLocation, Id};

/// Default row height in pixels
pub const DEFAULT_ROW_HEIGHT: f64 = 25.0;

/// Default column width in pixels
pub const DEFAULT_COLUMN_WIDTH: f64 = 150.0;

/// Minimum column width in pixels unless the props override it
pub const MIN_COLUMN_WIDTH: f64 = 40.0;

/// A column with its computed geometry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridColumn {
    pub column_id: Id,
    pub idx: usize,
    pub left: f64,
    pub width: f64,
    pub reorderable: bool,
    pub resizable: bool,
}

impl GridColumn {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// A row with its computed geometry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    pub row_id: Id,
    pub idx: usize,
    pub top: f64,
    pub height: f64,
    pub reorderable: bool,
    pub resizable: bool,
    pub group_id: Option<Id>,
}

impl GridRow {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Cursor into the matrix. Never cached across rebuilds; revalidate instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub row: GridRow,
    pub column: GridColumn,
}

impl Location {
    pub fn new(row: GridRow, column: GridColumn) -> Self {
        Self { row, column }
    }

    /// Same row and column Ids, whatever the geometry says
    pub fn same_cell(&self, other: &Location) -> bool {
        self.row.row_id == other.row.row_id && self.column.column_id == other.column.column_id
    }

    pub fn cell_location(&self) -> CellLocation {
        CellLocation::new(self.row.row_id.clone(), self.column.column_id.clone())
    }
}

/// Location under the pointer plus where exactly the pointer sits.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerLocation {
    pub location: Location,
    /// X in content coordinates (sticky panes already resolved)
    pub viewport_x: f64,
    /// Y in content coordinates
    pub viewport_y: f64,
    /// X offset inside the cell
    pub cell_x: f64,
    /// Y offset inside the cell
    pub cell_y: f64,
}

impl PointerLocation {
    /// Pointer at the top-left corner of `location`
    pub fn at(location: Location) -> Self {
        Self {
            viewport_x: location.column.left,
            viewport_y: location.row.top,
            cell_x: 0.0,
            cell_y: 0.0,
            location,
        }
    }

    /// Pointer at `(cell_x, cell_y)` inside `location`
    pub fn within(location: Location, cell_x: f64, cell_y: f64) -> Self {
        Self {
            viewport_x: location.column.left + cell_x,
            viewport_y: location.row.top + cell_y,
            cell_x,
            cell_y,
            location,
        }
    }
}

impl Deref for PointerLocation {
    type Target = Location;

    fn deref(&self) -> &Location {
        &self.location
    }
}

/// The four frozen edge panes. Corners belong to none of them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StickyRanges {
    pub top: Range,
    pub left: Range,
    pub right: Range,
    pub bottom: Range,
}

/// Serializable geometry of a built matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixSummary<'a> {
    pub width: f64,
    pub height: f64,
    pub columns: &'a [GridColumn],
    pub rows: &'a [GridRow],
    pub sticky_top_rows: usize,
    pub sticky_bottom_rows: usize,
    pub sticky_left_columns: usize,
    pub sticky_right_columns: usize,
    /// Number of cells covered by a span
    pub spanned_cells: usize,
}

impl<'a> MatrixSummary<'a> {
    pub fn of(matrix: &'a CellMatrix) -> Self {
        Self {
            width: matrix.width,
            height: matrix.height,
            columns: &matrix.columns,
            rows: &matrix.rows,
            sticky_top_rows: matrix.ranges.top.rows.len(),
            sticky_bottom_rows: matrix.ranges.bottom.rows.len(),
            sticky_left_columns: matrix.ranges.left.columns.len(),
            sticky_right_columns: matrix.ranges.right.columns.len(),
            spanned_cells: matrix.span_lookup.len(),
        }
    }
}

/// Pack a (row, column) index pair into a lookup key
pub fn cell_key(row_idx: usize, column_idx: usize) -> u64 {
    ((row_idx as u64) << 32) | (column_idx as u64 & 0xFFFF_FFFF)
}

/// Geometric and logical model of the grid
#[derive(Debug, Clone, Default)]
pub struct CellMatrix {
    pub columns: Vec<GridColumn>,
    pub rows: Vec<GridRow>,
    /// Row-major host cells, one per (row, column)
    pub cells: Vec<Vec<Cell>>,
    pub ranges: StickyRanges,
    pub scrollable_range: Range,
    pub width: f64,
    pub height: f64,
    pub row_index_lookup: HashMap<Id, usize>,
    pub column_index_lookup: HashMap<Id, usize>,
    /// Spanned cells only: every covered key maps to the shared span range.
    /// Keys missing here render as their own 1×1 range.
    pub span_lookup: HashMap<u64, Arc<Range>>,
    pub row_groups: BTreeMap<Id, Vec<GridRow>>,
    pub first: Option<Location>,
    pub last: Option<Location>,
    pub min_column_width: f64,
}

impl CellMatrix {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    /// Contiguous range between two corners, in either order
    pub fn get_range(&self, start: &Location, end: &Location) -> Range {
        let (top, bottom) = min_max(start.row.idx, end.row.idx);
        let (left, right) = min_max(start.column.idx, end.column.idx);
        let rows = self.rows.get(top..=bottom).map(<[_]>::to_vec);
        let columns = self.columns.get(left..=right).map(<[_]>::to_vec);
        Range::new(rows.unwrap_or_default(), columns.unwrap_or_default())
    }

    pub fn get_location(&self, row_idx: usize, column_idx: usize) -> Option<Location> {
        Some(Location::new(
            self.rows.get(row_idx)?.clone(),
            self.columns.get(column_idx)?.clone(),
        ))
    }

    /// Resolve Ids to a location.
    ///
    /// # Errors
    /// Returns [`GridError::LocationNotFound`] when either Id is absent.
    pub fn get_location_by_id(&self, row_id: &Id, column_id: &Id) -> Result<Location> {
        self.row_index_lookup
            .get(row_id)
            .zip(self.column_index_lookup.get(column_id))
            .and_then(|(&r, &c)| self.get_location(r, c))
            .ok_or_else(|| GridError::LocationNotFound {
                row_id: row_id.clone(),
                column_id: column_id.clone(),
            })
    }

    /// Same as [`get_location_by_id`](Self::get_location_by_id) for an Id pair
    ///
    /// # Errors
    /// Returns [`GridError::LocationNotFound`] when either Id is absent.
    pub fn get_location_by_cell(&self, location: &CellLocation) -> Result<Location> {
        self.get_location_by_id(&location.row_id, &location.column_id)
    }

    /// Repair a possibly stale location.
    ///
    /// Ids win when they still exist; otherwise the stale index is clamped to
    /// the last valid one. `None` only when the matrix is empty.
    pub fn validate_location(&self, location: &Location) -> Option<Location> {
        let last = self.last.as_ref()?;
        let row_idx = self
            .row_index_lookup
            .get(&location.row.row_id)
            .copied()
            .unwrap_or_else(|| location.row.idx.min(last.row.idx));
        let column_idx = self
            .column_index_lookup
            .get(&location.column.column_id)
            .copied()
            .unwrap_or_else(|| location.column.idx.min(last.column.idx));
        self.get_location(row_idx, column_idx)
    }

    pub fn validate_range(&self, range: &Range) -> Option<Range> {
        let first = self.validate_location(&range.first()?)?;
        let last = self.validate_location(&range.last()?)?;
        Some(self.get_range(&first, &last))
    }

    /// All rows of the location's row group across every column
    pub fn get_selected_rows_by_location(&self, location: &Location) -> Option<Range> {
        let group_id = location.row.group_id.as_ref()?;
        let rows = self.row_groups.get(group_id)?;
        Some(Range::new(rows.clone(), self.columns.clone()))
    }

    pub fn get_cell(&self, location: &Location) -> Option<&Cell> {
        self.get_cell_at(location.row.idx, location.column.idx)
    }

    pub fn get_cell_at(&self, row_idx: usize, column_idx: usize) -> Option<&Cell> {
        self.cells.get(row_idx)?.get(column_idx)
    }

    /// Range a renderer draws for this key: the span covering it, or 1×1
    pub fn range_at(&self, row_idx: usize, column_idx: usize) -> Option<Arc<Range>> {
        if let Some(span) = self.span_lookup.get(&cell_key(row_idx, column_idx)) {
            return Some(Arc::clone(span));
        }
        let location = self.get_location(row_idx, column_idx)?;
        Some(Arc::new(Range::single(&location)))
    }

    /// Whether this key is covered by a span but is not its top-left cell
    pub fn is_hidden_by_span(&self, row_idx: usize, column_idx: usize) -> bool {
        self.span_lookup
            .get(&cell_key(row_idx, column_idx))
            .and_then(|span| span.first())
            .is_some_and(|origin| origin.row.idx != row_idx || origin.column.idx != column_idx)
    }

    /// Top-left location of the span covering `location` (itself otherwise)
    pub fn span_origin(&self, location: &Location) -> Location {
        self.span_lookup
            .get(&cell_key(location.row.idx, location.column.idx))
            .and_then(|span| span.first())
            .unwrap_or_else(|| location.clone())
    }

    /// Row containing content y (binary search over row tops)
    pub fn row_at_y(&self, y: f64) -> Option<usize> {
        if self.rows.is_empty() || y < 0.0 || y >= self.height {
            return None;
        }
        match self
            .rows
            .binary_search_by(|row| row.top.partial_cmp(&y).unwrap_or(Ordering::Equal))
        {
            Ok(i) => Some(i),
            Err(i) => Some(i.saturating_sub(1)),
        }
    }

    /// Column containing content x (binary search over column lefts)
    pub fn col_at_x(&self, x: f64) -> Option<usize> {
        if self.columns.is_empty() || x < 0.0 || x >= self.width {
            return None;
        }
        match self
            .columns
            .binary_search_by(|col| col.left.partial_cmp(&x).unwrap_or(Ordering::Equal))
        {
            Ok(i) => Some(i),
            Err(i) => Some(i.saturating_sub(1)),
        }
    }

    /// Row index at y, clamped into the matrix
    pub fn row_at_y_clamped(&self, y: f64) -> Option<usize> {
        let last = self.rows.len().checked_sub(1)?;
        if y < 0.0 {
            return Some(0);
        }
        Some(self.row_at_y(y).unwrap_or(last))
    }

    /// Column index at x, clamped into the matrix
    pub fn col_at_x_clamped(&self, x: f64) -> Option<usize> {
        let last = self.columns.len().checked_sub(1)?;
        if x < 0.0 {
            return Some(0);
        }
        Some(self.col_at_x(x).unwrap_or(last))
    }

    /// Location at content coordinates, clamped into the matrix
    pub fn location_at(&self, x: f64, y: f64) -> Option<PointerLocation> {
        let row = self.rows.get(self.row_at_y_clamped(y)?)?.clone();
        let column = self.columns.get(self.col_at_x_clamped(x)?)?.clone();
        let cell_x = (x - column.left).clamp(0.0, column.width);
        let cell_y = (y - row.top).clamp(0.0, row.height);
        Some(PointerLocation {
            location: Location::new(row, column),
            viewport_x: x,
            viewport_y: y,
            cell_x,
            cell_y,
        })
    }

    /// The whole matrix as one range
    pub fn full_range(&self) -> Range {
        Range::new(self.rows.clone(), self.columns.clone())
    }

    /// Range covering whole rows between two row indices
    pub fn rows_range(&self, from: usize, to: usize) -> Range {
        let (top, bottom) = min_max(from, to);
        let rows = self.rows.get(top..=bottom).map(<[_]>::to_vec);
        Range::new(rows.unwrap_or_default(), self.columns.clone())
    }

    /// Range covering whole columns between two column indices
    pub fn columns_range(&self, from: usize, to: usize) -> Range {
        let (left, right) = min_max(from, to);
        let columns = self.columns.get(left..=right).map(<[_]>::to_vec);
        Range::new(self.rows.clone(), columns.unwrap_or_default())
    }
}

fn min_max(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
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
    use crate::types::{Column, Row};

    fn matrix(rows: usize, cols: usize) -> CellMatrix {
        let columns = (0..cols).map(|c| Column::new(format!("c{c}"))).collect();
        let rows = (0..rows)
            .map(|r| {
                Row::new(
                    format!("r{r}"),
                    (0..cols).map(|c| Cell::text(format!("{r}:{c}"))).collect(),
                )
            })
            .collect();
        CellMatrixBuilder::new(&CellMatrixProps::new(columns, rows)).build()
    }

    #[test]
    fn test_get_range_normalizes_order() {
        let m = matrix(4, 4);
        let a = m.get_location(3, 1).unwrap();
        let b = m.get_location(0, 2).unwrap();
        let range = m.get_range(&a, &b);
        assert_eq!(range, m.get_range(&b, &a));
        assert_eq!(range.first().unwrap().row.idx, 0);
        assert_eq!(range.last().unwrap().row.idx, 3);
        assert_eq!(range.columns.len(), 2);
    }

    #[test]
    fn test_location_by_id() {
        let m = matrix(3, 3);
        let loc = m
            .get_location_by_id(&Id::from("r2"), &Id::from("c1"))
            .unwrap();
        assert_eq!(loc.row.idx, 2);
        assert_eq!(loc.column.idx, 1);

        let err = m
            .get_location_by_id(&Id::from("gone"), &Id::from("c1"))
            .unwrap_err();
        assert!(matches!(err, GridError::LocationNotFound { .. }));
    }

    #[test]
    fn test_validate_location_clamps_stale_index() {
        let big = matrix(6, 3);
        let stale = big.get_location(5, 2).unwrap();
        let small = matrix(3, 3);
        let fixed = small.validate_location(&stale).unwrap();
        // "r5" is gone, so the index is clamped
        assert_eq!(fixed.row.idx, 2);
        assert_eq!(fixed.column.column_id, Id::from("c2"));
    }

    #[test]
    fn test_validate_location_on_empty_matrix() {
        let stale = matrix(2, 2).get_location(1, 1).unwrap();
        assert!(CellMatrix::default().validate_location(&stale).is_none());
    }

    #[test]
    fn test_row_and_col_at() {
        let m = matrix(10, 5);
        assert_eq!(m.row_at_y(0.0), Some(0));
        assert_eq!(m.row_at_y(10.0), Some(0));
        assert_eq!(m.row_at_y(DEFAULT_ROW_HEIGHT), Some(1));
        assert_eq!(m.row_at_y(DEFAULT_ROW_HEIGHT * 2.5), Some(2));
        assert_eq!(m.row_at_y(m.height), None);
        assert_eq!(m.col_at_x(DEFAULT_COLUMN_WIDTH * 4.5), Some(4));
        assert_eq!(m.col_at_x(-1.0), None);
        assert_eq!(m.col_at_x_clamped(-1.0), Some(0));
        assert_eq!(m.row_at_y_clamped(1e9), Some(9));
    }

    #[test]
    fn test_location_at_offsets() {
        let m = matrix(3, 3);
        let p = m.location_at(160.0, 30.0).unwrap();
        assert_eq!(p.row.idx, 1);
        assert_eq!(p.column.idx, 1);
        assert_eq!(p.cell_x, 10.0);
        assert_eq!(p.cell_y, 5.0);
    }

    #[test]
    fn test_cell_key_is_unique_per_pair() {
        assert_ne!(cell_key(1, 0), cell_key(0, 1));
        assert_eq!(cell_key(3, 7), (3_u64 << 32) | 7);
    }
}
