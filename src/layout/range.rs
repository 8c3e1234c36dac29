//! Rectangular selection value object.

use serde::Serialize;

use super::{GridColumn, GridRow, Location};

/// Contiguous block of rows × columns, compared structurally.
///
/// Rows and columns are each sorted by `idx`. Width and height are the sums
/// of the member sizes, computed independently per axis, so a range with
/// rows but no columns still reports its height.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub rows: Vec<GridRow>,
    pub columns: Vec<GridColumn>,
    pub width: f64,
    pub height: f64,
}

impl Range {
    pub fn new(rows: Vec<GridRow>, columns: Vec<GridColumn>) -> Self {
        let width = columns.iter().map(|c| c.width).sum();
        let height = rows.iter().map(|r| r.height).sum();
        Self {
            rows,
            columns,
            width,
            height,
        }
    }

    /// The degenerate 1×1 range at `location`
    pub fn single(location: &Location) -> Self {
        Self::new(vec![location.row.clone()], vec![location.column.clone()])
    }

    /// Top-left corner (`None` for an empty range)
    pub fn first(&self) -> Option<Location> {
        Some(Location::new(
            self.rows.first()?.clone(),
            self.columns.first()?.clone(),
        ))
    }

    /// Bottom-right corner (`None` for an empty range)
    pub fn last(&self) -> Option<Location> {
        Some(Location::new(
            self.rows.last()?.clone(),
            self.columns.last()?.clone(),
        ))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn is_degenerate(&self) -> bool {
        self.rows.len() == 1 && self.columns.len() == 1
    }

    /// Inclusive row index bounds
    pub fn row_bounds(&self) -> Option<(usize, usize)> {
        Some((self.rows.first()?.idx, self.rows.last()?.idx))
    }

    /// Inclusive column index bounds
    pub fn column_bounds(&self) -> Option<(usize, usize)> {
        Some((self.columns.first()?.idx, self.columns.last()?.idx))
    }

    pub fn contains(&self, location: &Location) -> bool {
        let (Some((top, bottom)), Some((left, right))) = (self.row_bounds(), self.column_bounds())
        else {
            return false;
        };
        (top..=bottom).contains(&location.row.idx) && (left..=right).contains(&location.column.idx)
    }

    pub fn intersects(&self, other: &Range) -> bool {
        let (Some(rows), Some(cols), Some(other_rows), Some(other_cols)) = (
            self.row_bounds(),
            self.column_bounds(),
            other.row_bounds(),
            other.column_bounds(),
        ) else {
            return false;
        };
        rows.0 <= other_rows.1
            && other_rows.0 <= rows.1
            && cols.0 <= other_cols.1
            && other_cols.0 <= cols.1
    }

    /// Every location in row-major order
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        self.rows.iter().flat_map(move |row| {
            self.columns
                .iter()
                .map(move |column| Location::new(row.clone(), column.clone()))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::Id;

    fn row(idx: usize) -> GridRow {
        GridRow {
            row_id: Id::from(format!("r{idx}")),
            idx,
            top: idx as f64 * 25.0,
            height: 25.0,
            reorderable: false,
            resizable: false,
            group_id: None,
        }
    }

    fn col(idx: usize) -> GridColumn {
        GridColumn {
            column_id: Id::from(format!("c{idx}")),
            idx,
            left: idx as f64 * 100.0,
            width: 100.0,
            reorderable: false,
            resizable: false,
        }
    }

    fn range(rows: std::ops::RangeInclusive<usize>, cols: std::ops::RangeInclusive<usize>) -> Range {
        Range::new(rows.map(row).collect(), cols.map(col).collect())
    }

    #[test]
    fn test_size_and_corners() {
        let r = range(1..=3, 2..=3);
        assert_eq!(r.width, 200.0);
        assert_eq!(r.height, 75.0);
        assert_eq!(r.first().unwrap().row.idx, 1);
        assert_eq!(r.last().unwrap().column.idx, 3);
        assert!(!r.is_degenerate());
    }

    #[test]
    fn test_contains() {
        let r = range(1..=3, 1..=3);
        assert!(r.contains(&Location::new(row(2), col(2))));
        assert!(r.contains(&Location::new(row(1), col(3))));
        assert!(!r.contains(&Location::new(row(0), col(2))));
        assert!(!r.contains(&Location::new(row(2), col(4))));
    }

    #[test]
    fn test_intersects() {
        let a = range(0..=2, 0..=2);
        assert!(a.intersects(&range(2..=4, 2..=4)));
        assert!(!a.intersects(&range(3..=4, 0..=2)));
        assert!(!a.intersects(&Range::default()));
    }

    #[test]
    fn test_single_is_degenerate() {
        let r = Range::single(&Location::new(row(4), col(1)));
        assert!(r.is_degenerate());
        assert_eq!(r.first(), r.last());
        assert_eq!(r.locations().count(), 1);
    }

    #[test]
    fn test_empty_range_has_no_corners() {
        let r = Range::new(vec![row(0)], vec![]);
        assert!(r.is_empty());
        assert!(r.first().is_none());
        assert_eq!(r.height, 25.0);
        assert!(!r.contains(&Location::new(row(0), col(0))));
    }
}
