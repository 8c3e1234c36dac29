//! Tests for cell matrix geometry: sticky panes, spans, Id lookups and
//! location repair after rebuilds.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use cellgrid::{Cell, CellMatrixBuilder, CellMatrixProps, Column, GridError, Id, Row};
use common::{text_matrix, text_rows};
use proptest::prelude::*;

// ============================================================================
// Sticky panes
// ============================================================================

#[test]
fn test_sticky_frame_5x5() {
    let props = text_matrix(5, 5).with_sticky(1, 1, 1, 1);
    let matrix = CellMatrixBuilder::new(&props).build();

    let centre = matrix.get_location(2, 2).unwrap();
    assert!(matrix.scrollable_range.contains(&centre));
    assert_eq!(matrix.scrollable_range.row_bounds(), Some((1, 3)));
    assert_eq!(matrix.scrollable_range.column_bounds(), Some((1, 3)));

    assert_eq!(matrix.ranges.top.row_bounds(), Some((0, 0)));
    assert_eq!(matrix.ranges.top.column_bounds(), Some((1, 3)));
    assert_eq!(matrix.ranges.bottom.row_bounds(), Some((4, 4)));
    assert_eq!(matrix.ranges.left.column_bounds(), Some((0, 0)));
    assert_eq!(matrix.ranges.left.row_bounds(), Some((1, 3)));
    assert_eq!(matrix.ranges.right.column_bounds(), Some((4, 4)));

    // corners belong to no pane
    let corner = matrix.get_location(0, 0).unwrap();
    assert!(!matrix.ranges.top.contains(&corner));
    assert!(!matrix.ranges.left.contains(&corner));
    assert!(!matrix.scrollable_range.contains(&corner));
}

#[test]
fn test_responsive_breakpoint_drops_sticky_columns() {
    let props = text_matrix(10, 6).with_sticky(0, 2, 1, 0);
    // 3 sticky columns are 450px, more than half of 800px
    let matrix = CellMatrixBuilder::new(&props)
        .responsive(800.0, 600.0, 50.0, 50.0)
        .build();
    assert!(matrix.ranges.left.is_empty());
    assert!(matrix.ranges.right.is_empty());
    assert_eq!(matrix.scrollable_range.column_bounds(), Some((0, 5)));

    let matrix = CellMatrixBuilder::new(&props)
        .responsive(1000.0, 600.0, 50.0, 50.0)
        .build();
    assert_eq!(matrix.ranges.left.columns.len(), 2);
    assert_eq!(matrix.ranges.right.columns.len(), 1);
}

// ============================================================================
// Geometry
// ============================================================================

#[test]
fn test_offsets_and_min_width() {
    let columns = vec![
        Column::new("a").with_width(100.0),
        Column::new("b").with_width(10.0),
        Column::new("c"),
    ];
    let rows = vec![
        Row::new("r0", vec![]).with_height(30.0),
        Row::new("r1", vec![]),
    ];
    let matrix = CellMatrixBuilder::new(&CellMatrixProps::new(columns, rows)).build();

    let lefts: Vec<f64> = matrix.columns.iter().map(|c| c.left).collect();
    assert_eq!(lefts, vec![0.0, 100.0, 140.0]);
    assert_eq!(matrix.width, 290.0);
    assert_eq!(matrix.rows[1].top, 30.0);
    assert_eq!(matrix.height, 55.0);
    // short rows are padded with empty cells
    assert_eq!(matrix.get_cell_at(1, 2).unwrap(), &Cell::empty());
}

#[test]
fn test_span_shares_one_range() {
    let mut rows = text_rows(4, 4);
    rows[1].cells[1] = Cell::text("merged").with_span(2, 2);
    let matrix = CellMatrixBuilder::new(&CellMatrixProps::new(common::column_ids(4), rows)).build();

    let origin = matrix.range_at(1, 1).unwrap();
    let covered = matrix.range_at(2, 2).unwrap();
    assert_eq!(origin, covered);
    assert_eq!(origin.row_bounds(), Some((1, 2)));
    assert_eq!(origin.column_bounds(), Some((1, 2)));
    assert!(matrix.is_hidden_by_span(2, 1));
    assert!(!matrix.is_hidden_by_span(1, 1));
    assert!(matrix.range_at(0, 0).is_none());
}

#[test]
fn test_span_is_clipped_at_matrix_edge() {
    let mut rows = text_rows(3, 3);
    rows[1].cells[1] = Cell::text("wide").with_span(5, 5);
    let matrix = CellMatrixBuilder::new(&CellMatrixProps::new(common::column_ids(3), rows)).build();
    let span = matrix.range_at(2, 2).unwrap();
    assert_eq!(span.row_bounds(), Some((1, 2)));
    assert_eq!(span.column_bounds(), Some((1, 2)));
    assert_eq!(matrix.span_lookup.len(), 4);
}

#[test]
fn test_row_groups_collect_rows() {
    let rows: Vec<Row> = text_rows(5, 2)
        .into_iter()
        .enumerate()
        .map(|(i, row)| if i % 2 == 0 { row.with_group_id("even") } else { row })
        .collect();
    let matrix = CellMatrixBuilder::new(&CellMatrixProps::new(common::column_ids(2), rows)).build();
    let even: Vec<usize> = matrix.row_groups[&Id::from("even")].iter().map(|r| r.idx).collect();
    assert_eq!(even, vec![0, 2, 4]);

    let location = matrix.get_location(2, 1).unwrap();
    let group = matrix.get_selected_rows_by_location(&location).unwrap();
    assert_eq!(group.rows.len(), 3);
    assert_eq!(group.columns.len(), 2);
}

#[test]
fn test_unknown_id_is_an_error() {
    let matrix = CellMatrixBuilder::new(&text_matrix(2, 2)).build();
    let err = matrix
        .get_location_by_id(&Id::from("nope"), &Id::from("c0"))
        .unwrap_err();
    assert!(matches!(err, GridError::LocationNotFound { .. }));
}

#[test]
fn test_validate_location_after_rows_removed() {
    let before = CellMatrixBuilder::new(&text_matrix(6, 3)).build();
    let stale = before.get_location(5, 2).unwrap();

    // r5 is gone: the index clamps to the new last row
    let after = CellMatrixBuilder::new(&text_matrix(3, 3)).build();
    let repaired = after.validate_location(&stale).unwrap();
    assert_eq!((repaired.row.idx, repaired.column.idx), (2, 2));

    // an Id that survived wins over its old index
    let mut rows = text_rows(6, 3);
    rows.remove(0);
    let after = CellMatrixBuilder::new(&CellMatrixProps::new(common::column_ids(3), rows)).build();
    let kept = before.get_location(4, 1).unwrap();
    let repaired = after.validate_location(&kept).unwrap();
    assert_eq!(repaired.row.row_id, Id::from("r4"));
    assert_eq!(repaired.row.idx, 3);
}

#[test]
fn test_empty_matrix() {
    let matrix = CellMatrixBuilder::new(&CellMatrixProps::default()).build();
    assert!(matrix.is_empty());
    assert!(matrix.first.is_none());
    assert!(matrix.location_at(10.0, 10.0).is_none());
}

// ============================================================================
// Properties
// ============================================================================

fn dims() -> impl Strategy<Value = (usize, usize)> {
    (1usize..30, 1usize..10)
}

proptest! {
    #[test]
    fn prop_id_lookup_round_trips((rows, cols) in dims(), r in 0usize..30, c in 0usize..10) {
        let matrix = CellMatrixBuilder::new(&text_matrix(rows, cols)).build();
        prop_assume!(r < rows && c < cols);
        let location = matrix.get_location(r, c).unwrap();
        let found = matrix
            .get_location_by_id(&location.row.row_id, &location.column.column_id)
            .unwrap();
        prop_assert_eq!(found, location);
    }

    #[test]
    fn prop_get_range_ignores_corner_order(
        (rows, cols) in dims(),
        a in (0usize..30, 0usize..10),
        b in (0usize..30, 0usize..10),
    ) {
        let matrix = CellMatrixBuilder::new(&text_matrix(rows, cols)).build();
        prop_assume!(a.0 < rows && b.0 < rows && a.1 < cols && b.1 < cols);
        let start = matrix.get_location(a.0, a.1).unwrap();
        let end = matrix.get_location(b.0, b.1).unwrap();
        let forward = matrix.get_range(&start, &end);
        let backward = matrix.get_range(&end, &start);
        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(forward.rows.len(), a.0.abs_diff(b.0) + 1);
        prop_assert_eq!(forward.columns.len(), a.1.abs_diff(b.1) + 1);
        prop_assert!(forward.contains(&start) && forward.contains(&end));
    }

    #[test]
    fn prop_validate_location_is_idempotent(
        (rows, cols) in dims(),
        (new_rows, new_cols) in dims(),
        r in 0usize..30,
        c in 0usize..10,
    ) {
        let before = CellMatrixBuilder::new(&text_matrix(rows, cols)).build();
        prop_assume!(r < rows && c < cols);
        let stale = before.get_location(r, c).unwrap();

        let after = CellMatrixBuilder::new(&text_matrix(new_rows, new_cols)).build();
        let once = after.validate_location(&stale).unwrap();
        prop_assert!(once.row.idx < new_rows && once.column.idx < new_cols);
        let twice = after.validate_location(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_sticky_panes_partition_the_axes(
        (rows, cols) in dims(),
        top in 0usize..8,
        bottom in 0usize..8,
        left in 0usize..4,
        right in 0usize..4,
    ) {
        let props = text_matrix(rows, cols).with_sticky(top, left, right, bottom);
        let matrix = CellMatrixBuilder::new(&props).build();
        let ranges = &matrix.ranges;
        let scrollable = &matrix.scrollable_range;

        prop_assert_eq!(
            ranges.top.rows.len() + scrollable.rows.len() + ranges.bottom.rows.len(),
            rows
        );
        prop_assert_eq!(
            ranges.left.columns.len() + scrollable.columns.len() + ranges.right.columns.len(),
            cols
        );
        prop_assert_eq!(ranges.top.rows.len(), top.min(rows));
        prop_assert_eq!(ranges.left.columns.len(), left.min(cols));
        prop_assert_eq!(&ranges.left.rows, &scrollable.rows);
        prop_assert_eq!(&ranges.top.columns, &scrollable.columns);
    }
}
