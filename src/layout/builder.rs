//! Staged construction of a [`CellMatrix`].
//!
//! Every stage reads the output of the one before it, so the stages are
//! only reachable through [`CellMatrixBuilder::build`], which runs them in
//! order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::cell_matrix::{
    cell_key, CellMatrix, GridColumn, GridRow, DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT,
    MIN_COLUMN_WIDTH,
};
use super::{Range, StickyRanges};
use crate::config::DEFAULT_STICKY_BREAKPOINT;
use crate::types::{Cell, Column, Row};

/// Host input the matrix is built from
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellMatrixProps {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    #[serde(default)]
    pub sticky_top_rows: usize,
    #[serde(default)]
    pub sticky_left_columns: usize,
    #[serde(default)]
    pub sticky_right_columns: usize,
    #[serde(default)]
    pub sticky_bottom_rows: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_column_width: Option<f64>,
}

impl CellMatrixProps {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_sticky(mut self, top: usize, left: usize, right: usize, bottom: usize) -> Self {
        self.sticky_top_rows = top;
        self.sticky_left_columns = left;
        self.sticky_right_columns = right;
        self.sticky_bottom_rows = bottom;
        self
    }
}

/// Sticky pane boundaries: `rows[..top]`, `rows[bottom..]`,
/// `columns[..left]`, `columns[right..]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edges {
    top: usize,
    bottom: usize,
    left: usize,
    right: usize,
}

/// Builds a [`CellMatrix`] from host rows/columns
pub struct CellMatrixBuilder<'a> {
    props: &'a CellMatrixProps,
    viewport: Option<(f64, f64)>,
    horizontal_breakpoint: f64,
    vertical_breakpoint: f64,
    matrix: CellMatrix,
}

impl<'a> CellMatrixBuilder<'a> {
    pub fn new(props: &'a CellMatrixProps) -> Self {
        Self {
            props,
            viewport: None,
            horizontal_breakpoint: DEFAULT_STICKY_BREAKPOINT,
            vertical_breakpoint: DEFAULT_STICKY_BREAKPOINT,
            matrix: CellMatrix::default(),
        }
    }

    /// Make sticky panes responsive to the given viewport size.
    ///
    /// Breakpoints are percentages of the viewport the sticky panes on one
    /// axis may use before they are dropped.
    #[must_use]
    pub fn responsive(
        mut self,
        viewport_width: f64,
        viewport_height: f64,
        horizontal_breakpoint: f64,
        vertical_breakpoint: f64,
    ) -> Self {
        self.viewport = Some((viewport_width, viewport_height));
        self.horizontal_breakpoint = horizontal_breakpoint;
        self.vertical_breakpoint = vertical_breakpoint;
        self
    }

    /// Run every stage in order
    pub fn build(mut self) -> CellMatrix {
        self.fill_rows_and_cols();
        self.fill_row_groups();
        self.set_ranges_to_render_lookup();
        let edges = self.sticky_edges();
        self.fill_sticky(edges);
        self.fill_scrollable_range(edges);
        self.set_edge_locations();
        tracing::debug!(
            rows = self.matrix.rows.len(),
            columns = self.matrix.columns.len(),
            spans = self.matrix.span_lookup.len(),
            groups = self.matrix.row_groups.len(),
            "cell matrix built"
        );
        self.matrix
    }

    fn fill_rows_and_cols(&mut self) {
        let min_width = self.props.min_column_width.unwrap_or(MIN_COLUMN_WIDTH);
        let matrix = &mut self.matrix;
        matrix.min_column_width = min_width;

        let mut left = 0.0;
        matrix.columns = Vec::with_capacity(self.props.columns.len());
        for (idx, column) in self.props.columns.iter().enumerate() {
            let width = column.width.unwrap_or(DEFAULT_COLUMN_WIDTH).max(min_width);
            if matrix
                .column_index_lookup
                .insert(column.column_id.clone(), idx)
                .is_some()
            {
                tracing::warn!(column_id = %column.column_id, "duplicate column id, last one wins");
            }
            matrix.columns.push(GridColumn {
                column_id: column.column_id.clone(),
                idx,
                left,
                width,
                reorderable: column.reorderable,
                resizable: column.resizable,
            });
            left += width;
        }
        matrix.width = left;

        let column_count = self.props.columns.len();
        let mut top = 0.0;
        matrix.rows = Vec::with_capacity(self.props.rows.len());
        matrix.cells = Vec::with_capacity(self.props.rows.len());
        for (idx, row) in self.props.rows.iter().enumerate() {
            let height = row.height.unwrap_or(DEFAULT_ROW_HEIGHT);
            if matrix
                .row_index_lookup
                .insert(row.row_id.clone(), idx)
                .is_some()
            {
                tracing::warn!(row_id = %row.row_id, "duplicate row id, last one wins");
            }
            matrix.rows.push(GridRow {
                row_id: row.row_id.clone(),
                idx,
                top,
                height,
                reorderable: row.reorderable,
                resizable: row.resizable,
                group_id: row.group_id.clone(),
            });
            let mut cells: Vec<Cell> = row.cells.iter().take(column_count).cloned().collect();
            if cells.len() < column_count {
                tracing::debug!(row_id = %row.row_id, "row has fewer cells than columns, padding");
                cells.resize_with(column_count, Cell::empty);
            }
            matrix.cells.push(cells);
            top += height;
        }
        matrix.height = top;
    }

    fn fill_row_groups(&mut self) {
        let matrix = &mut self.matrix;
        for row in &matrix.rows {
            if let Some(group_id) = &row.group_id {
                matrix
                    .row_groups
                    .entry(group_id.clone())
                    .or_default()
                    .push(row.clone());
            }
        }
    }

    fn set_ranges_to_render_lookup(&mut self) {
        let Some(last_row) = self.matrix.rows.len().checked_sub(1) else {
            return;
        };
        let Some(last_col) = self.matrix.columns.len().checked_sub(1) else {
            return;
        };
        let mut spans = Vec::new();
        for (row_idx, cells) in self.matrix.cells.iter().enumerate() {
            for (col_idx, cell) in cells.iter().enumerate() {
                if cell.colspan() > 1 || cell.rowspan() > 1 {
                    let end_row = (row_idx + cell.rowspan() - 1).min(last_row);
                    let end_col = (col_idx + cell.colspan() - 1).min(last_col);
                    spans.push((row_idx, col_idx, end_row, end_col));
                }
            }
        }

        for (row_idx, col_idx, end_row, end_col) in spans {
            let overlaps = (row_idx..=end_row).any(|r| {
                (col_idx..=end_col).any(|c| self.matrix.span_lookup.contains_key(&cell_key(r, c)))
            });
            if overlaps {
                tracing::warn!(row_idx, col_idx, "span overlaps an earlier span, ignored");
                continue;
            }
            let (Some(start), Some(end)) = (
                self.matrix.get_location(row_idx, col_idx),
                self.matrix.get_location(end_row, end_col),
            ) else {
                continue;
            };
            let range = Arc::new(self.matrix.get_range(&start, &end));
            for r in row_idx..=end_row {
                for c in col_idx..=end_col {
                    self.matrix
                        .span_lookup
                        .insert(cell_key(r, c), Arc::clone(&range));
                }
            }
        }
    }

    fn sticky_edges(&self) -> Edges {
        let row_count = self.matrix.rows.len();
        let column_count = self.matrix.columns.len();

        let mut top = self.props.sticky_top_rows.min(row_count);
        let mut bottom_count = self.props.sticky_bottom_rows.min(row_count - top);
        let mut left = self.props.sticky_left_columns.min(column_count);
        let mut right_count = self.props.sticky_right_columns.min(column_count - left);

        if let Some((viewport_width, viewport_height)) = self.viewport {
            let sticky_width: f64 = self
                .matrix
                .columns
                .iter()
                .take(left)
                .chain(self.matrix.columns.iter().rev().take(right_count))
                .map(|c| c.width)
                .sum();
            if left + right_count > 0
                && sticky_width > viewport_width * self.horizontal_breakpoint / 100.0
            {
                tracing::debug!(sticky_width, viewport_width, "sticky columns disabled");
                left = 0;
                right_count = 0;
            }

            let sticky_height: f64 = self
                .matrix
                .rows
                .iter()
                .take(top)
                .chain(self.matrix.rows.iter().rev().take(bottom_count))
                .map(|r| r.height)
                .sum();
            if top + bottom_count > 0
                && sticky_height > viewport_height * self.vertical_breakpoint / 100.0
            {
                tracing::debug!(sticky_height, viewport_height, "sticky rows disabled");
                top = 0;
                bottom_count = 0;
            }
        }

        Edges {
            top,
            bottom: row_count - bottom_count,
            left,
            right: column_count - right_count,
        }
    }

    fn fill_sticky(&mut self, edges: Edges) {
        let rows = &self.matrix.rows;
        let columns = &self.matrix.columns;
        let slice_rows = |a: usize, b: usize| rows.get(a..b).map(<[_]>::to_vec).unwrap_or_default();
        let slice_cols =
            |a: usize, b: usize| columns.get(a..b).map(<[_]>::to_vec).unwrap_or_default();

        self.matrix.ranges = StickyRanges {
            top: Range::new(slice_rows(0, edges.top), slice_cols(edges.left, edges.right)),
            left: Range::new(slice_rows(edges.top, edges.bottom), slice_cols(0, edges.left)),
            right: Range::new(
                slice_rows(edges.top, edges.bottom),
                slice_cols(edges.right, columns.len()),
            ),
            bottom: Range::new(
                slice_rows(edges.bottom, rows.len()),
                slice_cols(edges.left, edges.right),
            ),
        };
    }

    fn fill_scrollable_range(&mut self, edges: Edges) {
        let rows = self
            .matrix
            .rows
            .get(edges.top..edges.bottom)
            .map(<[_]>::to_vec)
            .unwrap_or_default();
        let columns = self
            .matrix
            .columns
            .get(edges.left..edges.right)
            .map(<[_]>::to_vec)
            .unwrap_or_default();
        self.matrix.scrollable_range = Range::new(rows, columns);
    }

    fn set_edge_locations(&mut self) {
        let matrix = &mut self.matrix;
        matrix.first = matrix.get_location(0, 0);
        matrix.last = matrix
            .rows
            .len()
            .checked_sub(1)
            .zip(matrix.columns.len().checked_sub(1))
            .and_then(|(r, c)| matrix.get_location(r, c));
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
    use crate::types::Id;

    fn props(rows: usize, cols: usize) -> CellMatrixProps {
        let columns = (0..cols).map(|c| Column::new(format!("c{c}"))).collect();
        let rows = (0..rows)
            .map(|r| Row::new(format!("r{r}"), (0..cols).map(|_| Cell::text("")).collect()))
            .collect();
        CellMatrixProps::new(columns, rows)
    }

    #[test]
    fn test_offsets_and_min_width() {
        let mut p = props(2, 3);
        p.columns[1].width = Some(10.0);
        p.rows[0].height = Some(40.0);
        let m = CellMatrixBuilder::new(&p).build();
        assert_eq!(m.columns[1].width, MIN_COLUMN_WIDTH);
        assert_eq!(m.columns[2].left, DEFAULT_COLUMN_WIDTH + MIN_COLUMN_WIDTH);
        assert_eq!(m.rows[1].top, 40.0);
        assert_eq!(m.height, 40.0 + DEFAULT_ROW_HEIGHT);
        assert_eq!(m.row_index_lookup[&Id::from("r1")], 1);
    }

    #[test]
    fn test_custom_min_column_width() {
        let mut p = props(1, 1);
        p.columns[0].width = Some(10.0);
        p.min_column_width = Some(5.0);
        let m = CellMatrixBuilder::new(&p).build();
        assert_eq!(m.columns[0].width, 10.0);
    }

    #[test]
    fn test_sticky_partition() {
        let p = props(5, 5).with_sticky(1, 1, 1, 1);
        let m = CellMatrixBuilder::new(&p).build();
        assert_eq!(m.ranges.top.rows.len(), 1);
        assert_eq!(m.ranges.top.columns.len(), 3);
        assert_eq!(m.ranges.left.rows.len(), 3);
        assert_eq!(m.ranges.left.columns.len(), 1);
        assert_eq!(m.ranges.bottom.rows[0].idx, 4);
        assert_eq!(m.ranges.right.columns[0].idx, 4);
        assert_eq!(m.scrollable_range.rows.len(), 3);
        assert_eq!(
            m.ranges.top.height + m.scrollable_range.height + m.ranges.bottom.height,
            m.height
        );
        assert_eq!(
            m.ranges.left.width + m.scrollable_range.width + m.ranges.right.width,
            m.width
        );
    }

    #[test]
    fn test_sticky_counts_are_clamped() {
        let p = props(2, 2).with_sticky(5, 5, 5, 5);
        let m = CellMatrixBuilder::new(&p).build();
        assert_eq!(m.ranges.top.rows.len(), 2);
        assert!(m.ranges.bottom.rows.is_empty());
        assert_eq!(m.ranges.left.columns.len(), 2);
        assert!(m.ranges.right.columns.is_empty());
        assert!(m.scrollable_range.is_empty());
    }

    #[test]
    fn test_responsive_sticky_drops_wide_panes() {
        let p = props(5, 5).with_sticky(1, 2, 0, 0);
        // two sticky columns are 300px, more than half of 400px
        let m = CellMatrixBuilder::new(&p)
            .responsive(400.0, 1000.0, 50.0, 50.0)
            .build();
        assert!(m.ranges.left.columns.is_empty());
        assert_eq!(m.ranges.top.rows.len(), 1);
        assert_eq!(m.scrollable_range.columns.len(), 5);
    }

    #[test]
    fn test_spans_share_one_range() {
        let mut p = props(4, 4);
        p.rows[1].cells[1] = Cell::text("merged").with_span(2, 2);
        let m = CellMatrixBuilder::new(&p).build();
        let a = m.range_at(1, 1).unwrap();
        let b = m.range_at(2, 2).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.rows.len(), 2);
        assert!(m.is_hidden_by_span(2, 1));
        assert!(!m.is_hidden_by_span(1, 1));
        assert!(m.range_at(0, 0).unwrap().is_degenerate());
    }

    #[test]
    fn test_disjoint_spans_each_keep_their_range() {
        let mut p = props(4, 4);
        p.rows[0].cells[0] = Cell::text("first").with_span(2, 2);
        p.rows[1].cells[2] = Cell::text("second").with_span(2, 2);
        p.rows[2].cells[0] = Cell::text("third").with_span(1, 2);
        let m = CellMatrixBuilder::new(&p).build();

        let first = m.range_at(0, 0).unwrap();
        assert!(Arc::ptr_eq(&first, &m.range_at(1, 1).unwrap()));
        assert!(Arc::ptr_eq(
            &m.range_at(1, 2).unwrap(),
            &m.range_at(2, 3).unwrap()
        ));
        assert_eq!(m.range_at(2, 0).unwrap().rows.len(), 2);
        assert_eq!(m.span_lookup.len(), 4 + 4 + 2);
    }

    #[test]
    fn test_overlap_keeps_every_key_of_a_span_on_one_range() {
        let mut p = props(3, 3);
        p.rows[0].cells[0] = Cell::text("a").with_span(2, 2);
        p.rows[1].cells[1] = Cell::text("b").with_span(2, 2);
        let m = CellMatrixBuilder::new(&p).build();
        assert_eq!(m.span_lookup.len(), 4);
        assert!(Arc::ptr_eq(
            &m.range_at(0, 0).unwrap(),
            &m.range_at(1, 1).unwrap()
        ));
        assert!(m.range_at(2, 2).unwrap().is_degenerate());
        assert!(m.range_at(1, 2).unwrap().is_degenerate());
    }

    #[test]
    fn test_span_clipped_at_bounds() {
        let mut p = props(2, 2);
        p.rows[1].cells[1] = Cell::text("x").with_span(5, 5);
        let m = CellMatrixBuilder::new(&p).build();
        assert!(m.range_at(1, 1).unwrap().is_degenerate());
    }

    #[test]
    fn test_row_groups_and_edges() {
        let mut p = props(4, 2);
        p.rows[1].group_id = Some(7.into());
        p.rows[2].group_id = Some(7.into());
        let m = CellMatrixBuilder::new(&p).build();
        assert_eq!(m.row_groups[&Id::from(7)].len(), 2);
        let loc = m.get_location(2, 0).unwrap();
        let group = m.get_selected_rows_by_location(&loc).unwrap();
        assert_eq!(group.rows.len(), 2);
        assert_eq!(group.columns.len(), 2);
        assert!(m
            .get_selected_rows_by_location(&m.get_location(0, 0).unwrap())
            .is_none());
        assert_eq!(m.last.as_ref().unwrap().row.idx, 3);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut p = props(1, 3);
        p.rows[0].cells.truncate(1);
        let m = CellMatrixBuilder::new(&p).build();
        assert_eq!(m.cells[0].len(), 3);
        assert_eq!(m.get_cell_at(0, 2), Some(&Cell::empty()));
    }

    #[test]
    fn test_empty_props() {
        let m = CellMatrixBuilder::new(&CellMatrixProps::default()).build();
        assert!(m.is_empty());
        assert!(m.first.is_none());
        assert!(m.last.is_none());
    }
}
