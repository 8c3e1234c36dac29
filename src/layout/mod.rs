//! Grid geometry: the cell matrix, its builder and the viewport.
//!
//! This module handles:
//! - Pre-computing row/column offsets from widths and heights
//! - Partitioning rows/columns into sticky panes and the scrollable range
//! - Span and row-group lookups
//! - Binary search for efficient location lookup at content coordinates
//! - Viewport scroll state and hit testing

mod builder;
mod cell_matrix;
mod range;
mod viewport;

pub use builder::{CellMatrixBuilder, CellMatrixProps};
pub use cell_matrix::{
    cell_key, CellMatrix, GridColumn, GridRow, Location, MatrixSummary, PointerLocation, StickyRanges,
    DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT, MIN_COLUMN_WIDTH,
};
pub use range::Range;
pub use viewport::Viewport;
