//! Common test utilities: grid builders, pointer helpers and callback
//! recorders shared by the integration tests.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_precision_loss
)]

use std::cell::RefCell;
use std::rc::Rc;

use cellgrid::{
    Bounds, Cell, CellChange, CellMatrixProps, Column, DropPosition, Grid, GridCallbacks,
    GridOptions, GridProps, Id, PointerEvent, Row,
};

// ============================================================================
// Geometry
// ============================================================================

pub const ROW_HEIGHT: f64 = 25.0;
pub const COLUMN_WIDTH: f64 = 150.0;

/// Grid element placement used by every interactive test
pub fn bounds() -> Bounds {
    Bounds::new(0.0, 0.0, 800.0, 600.0)
}

/// Client point in the middle of cell `(r, c)` with default sizes and no scroll
pub fn center(r: usize, c: usize) -> PointerEvent {
    PointerEvent::new(
        c as f64 * COLUMN_WIDTH + COLUMN_WIDTH / 2.0,
        r as f64 * ROW_HEIGHT + ROW_HEIGHT / 2.0,
    )
}

// ============================================================================
// Props
// ============================================================================

pub fn column_ids(cols: usize) -> Vec<Column> {
    (0..cols).map(|c| Column::new(format!("c{c}"))).collect()
}

/// `rows` x `cols` text cells reading `"r:c"`
pub fn text_rows(rows: usize, cols: usize) -> Vec<Row> {
    (0..rows)
        .map(|r| {
            Row::new(
                format!("r{r}"),
                (0..cols).map(|c| Cell::text(format!("{r}:{c}"))).collect(),
            )
        })
        .collect()
}

pub fn text_matrix(rows: usize, cols: usize) -> CellMatrixProps {
    CellMatrixProps::new(column_ids(cols), text_rows(rows, cols))
}

pub fn text_props(rows: usize, cols: usize) -> GridProps {
    GridProps::new(text_matrix(rows, cols))
}

/// Interactive grid placed at [`bounds`]
pub fn grid(props: GridProps) -> Grid {
    let mut grid = Grid::new(props).unwrap();
    grid.set_bounds(bounds());
    grid
}

pub fn options(f: impl FnOnce(&mut GridOptions)) -> GridOptions {
    let mut options = GridOptions::default();
    f(&mut options);
    options
}

// ============================================================================
// Pointer gestures
// ============================================================================

pub fn click(grid: &mut Grid, event: &PointerEvent) {
    grid.pointer_down(event);
    grid.pointer_up(event);
}

/// Press at `from`, pass through every point of `path`, release at the last one
pub fn drag(grid: &mut Grid, from: &PointerEvent, path: &[PointerEvent]) {
    grid.pointer_down(from);
    for event in path {
        grid.pointer_move(event);
    }
    grid.pointer_up(path.last().unwrap_or(from));
}

/// `(row, column)` indexes of the focused cell
pub fn focus_of(grid: &Grid) -> Option<(usize, usize)> {
    grid.state()
        .focused_location
        .as_ref()
        .map(|l| (l.row.idx, l.column.idx))
}

// ============================================================================
// Callback recording
// ============================================================================

/// Records every notification a grid emits
#[derive(Clone, Default)]
pub struct Recorder {
    pub cells: Rc<RefCell<Vec<Vec<CellChange>>>>,
    pub selections: Rc<RefCell<usize>>,
    pub rows_reordered: Rc<RefCell<Vec<(Id, Vec<Id>, DropPosition)>>>,
    pub columns_reordered: Rc<RefCell<Vec<(Id, Vec<Id>, DropPosition)>>>,
    pub column_resized: Rc<RefCell<Vec<(Id, f64, Vec<Id>)>>>,
    pub row_resized: Rc<RefCell<Vec<(Id, f64, Vec<Id>)>>>,
}

impl Recorder {
    pub fn callbacks(&self) -> GridCallbacks {
        let cells = Rc::clone(&self.cells);
        let selections = Rc::clone(&self.selections);
        let rows = Rc::clone(&self.rows_reordered);
        let columns = Rc::clone(&self.columns_reordered);
        let column_resized = Rc::clone(&self.column_resized);
        let row_resized = Rc::clone(&self.row_resized);
        GridCallbacks::default()
            .on_cells_changed(move |c| cells.borrow_mut().push(c.to_vec()))
            .on_selection_changed(move |_| *selections.borrow_mut() += 1)
            .on_rows_reordered(move |target, ids, position| {
                rows.borrow_mut().push((target.clone(), ids.to_vec(), position));
            })
            .on_columns_reordered(move |target, ids, position| {
                columns
                    .borrow_mut()
                    .push((target.clone(), ids.to_vec(), position));
            })
            .on_column_resized(move |id, width, ids| {
                column_resized
                    .borrow_mut()
                    .push((id.clone(), width, ids.to_vec()));
            })
            .on_row_resized(move |id, height, ids| {
                row_resized.borrow_mut().push((id.clone(), height, ids.to_vec()));
            })
    }

    /// Every change of every batch, flattened
    pub fn all_changes(&self) -> Vec<CellChange> {
        self.cells.borrow().iter().flatten().cloned().collect()
    }
}
