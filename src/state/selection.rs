//! Range, row and column selection transitions.
//!
//! In row/column mode the Ids are authoritative; indexes and ranges are
//! re-derived from them whenever the matrix changes.

use std::sync::Arc;

use super::State;
use crate::layout::{CellMatrix, GridColumn, GridRow, Location, Range};
use crate::types::{Id, SelectionMode};

/// Select `range`. Incremental selection (ctrl/cmd) appends to the existing
/// range selection and makes the new range active.
pub fn select_range(mut state: State, range: Range, incremental: bool) -> State {
    let append = incremental && state.selection_mode == SelectionMode::Range;
    if !append {
        state.selected_ranges.clear();
    }
    state.active_selected_range_idx = state.selected_ranges.len();
    state.selected_ranges.push(range);
    state.selection_mode = SelectionMode::Range;
    state.selected_indexes.clear();
    state.selected_ids.clear();
    state
}

/// Replace the active range (shift-extend and drag)
pub fn update_active_selected_range(mut state: State, range: Range) -> State {
    match state.selected_ranges.get_mut(state.active_selected_range_idx) {
        Some(active) => *active = range,
        None => {
            state.active_selected_range_idx = state.selected_ranges.len();
            state.selected_ranges.push(range);
        }
    }
    state.selection_mode = SelectionMode::Range;
    state.selected_indexes.clear();
    state.selected_ids.clear();
    state
}

/// The cell at `location` as a range, grown to its span if it has one
pub fn cell_range(matrix: &CellMatrix, location: &Location) -> Range {
    matrix
        .range_at(location.row.idx, location.column.idx)
        .map_or_else(|| Range::single(location), |span| Range::clone(&span))
}

/// Collapse the selection to the cell (or span) at `location`
pub fn reset_selection(state: State, location: &Location) -> State {
    let range = cell_range(&state.cell_matrix, location);
    select_range(state, range, false)
}

/// Select the whole matrix
pub fn select_all(state: State) -> State {
    let range = state.cell_matrix.full_range();
    select_range(state, range, false)
}

pub fn select_one_row(state: State, row: &GridRow, incremental: bool) -> State {
    select_line(state, SelectionMode::Row, row.idx, &row.row_id, incremental)
}

pub fn select_one_column(state: State, column: &GridColumn, incremental: bool) -> State {
    select_line(
        state,
        SelectionMode::Column,
        column.idx,
        &column.column_id,
        incremental,
    )
}

pub fn un_select_one_row(state: State, row: &GridRow) -> State {
    unselect_line(state, row.idx)
}

pub fn un_select_one_column(state: State, column: &GridColumn) -> State {
    unselect_line(state, column.idx)
}

/// Select every row between `first` and `last` (inclusive, any order)
pub fn select_multiple_rows(
    state: State,
    first: &GridRow,
    last: &GridRow,
    incremental: bool,
) -> State {
    let matrix = Arc::clone(&state.cell_matrix);
    let (from, to) = ordered(first.idx, last.idx);
    let lines = matrix
        .rows
        .get(from..=to)
        .unwrap_or_default()
        .iter()
        .map(|r| (r.idx, r.row_id.clone()));
    select_lines(state, SelectionMode::Row, lines, last.idx, incremental)
}

/// Select every column between `first` and `last` (inclusive, any order)
pub fn select_multiple_columns(
    state: State,
    first: &GridColumn,
    last: &GridColumn,
    incremental: bool,
) -> State {
    let matrix = Arc::clone(&state.cell_matrix);
    let (from, to) = ordered(first.idx, last.idx);
    let lines = matrix
        .columns
        .get(from..=to)
        .unwrap_or_default()
        .iter()
        .map(|c| (c.idx, c.column_id.clone()));
    select_lines(state, SelectionMode::Column, lines, last.idx, incremental)
}

/// Recompute indexes and ranges from the selected Ids after a rebuild.
/// Ids that no longer exist are dropped.
pub fn rederive_from_ids(mut state: State) -> State {
    let matrix = Arc::clone(&state.cell_matrix);
    let lookup = match state.selection_mode {
        SelectionMode::Row => &matrix.row_index_lookup,
        SelectionMode::Column => &matrix.column_index_lookup,
        SelectionMode::Range => return state,
    };
    let (ids, indexes): (Vec<Id>, Vec<usize>) = state
        .selected_ids
        .iter()
        .filter_map(|id| lookup.get(id).map(|&idx| (id.clone(), idx)))
        .unzip();
    state.selected_ids = ids;
    state.selected_indexes = indexes;
    let focus = state.selected_indexes.last().copied();
    derive_line_ranges(state, focus)
}

/// Forget every selection (ranges, rows and columns)
pub fn clear_selections(mut state: State) -> State {
    state.selected_ranges.clear();
    state.selected_indexes.clear();
    state.selected_ids.clear();
    state.active_selected_range_idx = 0;
    state
}

/// Ask the host whether the finished selection may stand.
///
/// A veto drops the active range; otherwise `on_selection_changed` fires.
pub fn commit_selection(mut state: State) -> State {
    let callbacks = state.callbacks();
    let allowed = callbacks
        .on_selection_changing
        .as_ref()
        .map_or(true, |veto| veto(&state.selected_ranges));
    if allowed {
        if let Some(notify) = &callbacks.on_selection_changed {
            notify(&state.selected_ranges);
        }
        return state;
    }
    tracing::debug!(
        ranges = state.selected_ranges.len(),
        "selection vetoed, dropping active range"
    );
    if state.active_selected_range_idx < state.selected_ranges.len() {
        state.selected_ranges.remove(state.active_selected_range_idx);
    }
    state.active_selected_range_idx = state.selected_ranges.len().saturating_sub(1);
    state
}

fn select_line(
    state: State,
    mode: SelectionMode,
    idx: usize,
    id: &Id,
    incremental: bool,
) -> State {
    select_lines(state, mode, std::iter::once((idx, id.clone())), idx, incremental)
}

fn select_lines(
    mut state: State,
    mode: SelectionMode,
    lines: impl Iterator<Item = (usize, Id)>,
    focus: usize,
    incremental: bool,
) -> State {
    if !(incremental && state.selection_mode == mode) {
        state.selected_indexes.clear();
        state.selected_ids.clear();
    }
    for (idx, id) in lines {
        if !state.selected_indexes.contains(&idx) {
            state.selected_indexes.push(idx);
            state.selected_ids.push(id);
        }
    }
    state.selection_mode = mode;
    derive_line_ranges(state, Some(focus))
}

fn unselect_line(mut state: State, idx: usize) -> State {
    if let Some(pos) = state.selected_indexes.iter().position(|&i| i == idx) {
        state.selected_indexes.remove(pos);
        if pos < state.selected_ids.len() {
            state.selected_ids.remove(pos);
        }
    }
    let focus = state.selected_indexes.last().copied();
    derive_line_ranges(state, focus)
}

/// Turn selected indexes into one range per contiguous run. The range
/// containing `focus` becomes active.
fn derive_line_ranges(mut state: State, focus: Option<usize>) -> State {
    let mut sorted = state.selected_indexes.clone();
    sorted.sort_unstable();
    sorted.dedup();

    let matrix: &CellMatrix = &state.cell_matrix;
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for idx in sorted {
        match runs.last_mut() {
            Some((_, end)) if *end + 1 == idx => *end = idx,
            _ => runs.push((idx, idx)),
        }
    }
    let ranges: Vec<Range> = runs
        .iter()
        .map(|&(from, to)| match state.selection_mode {
            SelectionMode::Column => matrix.columns_range(from, to),
            _ => matrix.rows_range(from, to),
        })
        .collect();
    state.active_selected_range_idx = focus
        .and_then(|f| runs.iter().position(|&(from, to)| (from..=to).contains(&f)))
        .unwrap_or_else(|| ranges.len().saturating_sub(1));
    state.selected_ranges = ranges;
    state
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::cell::Cell as Counter;
    use std::rc::Rc;

    use super::*;
    use crate::layout::CellMatrixProps;
    use crate::state::{GridCallbacks, GridProps};
    use crate::types::{Cell, Column, Row};

    fn state(rows: usize, callbacks: GridCallbacks) -> State {
        let columns = vec![Column::new("a"), Column::new("b"), Column::new("c")];
        let rows = (0..rows)
            .map(|r| Row::new(format!("r{r}"), vec![Cell::text("1"), Cell::text("2"), Cell::text("3")]))
            .collect();
        let props = GridProps::new(CellMatrixProps::new(columns, rows)).with_callbacks(callbacks);
        State::default().derive_from_props(Rc::new(props)).unwrap()
    }

    fn loc(s: &State, r: usize, c: usize) -> Location {
        s.cell_matrix.get_location(r, c).unwrap()
    }

    #[test]
    fn test_incremental_range_appends() {
        let s = state(5, GridCallbacks::default());
        let a = Range::single(&loc(&s, 0, 0));
        let b = Range::single(&loc(&s, 3, 2));
        let s = select_range(s, a, false);
        let s = select_range(s, b.clone(), true);
        assert_eq!(s.selected_ranges.len(), 2);
        assert_eq!(s.active_selected_range_idx, 1);
        assert_eq!(s.active_selected_range(), Some(&b));

        let c = Range::single(&loc(&s, 1, 1));
        let s = select_range(s, c, false);
        assert_eq!(s.selected_ranges.len(), 1);
        assert_eq!(s.active_selected_range_idx, 0);
    }

    #[test]
    fn test_update_active_replaces_only_active() {
        let s = state(5, GridCallbacks::default());
        let s = select_range(s.clone(), Range::single(&loc(&s, 0, 0)), false);
        let s = select_range(s.clone(), Range::single(&loc(&s, 4, 0)), true);
        let grown = s.cell_matrix.get_range(&loc(&s, 4, 0), &loc(&s, 2, 2));
        let s = update_active_selected_range(s, grown.clone());
        assert_eq!(s.selected_ranges.len(), 2);
        assert_eq!(s.selected_ranges[1], grown);
        assert!(s.selected_ranges[0].is_degenerate());
    }

    #[test]
    fn test_row_runs_become_ranges() {
        let s = state(6, GridCallbacks::default());
        let rows = s.cell_matrix.rows.clone();
        let s = select_one_row(s, &rows[1], false);
        let s = select_one_row(s, &rows[2], true);
        let s = select_one_row(s, &rows[4], true);
        assert_eq!(s.selection_mode, SelectionMode::Row);
        assert_eq!(s.selected_ids, vec![Id::from("r1"), Id::from("r2"), Id::from("r4")]);
        assert_eq!(s.selected_ranges.len(), 2);
        assert_eq!(s.selected_ranges[0].rows.len(), 2);
        assert_eq!(s.selected_ranges[0].columns.len(), 3);
        assert_eq!(s.active_selected_range_idx, 1);

        let s = un_select_one_row(s, &rows[2]);
        assert_eq!(s.selected_indexes, vec![1, 4]);
        assert_eq!(s.selected_ranges.len(), 2);
    }

    #[test]
    fn test_multiple_columns_in_reverse() {
        let s = state(2, GridCallbacks::default());
        let cols = s.cell_matrix.columns.clone();
        let s = select_multiple_columns(s, &cols[2], &cols[0], false);
        assert_eq!(s.selection_mode, SelectionMode::Column);
        assert_eq!(s.selected_indexes, vec![0, 1, 2]);
        assert_eq!(s.selected_ranges.len(), 1);
        assert_eq!(s.selected_ranges[0].rows.len(), 2);
    }

    #[test]
    fn test_range_select_clears_line_ids() {
        let s = state(3, GridCallbacks::default());
        let rows = s.cell_matrix.rows.clone();
        let s = select_one_row(s, &rows[0], false);
        let r = Range::single(&loc(&s, 1, 1));
        let s = select_range(s, r, true);
        assert_eq!(s.selection_mode, SelectionMode::Range);
        assert!(s.selected_ids.is_empty());
        assert_eq!(s.selected_ranges.len(), 1);
    }

    #[test]
    fn test_veto_drops_active_range() {
        let s = state(4, GridCallbacks::default().on_selection_changing(|ranges| ranges.len() < 2));
        let s = select_range(s.clone(), Range::single(&loc(&s, 0, 0)), false);
        let s = commit_selection(s);
        assert_eq!(s.selected_ranges.len(), 1);

        let s = select_range(s.clone(), Range::single(&loc(&s, 2, 2)), true);
        let s = commit_selection(s);
        assert_eq!(s.selected_ranges.len(), 1);
        assert_eq!(s.active_selected_range_idx, 0);
    }

    #[test]
    fn test_commit_notifies() {
        let calls = Rc::new(Counter::new(0));
        let seen = Rc::clone(&calls);
        let s = state(2, GridCallbacks::default().on_selection_changed(move |_| seen.set(seen.get() + 1)));
        let s = select_all(s);
        let s = commit_selection(s);
        assert_eq!(calls.get(), 1);
        assert_eq!(s.selected_ranges[0].rows.len(), 2);
    }

    #[test]
    fn test_clear_selections() {
        let s = state(3, GridCallbacks::default());
        let rows = s.cell_matrix.rows.clone();
        let s = clear_selections(select_one_row(s, &rows[1], false));
        assert!(s.selected_ranges.is_empty());
        assert!(s.selected_ids.is_empty());
        assert!(s.selected_indexes.is_empty());
    }
}
