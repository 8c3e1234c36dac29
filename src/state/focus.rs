//! Moving the focused cell.

use super::{changes, selection, State};
use crate::error::{GridError, Result};
use crate::events::Key;
use crate::layout::Location;

/// Move focus to `location`.
///
/// A pending edit is committed first, cascading over the row group, unless
/// the move was caused by Enter.
/// Cells that are neither focusable nor editable redirect focus to the first
/// editable row of their row group (or clear it). Otherwise the move is
/// refused, leaving focus where it was, when the template is not focusable,
/// the host vetoes it, or a pinned focus location forbids it.
///
/// # Errors
/// Fails when props are not set yet, the matrix is empty, or the cell at
/// the location cannot be resolved by its template.
pub fn focus_location(
    mut state: State,
    location: &Location,
    reset_selection: bool,
    key: Option<&Key>,
) -> Result<State> {
    if key != Some(&Key::Enter) {
        if let (Some(focused), Some(edited)) = (
            state.focused_location.clone(),
            state.currently_edited_cell.clone(),
        ) {
            state = changes::try_append_group_change(state, &focused, edited)?;
        }
    }

    let props = state.props.clone().ok_or(GridError::Uninitialized("props"))?;
    let matrix = std::sync::Arc::clone(&state.cell_matrix);
    let location = matrix
        .validate_location(location)
        .ok_or(GridError::EmptyMatrix)?;
    let location = matrix.span_origin(&location);

    let (cell, template) = state.get_compatible_cell_and_template(&location)?;
    let selected_row_groups: Vec<_> = matrix
        .get_selected_rows_by_location(&location)
        .into_iter()
        .collect();
    let focusable = template.is_focusable(&cell);

    if !focusable && cell.non_editable {
        let target = location.row.group_id.as_ref().and_then(|group_id| {
            matrix.row_groups.get(group_id)?.iter().find_map(|row| {
                let sibling = matrix.get_cell_at(row.idx, location.column.idx)?;
                if sibling.non_editable {
                    return None;
                }
                matrix.get_location(row.idx, location.column.idx)
            })
        });
        tracing::debug!(
            row_id = %location.row.row_id,
            column_id = %location.column.column_id,
            redirected = target.is_some(),
            "focus on disabled cell redirected"
        );
        if let (Some(target), Some(notify)) =
            (&target, &props.callbacks.on_focus_location_changed)
        {
            notify(&target.cell_location());
        }
        state.focused_location = target;
        state.selected_ranges.clear();
        state.active_selected_range_idx = 0;
        state.selected_row_groups = selected_row_groups;
        state.currently_edited_cell = None;
        return Ok(state);
    }

    if !focusable {
        return Ok(state);
    }

    let cell_location = location.cell_location();
    let allowed = props
        .callbacks
        .on_focus_location_changing
        .as_ref()
        .map_or(true, |veto| veto(&cell_location));
    if !allowed {
        tracing::debug!(row_id = %cell_location.row_id, column_id = %cell_location.column_id, "focus change vetoed");
        return Ok(state);
    }

    let stays = state
        .focused_location
        .as_ref()
        .is_some_and(|f| f.same_cell(&location));
    if !stays {
        if let Some(pinned) = &props.focus_location {
            let forced = matrix.get_location_by_cell(pinned)?;
            if !forced.same_cell(&location) {
                return Ok(state);
            }
        }
    }

    if let Some(notify) = &props.callbacks.on_focus_location_changed {
        notify(&cell_location);
    }
    if reset_selection {
        state = selection::reset_selection(state, &location);
    }
    state.focused_location = Some(location);
    state.selected_row_groups = selected_row_groups;
    state.context_menu_position = None;
    state.currently_edited_cell = None;
    Ok(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::layout::CellMatrixProps;
    use crate::state::{GridCallbacks, GridProps};
    use crate::types::{Cell, CellLocation, Column, Compatible, Id, Row};

    fn grid(rows: Vec<Row>, callbacks: GridCallbacks) -> State {
        let columns = vec![Column::new("a"), Column::new("b")];
        let props = GridProps::new(CellMatrixProps::new(columns, rows)).with_callbacks(callbacks);
        State::default().derive_from_props(Rc::new(props)).unwrap()
    }

    fn plain(id: &str) -> Row {
        Row::new(id, vec![Cell::text(id), Cell::text("")])
    }

    #[test]
    fn test_focus_resets_selection() {
        let state = grid(vec![plain("r0"), plain("r1")], GridCallbacks::default());
        let loc = state.cell_matrix.get_location(1, 1).unwrap();
        let state = focus_location(state, &loc, true, None).unwrap();
        assert!(state.focused_location.as_ref().unwrap().same_cell(&loc));
        assert_eq!(state.selected_ranges.len(), 1);
        assert!(state.selected_ranges[0].is_degenerate());
    }

    #[test]
    fn test_veto_leaves_state() {
        let state = grid(
            vec![plain("r0"), plain("r1")],
            GridCallbacks::default().on_focus_location_changing(|l| l.row_id != Id::from("r1")),
        );
        let loc = state.cell_matrix.get_location(1, 0).unwrap();
        let state = focus_location(state, &loc, true, None).unwrap();
        assert!(state.focused_location.is_none());
    }

    #[test]
    fn test_header_is_not_focusable() {
        let rows = vec![Row::new("h", vec![Cell::header("A"), Cell::header("B")]), plain("r1")];
        let state = grid(rows, GridCallbacks::default());
        let loc = state.cell_matrix.get_location(0, 0).unwrap();
        let state = focus_location(state, &loc, true, None).unwrap();
        assert!(state.focused_location.is_none());
    }

    #[test]
    fn test_disabled_cell_redirects_to_editable_group_row() {
        let rows = vec![
            plain("r0"),
            Row::new("g0", vec![Cell::text("x"), Cell::text("y")]).with_group_id(1),
            Row::new("g1", vec![Cell::disabled("x").non_editable(), Cell::text("y")]).with_group_id(1),
        ];
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let state = grid(
            rows,
            GridCallbacks::default().on_focus_location_changed(move |l: &CellLocation| {
                sink.borrow_mut().push(l.clone());
            }),
        );
        let loc = state.cell_matrix.get_location(2, 0).unwrap();
        let state = focus_location(state, &loc, true, None).unwrap();
        let focus = state.focused_location.as_ref().unwrap();
        assert_eq!(focus.row.row_id, Id::from("g0"));
        assert!(state.selected_ranges.is_empty());
        assert_eq!(state.selected_row_groups[0].rows.len(), 2);
        assert_eq!(seen.borrow().as_slice(), &[CellLocation::new("g0", "a")]);
    }

    #[test]
    fn test_disabled_cell_without_editable_sibling_clears_focus() {
        let rows = vec![
            plain("r0"),
            Row::new("g1", vec![Cell::disabled("x").non_editable(), Cell::text("y")]).with_group_id(1),
        ];
        let state = grid(rows, GridCallbacks::default());
        let first = state.cell_matrix.get_location(0, 0).unwrap();
        let state = focus_location(state, &first, true, None).unwrap();
        let loc = state.cell_matrix.get_location(1, 0).unwrap();
        let state = focus_location(state, &loc, true, None).unwrap();
        assert!(state.focused_location.is_none());
    }

    #[test]
    fn test_pinned_focus() {
        let mut props = GridProps::new(CellMatrixProps::new(
            vec![Column::new("a")],
            vec![plain("r0"), plain("r1"), plain("r2")],
        ));
        props.focus_location = Some(CellLocation::new("r1", "a"));
        let state = State::default().derive_from_props(Rc::new(props)).unwrap();

        let elsewhere = state.cell_matrix.get_location(2, 0).unwrap();
        let state = focus_location(state, &elsewhere, true, None).unwrap();
        assert!(state.focused_location.is_none());

        let pinned = state.cell_matrix.get_location(1, 0).unwrap();
        let state = focus_location(state, &pinned, true, None).unwrap();
        assert!(state.focused_location.as_ref().unwrap().same_cell(&pinned));
    }

    #[test]
    fn test_moving_focus_commits_edit() {
        let state = grid(vec![plain("r0"), plain("r1")], GridCallbacks::default());
        let loc = state.cell_matrix.get_location(0, 1).unwrap();
        let mut state = focus_location(state, &loc, true, None).unwrap();
        state.currently_edited_cell = Some(Compatible::new(Cell::text("typed"), "typed", f64::NAN));

        let next = state.cell_matrix.get_location(1, 1).unwrap();
        let state = focus_location(state, &next, true, None).unwrap();
        assert_eq!(state.queued_cell_changes.len(), 1);
        assert_eq!(state.queued_cell_changes[0].new_cell.text(), "typed");
        assert!(state.currently_edited_cell.is_none());
    }

    #[test]
    fn test_span_focus_lands_on_origin() {
        let rows = vec![
            Row::new("r0", vec![Cell::text("wide").with_span(2, 1), Cell::text("")]),
            plain("r1"),
        ];
        let state = grid(rows, GridCallbacks::default());
        let hidden = state.cell_matrix.get_location(0, 1).unwrap();
        let state = focus_location(state, &hidden, true, None).unwrap();
        assert_eq!(state.focused_location.as_ref().unwrap().column.idx, 0);
        assert_eq!(state.selected_ranges[0].columns.len(), 2);
    }
}
