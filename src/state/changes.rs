//! The change pipeline: template merge, queueing and the batched flush.

use std::sync::Arc;

use super::State;
use crate::error::Result;
use crate::layout::Location;
use crate::types::{Cell, CellChange, Compatible};

/// Queue an edit of the cell at `location`.
///
/// Unchanged cells and templates without an `update` are no-ops. The
/// template merges `incoming` into the current cell; the merge is queued
/// only when it differs and the result is editable.
///
/// # Errors
/// Fails when the cell at `location` cannot be resolved by its template.
pub fn try_append_change(state: State, location: &Location, incoming: Compatible) -> Result<State> {
    append(state, location, &incoming, false)
}

/// Like [`try_append_change`], but refuses when the incoming cell belongs
/// to a different cell group than the target.
///
/// # Errors
/// Fails when the cell at `location` cannot be resolved by its template.
pub fn try_append_change_having_group_id(
    state: State,
    location: &Location,
    incoming: Compatible,
) -> Result<State> {
    let target_group = state
        .cell_matrix
        .get_cell(location)
        .and_then(|cell| cell.group_id.clone());
    if target_group != incoming.group_id {
        tracing::warn!(
            row_id = %location.row.row_id,
            column_id = %location.column.column_id,
            "cell group mismatch, change skipped"
        );
        return Ok(state);
    }
    try_append_change(state, location, incoming)
}

/// Apply an edit at `location` and cascade it to the same column of every
/// row in the location's row group. Siblings are updated even when they are
/// `non_editable`.
///
/// # Errors
/// Fails when any cell in the group cannot be resolved by its template.
pub fn try_append_group_change(
    mut state: State,
    location: &Location,
    incoming: Compatible,
) -> Result<State> {
    state = append(state, location, &incoming, false)?;
    let matrix = Arc::clone(&state.cell_matrix);
    let Some(group) = location
        .row
        .group_id
        .as_ref()
        .and_then(|id| matrix.row_groups.get(id))
    else {
        return Ok(state);
    };
    for row in group.iter().filter(|row| row.idx != location.row.idx) {
        if let Some(sibling) = matrix.get_location(row.idx, location.column.idx) {
            state = append(state, &sibling, &incoming, true)?;
        }
    }
    Ok(state)
}

/// Write the empty text cell into every selected location
///
/// # Errors
/// Fails when a selected cell cannot be resolved by its template.
pub fn wipe_selected_ranges(mut state: State) -> Result<State> {
    let (empty, _) = state.cell_templates.compatible(&Cell::empty())?;
    let locations: Vec<Location> = state
        .selected_ranges
        .iter()
        .flat_map(|range| range.locations())
        .collect();
    for location in &locations {
        state = try_append_change(state, location, empty.clone())?;
    }
    Ok(state)
}

/// Drain the queue and notify the host once with the whole batch
pub fn handle_state_update(mut state: State) -> State {
    if state.queued_cell_changes.is_empty() {
        return state;
    }
    let changes = std::mem::take(&mut state.queued_cell_changes);
    tracing::debug!(count = changes.len(), "flushing cell changes");
    if let Some(notify) = state.callbacks().on_cells_changed {
        notify(&changes);
    }
    state
}

fn append(
    mut state: State,
    location: &Location,
    incoming: &Compatible,
    allow_non_editable: bool,
) -> Result<State> {
    let (previous, template) = state.get_compatible_cell_and_template(location)?;
    if template.cells_equal(&previous, incoming) {
        return Ok(state);
    }
    let Some(merged) = template.update(&previous, incoming) else {
        return Ok(state);
    };
    if template.cells_equal(&merged, &previous) {
        return Ok(state);
    }
    if merged.non_editable && !allow_non_editable {
        tracing::debug!(
            row_id = %location.row.row_id,
            column_id = %location.column.column_id,
            "change to non-editable cell discarded"
        );
        return Ok(state);
    }
    state.queued_cell_changes.push(CellChange {
        row_id: location.row.row_id.clone(),
        column_id: location.column.column_id.clone(),
        kind: merged.kind.clone(),
        previous_cell: previous,
        new_cell: merged,
    });
    Ok(state)
}
