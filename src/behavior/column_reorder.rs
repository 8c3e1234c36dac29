use super::{reset_drag_visuals, shadow_start, Gesture, ReorderGesture};
use crate::layout::{GridColumn, PointerLocation};
use crate::state::State;
use crate::types::{Cursor, DropPosition, Orientation};

/// Pick up the selected columns
pub(super) fn pointer_down(
    location: &PointerLocation,
    mut state: State,
    gesture: &mut Gesture,
) -> State {
    let mut indexes = state.selected_indexes.clone();
    indexes.sort_unstable();
    let mut columns: Vec<&GridColumn> = indexes
        .iter()
        .filter_map(|&i| state.cell_matrix.columns.get(i))
        .collect();
    if columns.is_empty() {
        columns.push(&location.column);
    }
    let before: f64 = columns
        .iter()
        .filter(|c| c.idx < location.column.idx)
        .map(|c| c.width)
        .sum();
    let size: f64 = columns.iter().map(|c| c.width).sum();
    let selected_ids = columns.iter().map(|c| c.column_id.clone()).collect();
    let pointer_offset = before + location.cell_x;

    state.line_orientation = Orientation::Vertical;
    state.shadow_size = size;
    state.shadow_cursor = Cursor::Grabbing;
    state.shadow_position = Some(shadow_start(
        location.viewport_x,
        pointer_offset,
        size,
        state.cell_matrix.width,
    ));
    *gesture = Gesture::Reorder(ReorderGesture {
        initial_idx: location.column.idx,
        pointer_offset,
        selected_ids,
        position: DropPosition::Before,
        last_drop: Some(location.location.clone()),
    });
    state
}

/// Columns only land before or after a target
pub(super) fn pointer_move(
    location: &PointerLocation,
    mut state: State,
    gesture: &mut Gesture,
) -> State {
    let Gesture::Reorder(drag) = gesture else {
        return state;
    };
    let width = state.cell_matrix.width;
    let shadow = shadow_start(location.viewport_x, drag.pointer_offset, state.shadow_size, width);
    let can_reorder = state.callbacks().can_reorder_columns;
    let accepted = can_reorder.as_ref().map_or(true, |can| {
        can(&location.column.column_id, &drag.selected_ids, drag.position)
    });
    if accepted {
        drag.last_drop = Some(location.location.clone());
    }

    let mut line = state.line_position;
    if let Some(drop) = drag
        .last_drop
        .as_ref()
        .filter(|d| d.column.idx != drag.initial_idx)
    {
        let right = drop.column.idx > drag.initial_idx;
        let edge = if right { drop.column.right() } else { drop.column.left };
        line = Some(edge.min(width));
        drag.position = if right { DropPosition::After } else { DropPosition::Before };
    }

    state.shadow_position = Some(shadow);
    state.line_position = line;
    state.shadow_cursor = Cursor::Grabbing;
    state
}

pub(super) fn pointer_up(state: State, gesture: &mut Gesture) -> State {
    let Gesture::Reorder(drag) = std::mem::take(gesture) else {
        return reset_drag_visuals(state);
    };
    if let Some(drop) = drag.last_drop.filter(|d| d.column.idx != drag.initial_idx) {
        tracing::debug!(target_id = %drop.column.column_id, moved = drag.selected_ids.len(), position = ?drag.position, "columns reordered");
        if let Some(notify) = state.callbacks().on_columns_reordered {
            notify(&drop.column.column_id, &drag.selected_ids, drag.position);
        }
    }
    reset_drag_visuals(state)
}
