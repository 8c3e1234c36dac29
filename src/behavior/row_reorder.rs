use super::{reset_drag_visuals, shadow_start, Gesture, ReorderGesture};
use crate::layout::{GridRow, PointerLocation};
use crate::state::State;
use crate::types::{Cursor, DropPosition, Orientation};

/// Pick up the selected rows. The pointer keeps its offset into the block.
pub(super) fn pointer_down(
    location: &PointerLocation,
    mut state: State,
    gesture: &mut Gesture,
) -> State {
    let mut indexes = state.selected_indexes.clone();
    indexes.sort_unstable();
    let mut rows: Vec<&GridRow> = indexes
        .iter()
        .filter_map(|&i| state.cell_matrix.rows.get(i))
        .collect();
    if rows.is_empty() {
        rows.push(&location.row);
    }
    let above: f64 = rows
        .iter()
        .filter(|r| r.idx < location.row.idx)
        .map(|r| r.height)
        .sum();
    let size: f64 = rows.iter().map(|r| r.height).sum();
    let selected_ids = rows.iter().map(|r| r.row_id.clone()).collect();
    let pointer_offset = above + location.cell_y;

    state.line_orientation = Orientation::Horizontal;
    state.shadow_size = size;
    state.shadow_cursor = Cursor::Grabbing;
    state.shadow_position = Some(shadow_start(
        location.viewport_y,
        pointer_offset,
        size,
        state.cell_matrix.height,
    ));
    *gesture = Gesture::Reorder(ReorderGesture {
        initial_idx: location.row.idx,
        pointer_offset,
        selected_ids,
        position: DropPosition::Before,
        last_drop: Some(location.location.clone()),
    });
    state
}

/// Move the shadow and work out where the rows would land.
///
/// A target the host refuses keeps the previous accepted one. With a
/// `can_reorder_rows` predicate, the half of the target row facing the
/// drag origin means "into" ([`DropPosition::On`]).
pub(super) fn pointer_move(
    location: &PointerLocation,
    mut state: State,
    gesture: &mut Gesture,
) -> State {
    let Gesture::Reorder(drag) = gesture else {
        return state;
    };
    let matrix = &state.cell_matrix;
    let shadow = shadow_start(
        location.viewport_y,
        drag.pointer_offset,
        state.shadow_size,
        matrix.height,
    );
    let can_reorder = state.callbacks().can_reorder_rows;
    let ids = drag.selected_ids.clone();
    let accepts = |target: &GridRow, position: DropPosition| {
        can_reorder
            .as_ref()
            .map_or(true, |can| can(&target.row_id, &ids, position))
    };

    if accepts(&location.row, drag.position) {
        drag.last_drop = Some(location.location.clone());
    }

    let mut cursor = Cursor::Grabbing;
    let mut line = state.line_position;
    if let Some(drop) = drag.last_drop.clone().filter(|d| d.row.idx != drag.initial_idx) {
        let down = drop.row.idx > drag.initial_idx;
        let edge = if down { drop.row.bottom() } else { drop.row.top };
        line = Some(edge.min(matrix.height));
        if can_reorder.is_none() {
            drag.position = if down { DropPosition::After } else { DropPosition::Before };
        } else if accepts(&drop.row, drag.position) {
            let y = location.viewport_y;
            let row = &location.row;
            let middle = row.top + row.height / 2.0;
            let into = if down {
                y > row.top && y < middle
            } else {
                y > middle && y < row.bottom()
            };
            if into {
                drag.position = DropPosition::On;
                cursor = Cursor::Move;
                line = None;
            } else {
                drag.position = if down { DropPosition::After } else { DropPosition::Before };
            }
        } else {
            line = None;
        }
    }

    state.shadow_position = Some(shadow);
    state.line_position = line;
    state.shadow_cursor = cursor;
    state
}

/// Drop: notify the host once if the rows would actually move
pub(super) fn pointer_up(state: State, gesture: &mut Gesture) -> State {
    let Gesture::Reorder(drag) = std::mem::take(gesture) else {
        return reset_drag_visuals(state);
    };
    if let Some(drop) = drag.last_drop.filter(|d| d.row.idx != drag.initial_idx) {
        tracing::debug!(target_id = %drop.row.row_id, moved = drag.selected_ids.len(), position = ?drag.position, "rows reordered");
        if let Some(notify) = state.callbacks().on_rows_reordered {
            notify(&drop.row.row_id, &drag.selected_ids, drag.position);
        }
    }
    reset_drag_visuals(state)
}
