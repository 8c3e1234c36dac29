use super::{reset_drag_visuals, Gesture, ResizeGesture};
use crate::layout::PointerLocation;
use crate::state::State;
use crate::types::{Cursor, Orientation, SelectionMode};

pub(super) fn pointer_down(
    location: &PointerLocation,
    mut state: State,
    gesture: &mut Gesture,
) -> State {
    let column = &location.column;
    *gesture = Gesture::Resize(ResizeGesture {
        idx: column.idx,
        id: column.column_id.clone(),
        start: column.left,
    });
    state.line_orientation = Orientation::Vertical;
    state.line_position = Some(column.right());
    state.shadow_cursor = Cursor::ColResize;
    state
}

/// New width for a pointer at content x, never below the minimum
fn width_at(state: &State, resize: &ResizeGesture, x: f64) -> f64 {
    (x - resize.start).max(state.cell_matrix.min_column_width)
}

pub(super) fn pointer_move(
    location: &PointerLocation,
    mut state: State,
    gesture: &mut Gesture,
) -> State {
    let Gesture::Resize(resize) = gesture else {
        return state;
    };
    let width = width_at(&state, resize, location.viewport_x);
    state.line_position = Some(resize.start + width);
    state
}

/// Report the final width together with the selected columns
pub(super) fn pointer_up(
    location: &PointerLocation,
    state: State,
    gesture: &mut Gesture,
) -> State {
    let Gesture::Resize(resize) = std::mem::take(gesture) else {
        return reset_drag_visuals(state);
    };
    let width = width_at(&state, &resize, location.viewport_x);
    let selected: &[_] = if state.selection_mode == SelectionMode::Column {
        &state.selected_ids
    } else {
        &[]
    };
    tracing::debug!(column_id = %resize.id, width, "column resized");
    if let Some(notify) = state.callbacks().on_column_resized {
        notify(&resize.id, width, selected);
    }
    reset_drag_visuals(state)
}
