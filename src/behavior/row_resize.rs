use super::{reset_drag_visuals, Gesture, ResizeGesture};
use crate::layout::PointerLocation;
use crate::state::State;
use crate::types::{Cursor, Orientation, SelectionMode};

pub(super) fn pointer_down(
    location: &PointerLocation,
    mut state: State,
    gesture: &mut Gesture,
) -> State {
    let row = &location.row;
    *gesture = Gesture::Resize(ResizeGesture {
        idx: row.idx,
        id: row.row_id.clone(),
        start: row.top,
    });
    state.line_orientation = Orientation::Horizontal;
    state.line_position = Some(row.bottom());
    state.shadow_cursor = Cursor::RowResize;
    state
}

fn height_at(state: &State, resize: &ResizeGesture, y: f64) -> f64 {
    (y - resize.start).max(state.options.min_row_height)
}

pub(super) fn pointer_move(
    location: &PointerLocation,
    mut state: State,
    gesture: &mut Gesture,
) -> State {
    let Gesture::Resize(resize) = gesture else {
        return state;
    };
    let height = height_at(&state, resize, location.viewport_y);
    state.line_position = Some(resize.start + height);
    state
}

pub(super) fn pointer_up(
    location: &PointerLocation,
    state: State,
    gesture: &mut Gesture,
) -> State {
    let Gesture::Resize(resize) = std::mem::take(gesture) else {
        return reset_drag_visuals(state);
    };
    let height = height_at(&state, &resize, location.viewport_y);
    let selected: &[_] = if state.selection_mode == SelectionMode::Row {
        &state.selected_ids
    } else {
        &[]
    };
    tracing::debug!(row_id = %resize.id, height, "row resized");
    if let Some(notify) = state.callbacks().on_row_resized {
        notify(&resize.id, height, selected);
    }
    reset_drag_visuals(state)
}
