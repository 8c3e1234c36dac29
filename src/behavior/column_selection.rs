use super::Gesture;
use crate::error::Result;
use crate::events::PointerEvent;
use crate::layout::PointerLocation;
use crate::state::{focus, selection, State};
use crate::types::SelectionMode;

pub(super) fn pointer_down(
    event: &PointerEvent,
    location: &PointerLocation,
    state: State,
    gesture: &mut Gesture,
) -> Result<State> {
    *gesture = Gesture::Lines {
        anchor: location.column.idx,
    };
    let column = &location.column;
    let incremental = event.selection_key();
    if incremental
        && state.selection_mode == SelectionMode::Column
        && state.selected_ids.contains(&column.column_id)
    {
        return Ok(selection::un_select_one_column(state, column));
    }
    if event.shift {
        if let Some(focused) = state.focused_location.clone() {
            return Ok(selection::select_multiple_columns(state, &focused.column, column, incremental));
        }
    }
    let state = focus::focus_location(state, location, false, None)?;
    Ok(selection::select_one_column(state, column, incremental))
}

pub(super) fn pointer_enter(
    event: &PointerEvent,
    location: &PointerLocation,
    state: State,
    gesture: &mut Gesture,
) -> State {
    let anchor = match gesture {
        Gesture::Lines { anchor } => *anchor,
        _ => location.column.idx,
    };
    let Some(first) = state.cell_matrix.columns.get(anchor).cloned() else {
        return state;
    };
    selection::select_multiple_columns(state, &first, &location.column, event.selection_key())
}
