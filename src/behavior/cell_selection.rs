use crate::error::Result;
use crate::events::PointerEvent;
use crate::layout::PointerLocation;
use crate::state::{focus, selection, State};
use crate::types::SelectionMode;

/// Shift extends from the focus anchor, ctrl/cmd starts another range,
/// a plain click moves focus.
pub(super) fn pointer_down(
    event: &PointerEvent,
    location: &PointerLocation,
    state: State,
) -> Result<State> {
    let range_selection = state.options.enable_range_selection;
    if range_selection && event.shift {
        if let Some(anchor) = &state.focused_location {
            let range = state.cell_matrix.get_range(anchor, location);
            return Ok(if event.selection_key() && state.selection_mode == SelectionMode::Range {
                selection::update_active_selected_range(state, range)
            } else {
                selection::select_range(state, range, false)
            });
        }
    }
    if range_selection && event.selection_key() {
        let range = selection::cell_range(&state.cell_matrix, location);
        let state = selection::select_range(state, range, true);
        return focus::focus_location(state, location, false, None);
    }
    focus::focus_location(state, location, true, None)
}

/// Dragging re-derives the active range from the focus anchor each time
pub(super) fn pointer_enter(location: &PointerLocation, state: State) -> State {
    if !state.options.enable_range_selection {
        return state;
    }
    let Some(anchor) = &state.focused_location else {
        return state;
    };
    let range = state.cell_matrix.get_range(anchor, location);
    if state.selection_mode == SelectionMode::Range {
        selection::update_active_selected_range(state, range)
    } else {
        selection::select_range(state, range, false)
    }
}
