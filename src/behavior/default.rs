use super::{BehaviorKind, Gesture};
use crate::error::Result;
use crate::events::{Key, KeyboardEvent, PointerEvent, PointerTarget, PointerType, RESIZE_HANDLE_WIDTH};
use crate::layout::PointerLocation;
use crate::state::State;
use crate::types::SelectionMode;

/// Behavior a pointer-down at `location` starts
pub fn pick_behavior(event: &PointerEvent, location: &PointerLocation, state: &State) -> BehaviorKind {
    let options = &state.options;
    let row = &location.row;
    let column = &location.column;
    let mouse = event.pointer_type == PointerType::Mouse;

    if mouse && row.idx == 0 && column.resizable && location.cell_x >= column.width - RESIZE_HANDLE_WIDTH {
        return BehaviorKind::ColumnResize;
    }
    if mouse && column.idx == 0 && row.resizable && location.cell_y >= row.height - RESIZE_HANDLE_WIDTH {
        return BehaviorKind::RowResize;
    }
    if options.enable_column_selection && row.idx == 0 {
        let selected = state.selection_mode == SelectionMode::Column
            && state.selected_ids.contains(&column.column_id);
        if selected && !event.selection_key() && column.reorderable {
            return BehaviorKind::ColumnReorder;
        }
        return BehaviorKind::ColumnSelection;
    }
    if options.enable_row_selection && column.idx == 0 {
        let selected =
            state.selection_mode == SelectionMode::Row && state.selected_ids.contains(&row.row_id);
        if selected && !event.selection_key() && row.reorderable {
            return BehaviorKind::RowReorder;
        }
        return BehaviorKind::RowSelection;
    }
    if event.target == PointerTarget::FillHandle && options.enable_fill_handle {
        return BehaviorKind::FillHandle;
    }
    BehaviorKind::CellSelection
}

/// Start a gesture: swap in the picked behavior with a fresh gesture
pub(super) fn pointer_down(
    event: &PointerEvent,
    location: &PointerLocation,
    mut state: State,
    gesture: &mut Gesture,
) -> Result<State> {
    let next = pick_behavior(event, location, &state);
    tracing::debug!(behavior = ?next, row = location.row.idx, column = location.column.idx, "gesture started");
    *gesture = Gesture::Idle;
    state.current_behavior = next;
    next.handle_pointer_down(event, location, state, gesture)
}

/// Double-click on the focused cell opens the editor when its template
/// allows it.
pub(super) fn double_click(
    event: &PointerEvent,
    location: &PointerLocation,
    mut state: State,
) -> Result<State> {
    let focused = state
        .focused_location
        .as_ref()
        .is_some_and(|f| f.same_cell(location));
    if !focused {
        return Ok(state);
    }
    let (cell, template) = state.get_compatible_cell_and_template(location)?;
    let key = KeyboardEvent {
        key: Key::Pointer,
        ctrl: event.ctrl,
        shift: event.shift,
        alt: event.alt,
        meta: event.meta,
        caps_lock: false,
    };
    let outcome = template.handle_key_down(&cell, &key);
    if outcome.enable_edit_mode && !cell.non_editable {
        state.currently_edited_cell = Some(outcome.cell);
    }
    Ok(state)
}

/// IME input finished on the focused cell
pub(super) fn composition_end(data: &str, mut state: State) -> Result<State> {
    if state.currently_edited_cell.is_some() {
        return Ok(state);
    }
    let Some(location) = state.focused_location.clone() else {
        return Ok(state);
    };
    let (cell, template) = state.get_compatible_cell_and_template(&location)?;
    if cell.non_editable || !template.is_focusable(&cell) {
        return Ok(state);
    }
    if let Some(outcome) = template.handle_composition_end(&cell, data) {
        if outcome.enable_edit_mode {
            state.currently_edited_cell = Some(outcome.cell);
        }
    }
    Ok(state)
}
