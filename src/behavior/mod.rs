//! Pointer and keyboard interaction modes.
//!
//! Exactly one [`BehaviorKind`] is current at a time. A pointer-down always
//! goes through [`BehaviorKind::Default`], which picks the behavior for the
//! new gesture; pointer-up hands control back to `Default`. Anything a
//! gesture needs to remember between its events lives in a [`Gesture`]
//! value that the dispatcher creates on pointer-down and drops on
//! pointer-up, so nothing carries over from one gesture to the next.

mod cell_selection;
mod column_reorder;
mod column_resize;
mod column_selection;
mod default;
mod fill_handle;
pub mod keyboard;
mod row_reorder;
mod row_resize;
mod row_selection;

use serde::Serialize;

use crate::error::Result;
use crate::events::{KeyboardEvent, PointerEvent};
use crate::layout::{Location, PointerLocation, Range};
use crate::state::{focus, ContextMenuRequest, MenuPosition, State};
use crate::types::{DropPosition, Id, SelectionMode};

pub use default::pick_behavior;
pub use fill_handle::FillDirection;

/// The interaction mode currently interpreting events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BehaviorKind {
    #[default]
    Default,
    CellSelection,
    RowSelection,
    ColumnSelection,
    RowReorder,
    ColumnReorder,
    ColumnResize,
    RowResize,
    FillHandle,
}

/// Row or column drag in progress
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderGesture {
    pub initial_idx: usize,
    /// Distance from the dragged block's leading edge to the pointer
    pub pointer_offset: f64,
    pub selected_ids: Vec<Id>,
    pub position: DropPosition,
    /// Last target the host accepted
    pub last_drop: Option<Location>,
}

/// Column or row resize in progress
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeGesture {
    pub idx: usize,
    pub id: Id,
    /// Leading edge of the resized column/row, content coordinates
    pub start: f64,
}

/// Fill handle drag in progress
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FillGesture {
    pub direction: Option<FillDirection>,
    pub fill_range: Option<Range>,
}

/// Data that lives from one pointer-down to the matching pointer-up
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Row or column selection drag, anchored at `anchor`
    Lines { anchor: usize },
    Reorder(ReorderGesture),
    Resize(ResizeGesture),
    Fill(FillGesture),
}

impl BehaviorKind {
    /// # Errors
    /// Propagates failures of the focus and change transitions.
    pub fn handle_pointer_down(
        self,
        event: &PointerEvent,
        location: &PointerLocation,
        state: State,
        gesture: &mut Gesture,
    ) -> Result<State> {
        match self {
            Self::Default => default::pointer_down(event, location, state, gesture),
            Self::CellSelection => cell_selection::pointer_down(event, location, state),
            Self::RowSelection => row_selection::pointer_down(event, location, state, gesture),
            Self::ColumnSelection => {
                column_selection::pointer_down(event, location, state, gesture)
            }
            Self::RowReorder => Ok(row_reorder::pointer_down(location, state, gesture)),
            Self::ColumnReorder => Ok(column_reorder::pointer_down(location, state, gesture)),
            Self::ColumnResize => Ok(column_resize::pointer_down(location, state, gesture)),
            Self::RowResize => Ok(row_resize::pointer_down(location, state, gesture)),
            Self::FillHandle => Ok(fill_handle::pointer_down(state, gesture)),
        }
    }

    /// Pointer moved. Called on every move of an active gesture.
    ///
    /// # Errors
    /// Propagates failures of the focus and change transitions.
    pub fn handle_pointer_move(
        self,
        _event: &PointerEvent,
        location: &PointerLocation,
        state: State,
        gesture: &mut Gesture,
    ) -> Result<State> {
        Ok(match self {
            Self::RowReorder => row_reorder::pointer_move(location, state, gesture),
            Self::ColumnReorder => column_reorder::pointer_move(location, state, gesture),
            Self::ColumnResize => column_resize::pointer_move(location, state, gesture),
            Self::RowResize => row_resize::pointer_move(location, state, gesture),
            _ => state,
        })
    }

    /// Pointer entered a different cell
    ///
    /// # Errors
    /// Propagates failures of the focus and change transitions.
    pub fn handle_pointer_enter(
        self,
        event: &PointerEvent,
        location: &PointerLocation,
        state: State,
        gesture: &mut Gesture,
    ) -> Result<State> {
        Ok(match self {
            Self::CellSelection => cell_selection::pointer_enter(location, state),
            Self::RowSelection => row_selection::pointer_enter(event, location, state, gesture),
            Self::ColumnSelection => {
                column_selection::pointer_enter(event, location, state, gesture)
            }
            Self::FillHandle => fill_handle::pointer_enter(location, state, gesture),
            _ => state,
        })
    }

    /// # Errors
    /// Propagates failures of the change pipeline (fill handle).
    pub fn handle_pointer_up(
        self,
        _event: &PointerEvent,
        location: &PointerLocation,
        state: State,
        gesture: &mut Gesture,
    ) -> Result<State> {
        match self {
            Self::Default => Ok(state),
            Self::CellSelection | Self::RowSelection | Self::ColumnSelection => {
                Ok(crate::state::selection::commit_selection(state))
            }
            Self::RowReorder => Ok(row_reorder::pointer_up(state, gesture)),
            Self::ColumnReorder => Ok(column_reorder::pointer_up(state, gesture)),
            Self::ColumnResize => Ok(column_resize::pointer_up(location, state, gesture)),
            Self::RowResize => Ok(row_resize::pointer_up(location, state, gesture)),
            Self::FillHandle => fill_handle::pointer_up(state, gesture),
        }
    }

    /// Keys are only interpreted between gestures
    ///
    /// # Errors
    /// Propagates failures of the focus and change transitions.
    pub fn handle_key_down(self, event: &KeyboardEvent, state: State) -> Result<State> {
        match self {
            Self::Default => keyboard::handle_key_down(event, state),
            _ => Ok(state),
        }
    }

    /// Tab and Enter are consumed on key-up; nothing else changes
    pub fn handle_key_up(self, _event: &KeyboardEvent, state: State) -> State {
        state
    }

    /// # Errors
    /// Propagates failures of the focus transition.
    pub fn handle_context_menu(
        self,
        event: &PointerEvent,
        location: Option<&PointerLocation>,
        state: State,
    ) -> Result<State> {
        context_menu(event, location, state)
    }

    /// # Errors
    /// Fails when the cell under the pointer cannot be resolved.
    pub fn handle_double_click(
        self,
        event: &PointerEvent,
        location: &PointerLocation,
        state: State,
    ) -> Result<State> {
        match self {
            Self::Default | Self::CellSelection => default::double_click(event, location, state),
            _ => Ok(state),
        }
    }

    /// # Errors
    /// Fails when the focused cell cannot be resolved.
    pub fn handle_composition_end(self, data: &str, state: State) -> Result<State> {
        match self {
            Self::Default => default::composition_end(data, state),
            _ => Ok(state),
        }
    }
}

/// Open the context menu at the pointer. Right-clicking outside the
/// current selection first moves focus there.
fn context_menu(
    event: &PointerEvent,
    location: Option<&PointerLocation>,
    mut state: State,
) -> Result<State> {
    if let Some(location) = location {
        let inside = state
            .selected_ranges
            .iter()
            .any(|range| range.contains(location));
        if !inside {
            state = focus::focus_location(state, location, true, None)?;
        }
    }
    let position = MenuPosition {
        top: event.client_y,
        left: event.client_x,
    };
    state.context_menu_position = Some(position);

    if let Some(notify) = state.callbacks().on_context_menu {
        let ids = |mode: SelectionMode| {
            if state.selection_mode == mode {
                state.selected_ids.clone()
            } else {
                Vec::new()
            }
        };
        notify(&ContextMenuRequest {
            selected_row_ids: ids(SelectionMode::Row),
            selected_column_ids: ids(SelectionMode::Column),
            selection_mode: state.selection_mode,
            position,
        });
    }
    Ok(state)
}

/// Clear the reorder/resize preview
pub(crate) fn reset_drag_visuals(mut state: State) -> State {
    state.line_position = None;
    state.shadow_position = None;
    state.shadow_size = 0.0;
    state.shadow_cursor = crate::types::Cursor::Default;
    state
}

/// Leading edge of a dragged block of `size` so that it stays inside `extent`
fn shadow_start(pointer: f64, offset: f64, size: f64, extent: f64) -> f64 {
    (pointer - offset).clamp(0.0, (extent - size).max(0.0))
}
