//! Keyboard handling between gestures.
//!
//! An open editor only reacts to Escape, Enter and Tab. Otherwise keys go,
//! in order, to select-all and wipe shortcuts, Tab/Enter cycling inside a
//! multi-cell selection, the focused cell's template, and navigation.

use std::sync::Arc;

use crate::error::Result;
use crate::events::{Key, KeyboardEvent};
use crate::layout::{CellMatrix, Location, Range};
use crate::state::{changes, focus, selection, State};
use crate::types::SelectionMode;

/// Row/column bounds of a rectangle, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bounds {
    top: usize,
    bottom: usize,
    left: usize,
    right: usize,
}

impl Bounds {
    fn of(range: &Range) -> Option<Self> {
        let (top, bottom) = range.row_bounds()?;
        let (left, right) = range.column_bounds()?;
        Some(Self {
            top,
            bottom,
            left,
            right,
        })
    }

    fn cell(row: usize, column: usize) -> Self {
        Self {
            top: row,
            bottom: row,
            left: column,
            right: column,
        }
    }

    fn len(&self) -> usize {
        (self.bottom - self.top + 1) * (self.right - self.left + 1)
    }
}

/// # Errors
/// Propagates failures of the focus and change transitions.
pub fn handle_key_down(event: &KeyboardEvent, state: State) -> Result<State> {
    if state.currently_edited_cell.is_some() {
        return editor_key(event, state);
    }
    let Some(focused) = state.focused_location.clone() else {
        return Ok(state);
    };

    if event.selection_key() && event.key == Key::Char('a') {
        return Ok(selection::select_all(state));
    }
    if matches!(event.key, Key::Delete | Key::Backspace) {
        return changes::wipe_selected_ranges(state);
    }
    if matches!(event.key, Key::Tab | Key::Enter) {
        if let Some(active) = state.active_selected_range().and_then(Bounds::of) {
            if active.len() > 1 {
                return cycle_in_selection(event, &focused, active, state);
            }
        }
    }
    let state = if event.key == Key::Tab {
        state
    } else {
        match template_key(event, &focused, state)? {
            Handled::Yes(state) => return Ok(state),
            Handled::No(state) => state,
        }
    };

    if event.shift && is_navigation(&event.key) {
        return Ok(extend_selection(event, &focused, state));
    }
    match event.key {
        Key::Tab => move_focus(state, &focused, &step_key(event, Key::ArrowRight, Key::ArrowLeft), false, None),
        Key::Enter => move_focus(state, &focused, &step_key(event, Key::ArrowDown, Key::ArrowUp), false, None),
        ref key if is_navigation(key) => move_focus(state, &focused, key, event.selection_key(), None),
        _ => Ok(state),
    }
}

fn is_navigation(key: &Key) -> bool {
    key.is_arrow() || matches!(key, Key::Home | Key::End | Key::PageUp | Key::PageDown)
}

/// Tab and Enter move forward, Shift reverses them
fn step_key(event: &KeyboardEvent, forward: Key, backward: Key) -> Key {
    if event.shift {
        backward
    } else {
        forward
    }
}

fn editor_key(event: &KeyboardEvent, mut state: State) -> Result<State> {
    match event.key {
        Key::Escape => {
            tracing::debug!("edit cancelled");
            state.currently_edited_cell = None;
            Ok(state)
        }
        Key::Enter | Key::Tab => {
            let (Some(focused), Some(edited)) = (
                state.focused_location.clone(),
                state.currently_edited_cell.take(),
            ) else {
                return Ok(state);
            };
            state = changes::try_append_group_change(state, &focused, edited)?;
            let step = if event.key == Key::Enter {
                step_key(event, Key::ArrowDown, Key::ArrowUp)
            } else {
                step_key(event, Key::ArrowRight, Key::ArrowLeft)
            };
            move_focus(state, &focused, &step, false, Some(&event.key))
        }
        _ => Ok(state),
    }
}

enum Handled {
    Yes(State),
    No(State),
}

/// Hand the key to the focused cell's template
fn template_key(event: &KeyboardEvent, focused: &Location, mut state: State) -> Result<Handled> {
    let (cell, template) = state.get_compatible_cell_and_template(focused)?;
    let outcome = template.handle_key_down(&cell, event);
    if outcome.enable_edit_mode {
        if cell.non_editable {
            return Ok(Handled::No(state));
        }
        state.currently_edited_cell = Some(outcome.cell);
        return Ok(Handled::Yes(state));
    }
    if template.cells_equal(&outcome.cell, &cell) {
        return Ok(Handled::No(state));
    }
    changes::try_append_group_change(state, focused, outcome.cell).map(Handled::Yes)
}

/// Move focus to the neighbour of the focused cell (or its span) in the
/// direction of `key`, resetting the selection.
fn move_focus(
    state: State,
    focused: &Location,
    key: &Key,
    to_corner: bool,
    cause: Option<&Key>,
) -> Result<State> {
    let matrix = Arc::clone(&state.cell_matrix);
    let span = selection::cell_range(&matrix, focused);
    let from = Bounds::of(&span).unwrap_or(Bounds::cell(focused.row.idx, focused.column.idx));
    let page = page_size(&state);
    let Some((row, column)) = step(&matrix, from, focused, key, to_corner, page) else {
        return Ok(state);
    };
    let Some(target) = matrix.get_location(row, column) else {
        return Ok(state);
    };
    if target.same_cell(&matrix.span_origin(focused)) {
        return Ok(state);
    }
    focus::focus_location(state, &target, true, cause)
}

/// Grow or shrink the active range by moving the corner opposite the focus
fn extend_selection(event: &KeyboardEvent, focused: &Location, state: State) -> State {
    if !state.options.enable_range_selection {
        return state;
    }
    let matrix = Arc::clone(&state.cell_matrix);
    let active = state
        .active_selected_range()
        .and_then(Bounds::of)
        .unwrap_or(Bounds::cell(focused.row.idx, focused.column.idx));
    let corner_row = if focused.row.idx == active.top { active.bottom } else { active.top };
    let corner_column = if focused.column.idx == active.left {
        active.right
    } else {
        active.left
    };
    let Some(corner) = matrix.get_location(corner_row, corner_column) else {
        return state;
    };
    let page = page_size(&state);
    let moved = step(
        &matrix,
        Bounds::cell(corner_row, corner_column),
        &corner,
        &event.key,
        event.selection_key(),
        page,
    )
    .and_then(|(row, column)| matrix.get_location(row, column));
    let Some(moved) = moved else {
        return state;
    };
    let range = matrix.get_range(focused, &moved);
    if state.selection_mode == SelectionMode::Range {
        selection::update_active_selected_range(state, range)
    } else {
        selection::select_range(state, range, false)
    }
}

/// Tab walks the active range row by row, Enter column by column, both
/// wrapping at the end. Focus moves, the selection stays.
fn cycle_in_selection(
    event: &KeyboardEvent,
    focused: &Location,
    active: Bounds,
    state: State,
) -> Result<State> {
    let rows = active.bottom - active.top + 1;
    let columns = active.right - active.left + 1;
    let total = active.len();
    let row = focused.row.idx.clamp(active.top, active.bottom) - active.top;
    let column = focused.column.idx.clamp(active.left, active.right) - active.left;
    let row_major = event.key == Key::Tab;
    let position = if row_major {
        row * columns + column
    } else {
        column * rows + row
    };
    let next = if event.shift {
        (position + total - 1) % total
    } else {
        (position + 1) % total
    };
    let (row, column) = if row_major {
        (next / columns, next % columns)
    } else {
        (next % rows, next / rows)
    };
    let Some(target) = state
        .cell_matrix
        .get_location(active.top + row, active.left + column)
    else {
        return Ok(state);
    };
    focus::focus_location(state, &target, false, Some(&event.key))
}

/// Rows a PageUp/PageDown jumps over
fn page_size(state: &State) -> usize {
    state
        .viewport
        .visible_rows(&state.cell_matrix)
        .map_or(1, |(first, last)| last - first + 1)
}

/// Target `(row, column)` of one navigation key from `from`, or `None`
/// at the matrix edge
fn step(
    matrix: &CellMatrix,
    from: Bounds,
    at: &Location,
    key: &Key,
    to_corner: bool,
    page: usize,
) -> Option<(usize, usize)> {
    let last_row = matrix.rows.len().checked_sub(1)?;
    let last_column = matrix.columns.len().checked_sub(1)?;
    let (row, column) = (at.row.idx, at.column.idx);
    let target = match key {
        Key::ArrowUp if to_corner => (0, column),
        Key::ArrowDown if to_corner => (last_row, column),
        Key::ArrowLeft if to_corner => (row, 0),
        Key::ArrowRight if to_corner => (row, last_column),
        Key::ArrowUp => (from.top.checked_sub(1)?, column),
        Key::ArrowDown => (from.bottom + 1, column),
        Key::ArrowLeft => (row, from.left.checked_sub(1)?),
        Key::ArrowRight => (row, from.right + 1),
        Key::Home if to_corner => (0, 0),
        Key::End if to_corner => (last_row, last_column),
        Key::Home => (row, 0),
        Key::End => (row, last_column),
        Key::PageUp => (row.saturating_sub(page), column),
        Key::PageDown => ((row + page).min(last_row), column),
        _ => return None,
    };
    (target.0 <= last_row && target.1 <= last_column).then_some(target)
}
