//! Dragging the fill handle at the corner of the active range.
//!
//! The fill extends in one direction only: whichever edge of the active
//! range the pointer has moved furthest past. On release the source cells
//! repeat along that direction until the fill range is covered.

use serde::Serialize;

use super::{reset_drag_visuals, FillGesture, Gesture};
use crate::error::Result;
use crate::layout::{CellMatrix, Location, PointerLocation, Range};
use crate::state::{changes, selection, State};
use crate::types::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FillDirection {
    Up,
    Down,
    Left,
    Right,
}

impl FillDirection {
    /// Fills that grow towards lower indexes
    fn is_backward(self) -> bool {
        matches!(self, Self::Up | Self::Left)
    }

    fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

pub(super) fn pointer_down(mut state: State, gesture: &mut Gesture) -> State {
    *gesture = Gesture::Fill(FillGesture::default());
    state.shadow_cursor = Cursor::Crosshair;
    state
}

pub(super) fn pointer_enter(location: &PointerLocation, state: State, gesture: &mut Gesture) -> State {
    let Gesture::Fill(fill) = gesture else {
        return state;
    };
    let Some(active) = state.active_selected_range() else {
        return state;
    };
    *fill = match direction(active, location) {
        Some(direction) => FillGesture {
            direction: Some(direction),
            fill_range: fill_range(&state.cell_matrix, active, location, direction),
        },
        None => FillGesture::default(),
    };
    state
}

/// Write the repeated source cells into the fill range, then grow the
/// active range over it.
///
/// # Errors
/// Fails when a source or target cell cannot be resolved by its template.
pub(super) fn pointer_up(mut state: State, gesture: &mut Gesture) -> Result<State> {
    let Gesture::Fill(FillGesture {
        direction: Some(direction),
        fill_range: Some(fill),
    }) = std::mem::take(gesture)
    else {
        return Ok(reset_drag_visuals(state));
    };
    let Some(active) = state.active_selected_range().cloned() else {
        return Ok(reset_drag_visuals(state));
    };

    for (sources, targets) in lines(&active, &fill, direction) {
        let cells = sources
            .iter()
            .map(|source| state.get_compatible_cell_and_template(source).map(|(cell, _)| cell))
            .collect::<Result<Vec<_>>>()?;
        for (target, cell) in targets.iter().zip(cells.iter().cycle()) {
            state = changes::try_append_change_having_group_id(state, target, cell.clone())?;
        }
    }
    tracing::debug!(
        ?direction,
        rows = fill.rows.len(),
        columns = fill.columns.len(),
        "filled range"
    );

    let corners = if direction.is_backward() {
        (fill.first(), active.last())
    } else {
        (active.first(), fill.last())
    };
    if let (Some(start), Some(end)) = corners {
        let extended = state.cell_matrix.get_range(&start, &end);
        state = selection::update_active_selected_range(state, extended);
    }
    Ok(reset_drag_visuals(selection::commit_selection(state)))
}

/// Edge of `active` the pointer overshoots the most, if any
fn direction(active: &Range, pointer: &PointerLocation) -> Option<FillDirection> {
    let (top, bottom) = (active.rows.first()?, active.rows.last()?);
    let (left, right) = (active.columns.first()?, active.columns.last()?);
    let candidates = [
        (FillDirection::Up, top.top - pointer.viewport_y),
        (FillDirection::Down, pointer.viewport_y - bottom.bottom()),
        (FillDirection::Left, left.left - pointer.viewport_x),
        (FillDirection::Right, pointer.viewport_x - right.right()),
    ];
    candidates
        .into_iter()
        .filter(|(_, overshoot)| *overshoot > 0.0)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(direction, _)| direction)
}

/// Cells between the active range and the pointer, across the range's
/// full width (vertical fills) or height (horizontal fills)
fn fill_range(
    matrix: &CellMatrix,
    active: &Range,
    pointer: &Location,
    direction: FillDirection,
) -> Option<Range> {
    let (r0, r1) = active.row_bounds()?;
    let (c0, c1) = active.column_bounds()?;
    let (row, column) = (pointer.row.idx, pointer.column.idx);
    let (start, end) = match direction {
        FillDirection::Up if row < r0 => ((row, c0), (r0 - 1, c1)),
        FillDirection::Down if row > r1 => ((r1 + 1, c0), (row, c1)),
        FillDirection::Left if column < c0 => ((r0, column), (r1, c0 - 1)),
        FillDirection::Right if column > c1 => ((r0, c1 + 1), (r1, column)),
        _ => return None,
    };
    let start = matrix.get_location(start.0, start.1)?;
    let end = matrix.get_location(end.0, end.1)?;
    Some(matrix.get_range(&start, &end))
}

/// Source and target locations per column (vertical) or row (horizontal),
/// both ordered outwards from the edge being filled
fn lines(active: &Range, fill: &Range, direction: FillDirection) -> Vec<(Vec<Location>, Vec<Location>)> {
    let backward = direction.is_backward();
    let ordered = |mut locations: Vec<Location>| {
        if backward {
            locations.reverse();
        }
        locations
    };
    if direction.is_vertical() {
        active
            .columns
            .iter()
            .map(|column| {
                let along = |range: &Range| {
                    range
                        .rows
                        .iter()
                        .map(|row| Location::new(row.clone(), column.clone()))
                        .collect()
                };
                (ordered(along(active)), ordered(along(fill)))
            })
            .collect()
    } else {
        active
            .rows
            .iter()
            .map(|row| {
                let along = |range: &Range| {
                    range
                        .columns
                        .iter()
                        .map(|column| Location::new(row.clone(), column.clone()))
                        .collect()
                };
                (ordered(along(active)), ordered(along(fill)))
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::layout::CellMatrixProps;
    use crate::state::{GridCallbacks, GridProps};
    use crate::types::{Cell, Column, Row};

    fn state(callbacks: GridCallbacks) -> State {
        let columns = (0..4).map(|c| Column::new(format!("c{c}"))).collect();
        let rows = (0..6)
            .map(|r| Row::new(format!("r{r}"), (0..4).map(|c| Cell::text(format!("{r}{c}"))).collect()))
            .collect();
        let props = GridProps::new(CellMatrixProps::new(columns, rows)).with_callbacks(callbacks);
        State::default().derive_from_props(Rc::new(props)).unwrap()
    }

    fn select(s: State, from: (usize, usize), to: (usize, usize)) -> State {
        let a = s.cell_matrix.get_location(from.0, from.1).unwrap();
        let b = s.cell_matrix.get_location(to.0, to.1).unwrap();
        let range = s.cell_matrix.get_range(&a, &b);
        selection::select_range(s, range, false)
    }

    fn at(s: &State, r: usize, c: usize) -> PointerLocation {
        PointerLocation::at(s.cell_matrix.get_location(r, c).unwrap())
    }

    fn written(s: &State) -> Vec<(String, String, String)> {
        s.queued_cell_changes
            .iter()
            .map(|c| (c.row_id.to_string(), c.column_id.to_string(), c.new_cell.text().to_string()))
            .collect()
    }

    #[test]
    fn test_fill_down_repeats_pattern() {
        let s = select(state(GridCallbacks::default()), (0, 1), (1, 1));
        let mut g = Gesture::Idle;
        let s = pointer_down(s, &mut g);
        let s = pointer_enter(&at(&s, 4, 1), s, &mut g);
        let Gesture::Fill(fill) = &g else {
            panic!("not filling");
        };
        assert_eq!(fill.direction, Some(FillDirection::Down));
        assert_eq!(fill.fill_range.as_ref().unwrap().row_bounds(), Some((2, 4)));

        let s = pointer_up(s, &mut g).unwrap();
        let got: Vec<_> = written(&s).into_iter().map(|(r, _, t)| (r, t)).collect();
        assert_eq!(
            got,
            vec![
                ("r2".to_string(), "01".to_string()),
                ("r3".to_string(), "11".to_string()),
                ("r4".to_string(), "01".to_string()),
            ]
        );
        assert_eq!(s.selected_ranges[0].row_bounds(), Some((0, 4)));
        assert_eq!(s.shadow_cursor, Cursor::Default);
        assert_eq!(g, Gesture::Idle);
    }

    #[test]
    fn test_fill_up_continues_backwards() {
        let s = select(state(GridCallbacks::default()), (3, 0), (4, 0));
        let mut g = Gesture::Idle;
        let s = pointer_down(s, &mut g);
        let s = pointer_enter(&at(&s, 0, 0), s, &mut g);
        let s = pointer_up(s, &mut g).unwrap();
        let got: Vec<_> = written(&s).into_iter().map(|(r, _, t)| (r, t)).collect();
        assert_eq!(
            got,
            vec![
                ("r2".to_string(), "40".to_string()),
                ("r1".to_string(), "30".to_string()),
                ("r0".to_string(), "40".to_string()),
            ]
        );
        assert_eq!(s.selected_ranges[0].row_bounds(), Some((0, 4)));
    }

    #[test]
    fn test_largest_overshoot_wins() {
        let s = select(state(GridCallbacks::default()), (1, 1), (1, 1));
        let mut g = Gesture::Idle;
        let s = pointer_down(s, &mut g);
        let s = pointer_enter(&at(&s, 2, 3), s, &mut g);
        let Gesture::Fill(fill) = &g else {
            panic!("not filling");
        };
        assert_eq!(fill.direction, Some(FillDirection::Right));
        let range = fill.fill_range.as_ref().unwrap();
        assert_eq!(range.column_bounds(), Some((2, 3)));
        assert_eq!(range.row_bounds(), Some((1, 1)));
        let _ = s;
    }

    #[test]
    fn test_back_inside_range_cancels() {
        let s = select(state(GridCallbacks::default()), (0, 0), (1, 1));
        let mut g = Gesture::Idle;
        let s = pointer_down(s, &mut g);
        let s = pointer_enter(&at(&s, 3, 0), s, &mut g);
        let s = pointer_enter(&at(&s, 1, 1), s, &mut g);
        let s = pointer_up(s, &mut g).unwrap();
        assert!(s.queued_cell_changes.is_empty());
        assert_eq!(s.selected_ranges[0].row_bounds(), Some((0, 1)));
    }

    #[test]
    fn test_vetoed_fill_drops_range_but_keeps_changes() {
        let s = select(state(GridCallbacks::default().on_selection_changing(|_| false)), (0, 0), (0, 0));
        let mut g = Gesture::Idle;
        let s = pointer_down(s, &mut g);
        let s = pointer_enter(&at(&s, 2, 0), s, &mut g);
        let s = pointer_up(s, &mut g).unwrap();
        assert_eq!(s.queued_cell_changes.len(), 2);
        assert!(s.selected_ranges.is_empty());
    }
}
