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
        anchor: location.row.idx,
    };
    let row = &location.row;
    let incremental = event.selection_key();
    if incremental
        && state.selection_mode == SelectionMode::Row
        && state.selected_ids.contains(&row.row_id)
    {
        return Ok(selection::un_select_one_row(state, row));
    }
    if event.shift {
        if let Some(focused) = state.focused_location.clone() {
            return Ok(selection::select_multiple_rows(state, &focused.row, row, incremental));
        }
    }
    let state = focus::focus_location(state, location, false, None)?;
    Ok(selection::select_one_row(state, row, incremental))
}

pub(super) fn pointer_enter(
    event: &PointerEvent,
    location: &PointerLocation,
    state: State,
    gesture: &mut Gesture,
) -> State {
    let anchor = match gesture {
        Gesture::Lines { anchor } => *anchor,
        _ => location.row.idx,
    };
    let Some(first) = state.cell_matrix.rows.get(anchor).cloned() else {
        return state;
    };
    selection::select_multiple_rows(state, &first, &location.row, event.selection_key())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::layout::CellMatrixProps;
    use crate::state::GridProps;
    use crate::types::{Cell, Column, Id, Row};

    fn state() -> State {
        let columns = vec![Column::new("a"), Column::new("b")];
        let rows = (0..6)
            .map(|r| Row::new(format!("r{r}"), vec![Cell::text("x"), Cell::text("y")]))
            .collect();
        let props = GridProps::new(CellMatrixProps::new(columns, rows));
        State::default().derive_from_props(Rc::new(props)).unwrap()
    }

    fn at(s: &State, r: usize) -> PointerLocation {
        PointerLocation::at(s.cell_matrix.get_location(r, 0).unwrap())
    }

    #[test]
    fn test_drag_selects_rows_from_anchor() {
        let mut g = Gesture::Idle;
        let e = PointerEvent::new(0.0, 0.0);
        let s = state();
        let s = pointer_down(&e, &at(&s, 2), s, &mut g).unwrap();
        assert_eq!(g, Gesture::Lines { anchor: 2 });
        let s = pointer_enter(&e, &at(&s, 4), s, &mut g);
        let s = pointer_enter(&e, &at(&s, 1), s, &mut g);
        assert_eq!(s.selection_mode, SelectionMode::Row);
        assert_eq!(s.selected_ids, vec![Id::from("r1"), Id::from("r2")]);
        assert_eq!(s.selected_ranges[0].row_bounds(), Some((1, 2)));
    }

    #[test]
    fn test_ctrl_click_toggles_row() {
        let mut g = Gesture::Idle;
        let e = PointerEvent::new(0.0, 0.0);
        let ctrl = e.clone().with_ctrl();
        let s = state();
        let s = pointer_down(&e, &at(&s, 0), s, &mut g).unwrap();
        let s = pointer_down(&ctrl, &at(&s, 3), s, &mut g).unwrap();
        assert_eq!(s.selected_indexes, vec![0, 3]);
        let s = pointer_down(&ctrl, &at(&s, 3), s, &mut g).unwrap();
        assert_eq!(s.selected_indexes, vec![0]);
    }

    #[test]
    fn test_shift_click_uses_focus_row() {
        let mut g = Gesture::Idle;
        let e = PointerEvent::new(0.0, 0.0);
        let s = state();
        let s = pointer_down(&e, &at(&s, 4), s, &mut g).unwrap();
        let s = pointer_down(&e.clone().with_shift(), &at(&s, 1), s, &mut g).unwrap();
        assert_eq!(s.selected_indexes.len(), 4);
        assert_eq!(s.selected_ranges.len(), 1);
    }
}
