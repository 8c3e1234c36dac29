//! Tests for drag gestures driven through `Grid`: reordering, resizing and
//! the fill handle.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use cellgrid::{
    BehaviorKind, Cell, CellMatrixProps, Column, Cursor, DropPosition, Gesture, GridProps, Id,
    PointerEvent, PointerTarget, Row,
};
use common::{center, click, drag, focus_of, grid, options, text_props, text_rows, Recorder};

// ============================================================================
// Reorder
// ============================================================================

fn reorderable_props(recorder: &Recorder) -> GridProps {
    let rows = text_rows(8, 3).into_iter().map(Row::reorderable).collect();
    let columns = (0..3).map(|c| Column::new(format!("c{c}")).reorderable()).collect();
    GridProps::new(CellMatrixProps::new(columns, rows))
        .with_options(options(|o| {
            o.enable_row_selection = true;
            o.enable_column_selection = true;
        }))
        .with_callbacks(recorder.callbacks().can_reorder_rows(|_, _, _| true))
}

#[test]
fn test_row_reorder_notifies_once_on_release() {
    let recorder = Recorder::default();
    let mut g = grid(reorderable_props(&recorder));
    click(&mut g, &center(3, 0));
    assert_eq!(g.state().selected_ids, vec![Id::from("r3")]);

    g.pointer_down(&center(3, 0));
    assert_eq!(g.state().current_behavior, BehaviorKind::RowReorder);
    assert_eq!(g.state().shadow_cursor, Cursor::Grabbing);

    g.pointer_move(&center(2, 0));
    // upper half of row 1
    let target = PointerEvent::new(75.0, 25.0 + 5.0);
    g.pointer_move(&target);
    assert_eq!(g.state().line_position, Some(25.0));
    assert!(recorder.rows_reordered.borrow().is_empty());

    g.pointer_up(&target);
    assert_eq!(
        recorder.rows_reordered.borrow().as_slice(),
        &[(Id::from("r1"), vec![Id::from("r3")], DropPosition::Before)]
    );
    assert_eq!(g.state().current_behavior, BehaviorKind::Default);
    assert!(g.state().line_position.is_none());
    assert!(g.state().shadow_position.is_none());
}

#[test]
fn test_row_dropped_on_itself_is_silent() {
    let recorder = Recorder::default();
    let mut g = grid(reorderable_props(&recorder));
    click(&mut g, &center(3, 0));
    drag(&mut g, &center(3, 0), &[center(4, 0), center(3, 0)]);
    assert!(recorder.rows_reordered.borrow().is_empty());
}

#[test]
fn test_column_reorder_moves_selected_block() {
    let recorder = Recorder::default();
    let mut g = grid(reorderable_props(&recorder));
    click(&mut g, &center(0, 0));
    click(&mut g, &center(0, 1).with_shift());
    assert_eq!(g.state().selected_ids, vec![Id::from("c0"), Id::from("c1")]);

    drag(&mut g, &center(0, 0), &[center(0, 1), center(0, 2)]);
    assert_eq!(
        recorder.columns_reordered.borrow().as_slice(),
        &[(
            Id::from("c2"),
            vec![Id::from("c0"), Id::from("c1")],
            DropPosition::After
        )]
    );
}

// ============================================================================
// Resize
// ============================================================================

fn resizable_props(recorder: &Recorder) -> GridProps {
    let columns = (0..4).map(|c| Column::new(format!("c{c}")).resizable()).collect();
    let rows = text_rows(10, 4).into_iter().map(Row::resizable).collect();
    GridProps::new(CellMatrixProps::new(columns, rows)).with_callbacks(recorder.callbacks())
}

#[test]
fn test_column_resize_reports_width_on_release() {
    let recorder = Recorder::default();
    let mut g = grid(resizable_props(&recorder));

    // grip at the right edge of the c1 header
    g.pointer_down(&PointerEvent::new(150.0 + 145.0, 12.0));
    assert_eq!(g.state().current_behavior, BehaviorKind::ColumnResize);
    assert_eq!(g.state().line_position, Some(300.0));

    g.pointer_move(&PointerEvent::new(400.0, 12.0));
    assert_eq!(g.state().line_position, Some(400.0));
    assert!(recorder.column_resized.borrow().is_empty());
    g.pointer_up(&PointerEvent::new(400.0, 12.0));

    assert_eq!(
        recorder.column_resized.borrow().as_slice(),
        &[(Id::from("c1"), 250.0, vec![])]
    );
    assert!(g.state().line_position.is_none());
}

#[test]
fn test_column_resize_clamps_to_min_width() {
    let recorder = Recorder::default();
    let mut g = grid(resizable_props(&recorder));
    drag(
        &mut g,
        &PointerEvent::new(150.0 + 145.0, 12.0),
        &[PointerEvent::new(160.0, 12.0)],
    );
    assert_eq!(recorder.column_resized.borrow()[0].1, 40.0);
}

#[test]
fn test_touch_never_starts_resize() {
    let recorder = Recorder::default();
    let mut g = grid(resizable_props(&recorder));
    let touch = PointerEvent::new(150.0 + 145.0, 12.0).with_pointer_type(cellgrid::PointerType::Touch);
    g.pointer_down(&touch);
    assert_eq!(g.state().current_behavior, BehaviorKind::CellSelection);
    g.pointer_up(&touch);
    assert!(recorder.column_resized.borrow().is_empty());
}

#[test]
fn test_row_resize_reports_height() {
    let recorder = Recorder::default();
    let mut g = grid(resizable_props(&recorder));
    // grip at the bottom edge of r2 in the first column
    g.pointer_down(&PointerEvent::new(75.0, 50.0 + 20.0));
    assert_eq!(g.state().current_behavior, BehaviorKind::RowResize);
    g.pointer_move(&PointerEvent::new(75.0, 100.0));
    g.pointer_up(&PointerEvent::new(75.0, 100.0));
    assert_eq!(
        recorder.row_resized.borrow().as_slice(),
        &[(Id::from("r2"), 50.0, vec![])]
    );
}

// ============================================================================
// Fill handle
// ============================================================================

fn fill_props(recorder: &Recorder) -> GridProps {
    text_props(10, 3)
        .with_options(options(|o| o.enable_fill_handle = true))
        .with_callbacks(recorder.callbacks())
}

fn handle(r: usize, c: usize) -> PointerEvent {
    center(r, c).with_target(PointerTarget::FillHandle)
}

#[test]
fn test_fill_down_copies_source_in_one_batch() {
    let recorder = Recorder::default();
    let mut g = grid(fill_props(&recorder));
    click(&mut g, &center(0, 0));

    g.pointer_down(&handle(0, 0));
    assert_eq!(g.state().current_behavior, BehaviorKind::FillHandle);
    g.pointer_move(&center(3, 0));
    assert_eq!(g.fill_range().unwrap().row_bounds(), Some((1, 3)));
    g.pointer_up(&center(3, 0));

    assert_eq!(recorder.cells.borrow().len(), 1);
    let changes = recorder.all_changes();
    let written: Vec<(String, &str)> = changes
        .iter()
        .map(|c| (c.row_id.to_string(), c.new_cell.text()))
        .collect();
    assert_eq!(
        written,
        vec![
            ("r1".to_string(), "0:0"),
            ("r2".to_string(), "0:0"),
            ("r3".to_string(), "0:0"),
        ]
    );
    let active = g.state().active_selected_range().unwrap();
    assert_eq!(active.row_bounds(), Some((0, 3)));
    assert_eq!(g.gesture(), &Gesture::Idle);
    assert!(g.fill_range().is_none());
}

#[test]
fn test_fill_repeats_a_two_cell_pattern() {
    let recorder = Recorder::default();
    let mut g = grid(fill_props(&recorder));
    click(&mut g, &center(0, 1));
    click(&mut g, &center(1, 1).with_shift());

    drag(&mut g, &handle(1, 1), &[center(2, 1), center(5, 1)]);

    let changes = recorder.all_changes();
    let texts: Vec<&str> = changes.iter().map(|c| c.new_cell.text()).collect();
    assert_eq!(texts, vec!["0:1", "1:1", "0:1", "1:1"]);
    assert_eq!(focus_of(&g), Some((0, 1)));
}

#[test]
fn test_fill_released_inside_range_writes_nothing() {
    let recorder = Recorder::default();
    let mut g = grid(fill_props(&recorder));
    click(&mut g, &center(2, 2));
    drag(&mut g, &handle(2, 2), &[center(4, 2), center(2, 2)]);
    assert!(recorder.cells.borrow().is_empty());
    assert!(g.state().active_selected_range().unwrap().is_degenerate());
}

#[test]
fn test_fill_skips_cells_of_another_group() {
    let recorder = Recorder::default();
    let mut rows = text_rows(4, 1);
    rows[0].cells[0] = Cell::text("g").with_group_id("a");
    rows[2].cells[0] = Cell::text("h").with_group_id("a");
    let props = GridProps::new(CellMatrixProps::new(common::column_ids(1), rows))
        .with_options(options(|o| o.enable_fill_handle = true))
        .with_callbacks(recorder.callbacks());
    let mut g = grid(props);
    click(&mut g, &center(0, 0));
    drag(&mut g, &handle(0, 0), &[center(3, 0)]);

    let rows: Vec<String> = recorder
        .all_changes()
        .iter()
        .map(|c| c.row_id.to_string())
        .collect();
    assert_eq!(rows, vec!["r2".to_string()]);
}

#[test]
fn test_failed_fill_leaves_no_drag_visuals() {
    let recorder = Recorder::default();
    let mut rows = text_rows(4, 1);
    rows[2].cells[0] = Cell::new("sparkle");
    let props = GridProps::new(CellMatrixProps::new(common::column_ids(1), rows))
        .with_options(options(|o| o.enable_fill_handle = true))
        .with_callbacks(recorder.callbacks());
    let mut g = grid(props);
    click(&mut g, &center(0, 0));

    g.pointer_down(&handle(0, 0));
    assert_eq!(g.state().shadow_cursor, Cursor::Crosshair);
    g.pointer_move(&center(3, 0));
    g.pointer_up(&center(3, 0));

    assert!(recorder.cells.borrow().is_empty());
    assert!(g.state().active_selected_range().unwrap().is_degenerate());
    assert_eq!(g.state().shadow_cursor, Cursor::Default);
    assert_eq!(g.state().current_behavior, BehaviorKind::Default);
    assert_eq!(g.gesture(), &Gesture::Idle);
}
