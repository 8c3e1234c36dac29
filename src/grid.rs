//! `Grid`: the entry point hosts drive.
//!
//! The grid owns the session [`State`] and the live [`Gesture`], turns
//! client coordinates into matrix locations, routes every event to the
//! current behavior and afterwards:
//! - keeps the previous state when a handler fails (the error is logged)
//! - flushes queued cell changes to `on_cells_changed` in one batch
//! - scrolls a newly focused cell or an opened editor into view

use std::rc::Rc;

use serde::Serialize;

use crate::behavior::{reset_drag_visuals, BehaviorKind, Gesture};
use crate::error::{GridError, Result};
use crate::events::{KeyboardEvent, PointerEvent};
use crate::layout::{Location, PointerLocation, Range};
use crate::state::clipboard::{self, ClipboardPayload};
use crate::state::{changes, focus, selection, Bounds, GridProps, MenuPosition, State};
use crate::templates::CellTemplates;
use crate::types::{CellLocation, Compatible, Cursor, Id, SelectionMode};

/// What a host renders from, in plain serializable form
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub behavior: BehaviorKind,
    pub focused_location: Option<CellLocation>,
    pub selection_mode: SelectionMode,
    /// Selected cells, one list per range
    pub selected_ranges: Vec<Vec<CellLocation>>,
    pub active_selected_range_idx: usize,
    pub selected_ids: Vec<Id>,
    pub currently_edited_cell: Option<Compatible>,
    pub context_menu_position: Option<MenuPosition>,
    pub line_position: Option<f64>,
    pub shadow_position: Option<f64>,
    pub shadow_cursor: Cursor,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

/// Interactive grid session
#[derive(Debug)]
pub struct Grid {
    state: State,
    gesture: Gesture,
    /// Cell the pointer was last seen over during a gesture
    hovered: Option<Location>,
}

impl Grid {
    /// Grid with the built-in cell templates
    ///
    /// # Errors
    /// Fails when the initial focus location cannot be applied.
    pub fn new(props: GridProps) -> Result<Self> {
        Self::with_templates(CellTemplates::default(), props)
    }

    /// Grid with a custom template registry
    ///
    /// # Errors
    /// Fails when the initial focus location cannot be applied.
    pub fn with_templates(templates: CellTemplates, props: GridProps) -> Result<Self> {
        let state = State::new(Rc::new(templates)).derive_from_props(Rc::new(props))?;
        tracing::debug!(
            rows = state.cell_matrix.rows.len(),
            columns = state.cell_matrix.columns.len(),
            "grid created"
        );
        Ok(Self {
            state,
            gesture: Gesture::Idle,
            hovered: None,
        })
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        Snapshot {
            behavior: state.current_behavior,
            focused_location: state.focused_location.as_ref().map(Location::cell_location),
            selection_mode: state.selection_mode,
            selected_ranges: state.selected_locations(),
            active_selected_range_idx: state.active_selected_range_idx,
            selected_ids: state.selected_ids.clone(),
            currently_edited_cell: state.currently_edited_cell.clone(),
            context_menu_position: state.context_menu_position,
            line_position: state.line_position,
            shadow_position: state.shadow_position,
            shadow_cursor: state.shadow_cursor,
            scroll_x: state.viewport.scroll_x,
            scroll_y: state.viewport.scroll_y,
        }
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Cells a fill handle drag would write, while one is in progress
    pub fn fill_range(&self) -> Option<&Range> {
        match &self.gesture {
            Gesture::Fill(fill) => fill.fill_range.as_ref(),
            _ => None,
        }
    }

    /// Replace props; selection and focus are revalidated against the new
    /// matrix.
    ///
    /// # Errors
    /// Fails when the new props cannot be applied; the grid keeps its state.
    pub fn set_props(&mut self, props: GridProps) -> Result<()> {
        self.state = self.state.clone().derive_from_props(Rc::new(props))?;
        Ok(())
    }

    /// The grid element moved or changed size
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.state.grid_bounds = Some(bounds);
        self.state.viewport.resize(bounds.width, bounds.height);
        self.state = self.state.clone().rebuild_matrix();
        let matrix = std::sync::Arc::clone(&self.state.cell_matrix);
        self.state.viewport.clamp_scroll(&matrix);
    }

    /// Host scrolled the content
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        let matrix = std::sync::Arc::clone(&self.state.cell_matrix);
        self.state.viewport.set_scroll(x, y, &matrix);
    }

    /// Cell under a client point, clamped to the nearest edge cell
    ///
    /// # Errors
    /// Fails before bounds are set or when the matrix is empty.
    pub fn locate(&self, client_x: f64, client_y: f64) -> Result<PointerLocation> {
        let bounds = self
            .state
            .grid_bounds
            .ok_or(GridError::Uninitialized("grid bounds"))?;
        self.state
            .viewport
            .location_from_client(
                &self.state.cell_matrix,
                client_x - bounds.left,
                client_y - bounds.top,
            )
            .ok_or(GridError::EmptyMatrix)
    }

    pub fn pointer_down(&mut self, event: &PointerEvent) {
        let Some(location) = self.locate_logged(event) else {
            return;
        };
        self.hovered = Some(location.location.clone());
        self.dispatch("pointer_down", |state, gesture| {
            BehaviorKind::Default.handle_pointer_down(event, &location, state, gesture)
        });
    }

    /// Pointer moved. Outside a gesture this is a hover and ignored.
    /// Dragging past the viewport edge scrolls by the overshoot.
    pub fn pointer_move(&mut self, event: &PointerEvent) {
        let behavior = self.state.current_behavior;
        if behavior == BehaviorKind::Default {
            return;
        }
        self.auto_scroll(event);
        let Some(location) = self.locate_logged(event) else {
            return;
        };
        self.dispatch("pointer_move", |state, gesture| {
            behavior.handle_pointer_move(event, &location, state, gesture)
        });
        let entered = self
            .hovered
            .as_ref()
            .map_or(true, |hovered| !hovered.same_cell(&location));
        if entered {
            self.hovered = Some(location.location.clone());
            self.dispatch("pointer_enter", |state, gesture| {
                behavior.handle_pointer_enter(event, &location, state, gesture)
            });
        }
    }

    /// Finish the gesture and hand control back to the default behavior
    pub fn pointer_up(&mut self, event: &PointerEvent) {
        let behavior = self.state.current_behavior;
        if let Some(location) = self.locate_logged(event) {
            self.dispatch("pointer_up", |state, gesture| {
                behavior.handle_pointer_up(event, &location, state, gesture)
            });
        }
        self.state = reset_drag_visuals(std::mem::take(&mut self.state));
        self.state.current_behavior = BehaviorKind::Default;
        self.gesture = Gesture::Idle;
        self.hovered = None;
    }

    pub fn key_down(&mut self, event: &KeyboardEvent) {
        let behavior = self.state.current_behavior;
        self.dispatch("key_down", |state, _| behavior.handle_key_down(event, state));
    }

    pub fn key_up(&mut self, event: &KeyboardEvent) {
        let behavior = self.state.current_behavior;
        self.dispatch("key_up", |state, _| Ok(behavior.handle_key_up(event, state)));
    }

    pub fn context_menu(&mut self, event: &PointerEvent) {
        let location = self.locate(event.client_x, event.client_y).ok();
        let behavior = self.state.current_behavior;
        self.dispatch("context_menu", |state, _| {
            behavior.handle_context_menu(event, location.as_ref(), state)
        });
    }

    pub fn double_click(&mut self, event: &PointerEvent) {
        let Some(location) = self.locate_logged(event) else {
            return;
        };
        let behavior = self.state.current_behavior;
        self.dispatch("double_click", |state, _| {
            behavior.handle_double_click(event, &location, state)
        });
    }

    pub fn composition_end(&mut self, data: &str) {
        let behavior = self.state.current_behavior;
        self.dispatch("composition_end", |state, _| {
            behavior.handle_composition_end(data, state)
        });
    }

    /// Move focus programmatically, resetting the selection
    pub fn focus(&mut self, location: &CellLocation) {
        self.dispatch("focus", |state, _| {
            let target = state.cell_matrix.get_location_by_cell(location)?;
            focus::focus_location(state, &target, true, None)
        });
    }

    /// The host editor changed the value being edited. Ignored when no
    /// editor is open.
    pub fn update_edited_cell(&mut self, cell: Compatible) {
        if self.state.currently_edited_cell.is_some() {
            self.state.currently_edited_cell = Some(cell);
        }
    }

    /// Copy the active range
    pub fn copy(&mut self) -> ClipboardPayload {
        let mut payload = ClipboardPayload::default();
        self.dispatch("copy", |state, _| {
            let (state, copied) = clipboard::copy(state)?;
            payload = copied;
            Ok(state)
        });
        payload
    }

    /// Copy the active range, then empty it
    pub fn cut(&mut self) -> ClipboardPayload {
        let mut payload = ClipboardPayload::default();
        self.dispatch("cut", |state, _| {
            let (state, copied) = clipboard::cut(state)?;
            payload = copied;
            Ok(state)
        });
        payload
    }

    pub fn paste(&mut self, payload: &ClipboardPayload) {
        self.dispatch("paste", |state, _| clipboard::paste(state, payload));
    }

    /// Drop every range, row and column selection
    pub fn clear_selections(&mut self) {
        self.dispatch("clear_selections", |state, _| {
            Ok(selection::clear_selections(state))
        });
    }

    fn locate_logged(&self, event: &PointerEvent) -> Option<PointerLocation> {
        match self.locate(event.client_x, event.client_y) {
            Ok(location) => Some(location),
            Err(err) => {
                tracing::warn!(%err, x = event.client_x, y = event.client_y, "pointer event ignored");
                None
            }
        }
    }

    fn auto_scroll(&mut self, event: &PointerEvent) {
        let Some(bounds) = self.state.grid_bounds else {
            return;
        };
        let (dx, dy) = self
            .state
            .viewport
            .auto_scroll_delta(event.client_x - bounds.left, event.client_y - bounds.top);
        if dx != 0.0 || dy != 0.0 {
            let matrix = std::sync::Arc::clone(&self.state.cell_matrix);
            self.state.viewport.scroll_by(dx, dy, &matrix);
        }
    }

    /// Run one transition. A failing handler leaves the state and the
    /// gesture as they were.
    fn dispatch(
        &mut self,
        event: &'static str,
        handler: impl FnOnce(State, &mut Gesture) -> Result<State>,
    ) {
        let previous_focus = self.state.focused_location.clone();
        let was_editing = self.state.currently_edited_cell.is_some();
        let mut gesture = self.gesture.clone();
        match handler(self.state.clone(), &mut gesture) {
            Ok(next) => {
                self.state = changes::handle_state_update(next);
                self.gesture = gesture;
            }
            Err(err) => tracing::warn!(event, %err, "event handler failed, state unchanged"),
        }
        self.reveal_focus(previous_focus.as_ref(), was_editing);
    }

    /// Scroll a newly focused cell, or the cell whose editor just opened,
    /// into view. Column resizing never scrolls.
    fn reveal_focus(&mut self, previous: Option<&Location>, was_editing: bool) {
        let Some(focused) = self.state.focused_location.clone() else {
            return;
        };
        let moved = previous.map_or(true, |previous| !previous.same_cell(&focused))
            && self.state.current_behavior != BehaviorKind::ColumnResize;
        let opened = !was_editing && self.state.currently_edited_cell.is_some();
        if !(moved || opened) {
            return;
        }
        let matrix = std::sync::Arc::clone(&self.state.cell_matrix);
        let (x, y) = self.state.viewport.scroll_into_view(&matrix, &focused);
        self.state.viewport.set_scroll(x, y, &matrix);
    }
}
