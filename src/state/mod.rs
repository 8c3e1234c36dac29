//! Interactive session state and the transition functions over it.
//!
//! Every transition takes a [`State`] by value and returns the next one.
//! The matrix is shared behind an `Arc` and props/templates behind `Rc`, so
//! cloning a state copies selection bookkeeping only.

pub mod changes;
pub mod clipboard;
pub mod focus;
pub mod selection;

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::behavior::BehaviorKind;
use crate::config::GridOptions;
use crate::error::{GridError, Result};
use crate::layout::{CellMatrix, CellMatrixBuilder, CellMatrixProps, Location, Range, Viewport};
use crate::templates::{CellTemplate, CellTemplates};
use crate::types::{
    CellChange, CellLocation, Compatible, Cursor, DropPosition, Highlight, Id, Orientation,
    SelectionMode,
};

type CellsNotify = Rc<dyn Fn(&[CellChange])>;
type LocationNotify = Rc<dyn Fn(&CellLocation)>;
type LocationPredicate = Rc<dyn Fn(&CellLocation) -> bool>;
type SelectionNotify = Rc<dyn Fn(&[Range])>;
type SelectionPredicate = Rc<dyn Fn(&[Range]) -> bool>;
type MenuNotify = Rc<dyn Fn(&ContextMenuRequest)>;
type ReorderNotify = Rc<dyn Fn(&Id, &[Id], DropPosition)>;
type ReorderPredicate = Rc<dyn Fn(&Id, &[Id], DropPosition) -> bool>;
type ResizeNotify = Rc<dyn Fn(&Id, f64, &[Id])>;

/// What the host receives when the context menu opens
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMenuRequest {
    pub selected_row_ids: Vec<Id>,
    pub selected_column_ids: Vec<Id>,
    pub selection_mode: SelectionMode,
    pub position: MenuPosition,
}

/// Host notifications and veto predicates. Absent predicates allow.
#[derive(Clone, Default)]
pub struct GridCallbacks {
    pub on_cells_changed: Option<CellsNotify>,
    pub on_focus_location_changed: Option<LocationNotify>,
    pub on_focus_location_changing: Option<LocationPredicate>,
    pub on_selection_changed: Option<SelectionNotify>,
    pub on_selection_changing: Option<SelectionPredicate>,
    pub on_rows_reordered: Option<ReorderNotify>,
    pub on_columns_reordered: Option<ReorderNotify>,
    pub can_reorder_rows: Option<ReorderPredicate>,
    pub can_reorder_columns: Option<ReorderPredicate>,
    pub on_column_resized: Option<ResizeNotify>,
    pub on_row_resized: Option<ResizeNotify>,
    pub on_context_menu: Option<MenuNotify>,
}

impl fmt::Debug for GridCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridCallbacks")
            .field("on_cells_changed", &self.on_cells_changed.is_some())
            .field("on_focus_location_changed", &self.on_focus_location_changed.is_some())
            .field("on_focus_location_changing", &self.on_focus_location_changing.is_some())
            .field("on_selection_changed", &self.on_selection_changed.is_some())
            .field("on_selection_changing", &self.on_selection_changing.is_some())
            .field("on_rows_reordered", &self.on_rows_reordered.is_some())
            .field("on_columns_reordered", &self.on_columns_reordered.is_some())
            .field("can_reorder_rows", &self.can_reorder_rows.is_some())
            .field("can_reorder_columns", &self.can_reorder_columns.is_some())
            .field("on_column_resized", &self.on_column_resized.is_some())
            .field("on_row_resized", &self.on_row_resized.is_some())
            .field("on_context_menu", &self.on_context_menu.is_some())
            .finish()
    }
}

impl GridCallbacks {
    #[must_use]
    pub fn on_cells_changed(mut self, f: impl Fn(&[CellChange]) + 'static) -> Self {
        self.on_cells_changed = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_focus_location_changed(mut self, f: impl Fn(&CellLocation) + 'static) -> Self {
        self.on_focus_location_changed = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_focus_location_changing(
        mut self,
        f: impl Fn(&CellLocation) -> bool + 'static,
    ) -> Self {
        self.on_focus_location_changing = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_selection_changed(mut self, f: impl Fn(&[Range]) + 'static) -> Self {
        self.on_selection_changed = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_selection_changing(mut self, f: impl Fn(&[Range]) -> bool + 'static) -> Self {
        self.on_selection_changing = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_rows_reordered(mut self, f: impl Fn(&Id, &[Id], DropPosition) + 'static) -> Self {
        self.on_rows_reordered = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_columns_reordered(
        mut self,
        f: impl Fn(&Id, &[Id], DropPosition) + 'static,
    ) -> Self {
        self.on_columns_reordered = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn can_reorder_rows(
        mut self,
        f: impl Fn(&Id, &[Id], DropPosition) -> bool + 'static,
    ) -> Self {
        self.can_reorder_rows = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn can_reorder_columns(
        mut self,
        f: impl Fn(&Id, &[Id], DropPosition) -> bool + 'static,
    ) -> Self {
        self.can_reorder_columns = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_column_resized(mut self, f: impl Fn(&Id, f64, &[Id]) + 'static) -> Self {
        self.on_column_resized = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_row_resized(mut self, f: impl Fn(&Id, f64, &[Id]) + 'static) -> Self {
        self.on_row_resized = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_context_menu(mut self, f: impl Fn(&ContextMenuRequest) + 'static) -> Self {
        self.on_context_menu = Some(Rc::new(f));
        self
    }
}

/// Everything the host configures a grid with
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridProps {
    #[serde(flatten)]
    pub matrix: CellMatrixProps,
    #[serde(flatten)]
    pub options: GridOptions,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
    /// Pinned focus: focus may only move to this location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_location: Option<CellLocation>,
    /// Focus applied once when the grid is first given props
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_focus_location: Option<CellLocation>,
    #[serde(skip)]
    pub callbacks: GridCallbacks,
}

impl GridProps {
    pub fn new(matrix: CellMatrixProps) -> Self {
        Self {
            matrix,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: GridOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_callbacks(mut self, callbacks: GridCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// # Errors
    /// Returns an error if the document is not valid JSON or misses `columns`/`rows`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Host element rectangle in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.left + self.width && y >= self.top && y <= self.top + self.height
    }
}

/// Where the host should open the context menu (client coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MenuPosition {
    pub top: f64,
    pub left: f64,
}

/// A host highlight resolved against the current matrix
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightLocation {
    pub location: Location,
    pub border_color: Option<String>,
}

/// Snapshot of one interactive grid session
#[derive(Debug, Clone)]
pub struct State {
    pub props: Option<Rc<GridProps>>,
    pub cell_templates: Rc<CellTemplates>,
    pub cell_matrix: Arc<CellMatrix>,
    pub options: GridOptions,
    pub current_behavior: BehaviorKind,
    pub focused_location: Option<Location>,
    pub selection_mode: SelectionMode,
    pub selected_ranges: Vec<Range>,
    pub active_selected_range_idx: usize,
    pub selected_row_groups: Vec<Range>,
    /// Row or column indexes in row/column selection mode
    pub selected_indexes: Vec<usize>,
    /// Row or column Ids in row/column selection mode
    pub selected_ids: Vec<Id>,
    pub currently_edited_cell: Option<Compatible>,
    pub queued_cell_changes: Vec<CellChange>,
    pub highlight_locations: Vec<HighlightLocation>,
    pub viewport: Viewport,
    /// Host element rectangle; `None` until the host reports it
    pub grid_bounds: Option<Bounds>,
    pub context_menu_position: Option<MenuPosition>,
    /// Reorder drop line / resize preview, content coordinates
    pub line_position: Option<f64>,
    pub line_orientation: Orientation,
    /// Leading edge of the dragged block, content coordinates
    pub shadow_position: Option<f64>,
    pub shadow_size: f64,
    pub shadow_cursor: Cursor,
    pub copy_range: Option<Range>,
}

impl Default for State {
    fn default() -> Self {
        Self::new(Rc::new(CellTemplates::default()))
    }
}

impl State {
    pub fn new(cell_templates: Rc<CellTemplates>) -> Self {
        Self {
            props: None,
            cell_templates,
            cell_matrix: Arc::new(CellMatrix::default()),
            options: GridOptions::default(),
            current_behavior: BehaviorKind::Default,
            focused_location: None,
            selection_mode: SelectionMode::Range,
            selected_ranges: Vec::new(),
            active_selected_range_idx: 0,
            selected_row_groups: Vec::new(),
            selected_indexes: Vec::new(),
            selected_ids: Vec::new(),
            currently_edited_cell: None,
            queued_cell_changes: Vec::new(),
            highlight_locations: Vec::new(),
            viewport: Viewport::default(),
            grid_bounds: None,
            context_menu_position: None,
            line_position: None,
            line_orientation: Orientation::Horizontal,
            shadow_position: None,
            shadow_size: 0.0,
            shadow_cursor: Cursor::Default,
            copy_range: None,
        }
    }

    /// Props, which every focus/selection transition requires.
    ///
    /// # Errors
    /// Returns [`GridError::Uninitialized`] before the host has set props.
    pub fn props(&self) -> Result<&GridProps> {
        self.props.as_deref().ok_or(GridError::Uninitialized("props"))
    }

    /// Callbacks, empty before props are set
    pub fn callbacks(&self) -> GridCallbacks {
        self.props
            .as_ref()
            .map(|p| p.callbacks.clone())
            .unwrap_or_default()
    }

    pub fn active_selected_range(&self) -> Option<&Range> {
        self.selected_ranges.get(self.active_selected_range_idx)
    }

    /// Cell and template at `location`.
    ///
    /// # Errors
    /// Fails when the location is outside the matrix, the type has no
    /// template, or the template rejects the cell.
    pub fn get_compatible_cell_and_template(
        &self,
        location: &Location,
    ) -> Result<(Compatible, Rc<dyn CellTemplate>)> {
        let cell = self
            .cell_matrix
            .get_cell(location)
            .ok_or(GridError::OutOfBounds {
                row_idx: location.row.idx,
                column_idx: location.column.idx,
            })?;
        self.cell_templates.compatible(cell)
    }

    /// Id pairs of every selected cell, one list per selected range
    pub fn selected_locations(&self) -> Vec<Vec<CellLocation>> {
        self.selected_ranges
            .iter()
            .map(|range| range.locations().map(|l| l.cell_location()).collect())
            .collect()
    }

    /// Rebuild the matrix from new props and revalidate everything that
    /// points into it.
    ///
    /// # Errors
    /// Fails when the initial focus cannot be applied.
    pub fn derive_from_props(mut self, props: Rc<GridProps>) -> Result<State> {
        let first_props = self.props.is_none();
        self.options = props.options.clone();
        self.cell_matrix = Arc::new(self.build_matrix(&props.matrix));
        self.props = Some(Rc::clone(&props));

        self = self.revalidate();
        self.highlight_locations = self.resolve_highlights(&props.highlights);

        if first_props {
            if let Some(initial) = &props.initial_focus_location {
                match self.cell_matrix.get_location_by_cell(initial) {
                    Ok(location) => self = focus::focus_location(self, &location, true, None)?,
                    Err(err) => tracing::debug!(%err, "initial focus location skipped"),
                }
            }
        }
        Ok(self)
    }

    /// Rebuild the matrix after the viewport changed size, keeping props
    pub fn rebuild_matrix(mut self) -> State {
        let Some(props) = self.props.clone() else {
            return self;
        };
        self.cell_matrix = Arc::new(self.build_matrix(&props.matrix));
        self = self.revalidate();
        self.highlight_locations = self.resolve_highlights(&props.highlights);
        self
    }

    fn build_matrix(&self, props: &CellMatrixProps) -> CellMatrix {
        let builder = CellMatrixBuilder::new(props);
        match self.grid_bounds {
            Some(_) => builder
                .responsive(
                    self.viewport.width,
                    self.viewport.height,
                    self.options.horizontal_sticky_breakpoint,
                    self.options.vertical_sticky_breakpoint,
                )
                .build(),
            None => builder.build(),
        }
    }

    /// Re-point focus and selections at the current matrix
    fn revalidate(mut self) -> State {
        let matrix = Arc::clone(&self.cell_matrix);
        self.focused_location = self
            .focused_location
            .as_ref()
            .and_then(|l| matrix.validate_location(l));
        self.selected_row_groups = self
            .focused_location
            .as_ref()
            .and_then(|l| matrix.get_selected_rows_by_location(l))
            .into_iter()
            .collect();
        self.copy_range = self.copy_range.as_ref().and_then(|r| matrix.validate_range(r));

        match self.selection_mode {
            SelectionMode::Range => {
                self.selected_ranges = self
                    .selected_ranges
                    .iter()
                    .filter_map(|r| matrix.validate_range(r))
                    .collect();
                self.active_selected_range_idx = self
                    .active_selected_range_idx
                    .min(self.selected_ranges.len().saturating_sub(1));
            }
            SelectionMode::Row | SelectionMode::Column => {
                self = selection::rederive_from_ids(self);
            }
        }

        self.viewport.clamp_scroll(&matrix);
        self
    }

    fn resolve_highlights(&self, highlights: &[Highlight]) -> Vec<HighlightLocation> {
        highlights
            .iter()
            .filter_map(|h| {
                match self.cell_matrix.get_location_by_id(&h.row_id, &h.column_id) {
                    Ok(location) => Some(HighlightLocation {
                        location,
                        border_color: h.border_color.clone(),
                    }),
                    Err(err) => {
                        tracing::debug!(%err, "highlight skipped");
                        None
                    }
                }
            })
            .collect()
    }
}
