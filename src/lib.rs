//! cellgrid - headless spreadsheet grid engine
//!
//! Everything an interactive grid widget needs except drawing it:
//! - Cell matrix geometry with sticky panes, spans and row groups
//! - Focus, range/row/column selection and the change pipeline
//! - Pointer and keyboard behaviors (selection, reorder, resize, fill handle)
//! - Clipboard interchange as tab-separated text plus typed JSON cells
//!
//! # Usage
//!
//! ```
//! use cellgrid::{Cell, CellMatrixProps, Column, Grid, GridProps, Row};
//!
//! let props = GridProps::new(CellMatrixProps::new(
//!     vec![Column::new("name"), Column::new("qty")],
//!     vec![Row::new("r1", vec![Cell::text("apples"), Cell::number(3.0)])],
//! ));
//! let grid = Grid::new(props).unwrap();
//! assert_eq!(grid.state().cell_matrix.rows.len(), 1);
//! ```

pub mod behavior;
pub mod config;
pub mod error;
pub mod events;
pub mod grid;
pub mod layout;
pub mod state;
pub mod templates;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

use wasm_bindgen::prelude::*;

pub use behavior::{BehaviorKind, Gesture};
pub use config::GridOptions;
pub use error::{GridError, Result};
pub use events::{Key, KeyboardEvent, PointerEvent, PointerTarget, PointerType};
pub use grid::Grid;
pub use layout::{CellMatrix, CellMatrixBuilder, CellMatrixProps, Location, PointerLocation, Range};
pub use state::clipboard::ClipboardPayload;
pub use state::{Bounds, GridCallbacks, GridProps, State};
pub use templates::{CellTemplate, CellTemplates};

pub use types::*;

/// Build the cell matrix for a JSON `CellMatrixProps` document and return
/// its geometry (row/column offsets, sticky ranges) as JSON.
///
/// # Errors
/// Returns an error if the document is not valid `CellMatrixProps` JSON.
#[wasm_bindgen]
pub fn build_matrix(props_json: &str) -> std::result::Result<String, JsValue> {
    let props: CellMatrixProps =
        serde_json::from_str(props_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let matrix = CellMatrixBuilder::new(&props).build();
    serde_json::to_string(&layout::MatrixSummary::of(&matrix))
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
