//! Structured error types for cellgrid.
//!
//! Lookup failures, construction-order bugs and malformed cells all surface
//! here. Policy rejections (vetoes, non-editable cells) are not errors: they
//! return the state unchanged.

use crate::types::Id;

/// All errors that can occur while building a matrix or handling an event.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A row or column Id is not present in the current matrix.
    #[error("Location not found: column '{column_id}', row '{row_id}'")]
    LocationNotFound { row_id: Id, column_id: Id },

    /// A row/column index outside the matrix bounds.
    #[error("Index out of bounds: row {row_idx}, column {column_idx}")]
    OutOfBounds { row_idx: usize, column_idx: usize },

    /// A field was queried before the host initialized it.
    #[error("\"{0}\" should be initialized before it is used")]
    Uninitialized(&'static str),

    /// A cell lacks a property its template requires.
    #[error("Cell is missing property '{property}' of type {expected}")]
    MissingProperty {
        property: String,
        expected: &'static str,
    },

    /// No template is registered for the cell's type.
    #[error("No cell template registered for type '{0}'")]
    UnknownTemplate(String),

    /// The matrix has no rows or no columns.
    #[error("Cell matrix is empty")]
    EmptyMatrix,

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
