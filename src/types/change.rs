use serde::{Deserialize, Serialize};

use super::{Compatible, Id};

/// Id-based address of a cell, stable across matrix rebuilds
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellLocation {
    pub row_id: Id,
    pub column_id: Id,
}

impl CellLocation {
    pub fn new(row_id: impl Into<Id>, column_id: impl Into<Id>) -> Self {
        Self {
            row_id: row_id.into(),
            column_id: column_id.into(),
        }
    }
}

/// One queued edit, flushed to the host in batches
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellChange {
    pub row_id: Id,
    pub column_id: Id,
    pub previous_cell: Compatible,
    pub new_cell: Compatible,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Where dragged rows/columns land relative to the drop target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    #[default]
    Before,
    /// Into the target (group merge); rows only
    On,
    After,
}

/// Host-requested border around a cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub row_id: Id,
    pub column_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
}
