use serde::{Deserialize, Serialize};

use super::{Cell, Id};

/// Column description supplied by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub column_id: Id,
    /// Width in pixels (default width when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default)]
    pub reorderable: bool,
    #[serde(default)]
    pub resizable: bool,
}

impl Column {
    pub fn new(column_id: impl Into<Id>) -> Self {
        Self {
            column_id: column_id.into(),
            width: None,
            reorderable: false,
            resizable: false,
        }
    }

    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn reorderable(mut self) -> Self {
        self.reorderable = true;
        self
    }

    #[must_use]
    pub fn resizable(mut self) -> Self {
        self.resizable = true;
        self
    }
}

/// Row description supplied by the host, cells in column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub row_id: Id,
    pub cells: Vec<Cell>,
    /// Height in pixels (default height when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub reorderable: bool,
    #[serde(default)]
    pub resizable: bool,
    /// Rows sharing a group id are selected and edited together
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Id>,
}

impl Row {
    pub fn new(row_id: impl Into<Id>, cells: Vec<Cell>) -> Self {
        Self {
            row_id: row_id.into(),
            cells,
            height: None,
            reorderable: false,
            resizable: false,
            group_id: None,
        }
    }

    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_group_id(mut self, group_id: impl Into<Id>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    #[must_use]
    pub fn reorderable(mut self) -> Self {
        self.reorderable = true;
        self
    }

    #[must_use]
    pub fn resizable(mut self) -> Self {
        self.resizable = true;
        self
    }
}
