use serde::{Deserialize, Serialize};

/// What the current selection is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Standard cell range selection (default)
    #[default]
    Range,
    /// Entire row(s) selected
    Row,
    /// Entire column(s) selected
    Column,
}

/// Axis of the reorder/resize preview line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Pointer cursor the host should show while a gesture is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cursor {
    #[default]
    Default,
    Grabbing,
    Move,
    ColResize,
    RowResize,
    Crosshair,
}
