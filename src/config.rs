//! Grid feature flags and responsive sticky-pane thresholds.
//!
//! Options come from the host either as a struct literal or as JSON with
//! camelCase keys; every field has a default so partial documents work.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default percentage of the viewport sticky panes may occupy before they
/// are turned off.
pub const DEFAULT_STICKY_BREAKPOINT: f64 = 50.0;

/// Minimum row height enforced by row resizing.
pub const MIN_ROW_HEIGHT: f64 = 20.0;

/// Feature flags passed through from the host configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    pub enable_range_selection: bool,
    pub enable_fill_handle: bool,
    pub enable_row_selection: bool,
    pub enable_column_selection: bool,
    /// Draw `selected_row_groups` as a selection (host concern, passed through)
    pub enable_group_selection: bool,
    /// Render group ids inside cells (host concern, passed through)
    pub enable_group_id_render: bool,
    pub disable_virtual_scrolling: bool,
    /// Capability flag for hosts running on engines without sticky positioning
    pub legacy_browser_mode: bool,
    /// Percentage of the viewport width left+right sticky columns may use
    pub horizontal_sticky_breakpoint: f64,
    /// Percentage of the viewport height top+bottom sticky rows may use
    pub vertical_sticky_breakpoint: f64,
    pub min_row_height: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            enable_range_selection: true,
            enable_fill_handle: false,
            enable_row_selection: false,
            enable_column_selection: false,
            enable_group_selection: false,
            enable_group_id_render: false,
            disable_virtual_scrolling: false,
            legacy_browser_mode: false,
            horizontal_sticky_breakpoint: DEFAULT_STICKY_BREAKPOINT,
            vertical_sticky_breakpoint: DEFAULT_STICKY_BREAKPOINT,
            min_row_height: MIN_ROW_HEIGHT,
        }
    }
}

impl GridOptions {
    /// Parse options from a JSON document. Missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns an error if the document is not valid JSON or a value has the wrong type.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
