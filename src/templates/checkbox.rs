use serde_json::Value;

use super::{CellTemplate, KeyOutcome};
use crate::error::Result;
use crate::events::{Key, KeyboardEvent};
use crate::types::{Cell, Compatible};

/// Boolean cell stored in the `checked` field.
///
/// Text is `checkedText` (default `"1"`) or `uncheckedText` (default `""`),
/// value is 1 when checked and `NaN` otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckboxCellTemplate;

impl CheckboxCellTemplate {
    fn with_checked(cell: &Cell, checked: bool) -> Compatible {
        let field = |name: &str, default: &str| {
            cell.property_str(name)
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(default)
                .to_string()
        };
        let text = if checked {
            field("checkedText", "1")
        } else {
            field("uncheckedText", "")
        };
        let value = if checked { 1.0 } else { f64::NAN };
        let cell = cell.clone().with_field("checked", Value::Bool(checked));
        Compatible::new(cell, text, value)
    }

    fn is_checked(cell: &Cell) -> bool {
        cell.property_bool("checked").unwrap_or(false)
    }
}

impl CellTemplate for CheckboxCellTemplate {
    fn get_compatible_cell(&self, cell: &Cell) -> Result<Compatible> {
        let checked = cell.property_bool("checked")?;
        Ok(Self::with_checked(cell, checked))
    }

    fn update(&self, cell: &Compatible, incoming: &Compatible) -> Option<Compatible> {
        let checked = if incoming.kind == "checkbox" {
            Self::is_checked(incoming)
        } else {
            // truthiness of the incoming value
            incoming.value.is_some_and(|v| v != 0.0)
        };
        Some(Self::with_checked(cell, checked))
    }

    fn handle_key_down(&self, cell: &Compatible, event: &KeyboardEvent) -> KeyOutcome {
        if !event.shift && matches!(event.key, Key::Space | Key::Enter) {
            return KeyOutcome {
                cell: Self::with_checked(cell, !Self::is_checked(cell)),
                enable_edit_mode: false,
            };
        }
        KeyOutcome::unchanged(cell)
    }
}
