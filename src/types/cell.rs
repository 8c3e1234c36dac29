use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::Deref;

use super::Id;
use crate::error::{GridError, Result};

/// A loosely-typed cell as supplied by the host.
///
/// Only `kind` is mandatory. Templates pull whatever else they need out of
/// `text`/`value` or the flattened `fields` map and normalize the result into
/// a [`Compatible`] cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Template key: "text", "number", "checkbox", "header", "disabled", ...
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub non_editable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Number of columns this cell spans (1 when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colspan: Option<u32>,
    /// Number of rows this cell spans (1 when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rowspan: Option<u32>,
    /// Template-specific fields (e.g. `checked` for checkboxes)
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Cell {
    /// Create a bare cell of the given template kind
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new("text")
        }
    }

    pub fn number(value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::new("number")
        }
    }

    pub fn checkbox(checked: bool) -> Self {
        Self::new("checkbox").with_field("checked", Value::Bool(checked))
    }

    pub fn header(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new("header")
        }
    }

    pub fn disabled(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new("disabled")
        }
    }

    /// The cell every wipe/cut writes.
    pub fn empty() -> Self {
        Self {
            text: Some(String::new()),
            ..Self::new("text")
        }
    }

    #[must_use]
    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    #[must_use]
    pub fn with_group_id(mut self, group_id: impl Into<Id>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    #[must_use]
    pub fn non_editable(mut self) -> Self {
        self.non_editable = true;
        self
    }

    #[must_use]
    pub fn with_span(mut self, colspan: u32, rowspan: u32) -> Self {
        self.colspan = Some(colspan);
        self.rowspan = Some(rowspan);
        self
    }

    /// `text` as required by most templates.
    ///
    /// # Errors
    /// Returns [`GridError::MissingProperty`] when the cell has no text.
    pub fn require_text(&self) -> Result<&str> {
        self.text.as_deref().ok_or_else(|| GridError::MissingProperty {
            property: "text".to_string(),
            expected: "string",
        })
    }

    /// `value` as required by numeric templates.
    ///
    /// # Errors
    /// Returns [`GridError::MissingProperty`] when the cell has no value.
    pub fn require_value(&self) -> Result<f64> {
        self.value.ok_or_else(|| GridError::MissingProperty {
            property: "value".to_string(),
            expected: "number",
        })
    }

    /// Read a boolean template field.
    ///
    /// # Errors
    /// Returns [`GridError::MissingProperty`] when the field is absent or not a boolean.
    pub fn property_bool(&self, name: &str) -> Result<bool> {
        self.fields
            .get(name)
            .and_then(Value::as_bool)
            .ok_or_else(|| GridError::MissingProperty {
                property: name.to_string(),
                expected: "boolean",
            })
    }

    /// Read a string template field.
    ///
    /// # Errors
    /// Returns [`GridError::MissingProperty`] when the field is absent or not a string.
    pub fn property_str(&self, name: &str) -> Result<&str> {
        self.fields
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| GridError::MissingProperty {
                property: name.to_string(),
                expected: "string",
            })
    }

    /// Number of columns covered, never less than one.
    pub fn colspan(&self) -> usize {
        self.colspan.map_or(1, |s| s.max(1) as usize)
    }

    /// Number of rows covered, never less than one.
    pub fn rowspan(&self) -> usize {
        self.rowspan.map_or(1, |s| s.max(1) as usize)
    }
}

/// A cell normalized by its template: `text` and `value` are always present.
///
/// `NaN` values are stored as absent so that structural equality stays
/// reflexive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Compatible(Cell);

impl Compatible {
    pub fn new(mut cell: Cell, text: impl Into<String>, value: f64) -> Self {
        cell.text = Some(text.into());
        cell.value = if value.is_nan() { None } else { Some(value) };
        Self(cell)
    }

    pub fn text(&self) -> &str {
        self.0.text.as_deref().unwrap_or_default()
    }

    /// Numeric value, `NaN` when the cell has none.
    pub fn value(&self) -> f64 {
        self.0.value.unwrap_or(f64::NAN)
    }

    pub fn cell(&self) -> &Cell {
        &self.0
    }

    pub fn into_cell(self) -> Cell {
        self.0
    }
}

impl Deref for Compatible {
    type Target = Cell;

    fn deref(&self) -> &Cell {
        &self.0
    }
}

/// Parse a number the way users type it: surrounding whitespace and
/// thousands separators are ignored. Returns `NaN` when nothing numeric is left.
pub fn parse_locale_number(text: &str) -> f64 {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != '\u{a0}')
        .collect();
    if cleaned.is_empty() {
        return f64::NAN;
    }
    cleaned.parse::<f64>().unwrap_or(f64::NAN)
}
