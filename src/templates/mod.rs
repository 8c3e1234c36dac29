//! Cell templates: per-type normalization, merge and keyboard policy.
//!
//! The engine never looks inside a cell beyond `non_editable` and the span
//! fields. Everything else (what text a cell shows, which fields an edit may
//! overwrite, which keys open the editor) is decided by the template
//! registered for the cell's `type`.

mod checkbox;
mod disabled;
mod header;
mod number;
mod text;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

pub use checkbox::CheckboxCellTemplate;
pub use disabled::DisabledCellTemplate;
pub use header::HeaderCellTemplate;
pub use number::NumberCellTemplate;
pub use text::TextCellTemplate;

use crate::error::{GridError, Result};
use crate::events::KeyboardEvent;
use crate::types::{Cell, Compatible};

/// Result of handing a key to a template
#[derive(Debug, Clone, PartialEq)]
pub struct KeyOutcome {
    pub cell: Compatible,
    pub enable_edit_mode: bool,
}

impl KeyOutcome {
    pub fn unchanged(cell: &Compatible) -> Self {
        Self {
            cell: cell.clone(),
            enable_edit_mode: false,
        }
    }
}

/// Capability implemented once per cell type
pub trait CellTemplate {
    /// Normalize a loosely typed cell.
    ///
    /// # Errors
    /// Returns [`GridError::MissingProperty`] when a required field is absent.
    fn get_compatible_cell(&self, cell: &Cell) -> Result<Compatible>;

    /// Merge `incoming` into `cell`. `None` means the type cannot be updated
    /// through the change pipeline.
    fn update(&self, _cell: &Compatible, _incoming: &Compatible) -> Option<Compatible> {
        None
    }

    fn handle_key_down(&self, cell: &Compatible, _event: &KeyboardEvent) -> KeyOutcome {
        KeyOutcome::unchanged(cell)
    }

    /// IME composition finished with `data`. `None` when unsupported.
    fn handle_composition_end(&self, _cell: &Compatible, _data: &str) -> Option<KeyOutcome> {
        None
    }

    fn is_focusable(&self, _cell: &Compatible) -> bool {
        true
    }

    /// Change detection used by the change pipeline
    fn cells_equal(&self, a: &Compatible, b: &Compatible) -> bool {
        a == b
    }

    fn class_name(&self, cell: &Compatible) -> String {
        cell.class_name.clone().unwrap_or_default()
    }
}

/// Template registry keyed by cell type
#[derive(Clone)]
pub struct CellTemplates {
    templates: HashMap<String, Rc<dyn CellTemplate>>,
}

impl fmt::Debug for CellTemplates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&String> = self.templates.keys().collect();
        kinds.sort();
        f.debug_struct("CellTemplates").field("kinds", &kinds).finish()
    }
}

impl Default for CellTemplates {
    fn default() -> Self {
        let mut templates = Self::empty();
        templates.register("text", TextCellTemplate);
        templates.register("number", NumberCellTemplate);
        templates.register("checkbox", CheckboxCellTemplate);
        templates.register("header", HeaderCellTemplate);
        templates.register("disabled", DisabledCellTemplate);
        templates
    }
}

impl CellTemplates {
    /// Registry without the built-in templates
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Add or replace the template for `kind`
    pub fn register(&mut self, kind: &str, template: impl CellTemplate + 'static) {
        self.templates.insert(kind.to_string(), Rc::new(template));
    }

    /// # Errors
    /// Returns [`GridError::UnknownTemplate`] when nothing is registered for `kind`.
    pub fn get(&self, kind: &str) -> Result<Rc<dyn CellTemplate>> {
        self.templates
            .get(kind)
            .cloned()
            .ok_or_else(|| GridError::UnknownTemplate(kind.to_string()))
    }

    /// Normalize `cell` with its own template.
    ///
    /// # Errors
    /// Fails when the type is unknown or the template rejects the cell.
    pub fn compatible(&self, cell: &Cell) -> Result<(Compatible, Rc<dyn CellTemplate>)> {
        let template = self.get(&cell.kind)?;
        let compatible = template.get_compatible_cell(cell)?;
        Ok((compatible, template))
    }
}

/// Text shown for a numeric value, `""` for `NaN`
pub(crate) fn format_number(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}
