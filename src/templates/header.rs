use super::CellTemplate;
use crate::error::Result;
use crate::types::{parse_locale_number, Cell, Compatible};

/// Read-only caption cell; never focusable, never updated.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderCellTemplate;

impl CellTemplate for HeaderCellTemplate {
    fn get_compatible_cell(&self, cell: &Cell) -> Result<Compatible> {
        let text = cell.require_text()?.to_string();
        let value = parse_locale_number(&text);
        Ok(Compatible::new(cell.clone(), text, value))
    }

    fn is_focusable(&self, _cell: &Compatible) -> bool {
        false
    }
}
