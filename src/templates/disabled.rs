use super::CellTemplate;
use crate::error::Result;
use crate::types::{parse_locale_number, Cell, Compatible};

/// Greyed-out text cell of a disabled group row.
///
/// It cannot be focused or edited directly, but keeps an `update` so that
/// an edit on an editable row of the same group can cascade into it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCellTemplate;

impl CellTemplate for DisabledCellTemplate {
    fn get_compatible_cell(&self, cell: &Cell) -> Result<Compatible> {
        let text = cell.require_text()?.to_string();
        let value = parse_locale_number(&text);
        Ok(Compatible::new(cell.clone(), text, value))
    }

    fn update(&self, cell: &Compatible, incoming: &Compatible) -> Option<Compatible> {
        let text = incoming.text().to_string();
        let value = parse_locale_number(&text);
        Some(Compatible::new(cell.cell().clone(), text, value))
    }

    fn is_focusable(&self, _cell: &Compatible) -> bool {
        false
    }
}
