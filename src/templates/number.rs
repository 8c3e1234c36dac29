use super::{format_number, CellTemplate, KeyOutcome};
use crate::error::Result;
use crate::events::{Key, KeyboardEvent};
use crate::types::{parse_locale_number, Cell, Compatible};

/// Numeric cell. A missing value is shown as empty text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberCellTemplate;

fn is_numeric_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | ',')
}

impl CellTemplate for NumberCellTemplate {
    fn get_compatible_cell(&self, cell: &Cell) -> Result<Compatible> {
        let value = cell.value.unwrap_or(f64::NAN);
        Ok(Compatible::new(cell.clone(), format_number(value), value))
    }

    fn update(&self, cell: &Compatible, incoming: &Compatible) -> Option<Compatible> {
        // pasted text carries no value; fall back to parsing it
        let value = if incoming.value.is_some() || incoming.kind == "number" {
            incoming.value()
        } else {
            parse_locale_number(incoming.text())
        };
        Some(Compatible::new(cell.cell().clone(), format_number(value), value))
    }

    fn handle_key_down(&self, cell: &Compatible, event: &KeyboardEvent) -> KeyOutcome {
        if !event.selection_key() && !event.alt {
            if let Key::Char(c) = event.key {
                if is_numeric_char(c) {
                    let typed = c.to_string();
                    let value = parse_locale_number(&typed);
                    return KeyOutcome {
                        cell: Compatible::new(cell.cell().clone(), typed, value),
                        enable_edit_mode: true,
                    };
                }
            }
        }
        KeyOutcome {
            cell: cell.clone(),
            enable_edit_mode: matches!(event.key, Key::Enter | Key::F2 | Key::Pointer),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_text_follows_value() {
        let c = NumberCellTemplate.get_compatible_cell(&Cell::number(4.5)).unwrap();
        assert_eq!(c.text(), "4.5");
        let c = NumberCellTemplate.get_compatible_cell(&Cell::new("number")).unwrap();
        assert_eq!(c.text(), "");
        assert!(c.value().is_nan());
    }

    #[test]
    fn test_update_from_text_cell() {
        let t = NumberCellTemplate;
        let prev = t.get_compatible_cell(&Cell::number(1.0)).unwrap();
        let pasted = Compatible::new(Cell::text("1,250"), "1,250", f64::NAN);
        assert_eq!(t.update(&prev, &pasted).unwrap().value(), 1250.0);
        let other = t.get_compatible_cell(&Cell::number(7.0)).unwrap();
        assert_eq!(t.update(&prev, &other).unwrap().text(), "7");
    }

    #[test]
    fn test_only_numeric_keys_open_editor() {
        let c = NumberCellTemplate.get_compatible_cell(&Cell::number(1.0)).unwrap();
        assert!(NumberCellTemplate.handle_key_down(&c, &KeyboardEvent::new(Key::Char('5'))).enable_edit_mode);
        assert!(!NumberCellTemplate.handle_key_down(&c, &KeyboardEvent::new(Key::Char('q'))).enable_edit_mode);
    }
}
