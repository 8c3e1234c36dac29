use super::{CellTemplate, KeyOutcome};
use crate::error::Result;
use crate::events::{Key, KeyboardEvent};
use crate::types::{parse_locale_number, Cell, Compatible};

/// Free text. Typing a printable key replaces the content and opens the editor.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCellTemplate;

impl TextCellTemplate {
    fn with_text(cell: &Compatible, text: String) -> Compatible {
        let value = parse_locale_number(&text);
        Compatible::new(cell.cell().clone(), text, value)
    }
}

impl CellTemplate for TextCellTemplate {
    fn get_compatible_cell(&self, cell: &Cell) -> Result<Compatible> {
        let text = cell.require_text()?.to_string();
        let value = parse_locale_number(&text);
        Ok(Compatible::new(cell.clone(), text, value))
    }

    fn update(&self, cell: &Compatible, incoming: &Compatible) -> Option<Compatible> {
        Some(Self::with_text(cell, incoming.text().to_string()))
    }

    fn handle_key_down(&self, cell: &Compatible, event: &KeyboardEvent) -> KeyOutcome {
        if !event.selection_key() && !event.alt && !(event.shift && event.key == Key::Space) {
            if let Some(c) = event.key.printable() {
                let typed = if event.caps_lock {
                    c.to_uppercase().collect()
                } else {
                    c.to_string()
                };
                return KeyOutcome {
                    cell: Self::with_text(cell, typed),
                    enable_edit_mode: true,
                };
            }
        }
        KeyOutcome {
            cell: cell.clone(),
            enable_edit_mode: matches!(event.key, Key::Enter | Key::F2 | Key::Pointer),
        }
    }

    fn handle_composition_end(&self, cell: &Compatible, data: &str) -> Option<KeyOutcome> {
        Some(KeyOutcome {
            cell: Self::with_text(cell, data.to_string()),
            enable_edit_mode: true,
        })
    }
}
