//! Copy, cut and paste of the active range.
//!
//! Text is tab-separated, quoted the way spreadsheet clipboards quote it.
//! Alongside the text the grid places the compatible cells as JSON, so a
//! paste back into a grid keeps cell types.

use serde::{Deserialize, Serialize};

use super::{changes, selection, State};
use crate::error::Result;
use crate::layout::{Location, Range};
use crate::types::{parse_locale_number, Cell, Compatible};

/// What the host puts on (or reads from) the system clipboard
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardPayload {
    /// `text/plain` content
    #[serde(default)]
    pub text: String,
    /// JSON array of rows of cells; empty when the source was not a grid
    #[serde(default)]
    pub cells_json: String,
}

impl ClipboardPayload {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cells_json: String::new(),
        }
    }
}

/// Copy the active range and remember it as the copy source
///
/// # Errors
/// Fails when a cell cannot be resolved by its template.
pub fn copy(mut state: State) -> Result<(State, ClipboardPayload)> {
    let Some(range) = state.active_selected_range().cloned() else {
        return Ok((state, ClipboardPayload::default()));
    };
    let payload = payload_for(&state, &range)?;
    tracing::debug!(
        rows = range.rows.len(),
        columns = range.columns.len(),
        "copied range"
    );
    state.copy_range = Some(range);
    Ok((state, payload))
}

/// Copy, then empty every cell of the active range
///
/// # Errors
/// Fails when a cell cannot be resolved by its template.
pub fn cut(state: State) -> Result<(State, ClipboardPayload)> {
    let (mut state, payload) = copy(state)?;
    let Some(range) = state.copy_range.clone() else {
        return Ok((state, payload));
    };
    let (empty, _) = state.cell_templates.compatible(&Cell::empty())?;
    for location in range.locations() {
        state = changes::try_append_change(state, &location, empty.clone())?;
    }
    Ok((state, payload))
}

/// Paste into the active range.
///
/// A single pasted cell fills the whole range. Larger blocks are laid out
/// from the range's top-left corner, dropping what falls outside the
/// matrix, and the pasted block becomes the selection unless the host
/// vetoes it.
///
/// # Errors
/// Fails when a pasted or target cell cannot be resolved by its template.
pub fn paste(mut state: State, payload: &ClipboardPayload) -> Result<State> {
    let Some(active) = state.active_selected_range().cloned() else {
        return Ok(state);
    };
    let Some(origin) = active.first() else {
        return Ok(state);
    };
    let rows = pasted_rows(&state, payload)?;

    if let [row] = rows.as_slice() {
        if let [cell] = row.as_slice() {
            for location in active.locations() {
                state = changes::try_append_change(state, &location, cell.clone())?;
            }
            return Ok(state);
        }
    }

    let matrix = std::sync::Arc::clone(&state.cell_matrix);
    let mut last: Option<Location> = None;
    for (i, row) in rows.iter().enumerate() {
        for (j, cell) in row.iter().enumerate() {
            let Some(location) = matrix.get_location(origin.row.idx + i, origin.column.idx + j)
            else {
                continue;
            };
            state = changes::try_append_change(state, &location, cell.clone())?;
            last = Some(match last {
                Some(prev) => matrix
                    .get_location(
                        prev.row.idx.max(location.row.idx),
                        prev.column.idx.max(location.column.idx),
                    )
                    .unwrap_or(location),
                None => location,
            });
        }
    }
    let Some(last) = last else {
        return Ok(state);
    };

    let pasted = matrix.get_range(&origin, &last);
    let callbacks = state.callbacks();
    let candidate = [pasted];
    let allowed = callbacks
        .on_selection_changing
        .as_ref()
        .map_or(true, |veto| veto(&candidate));
    if allowed {
        if let Some(notify) = &callbacks.on_selection_changed {
            notify(&candidate);
        }
        let [pasted] = candidate;
        state = selection::select_range(state, pasted, false);
    }
    Ok(state)
}

fn payload_for(state: &State, range: &Range) -> Result<ClipboardPayload> {
    let mut text = String::new();
    let mut cells: Vec<Vec<Compatible>> = Vec::with_capacity(range.rows.len());
    for (i, row) in range.rows.iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        let mut out = Vec::with_capacity(range.columns.len());
        for (j, column) in range.columns.iter().enumerate() {
            if j > 0 {
                text.push('\t');
            }
            let location = Location::new(row.clone(), column.clone());
            let (cell, _) = state.get_compatible_cell_and_template(&location)?;
            text.push_str(&escape_cell_value(cell.text()));
            out.push(cell);
        }
        cells.push(out);
    }
    Ok(ClipboardPayload {
        text,
        cells_json: serde_json::to_string(&cells)?,
    })
}

fn pasted_rows(state: &State, payload: &ClipboardPayload) -> Result<Vec<Vec<Compatible>>> {
    if !payload.cells_json.is_empty() {
        match serde_json::from_str::<Vec<Vec<Cell>>>(&payload.cells_json) {
            Ok(rows) => {
                let mut out = Vec::with_capacity(rows.len());
                for row in &rows {
                    let cells = row
                        .iter()
                        .map(|cell| state.cell_templates.compatible(cell).map(|(c, _)| c))
                        .collect::<Result<Vec<_>>>()?;
                    out.push(cells);
                }
                return Ok(out);
            }
            Err(err) => tracing::debug!(%err, "clipboard cells unreadable, falling back to text"),
        }
    }
    Ok(parse_tsv(&payload.text)
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|text| {
                    let value = parse_locale_number(&text);
                    Compatible::new(Cell::text(text.clone()), text, value)
                })
                .collect()
        })
        .collect())
}

/// Quote a value containing tabs, newlines or quotes; double inner quotes
pub fn escape_cell_value(value: &str) -> String {
    let needs_quoting = value.contains(['\t', '\n', '\r', '"']);
    if needs_quoting {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Split clipboard text into rows of fields, undoing [`escape_cell_value`].
/// One trailing line break is ignored.
pub fn parse_tsv(text: &str) -> Vec<Vec<String>> {
    let text = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text);
    if text.is_empty() {
        return Vec::new();
    }

    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    quoted = false;
                }
            }
            '"' if field.is_empty() => quoted = true,
            '\t' if !quoted => row.push(std::mem::take(&mut field)),
            '\r' if !quoted && chars.peek() == Some(&'\n') => {}
            '\n' if !quoted => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }
    row.push(field);
    rows.push(row);
    rows
}
