//! CLI tool for cellgrid - replays a scripted session and prints the result
//!
//! Usage:
//!   grid_replay <script.json>              # Output JSON to stdout
//!   grid_replay <script.json> -o out.json  # Output JSON to file
//!
//! The script holds grid props, the grid bounds and a list of events:
//!
//! ```json
//! {
//!   "props": { "columns": [...], "rows": [...], "enableFillHandle": true },
//!   "bounds": { "left": 0, "top": 0, "width": 800, "height": 600 },
//!   "events": [
//!     { "type": "pointerDown", "clientX": 10, "clientY": 10 },
//!     { "type": "pointerUp", "clientX": 10, "clientY": 10 },
//!     { "type": "keyDown", "key": "x" }
//!   ]
//! }
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `warn`).

use std::cell::RefCell;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;
use std::rc::Rc;

use cellgrid::grid::Snapshot;
use cellgrid::{Bounds, ClipboardPayload, Grid, GridCallbacks, GridProps, KeyboardEvent, PointerEvent};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Script {
    props: GridProps,
    bounds: Bounds,
    #[serde(default)]
    events: Vec<ReplayEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum ReplayEvent {
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    DoubleClick(PointerEvent),
    ContextMenu(PointerEvent),
    KeyDown(KeyboardEvent),
    KeyUp(KeyboardEvent),
    CompositionEnd { data: String },
    Scroll { x: f64, y: f64 },
    Copy,
    Cut,
    Paste(ClipboardPayload),
    ClearSelections,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Output {
    snapshot: Snapshot,
    /// Callback invocations in order
    notifications: Vec<Value>,
    /// Payloads produced by copy/cut events
    clipboard: Vec<ClipboardPayload>,
}

type Log = Rc<RefCell<Vec<Value>>>;

fn recording_callbacks(log: &Log) -> GridCallbacks {
    let record = |log: &Log, name: &'static str| {
        let log = Rc::clone(log);
        move |payload: Value| log.borrow_mut().push(json!({ "callback": name, "payload": payload }))
    };
    let cells = record(log, "onCellsChanged");
    let focus = record(log, "onFocusLocationChanged");
    let selection = record(log, "onSelectionChanged");
    let rows = record(log, "onRowsReordered");
    let columns = record(log, "onColumnsReordered");
    let column_resized = record(log, "onColumnResized");
    let row_resized = record(log, "onRowResized");
    let menu = record(log, "onContextMenu");
    GridCallbacks::default()
        .on_cells_changed(move |changes| cells(json!(changes)))
        .on_focus_location_changed(move |location| focus(json!(location)))
        .on_selection_changed(move |ranges| selection(json!(ranges)))
        .on_rows_reordered(move |target, ids, position| rows(json!([target, ids, position])))
        .on_columns_reordered(move |target, ids, position| columns(json!([target, ids, position])))
        .on_column_resized(move |id, width, ids| column_resized(json!([id, width, ids])))
        .on_row_resized(move |id, height, ids| row_resized(json!([id, height, ids])))
        .on_context_menu(move |request| menu(json!(request)))
}

fn replay(script: Script) -> cellgrid::Result<Output> {
    let log: Log = Rc::default();
    let props = script.props.with_callbacks(recording_callbacks(&log));
    let mut grid = Grid::new(props)?;
    grid.set_bounds(script.bounds);

    let mut clipboard = Vec::new();
    for event in &script.events {
        tracing::debug!(?event, "replaying");
        match event {
            ReplayEvent::PointerDown(e) => grid.pointer_down(e),
            ReplayEvent::PointerMove(e) => grid.pointer_move(e),
            ReplayEvent::PointerUp(e) => grid.pointer_up(e),
            ReplayEvent::DoubleClick(e) => grid.double_click(e),
            ReplayEvent::ContextMenu(e) => grid.context_menu(e),
            ReplayEvent::KeyDown(e) => grid.key_down(e),
            ReplayEvent::KeyUp(e) => grid.key_up(e),
            ReplayEvent::CompositionEnd { data } => grid.composition_end(data),
            ReplayEvent::Scroll { x, y } => grid.scroll_to(*x, *y),
            ReplayEvent::Copy => clipboard.push(grid.copy()),
            ReplayEvent::Cut => clipboard.push(grid.cut()),
            ReplayEvent::Paste(payload) => grid.paste(payload),
            ReplayEvent::ClearSelections => grid.clear_selections(),
        }
    }

    let notifications = log.borrow().clone();
    Ok(Output {
        snapshot: grid.snapshot(),
        notifications,
        clipboard,
    })
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init();

    let args: Vec<String> = env::args().collect();
    let Some(input_path) = args.get(1) else {
        eprintln!("Usage: grid_replay <script.json> [-o output.json]");
        return ExitCode::FAILURE;
    };
    let output_path = match (args.get(2).map(String::as_str), args.get(3)) {
        (Some("-o"), Some(path)) => Some(path),
        _ => None,
    };

    let text = match fs::read_to_string(input_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error reading {input_path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let script: Script = match serde_json::from_str(&text) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error parsing script: {e}");
            return ExitCode::FAILURE;
        }
    };

    let output = match replay(script) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error replaying script: {e}");
            return ExitCode::FAILURE;
        }
    };

    let json = match serde_json::to_string_pretty(&output) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {e}");
            return ExitCode::FAILURE;
        }
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {path}: {e}");
                return ExitCode::FAILURE;
            }
            eprintln!("Written: {path}");
        }
        None => {
            let mut stdout = io::stdout();
            if writeln!(stdout, "{json}").is_err() {
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
