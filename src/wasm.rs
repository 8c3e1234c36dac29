//! WASM-exported `WasmGrid` wrapping [`Grid`] for browser hosts.
//!
//! Props, events and clipboard payloads cross the boundary as plain JS
//! objects (camelCase, via `serde-wasm-bindgen`). Callbacks are looked up by
//! name on a JS object passed to the constructor:
//!
//! ```javascript
//! const grid = new WasmGrid(props, {
//!   onCellsChanged: (changes) => save(changes),
//!   onSelectionChanging: (ranges) => ranges.length < 5,
//! });
//! grid.setBounds(rect.left, rect.top, rect.width, rect.height);
//! canvas.onpointerdown = (e) => grid.pointerDown({ clientX: e.clientX, clientY: e.clientY });
//! ```

use std::rc::Rc;

use js_sys::{Function, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::events::{KeyboardEvent, PointerEvent};
use crate::grid::Grid;
use crate::state::clipboard::ClipboardPayload;
use crate::state::{Bounds, GridCallbacks, GridProps};
use crate::types::{CellLocation, DropPosition, Id};

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Function stored under `name` on `callbacks`, if any
fn callback(callbacks: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(callbacks, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

/// Call a JS predicate; anything but an explicit `false` allows
fn allows(result: Result<JsValue, JsValue>) -> bool {
    result.map_or(true, |v| v.as_bool() != Some(false))
}

fn reorder_args(target: &Id, ids: &[Id], position: DropPosition) -> (JsValue, JsValue, JsValue) {
    (to_js(target), to_js(ids), to_js(&position))
}

fn js_callbacks(callbacks: &JsValue) -> GridCallbacks {
    let mut out = GridCallbacks::default();
    if let Some(f) = callback(callbacks, "onCellsChanged") {
        out = out.on_cells_changed(move |changes| {
            let _ = f.call1(&JsValue::NULL, &to_js(changes));
        });
    }
    if let Some(f) = callback(callbacks, "onFocusLocationChanged") {
        out = out.on_focus_location_changed(move |location: &CellLocation| {
            let _ = f.call1(&JsValue::NULL, &to_js(location));
        });
    }
    if let Some(f) = callback(callbacks, "onFocusLocationChanging") {
        out = out.on_focus_location_changing(move |location: &CellLocation| {
            allows(f.call1(&JsValue::NULL, &to_js(location)))
        });
    }
    if let Some(f) = callback(callbacks, "onSelectionChanged") {
        out = out.on_selection_changed(move |ranges| {
            let _ = f.call1(&JsValue::NULL, &to_js(ranges));
        });
    }
    if let Some(f) = callback(callbacks, "onSelectionChanging") {
        out = out.on_selection_changing(move |ranges| allows(f.call1(&JsValue::NULL, &to_js(ranges))));
    }
    if let Some(f) = callback(callbacks, "onRowsReordered") {
        out = out.on_rows_reordered(move |target, ids, position| {
            let (a, b, c) = reorder_args(target, ids, position);
            let _ = f.call3(&JsValue::NULL, &a, &b, &c);
        });
    }
    if let Some(f) = callback(callbacks, "onColumnsReordered") {
        out = out.on_columns_reordered(move |target, ids, position| {
            let (a, b, c) = reorder_args(target, ids, position);
            let _ = f.call3(&JsValue::NULL, &a, &b, &c);
        });
    }
    if let Some(f) = callback(callbacks, "canReorderRows") {
        out = out.can_reorder_rows(move |target, ids, position| {
            let (a, b, c) = reorder_args(target, ids, position);
            allows(f.call3(&JsValue::NULL, &a, &b, &c))
        });
    }
    if let Some(f) = callback(callbacks, "canReorderColumns") {
        out = out.can_reorder_columns(move |target, ids, position| {
            let (a, b, c) = reorder_args(target, ids, position);
            allows(f.call3(&JsValue::NULL, &a, &b, &c))
        });
    }
    if let Some(f) = callback(callbacks, "onColumnResized") {
        out = out.on_column_resized(move |id, width, selected| {
            let _ = f.call3(&JsValue::NULL, &to_js(id), &JsValue::from_f64(width), &to_js(selected));
        });
    }
    if let Some(f) = callback(callbacks, "onRowResized") {
        out = out.on_row_resized(move |id, height, selected| {
            let _ = f.call3(&JsValue::NULL, &to_js(id), &JsValue::from_f64(height), &to_js(selected));
        });
    }
    if let Some(f) = callback(callbacks, "onContextMenu") {
        out = out.on_context_menu(move |request| {
            let _ = f.call1(&JsValue::NULL, &to_js(request));
        });
    }
    out
}

#[wasm_bindgen]
pub struct WasmGrid {
    grid: Grid,
    callbacks: Rc<JsValue>,
}

#[wasm_bindgen]
impl WasmGrid {
    /// Create a grid from props and a callbacks object.
    ///
    /// # Errors
    /// Returns an error if the props cannot be deserialized or applied.
    #[wasm_bindgen(constructor)]
    pub fn new(props: JsValue, callbacks: JsValue) -> Result<WasmGrid, JsValue> {
        console_error_panic_hook::set_once();
        let props: GridProps = serde_wasm_bindgen::from_value(props).map_err(js_err)?;
        let grid = Grid::new(props.with_callbacks(js_callbacks(&callbacks))).map_err(js_err)?;
        Ok(WasmGrid {
            grid,
            callbacks: Rc::new(callbacks),
        })
    }

    /// Replace props, keeping the callbacks given at construction.
    ///
    /// # Errors
    /// Returns an error if the props cannot be deserialized or applied.
    #[wasm_bindgen(js_name = setProps)]
    pub fn set_props(&mut self, props: JsValue) -> Result<(), JsValue> {
        let props: GridProps = serde_wasm_bindgen::from_value(props).map_err(js_err)?;
        self.grid
            .set_props(props.with_callbacks(js_callbacks(&self.callbacks)))
            .map_err(js_err)
    }

    #[wasm_bindgen(js_name = setBounds)]
    pub fn set_bounds(&mut self, left: f64, top: f64, width: f64, height: f64) {
        self.grid.set_bounds(Bounds::new(left, top, width, height));
    }

    #[wasm_bindgen(js_name = scrollTo)]
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.grid.scroll_to(x, y);
    }

    /// # Errors
    /// Returns an error if the event object is malformed.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, event: JsValue) -> Result<(), JsValue> {
        let event: PointerEvent = serde_wasm_bindgen::from_value(event).map_err(js_err)?;
        self.grid.pointer_down(&event);
        Ok(())
    }

    /// # Errors
    /// Returns an error if the event object is malformed.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, event: JsValue) -> Result<(), JsValue> {
        let event: PointerEvent = serde_wasm_bindgen::from_value(event).map_err(js_err)?;
        self.grid.pointer_move(&event);
        Ok(())
    }

    /// # Errors
    /// Returns an error if the event object is malformed.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, event: JsValue) -> Result<(), JsValue> {
        let event: PointerEvent = serde_wasm_bindgen::from_value(event).map_err(js_err)?;
        self.grid.pointer_up(&event);
        Ok(())
    }

    /// # Errors
    /// Returns an error if the event object is malformed.
    #[wasm_bindgen(js_name = doubleClick)]
    pub fn double_click(&mut self, event: JsValue) -> Result<(), JsValue> {
        let event: PointerEvent = serde_wasm_bindgen::from_value(event).map_err(js_err)?;
        self.grid.double_click(&event);
        Ok(())
    }

    /// # Errors
    /// Returns an error if the event object is malformed.
    #[wasm_bindgen(js_name = contextMenu)]
    pub fn context_menu(&mut self, event: JsValue) -> Result<(), JsValue> {
        let event: PointerEvent = serde_wasm_bindgen::from_value(event).map_err(js_err)?;
        self.grid.context_menu(&event);
        Ok(())
    }

    /// # Errors
    /// Returns an error if the event object is malformed.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, event: JsValue) -> Result<(), JsValue> {
        let event: KeyboardEvent = serde_wasm_bindgen::from_value(event).map_err(js_err)?;
        self.grid.key_down(&event);
        Ok(())
    }

    /// # Errors
    /// Returns an error if the event object is malformed.
    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&mut self, event: JsValue) -> Result<(), JsValue> {
        let event: KeyboardEvent = serde_wasm_bindgen::from_value(event).map_err(js_err)?;
        self.grid.key_up(&event);
        Ok(())
    }

    #[wasm_bindgen(js_name = compositionEnd)]
    pub fn composition_end(&mut self, data: &str) {
        self.grid.composition_end(data);
    }

    /// Copy the active range; returns `{ text, cellsJson }`
    pub fn copy(&mut self) -> JsValue {
        to_js(&self.grid.copy())
    }

    pub fn cut(&mut self) -> JsValue {
        to_js(&self.grid.cut())
    }

    /// Paste `{ text, cellsJson }`; plain text from other apps is accepted
    /// as `{ text }`.
    ///
    /// # Errors
    /// Returns an error if the payload object is malformed.
    pub fn paste(&mut self, payload: JsValue) -> Result<(), JsValue> {
        let payload: ClipboardPayload = serde_wasm_bindgen::from_value(payload).map_err(js_err)?;
        self.grid.paste(&payload);
        Ok(())
    }

    #[wasm_bindgen(js_name = clearSelections)]
    pub fn clear_selections(&mut self) {
        self.grid.clear_selections();
    }

    /// Current session (focus, selection, editor, drag preview) for rendering
    pub fn snapshot(&self) -> JsValue {
        to_js(&self.grid.snapshot())
    }

    /// Rows and columns the renderer has to draw
    #[wasm_bindgen(js_name = visibleRange)]
    pub fn visible_range(&self) -> JsValue {
        let state = self.grid.state();
        to_js(&state.viewport.visible_range(
            &state.cell_matrix,
            state.options.disable_virtual_scrolling,
        ))
    }
}
