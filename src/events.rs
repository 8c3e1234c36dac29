//! Platform-neutral input events.
//!
//! Hosts translate their native pointer/keyboard events into these before
//! handing them to [`Grid`](crate::Grid). Pointer coordinates are client
//! coordinates; the grid subtracts its bounds to get viewport coordinates.

use serde::{Deserialize, Serialize};

/// Width in pixels of the resize grip at the trailing edge of a header cell
pub const RESIZE_HANDLE_WIDTH: f64 = 11.0;

/// Logical key, decoded from the DOM `key` string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Key {
    Enter,
    Tab,
    Escape,
    Backspace,
    Delete,
    Space,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    F2,
    /// Synthetic key sent to templates when a cell is double-clicked
    Pointer,
    /// A printable character
    Char(char),
    Other(String),
}

impl Key {
    /// Whether typing this key should start editing with it as content
    pub fn printable(&self) -> Option<char> {
        match self {
            Key::Char(c) => Some(*c),
            Key::Space => Some(' '),
            _ => None,
        }
    }

    pub fn is_arrow(&self) -> bool {
        matches!(
            self,
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight
        )
    }
}

impl From<&str> for Key {
    fn from(key: &str) -> Self {
        match key {
            "Enter" => Key::Enter,
            "Tab" => Key::Tab,
            "Escape" | "Esc" => Key::Escape,
            "Backspace" => Key::Backspace,
            "Delete" | "Del" => Key::Delete,
            " " | "Space" | "Spacebar" => Key::Space,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Home" => Key::Home,
            "End" => Key::End,
            "PageUp" => Key::PageUp,
            "PageDown" => Key::PageDown,
            "F2" => Key::F2,
            "DoubleClick" => Key::Pointer,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other(other.to_string()),
                }
            }
        }
    }
}

impl From<String> for Key {
    fn from(key: String) -> Self {
        Key::from(key.as_str())
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        match key {
            Key::Enter => "Enter".into(),
            Key::Tab => "Tab".into(),
            Key::Escape => "Escape".into(),
            Key::Backspace => "Backspace".into(),
            Key::Delete => "Delete".into(),
            Key::Space => " ".into(),
            Key::ArrowUp => "ArrowUp".into(),
            Key::ArrowDown => "ArrowDown".into(),
            Key::ArrowLeft => "ArrowLeft".into(),
            Key::ArrowRight => "ArrowRight".into(),
            Key::Home => "Home".into(),
            Key::End => "End".into(),
            Key::PageUp => "PageUp".into(),
            Key::PageDown => "PageDown".into(),
            Key::F2 => "F2".into(),
            Key::Pointer => "DoubleClick".into(),
            Key::Char(c) => c.to_string(),
            Key::Other(s) => s,
        }
    }
}

/// Keyboard event with modifier state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyboardEvent {
    pub key: Key,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
    #[serde(default)]
    pub caps_lock: bool,
}

impl KeyboardEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
            alt: false,
            meta: false,
            caps_lock: false,
        }
    }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Ctrl on most platforms, Cmd on macOS
    pub fn selection_key(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Kind of device behind a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerType {
    #[default]
    Mouse,
    Touch,
    Pen,
}

/// What the host's hit testing found under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointerTarget {
    /// A grid cell (resize grips are resolved from geometry)
    #[default]
    Cell,
    /// The fill handle at the corner of the active range
    FillHandle,
}

/// Pointer event in client coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerEvent {
    pub client_x: f64,
    pub client_y: f64,
    #[serde(default)]
    pub pointer_type: PointerType,
    #[serde(default)]
    pub target: PointerTarget,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl PointerEvent {
    pub fn new(client_x: f64, client_y: f64) -> Self {
        Self {
            client_x,
            client_y,
            pointer_type: PointerType::Mouse,
            target: PointerTarget::Cell,
            ctrl: false,
            shift: false,
            alt: false,
            meta: false,
        }
    }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: PointerTarget) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn with_pointer_type(mut self, pointer_type: PointerType) -> Self {
        self.pointer_type = pointer_type;
        self
    }

    /// Ctrl on most platforms, Cmd on macOS
    pub fn selection_key(&self) -> bool {
        self.ctrl || self.meta
    }
}
