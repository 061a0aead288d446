//! Input vocabulary delivered to the overlay by its host.

use serde::{Deserialize, Serialize};

use crate::geometry::{OverlayBounds, ScreenPoint};

/// Phase of a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    DoubleClick,
}

/// A pointer event together with the overlay geometry at the moment it fired.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    /// Pointer position in screen space
    pub position: ScreenPoint,
    /// Current screen-space bounds of the overlay container
    pub bounds: OverlayBounds,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: ScreenPoint, bounds: OverlayBounds) -> Self {
        Self {
            kind,
            position,
            bounds,
        }
    }
}

/// Keys the overlay and its host care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Enter,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Char(char),
}

impl Key {
    /// Get the display name for this key.
    pub fn name(&self) -> String {
        match self {
            Key::Delete => "Delete".to_string(),
            Key::Backspace => "Backspace".to_string(),
            Key::Escape => "Escape".to_string(),
            Key::Enter => "Enter".to_string(),
            Key::ArrowLeft => "ArrowLeft".to_string(),
            Key::ArrowRight => "ArrowRight".to_string(),
            Key::ArrowUp => "ArrowUp".to_string(),
            Key::ArrowDown => "ArrowDown".to_string(),
            Key::Char(c) => display_char(*c).to_string(),
        }
    }

    /// Parse a key from its display name. Single characters map to [`Key::Char`].
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "Delete" | "Del" => Key::Delete,
            "Backspace" => Key::Backspace,
            "Escape" | "Esc" => Key::Escape,
            "Enter" | "Return" => Key::Enter,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(fold_char(c)),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

/// Lowercase form of a character key, when that is a single character.
fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Uppercase form for display, kept only if it folds back to `c`.
fn display_char(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) if fold_char(u) == c => u,
        _ => c,
    }
}

/// Where keyboard focus sits when a key is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FocusTarget {
    /// The image viewer or anything that is not a text input
    #[default]
    Overlay,
    /// The free-text report editor; shortcuts must not fire here
    TextEditor,
}

/// A key press and the focus it happened under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub focus: FocusTarget,
}

impl KeyEvent {
    pub fn new(key: Key, focus: FocusTarget) -> Self {
        Self { key, focus }
    }

    /// Key press outside any text input.
    pub fn overlay(key: Key) -> Self {
        Self::new(key, FocusTarget::Overlay)
    }
}
