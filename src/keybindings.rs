//! Customizable keybindings for the viewer shortcuts.
//!
//! Keys are stored by name (`"Delete"`, `"ArrowLeft"`, `"D"`) so the config file
//! stays readable.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use roimark_overlay::{Direction, Key, ShortcutAction};

/// Keybinding configuration for the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Delete the selected annotation
    #[serde(with = "key_name")]
    pub delete: Key,
    /// Step to the previous slice
    #[serde(with = "key_name")]
    pub previous: Key,
    /// Step to the next slice
    #[serde(with = "key_name")]
    pub next: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            delete: Key::Delete,
            previous: Key::ArrowLeft,
            next: Key::ArrowRight,
        }
    }
}

impl KeyBindings {
    /// Create new keybindings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the action that corresponds to a key press, if any.
    pub fn action_for_key(&self, key: Key) -> Option<ShortcutAction> {
        if key == self.delete {
            Some(ShortcutAction::DeleteSelected)
        } else if key == self.previous {
            Some(ShortcutAction::Step(Direction::Previous))
        } else if key == self.next {
            Some(ShortcutAction::Step(Direction::Next))
        } else {
            None
        }
    }

    /// Get the key bound to an action.
    pub fn key_for_action(&self, action: ShortcutAction) -> Key {
        match action {
            ShortcutAction::DeleteSelected => self.delete,
            ShortcutAction::Step(Direction::Previous) => self.previous,
            ShortcutAction::Step(Direction::Next) => self.next,
        }
    }

    /// Describe the first pair of actions sharing a key, if any.
    pub fn conflict(&self) -> Option<String> {
        let bound = [
            (self.delete, ShortcutAction::DeleteSelected),
            (self.previous, ShortcutAction::Step(Direction::Previous)),
            (self.next, ShortcutAction::Step(Direction::Next)),
        ];
        for (i, (key, action)) in bound.iter().enumerate() {
            if let Some((_, other)) = bound[i + 1..].iter().find(|(k, _)| k == key) {
                return Some(format!(
                    "'{}' is bound to both {} and {}",
                    key.name(),
                    action.name(),
                    other.name()
                ));
            }
        }
        None
    }
}

/// Serialize keys by display name.
pub(crate) mod key_name {
    use super::*;

    pub fn serialize<S: Serializer>(key: &Key, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&key.name())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Key, D::Error> {
        let name = String::deserialize(deserializer)?;
        Key::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown key '{}'", name)))
    }
}
