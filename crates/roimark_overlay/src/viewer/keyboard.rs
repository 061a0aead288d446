//! Keyboard shortcuts owned by the viewer.

use serde::{Deserialize, Serialize};

use super::Viewer;
use crate::event::FocusTarget;
use crate::navigation::Direction;

/// An action a keyboard shortcut can trigger on the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutAction {
    /// Delete the selected annotation
    DeleteSelected,
    /// Step to the neighbouring slice
    Step(Direction),
}

impl ShortcutAction {
    pub fn name(&self) -> &'static str {
        match self {
            ShortcutAction::DeleteSelected => "delete selected",
            ShortcutAction::Step(Direction::Previous) => "previous slice",
            ShortcutAction::Step(Direction::Next) => "next slice",
        }
    }
}

impl Viewer {
    /// Run a shortcut. Nothing fires while the text editor has focus, so typing and
    /// caret movement there never delete annotations or change slices.
    ///
    /// Returns true if the action changed anything.
    pub fn handle_shortcut(&mut self, action: ShortcutAction, focus: FocusTarget) -> bool {
        if focus == FocusTarget::TextEditor {
            log::trace!("Viewer: '{}' suppressed in text editor", action.name());
            return false;
        }
        log::debug!("Viewer: shortcut '{}'", action.name());
        match action {
            ShortcutAction::DeleteSelected => self.delete_selected(),
            ShortcutAction::Step(direction) => self.step(direction),
        }
    }
}
