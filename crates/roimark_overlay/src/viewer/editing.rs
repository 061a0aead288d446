//! Selection and list-panel editing: select, delete and rename.

use super::{PendingOp, Viewer};
use crate::model::{AnnotationId, AnnotationPatch};
use crate::sync::SyncRequest;

impl Viewer {
    /// Select an annotation from the label list, same as clicking its body.
    pub fn select_from_list(&mut self, id: AnnotationId) -> bool {
        if self.store.get(id).is_none() {
            log::warn!("Viewer: cannot select unknown annotation {}", id);
            return false;
        }
        let changed = self.selection.select(id);
        self.dirty |= changed;
        changed
    }

    pub fn clear_selection(&mut self) -> bool {
        let changed = self.selection.clear();
        self.dirty |= changed;
        changed
    }

    /// Delete the selected annotation, if any.
    pub fn delete_selected(&mut self) -> bool {
        match self.selection.selected() {
            Some(id) => self.delete_annotation(id),
            None => false,
        }
    }

    /// Remove an annotation locally and ask the remote store to delete it.
    ///
    /// The local removal happens immediately. Clears the selection if it pointed
    /// at the removed annotation.
    pub fn delete_annotation(&mut self, id: AnnotationId) -> bool {
        let Some((index, annotation)) = self.store.remove(id) else {
            log::debug!("Viewer: delete of unknown annotation {}", id);
            return false;
        };
        self.selection.forget(id);
        if self.gesture.session().targets(id) {
            self.gesture.cancel();
        }
        self.dirty = true;

        log::info!("Viewer: deleting annotation {} ({})", id, annotation.label);
        self.send(
            SyncRequest::Delete { id },
            PendingOp::Delete { index, annotation },
        );
        true
    }

    /// Change an annotation's label and persist it.
    pub fn rename_annotation(&mut self, id: AnnotationId, label: impl Into<String>) -> bool {
        let label = label.into();
        let Some(annotation) = self.store.get_mut(id) else {
            log::warn!("Viewer: cannot rename unknown annotation {}", id);
            return false;
        };
        if annotation.label == label {
            return false;
        }
        let patch = AnnotationPatch::relabel(label);
        let restore = patch.snapshot(annotation);
        patch.apply_to(annotation);
        self.dirty = true;

        log::info!("Viewer: renaming annotation {}", id);
        self.send_update(id, patch, restore);
        true
    }
}
