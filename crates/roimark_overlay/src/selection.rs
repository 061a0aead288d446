//! Single-annotation selection and pointer hit testing.

use crate::geometry::{Handle, ImagePoint};
use crate::model::AnnotationId;
use crate::store::AnnotationStore;

/// The selected annotation of the displayed image, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<AnnotationId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<AnnotationId> {
        self.selected
    }

    pub fn is_selected(&self, id: AnnotationId) -> bool {
        self.selected == Some(id)
    }

    /// Select an annotation. Returns true if the selection changed.
    pub fn select(&mut self, id: AnnotationId) -> bool {
        let changed = self.selected != Some(id);
        self.selected = Some(id);
        changed
    }

    /// Clear the selection. Returns true if something was selected.
    pub fn clear(&mut self) -> bool {
        self.selected.take().is_some()
    }

    /// Clear the selection if it refers to `id`.
    pub fn forget(&mut self, id: AnnotationId) -> bool {
        if self.selected == Some(id) {
            self.selected = None;
            true
        } else {
            false
        }
    }
}

/// What a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Empty overlay background
    Background,
    /// The body of an annotation
    Body(AnnotationId),
    /// A corner handle of the selected annotation
    Handle(AnnotationId, Handle),
}

impl PointerTarget {
    /// The annotation under the pointer, whether body or handle.
    pub fn annotation(&self) -> Option<AnnotationId> {
        match self {
            PointerTarget::Background => None,
            PointerTarget::Body(id) | PointerTarget::Handle(id, _) => Some(*id),
        }
    }
}

/// Resolve what lies under `point`.
///
/// Handles exist only on the selected annotation and sit above every body.
pub fn hit_test(
    store: &AnnotationStore,
    selection: &Selection,
    point: ImagePoint,
    handle_size: i32,
) -> PointerTarget {
    if let Some(annotation) = selection.selected().and_then(|id| store.get(id)) {
        if let Some(handle) = Handle::ALL
            .into_iter()
            .find(|h| h.hit(&annotation.rect, point, handle_size))
        {
            return PointerTarget::Handle(annotation.id, handle);
        }
    }

    match store.hit_test(point) {
        Some(id) => PointerTarget::Body(id),
        None => PointerTarget::Background,
    }
}
