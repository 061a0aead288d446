//! In-memory annotation collection for the currently displayed image.

use crate::geometry::{ImagePoint, Rect};
use crate::model::{Annotation, AnnotationId, ImageKey};

/// Ordered annotations of the displayed image.
///
/// Order is the remote store's order followed by annotations created during this
/// visit; later entries are drawn on top. Switching images discards everything.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    /// Image the current contents were loaded for
    image: Option<ImageKey>,
    /// Annotations in display order
    annotations: Vec<Annotation>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection with a freshly fetched list.
    pub fn load(&mut self, image: ImageKey, annotations: Vec<Annotation>) {
        log::debug!(
            "Store: loaded {} annotations for {}",
            annotations.len(),
            image.filename
        );
        self.image = Some(image);
        self.annotations = annotations;
    }

    /// Discard all annotations and forget the image.
    pub fn clear(&mut self) {
        self.image = None;
        self.annotations.clear();
    }

    /// The image the collection belongs to, once loaded.
    pub fn image(&self) -> Option<&ImageKey> {
        self.image.as_ref()
    }

    /// Append a persisted annotation. An entry with the same id is replaced in place.
    pub fn add(&mut self, annotation: Annotation) {
        match self.position(annotation.id) {
            Some(index) => self.annotations[index] = annotation,
            None => self.annotations.push(annotation),
        }
    }

    /// Put an annotation back at a given position (clamped to the end).
    pub fn insert_at(&mut self, index: usize, annotation: Annotation) {
        if self.position(annotation.id).is_some() {
            return;
        }
        let index = index.min(self.annotations.len());
        self.annotations.insert(index, annotation);
    }

    /// Rewrite an annotation's geometry. Returns the new geometry if the id exists.
    pub fn update_rect(
        &mut self,
        id: AnnotationId,
        update: impl FnOnce(Rect) -> Rect,
    ) -> Option<Rect> {
        let annotation = self.get_mut(id)?;
        annotation.rect = update(annotation.rect);
        Some(annotation.rect)
    }

    /// Remove an annotation, returning its former position and value.
    pub fn remove(&mut self, id: AnnotationId) -> Option<(usize, Annotation)> {
        let index = self.position(id)?;
        Some((index, self.annotations.remove(index)))
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: AnnotationId) -> Option<&mut Annotation> {
        self.annotations.iter_mut().find(|a| a.id == id)
    }

    fn position(&self, id: AnnotationId) -> Option<usize> {
        self.annotations.iter().position(|a| a.id == id)
    }

    /// Get all annotations in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    pub fn as_slice(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Topmost annotation whose body contains the point.
    pub fn hit_test(&self, point: ImagePoint) -> Option<AnnotationId> {
        self.annotations
            .iter()
            .rev()
            .find(|a| a.rect.contains(point))
            .map(|a| a.id)
    }
}
