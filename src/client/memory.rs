//! In-memory label store with the remote service's semantics.

use std::collections::HashSet;

use roimark_overlay::{Annotation, AnnotationId, AnnotationPatch, ImageKey, NewAnnotation, SyncError};

use super::AnnotationClient;
use super::wire::{LabelCreate, LabelResponse};

/// Label store kept in memory.
///
/// Like the real service it only accepts labels for registered (uploaded)
/// images, and lists nothing for images it does not know. Failures can be
/// switched on to exercise the viewer's error paths.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    /// Images labels may be created for
    images: HashSet<ImageKey>,
    /// Stored labels in creation order
    labels: Vec<LabelResponse>,
    next_id: AnnotationId,
    /// Every call fails with a network error
    offline: bool,
    /// Creates, updates and deletes fail with a network error
    fail_mutations: bool,
    /// Number of calls received
    calls: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            images: HashSet::new(),
            labels: Vec::new(),
            next_id: 1,
            offline: false,
            fail_mutations: false,
            calls: 0,
        }
    }

    /// Seed the store with existing labels. Their images are registered too.
    pub fn with_labels(mut self, labels: Vec<LabelResponse>) -> Self {
        for label in labels {
            self.images.insert(label.key());
            self.next_id = self.next_id.max(label.id + 1);
            self.labels.push(label);
        }
        self
    }

    /// Make labels for an image acceptable.
    pub fn register_image(&mut self, key: ImageKey) {
        log::debug!("MemoryStore: registered {} ({})", key.filename, key.instance_uid);
        self.images.insert(key);
    }

    pub fn is_registered(&self, key: &ImageKey) -> bool {
        self.images.contains(key)
    }

    pub fn labels(&self) -> &[LabelResponse] {
        &self.labels
    }

    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn set_fail_mutations(&mut self, fail: bool) {
        self.fail_mutations = fail;
    }

    pub fn calls(&self) -> usize {
        self.calls
    }

    fn check(&mut self, mutation: bool) -> Result<(), SyncError> {
        self.calls += 1;
        if self.offline {
            return Err(SyncError::network("store is offline"));
        }
        if mutation && self.fail_mutations {
            return Err(SyncError::network("connection reset"));
        }
        Ok(())
    }

    fn find_mut(&mut self, id: AnnotationId) -> Result<&mut LabelResponse, SyncError> {
        self.labels
            .iter_mut()
            .find(|label| label.id == id)
            .ok_or_else(|| SyncError::not_found(format!("label {}", id)))
    }
}

impl AnnotationClient for MemoryStore {
    fn list(&mut self, key: &ImageKey) -> Result<Vec<Annotation>, SyncError> {
        self.check(false)?;
        if !self.images.contains(key) {
            log::debug!("MemoryStore: {} is not registered, listing nothing", key.filename);
            return Ok(Vec::new());
        }
        Ok(self
            .labels
            .iter()
            .filter(|label| label.belongs_to(key))
            .cloned()
            .map(Annotation::from)
            .collect())
    }

    fn create(&mut self, draft: &NewAnnotation) -> Result<Annotation, SyncError> {
        self.check(true)?;
        if !self.images.contains(&draft.image) {
            return Err(SyncError::not_found(format!("file {}", draft.image.filename)));
        }

        let id = self.next_id;
        self.next_id += 1;
        let label = LabelCreate::from(draft).into_response(id);
        self.labels.push(label.clone());
        log::debug!("MemoryStore: created label {}", id);
        Ok(label.into())
    }

    fn update(
        &mut self,
        id: AnnotationId,
        patch: &AnnotationPatch,
    ) -> Result<Annotation, SyncError> {
        self.check(true)?;
        let label = self.find_mut(id)?;
        label.apply(patch);
        Ok(label.clone().into())
    }

    fn delete(&mut self, id: AnnotationId) -> Result<(), SyncError> {
        self.check(true)?;
        let index = self
            .labels
            .iter()
            .position(|label| label.id == id)
            .ok_or_else(|| SyncError::not_found(format!("label {}", id)))?;
        self.labels.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roimark_overlay::Rect;

    fn key() -> ImageKey {
        ImageKey::new("IM0001.dcm", "1.2.840.1")
    }

    fn draft(rect: Rect) -> NewAnnotation {
        NewAnnotation {
            image: key(),
            label: "nodule".to_string(),
            rect,
        }
    }

    #[test]
    fn test_create_requires_registered_image() {
        let mut store = MemoryStore::new();
        let err = store.create(&draft(Rect::new(0, 0, 20, 20))).unwrap_err();
        assert!(err.is_not_found());

        store.register_image(key());
        let created = store.create(&draft(Rect::new(0, 0, 20, 20))).unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(store.list(&key()).unwrap(), vec![created]);
    }

    #[test]
    fn test_list_unknown_image_is_empty() {
        let mut store = MemoryStore::new();
        assert!(store.list(&key()).unwrap().is_empty());
    }

    #[test]
    fn test_list_filters_by_instance() {
        let mut store = MemoryStore::new();
        store.register_image(key());
        let other = ImageKey::new("IM0001.dcm", "9.9.9");
        store.register_image(other.clone());
        store.create(&draft(Rect::new(0, 0, 20, 20))).unwrap();

        assert_eq!(store.list(&key()).unwrap().len(), 1);
        assert!(store.list(&other).unwrap().is_empty());
    }

    #[test]
    fn test_update_and_delete() {
        let mut store = MemoryStore::new();
        store.register_image(key());
        let created = store.create(&draft(Rect::new(0, 0, 20, 20))).unwrap();

        let updated = store
            .update(created.id, &AnnotationPatch::geometry(Rect::new(1, 1, 30, 30)))
            .unwrap();
        assert_eq!(updated.rect, Rect::new(1, 1, 30, 30));

        store.delete(created.id).unwrap();
        assert!(store.labels().is_empty());
        assert!(store.delete(created.id).unwrap_err().is_not_found());
        assert!(
            store
                .update(created.id, &AnnotationPatch::relabel("x"))
                .unwrap_err()
                .is_not_found()
        );
    }

    #[test]
    fn test_seeded_ids_continue() {
        let seeded = LabelCreate::from(&draft(Rect::new(0, 0, 20, 20))).into_response(41);
        let mut store = MemoryStore::new().with_labels(vec![seeded]);
        let created = store.create(&draft(Rect::new(5, 5, 20, 20))).unwrap();
        assert_eq!(created.id, 42);
    }

    #[test]
    fn test_failure_switches() {
        let mut store = MemoryStore::new();
        store.register_image(key());
        store.set_fail_mutations(true);
        assert!(store.list(&key()).is_ok());
        assert!(matches!(
            store.create(&draft(Rect::new(0, 0, 20, 20))),
            Err(SyncError::Network { .. })
        ));

        store.set_offline(true);
        assert!(store.list(&key()).is_err());
        assert_eq!(store.calls(), 3);
    }
}
