//! Clients for the remote annotation store.

mod memory;
pub mod wire;

pub use memory::MemoryStore;

use roimark_overlay::{
    Annotation, AnnotationId, AnnotationPatch, ImageKey, NewAnnotation, SyncError, SyncReply,
    SyncRequest,
};

/// Remote CRUD for annotations.
///
/// Implementations only move data; the viewer decides what a failure means
/// (for example, `NotFound` on a list is an empty result).
pub trait AnnotationClient {
    /// Every annotation stored for an image, in store order.
    fn list(&mut self, key: &ImageKey) -> Result<Vec<Annotation>, SyncError>;

    /// Persist a new annotation. The store assigns the id.
    fn create(&mut self, draft: &NewAnnotation) -> Result<Annotation, SyncError>;

    /// Apply a partial update and return the stored result.
    fn update(&mut self, id: AnnotationId, patch: &AnnotationPatch)
    -> Result<Annotation, SyncError>;

    fn delete(&mut self, id: AnnotationId) -> Result<(), SyncError>;

    /// Run a request emitted by the viewer.
    fn execute(&mut self, call: &SyncRequest) -> Result<SyncReply, SyncError> {
        match call {
            SyncRequest::List { key } => self.list(key).map(SyncReply::Listed),
            SyncRequest::Create(draft) => self.create(draft).map(SyncReply::Created),
            SyncRequest::Update { id, patch } => self.update(*id, patch).map(SyncReply::Updated),
            SyncRequest::Delete { id } => self.delete(*id).map(|()| SyncReply::Deleted),
        }
    }
}
