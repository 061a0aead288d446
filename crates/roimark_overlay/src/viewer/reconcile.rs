//! Applying remote store responses to the local collection.

use super::{Pending, PendingOp, Viewer};
use crate::error::{LoadError, SyncError};
use crate::model::{Annotation, AnnotationId, AnnotationPatch, ImageKey};
use crate::sync::{RequestId, SyncReply};

impl Viewer {
    /// Hand back the outcome of an [`Effect::Sync`](crate::sync::Effect::Sync).
    ///
    /// List results are applied only if the image they were requested for is still
    /// displayed. Create results are dropped after navigation as well. Failed
    /// updates and deletes are logged; local state is left as is unless rollback
    /// is enabled in [`ViewerSettings`](super::ViewerSettings).
    pub fn complete_sync(&mut self, request: RequestId, result: Result<SyncReply, SyncError>) {
        let Some(Pending { generation, op }) = self.pending.remove(&request) else {
            log::warn!("Viewer: completion for unknown request {}", request);
            return;
        };
        let current = generation == self.generation;

        match op {
            PendingOp::List { key } => {
                self.finish_list(current, key, result.and_then(SyncReply::into_listed))
            }
            PendingOp::Create => {
                self.finish_create(current, request, result.and_then(SyncReply::into_created))
            }
            PendingOp::Update { id, restore } => self.finish_update(
                current,
                request,
                id,
                restore,
                result.and_then(SyncReply::into_updated),
            ),
            PendingOp::Delete { index, annotation } => self.finish_delete(
                current,
                request,
                index,
                annotation,
                result.and_then(SyncReply::into_deleted),
            ),
            PendingOp::Resolve { path } => {
                log::warn!(
                    "Viewer: {} resolves image {}, not a sync request",
                    request,
                    path
                );
            }
        }
    }

    fn finish_list(
        &mut self,
        current: bool,
        key: ImageKey,
        result: Result<Vec<Annotation>, SyncError>,
    ) {
        if !current {
            log::debug!("Viewer: dropping stale annotation list for {}", key.filename);
            return;
        }

        let annotations = match result {
            Ok(annotations) => annotations,
            Err(err) if err.is_not_found() => {
                log::debug!("Viewer: no annotations for {}", key.filename);
                Vec::new()
            }
            Err(err) => {
                log::error!(
                    "Viewer: failed to load annotations for {}: {}",
                    key.filename,
                    err
                );
                self.load_error = Some(LoadError::Annotations(err));
                Vec::new()
            }
        };
        log::info!(
            "Viewer: {} annotations on {}",
            annotations.len(),
            key.filename
        );
        // The list replaces the collection. An annotation created while it was in
        // flight may be missing from it until the image is loaded again.
        self.store.load(key, annotations);
        self.dirty = true;
    }

    fn finish_create(
        &mut self,
        current: bool,
        request: RequestId,
        result: Result<Annotation, SyncError>,
    ) {
        match result {
            Ok(annotation) if current => {
                log::info!(
                    "Viewer: annotation {} created on {}",
                    annotation.id,
                    annotation.image.filename
                );
                self.store.add(annotation);
                self.dirty = true;
            }
            Ok(annotation) => {
                log::debug!(
                    "Viewer: annotation {} created for {} after navigation, not shown",
                    annotation.id,
                    annotation.image.filename
                );
            }
            Err(err) => {
                log::warn!("Viewer: create {} failed: {}", request, err);
            }
        }
    }

    fn finish_update(
        &mut self,
        current: bool,
        request: RequestId,
        id: AnnotationId,
        restore: AnnotationPatch,
        result: Result<Annotation, SyncError>,
    ) {
        let (owns_label, owns_geometry) = self.settle_update(id, request);
        let err = match result {
            Ok(_) => {
                log::debug!("Viewer: annotation {} persisted", id);
                return;
            }
            Err(err) => err,
        };
        log::warn!("Viewer: update {} of annotation {} failed: {}", request, id, err);

        if !(self.settings.rollback_failed_mutations && current) {
            return;
        }
        // A later update of the same field supersedes this one, whatever its outcome
        let resizing = self.gesture.session().targets(id);
        if resizing && owns_geometry {
            log::debug!("Viewer: annotation {} is being resized, keeping it", id);
        }
        let revert = restore.restricted(owns_label, owns_geometry && !resizing);
        if revert.is_empty() {
            log::debug!("Viewer: failed update {} was superseded", request);
            return;
        }
        if let Some(annotation) = self.store.get_mut(id) {
            revert.apply_to(annotation);
            log::info!("Viewer: rolled back annotation {}", id);
            self.dirty = true;
        }
    }

    fn finish_delete(
        &mut self,
        current: bool,
        request: RequestId,
        index: usize,
        annotation: Annotation,
        result: Result<(), SyncError>,
    ) {
        let err = match result {
            Ok(()) => {
                log::debug!("Viewer: annotation {} deleted", annotation.id);
                return;
            }
            Err(err) => err,
        };
        log::warn!(
            "Viewer: delete {} of annotation {} failed: {}",
            request,
            annotation.id,
            err
        );

        if self.settings.rollback_failed_mutations && current {
            log::info!("Viewer: restoring annotation {}", annotation.id);
            self.store.insert_at(index, annotation);
            self.dirty = true;
        }
    }
}
