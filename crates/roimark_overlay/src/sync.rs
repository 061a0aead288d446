//! Requests the overlay asks its host to carry out, and the replies it expects.
//!
//! The overlay never performs I/O. Every remote call and every image resolution is
//! emitted as an [`Effect`] tagged with a [`RequestId`]; the host runs it and hands
//! the result back through the viewer's `complete_*` methods.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::model::{Annotation, AnnotationId, AnnotationPatch, ImageKey, NewAnnotation};

/// Correlates an emitted effect with its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A call against the remote annotation store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SyncRequest {
    /// Fetch every annotation of one image
    List { key: ImageKey },
    /// Persist a new annotation; the remote assigns the id
    Create(NewAnnotation),
    /// Partially update an annotation
    Update {
        id: AnnotationId,
        patch: AnnotationPatch,
    },
    /// Remove an annotation
    Delete { id: AnnotationId },
}

impl SyncRequest {
    pub fn name(&self) -> &'static str {
        match self {
            SyncRequest::List { .. } => "list",
            SyncRequest::Create(_) => "create",
            SyncRequest::Update { .. } => "update",
            SyncRequest::Delete { .. } => "delete",
        }
    }
}

/// Successful answer from the remote annotation store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncReply {
    Listed(Vec<Annotation>),
    Created(Annotation),
    Updated(Annotation),
    Deleted,
}

impl SyncReply {
    pub fn name(&self) -> &'static str {
        match self {
            SyncReply::Listed(_) => "listed",
            SyncReply::Created(_) => "created",
            SyncReply::Updated(_) => "updated",
            SyncReply::Deleted => "deleted",
        }
    }

    fn unexpected(self, expected: &'static str) -> SyncError {
        SyncError::UnexpectedReply {
            expected,
            got: self.name(),
        }
    }

    pub fn into_listed(self) -> Result<Vec<Annotation>, SyncError> {
        match self {
            SyncReply::Listed(annotations) => Ok(annotations),
            other => Err(other.unexpected("listed")),
        }
    }

    pub fn into_created(self) -> Result<Annotation, SyncError> {
        match self {
            SyncReply::Created(annotation) => Ok(annotation),
            other => Err(other.unexpected("created")),
        }
    }

    pub fn into_updated(self) -> Result<Annotation, SyncError> {
        match self {
            SyncReply::Updated(annotation) => Ok(annotation),
            other => Err(other.unexpected("updated")),
        }
    }

    pub fn into_deleted(self) -> Result<(), SyncError> {
        match self {
            SyncReply::Deleted => Ok(()),
            other => Err(other.unexpected("deleted")),
        }
    }
}

/// Work the host must perform on the viewer's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Decode the image at `path` and read its metadata
    ResolveImage { request: RequestId, path: String },
    /// Call the remote annotation store
    Sync {
        request: RequestId,
        call: SyncRequest,
    },
}

impl Effect {
    pub fn request(&self) -> RequestId {
        match self {
            Effect::ResolveImage { request, .. } | Effect::Sync { request, .. } => *request,
        }
    }
}
