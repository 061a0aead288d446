//! JSON wire types of the remote label service.
//!
//! The service keys labels by `filename` and `sop_instance` rather than by a
//! nested image object. Partial updates use [`AnnotationPatch`] as is, since
//! its field names already match the service's update body.

use serde::{Deserialize, Serialize};

use roimark_overlay::{Annotation, AnnotationId, ImageKey, NewAnnotation, Rect};

pub use roimark_overlay::AnnotationPatch as LabelUpdate;

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCreate {
    pub filename: String,
    pub sop_instance: String,
    pub label: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl From<&NewAnnotation> for LabelCreate {
    fn from(draft: &NewAnnotation) -> Self {
        Self {
            filename: draft.image.filename.clone(),
            sop_instance: draft.image.instance_uid.clone(),
            label: draft.label.clone(),
            x: draft.rect.x,
            y: draft.rect.y,
            width: draft.rect.width,
            height: draft.rect.height,
        }
    }
}

impl LabelCreate {
    /// Attach the id assigned by the service.
    pub fn into_response(self, id: AnnotationId) -> LabelResponse {
        LabelResponse {
            id,
            filename: self.filename,
            sop_instance: self.sop_instance,
            label: self.label,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// A stored label as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelResponse {
    pub id: AnnotationId,
    pub filename: String,
    pub sop_instance: String,
    pub label: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl LabelResponse {
    pub fn key(&self) -> ImageKey {
        ImageKey::new(self.filename.clone(), self.sop_instance.clone())
    }

    /// Check whether the label belongs to the image identified by `key`.
    pub fn belongs_to(&self, key: &ImageKey) -> bool {
        self.filename == key.filename && self.sop_instance == key.instance_uid
    }

    /// Apply the present fields of an update.
    pub fn apply(&mut self, update: &LabelUpdate) {
        if let Some(label) = &update.label {
            self.label = label.clone();
        }
        self.x = update.x.unwrap_or(self.x);
        self.y = update.y.unwrap_or(self.y);
        self.width = update.width.unwrap_or(self.width);
        self.height = update.height.unwrap_or(self.height);
    }
}

impl From<LabelResponse> for Annotation {
    fn from(label: LabelResponse) -> Self {
        Annotation {
            id: label.id,
            image: label.key(),
            label: label.label,
            rect: Rect::new(label.x, label.y, label.width, label.height),
        }
    }
}

impl From<&Annotation> for LabelResponse {
    fn from(annotation: &Annotation) -> Self {
        Self {
            id: annotation.id,
            filename: annotation.image.filename.clone(),
            sop_instance: annotation.image.instance_uid.clone(),
            label: annotation.label.clone(),
            x: annotation.rect.x,
            y: annotation.rect.y,
            width: annotation.rect.width,
            height: annotation.rect.height,
        }
    }
}
