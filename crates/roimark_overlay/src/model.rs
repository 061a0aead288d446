//! Annotation and image slice data model.

use serde::{Deserialize, Serialize};

use crate::constants::UNKNOWN_SUBJECT;
use crate::geometry::Rect;

/// Identifier assigned to an annotation by the remote store.
pub type AnnotationId = u64;

/// Server-side identity of an image: its filename plus the instance identifier
/// read from its embedded metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageKey {
    pub filename: String,
    pub instance_uid: String,
}

impl ImageKey {
    pub fn new(filename: impl Into<String>, instance_uid: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            instance_uid: instance_uid.into(),
        }
    }
}

/// A persisted rectangular region of interest on one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Identifier assigned by the remote store.
    pub id: AnnotationId,
    /// Free-text label.
    pub label: String,
    /// Geometry in image pixels.
    #[serde(flatten)]
    pub rect: Rect,
    /// The image this annotation belongs to. Never changes after creation.
    pub image: ImageKey,
}

/// An annotation that has been drawn but not yet persisted (no id yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAnnotation {
    pub image: ImageKey,
    pub label: String,
    #[serde(flatten)]
    pub rect: Rect,
}

impl NewAnnotation {
    /// Attach the id the remote store assigned.
    pub fn into_annotation(self, id: AnnotationId) -> Annotation {
        Annotation {
            id,
            label: self.label,
            rect: self.rect,
            image: self.image,
        }
    }
}

/// Partial update of an annotation. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
}

impl AnnotationPatch {
    /// Patch carrying a full geometry.
    pub fn geometry(rect: Rect) -> Self {
        Self {
            label: None,
            x: Some(rect.x),
            y: Some(rect.y),
            width: Some(rect.width),
            height: Some(rect.height),
        }
    }

    /// Patch carrying only a new label.
    pub fn relabel(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.x.is_none()
            && self.y.is_none()
            && self.width.is_none()
            && self.height.is_none()
    }

    /// Check whether the patch changes the label.
    pub fn touches_label(&self) -> bool {
        self.label.is_some()
    }

    /// Check whether the patch changes any part of the geometry.
    pub fn touches_geometry(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.width.is_some() || self.height.is_some()
    }

    /// The values `annotation` has now for every field this patch sets.
    ///
    /// Applying the result undoes this patch and nothing else.
    pub fn snapshot(&self, annotation: &Annotation) -> Self {
        Self {
            label: self.label.as_ref().map(|_| annotation.label.clone()),
            x: self.x.map(|_| annotation.rect.x),
            y: self.y.map(|_| annotation.rect.y),
            width: self.width.map(|_| annotation.rect.width),
            height: self.height.map(|_| annotation.rect.height),
        }
    }

    /// Keep only the label, the geometry, or both.
    pub fn restricted(self, label: bool, geometry: bool) -> Self {
        Self {
            label: self.label.filter(|_| label),
            x: self.x.filter(|_| geometry),
            y: self.y.filter(|_| geometry),
            width: self.width.filter(|_| geometry),
            height: self.height.filter(|_| geometry),
        }
    }

    /// Apply the present fields to an annotation.
    pub fn apply_to(&self, annotation: &mut Annotation) {
        if let Some(label) = &self.label {
            annotation.label = label.clone();
        }
        if let Some(x) = self.x {
            annotation.rect.x = x;
        }
        if let Some(y) = self.y {
            annotation.rect.y = y;
        }
        if let Some(width) = self.width {
            annotation.rect.width = width;
        }
        if let Some(height) = self.height {
            annotation.rect.height = height;
        }
    }
}

/// One image of the navigable sequence, as resolved by the image collaborator.
///
/// Dimensions and the instance identifier are recomputed every time the slice is
/// displayed; nothing here is cached across navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSlice {
    /// Relative path within the sequence
    pub path: String,
    /// Pixel columns
    pub columns: u32,
    /// Pixel rows
    pub rows: u32,
    /// Instance identifier from the image metadata
    pub instance_uid: String,
    /// Human-readable subject name from the image metadata
    #[serde(default = "default_subject")]
    pub subject_name: String,
}

fn default_subject() -> String {
    UNKNOWN_SUBJECT.to_string()
}

impl ImageSlice {
    pub fn new(
        path: impl Into<String>,
        columns: u32,
        rows: u32,
        instance_uid: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            columns,
            rows,
            instance_uid: instance_uid.into(),
            subject_name: default_subject(),
        }
    }

    pub fn with_subject(mut self, subject_name: impl Into<String>) -> Self {
        self.subject_name = subject_name.into();
        self
    }

    /// Filename shown under the viewer (last path component).
    pub fn filename(&self) -> &str {
        filename_of(&self.path)
    }

    /// Key under which this slice's annotations are stored remotely.
    pub fn key(&self) -> ImageKey {
        ImageKey::new(self.filename(), self.instance_uid.clone())
    }
}

/// Last `/`-separated component of a relative path.
pub fn filename_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
