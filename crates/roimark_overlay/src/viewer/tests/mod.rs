//! Scenario tests for the viewer.
//!
//! The fixtures drive a [`Viewer`] against a scripted remote that answers every
//! effect synchronously, or holds them back for tests about ordering.

mod drawing_tests;
mod selection_tests;

use crate::error::{ImageUnavailable, SyncError};
use crate::event::{PointerEvent, PointerEventKind};
use crate::geometry::{OverlayBounds, Rect, ScreenPoint};
use crate::model::{Annotation, AnnotationId, ImageKey, ImageSlice};
use crate::navigation::Navigator;
use crate::sync::{Effect, SyncReply, SyncRequest};

use super::{Viewer, ViewerSettings};

/// Screen origin of the overlay container in every test.
const ORIGIN: (f64, f64) = (100.0, 50.0);

pub(super) fn sequence() -> Vec<String> {
    vec![
        "study/IM0001.dcm".to_string(),
        "study/IM0002.dcm".to_string(),
        "study/IM0003.dcm".to_string(),
    ]
}

pub(super) fn key_for(path: &str) -> ImageKey {
    slice_for(path).key()
}

pub(super) fn slice_for(path: &str) -> ImageSlice {
    let filename = crate::model::filename_of(path);
    ImageSlice::new(path, 512, 512, format!("1.2.840.{}", filename)).with_subject("Doe^Jane")
}

pub(super) fn bounds() -> OverlayBounds {
    OverlayBounds::new(ORIGIN.0, ORIGIN.1, 512.0, 512.0)
}

/// Pointer event at an image-space position.
pub(super) fn at(kind: PointerEventKind, x: f64, y: f64) -> PointerEvent {
    PointerEvent::new(kind, ScreenPoint::new(ORIGIN.0 + x, ORIGIN.1 + y), bounds())
}

/// Press, move and release from one image point to another.
pub(super) fn drag(viewer: &mut Viewer, from: (f64, f64), to: (f64, f64)) {
    viewer.handle_pointer(at(PointerEventKind::Down, from.0, from.1));
    viewer.handle_pointer(at(PointerEventKind::Move, to.0, to.1));
    viewer.handle_pointer(at(PointerEventKind::Up, to.0, to.1));
}

pub(super) fn click(viewer: &mut Viewer, x: f64, y: f64) {
    viewer.handle_pointer(at(PointerEventKind::Down, x, y));
    viewer.handle_pointer(at(PointerEventKind::Up, x, y));
}

/// In-test stand-in for the remote annotation store.
#[derive(Default)]
pub(super) struct Remote {
    pub annotations: Vec<Annotation>,
    next_id: AnnotationId,
    /// Fail every create, update and delete with a network error
    pub fail_mutations: bool,
    /// Fail every list with a network error
    pub fail_lists: bool,
    /// Paths whose image cannot be resolved
    pub broken_images: Vec<String>,
    /// Calls received, in order
    pub log: Vec<SyncRequest>,
}

impl Remote {
    pub fn new() -> Self {
        Self {
            next_id: 100,
            ..Self::default()
        }
    }

    /// Seed an annotation on the image at `path`.
    pub fn seed(&mut self, path: &str, id: AnnotationId, rect: Rect) {
        self.annotations.push(Annotation {
            id,
            label: "nodule".to_string(),
            rect,
            image: key_for(path),
        });
    }

    /// Answer effects until the viewer stops emitting them.
    pub fn settle(&mut self, viewer: &mut Viewer) {
        loop {
            let effects = viewer.drain_effects();
            if effects.is_empty() {
                break;
            }
            for effect in effects {
                self.answer(viewer, effect);
            }
        }
    }

    pub fn answer(&mut self, viewer: &mut Viewer, effect: Effect) {
        match effect {
            Effect::ResolveImage { request, path } => {
                let result = if self.broken_images.contains(&path) {
                    Err(ImageUnavailable::new(path, "corrupt header"))
                } else {
                    Ok(slice_for(&path))
                };
                viewer.complete_image(request, result);
            }
            Effect::Sync { request, call } => {
                let result = self.reply(call);
                viewer.complete_sync(request, result);
            }
        }
    }

    fn reply(&mut self, call: SyncRequest) -> Result<SyncReply, SyncError> {
        self.log.push(call.clone());
        match call {
            SyncRequest::List { key } => {
                if self.fail_lists {
                    return Err(SyncError::network("connection refused"));
                }
                let listed = self
                    .annotations
                    .iter()
                    .filter(|a| a.image == key)
                    .cloned()
                    .collect();
                Ok(SyncReply::Listed(listed))
            }
            _ if self.fail_mutations => Err(SyncError::network("connection reset")),
            SyncRequest::Create(draft) => {
                self.next_id += 1;
                let annotation = draft.into_annotation(self.next_id);
                self.annotations.push(annotation.clone());
                Ok(SyncReply::Created(annotation))
            }
            SyncRequest::Update { id, patch } => {
                let annotation = self
                    .annotations
                    .iter_mut()
                    .find(|a| a.id == id)
                    .ok_or_else(|| SyncError::not_found(format!("annotation {}", id)))?;
                patch.apply_to(annotation);
                Ok(SyncReply::Updated(annotation.clone()))
            }
            SyncRequest::Delete { id } => {
                self.annotations.retain(|a| a.id != id);
                Ok(SyncReply::Deleted)
            }
        }
    }
}

pub(super) fn settings() -> ViewerSettings {
    ViewerSettings::default()
}

/// A viewer showing the first slice with the remote's annotations loaded.
pub(super) fn loaded_viewer(remote: &mut Remote, settings: ViewerSettings) -> Viewer {
    let sequence = sequence();
    let first = sequence[0].clone();
    let mut viewer = Viewer::new(settings, Navigator::new(sequence));
    viewer.open(first);
    remote.settle(&mut viewer);
    viewer
}

/// Shorthand: one annotation with id 1 at `rect` on the first slice.
pub(super) fn viewer_with(rect: Rect) -> (Viewer, Remote) {
    let mut remote = Remote::new();
    remote.seed(&sequence()[0], 1, rect);
    let viewer = loaded_viewer(&mut remote, settings());
    (viewer, remote)
}
