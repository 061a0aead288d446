//! The annotation viewer: one controller owning every piece of overlay state.
//!
//! The viewer holds the navigator, the displayed slice, the annotation store, the
//! selection and the gesture machine, and is the only place they are mutated.
//! Remote calls and image resolution leave through [`Viewer::drain_effects`] and
//! come back through [`Viewer::complete_image`] and [`Viewer::complete_sync`].
//!
//! Every displayed image gets a new generation number. Each outstanding request
//! remembers the generation it was issued under, so responses that arrive after
//! the user navigated away are recognised and dropped.

mod editing;
mod keyboard;
mod pointer;
mod reconcile;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use crate::constants::{DEFAULT_LABEL, HANDLE_SIZE, MIN_RECT_SIZE};
use crate::error::{ImageUnavailable, LoadError};
use crate::geometry::{Handle, Rect};
use crate::gesture::{GestureMachine, InteractionSession};
use crate::model::{Annotation, AnnotationId, AnnotationPatch, ImageKey, ImageSlice};
use crate::navigation::{Direction, Navigator};
use crate::selection::Selection;
use crate::store::AnnotationStore;
use crate::sync::{Effect, RequestId, SyncRequest};

pub use keyboard::ShortcutAction;

/// Tunables for the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerSettings {
    /// Label given to newly drawn rectangles
    pub default_label: String,
    /// Minimum width and height of a drawn rectangle
    pub min_rect_size: i32,
    /// Edge length of the corner handles
    pub handle_size: i32,
    /// Undo local changes whose remote update or delete failed
    pub rollback_failed_mutations: bool,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            default_label: DEFAULT_LABEL.to_string(),
            min_rect_size: MIN_RECT_SIZE,
            handle_size: HANDLE_SIZE,
            rollback_failed_mutations: false,
        }
    }
}

/// What an outstanding request was for.
#[derive(Debug, Clone)]
enum PendingOp {
    Resolve { path: String },
    List { key: ImageKey },
    Create,
    /// `restore` holds the pre-update values of the fields the patch sets
    Update {
        id: AnnotationId,
        restore: AnnotationPatch,
    },
    Delete { index: usize, annotation: Annotation },
}

/// Newest update request sent for each part of one annotation.
#[derive(Debug, Clone, Copy, Default)]
struct LatestUpdate {
    label: Option<RequestId>,
    geometry: Option<RequestId>,
}

#[derive(Debug, Clone)]
struct Pending {
    generation: u64,
    op: PendingOp,
}

/// Interactive annotation overlay for a sequence of image slices.
#[derive(Debug)]
pub struct Viewer {
    settings: ViewerSettings,
    navigator: Navigator,
    /// Resolved slice of the displayed image, once known
    slice: Option<ImageSlice>,
    store: AnnotationStore,
    selection: Selection,
    gesture: GestureMachine,
    /// Bumped every time the displayed image changes
    generation: u64,
    next_request: u64,
    pending: HashMap<RequestId, Pending>,
    /// Only the newest update of a field may roll it back
    latest_updates: HashMap<AnnotationId, LatestUpdate>,
    outbox: Vec<Effect>,
    /// Failure to show to the user for the displayed image
    load_error: Option<LoadError>,
    /// Set whenever something visible changed
    dirty: bool,
}

impl Viewer {
    pub fn new(settings: ViewerSettings, navigator: Navigator) -> Self {
        let gesture = GestureMachine::new(settings.min_rect_size);
        Self {
            settings,
            navigator,
            slice: None,
            store: AnnotationStore::new(),
            selection: Selection::new(),
            gesture,
            generation: 0,
            next_request: 0,
            pending: HashMap::new(),
            latest_updates: HashMap::new(),
            outbox: Vec::new(),
            load_error: None,
            dirty: true,
        }
    }

    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn slice(&self) -> Option<&ImageSlice> {
        self.slice.as_ref()
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    /// Annotations of the displayed image in drawing order.
    pub fn annotations(&self) -> &[Annotation] {
        self.store.as_slice()
    }

    pub fn selected(&self) -> Option<AnnotationId> {
        self.selection.selected()
    }

    pub fn session(&self) -> &InteractionSession {
        self.gesture.session()
    }

    /// Rubber-band rectangle of an in-progress draw.
    pub fn working_rect(&self) -> Option<Rect> {
        self.gesture.working_rect()
    }

    /// Squares to render as resize handles: only the selected annotation has them.
    pub fn handle_rects(&self) -> Vec<(Handle, Rect)> {
        let Some(annotation) = self.selected().and_then(|id| self.store.get(id)) else {
            return Vec::new();
        };
        let size = self.settings.handle_size;
        Handle::ALL
            .into_iter()
            .map(|handle| {
                let corner = annotation.rect.corner(handle);
                let half = size / 2;
                (handle, Rect::new(corner.x - half, corner.y - half, size, size))
            })
            .collect()
    }

    pub fn load_error(&self) -> Option<&LoadError> {
        self.load_error.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of effects issued but not yet completed.
    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    /// Take the effects emitted since the last call.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.outbox)
    }

    /// Returns true once after any visible change.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // Navigation

    /// Display an arbitrary image, e.g. one picked from the file browser.
    pub fn open(&mut self, path: impl Into<String>) {
        let path = path.into();
        log::info!("Viewer: opening {}", path);
        self.navigator.set_current(path);
        self.rebind();
    }

    /// Move to the neighbouring slice. Returns true if the displayed image changed.
    pub fn step(&mut self, direction: Direction) -> bool {
        match self.navigator.step(direction) {
            Some(path) => {
                log::info!("Viewer: stepped {:?} to {}", direction, path);
                self.rebind();
                true
            }
            None => {
                log::debug!("Viewer: step {:?} ignored at boundary", direction);
                false
            }
        }
    }

    pub fn can_step(&self, direction: Direction) -> bool {
        self.navigator.can_step(direction)
    }

    /// Replace the navigable sequence after a folder change. The displayed image stays.
    pub fn set_sequence(&mut self, folder: impl Into<String>, sequence: Vec<String>) {
        self.navigator.set_sequence(folder, sequence);
        self.dirty = true;
    }

    /// Reset all per-image state and start resolving the newly displayed image.
    fn rebind(&mut self) {
        self.generation += 1;
        self.gesture.cancel();
        self.selection.clear();
        self.store.clear();
        self.latest_updates.clear();
        self.slice = None;
        self.load_error = None;
        self.dirty = true;

        let Some(path) = self.navigator.current().map(str::to_string) else {
            return;
        };
        let request = self.next_request_id();
        self.pending.insert(
            request,
            Pending {
                generation: self.generation,
                op: PendingOp::Resolve { path: path.clone() },
            },
        );
        log::debug!(
            "Viewer: {} resolve {} (generation {})",
            request,
            path,
            self.generation
        );
        self.outbox.push(Effect::ResolveImage { request, path });
    }

    /// Hand back the outcome of a [`Effect::ResolveImage`].
    ///
    /// On success the annotation list for the slice's key is requested; annotations
    /// are never loaded before the image identity is known.
    pub fn complete_image(&mut self, request: RequestId, result: Result<ImageSlice, ImageUnavailable>) {
        let Some(pending) = self.pending.remove(&request) else {
            log::warn!("Viewer: completion for unknown request {}", request);
            return;
        };
        let PendingOp::Resolve { path } = pending.op else {
            log::warn!("Viewer: {} is not an image request", request);
            return;
        };
        if pending.generation != self.generation {
            log::debug!("Viewer: dropping stale image {} for {}", request, path);
            return;
        }

        match result {
            Ok(slice) => {
                log::info!(
                    "Viewer: displaying {} ({}x{}, subject {})",
                    slice.filename(),
                    slice.columns,
                    slice.rows,
                    slice.subject_name
                );
                let key = slice.key();
                self.slice = Some(slice);
                self.dirty = true;
                self.send(SyncRequest::List { key: key.clone() }, PendingOp::List { key });
            }
            Err(err) => {
                log::error!("Viewer: {}", err);
                self.load_error = Some(err.into());
                self.dirty = true;
            }
        }
    }

    fn next_request_id(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId(self.next_request)
    }

    /// Queue a remote call and remember what it was for.
    fn send(&mut self, call: SyncRequest, op: PendingOp) -> RequestId {
        let request = self.next_request_id();
        log::debug!("Viewer: {} {}", request, call.name());
        self.pending.insert(
            request,
            Pending {
                generation: self.generation,
                op,
            },
        );
        self.outbox.push(Effect::Sync { request, call });
        request
    }

    /// Queue an update and mark it as the newest edit of the fields it sets.
    fn send_update(&mut self, id: AnnotationId, patch: AnnotationPatch, restore: AnnotationPatch) {
        let touches_label = patch.touches_label();
        let touches_geometry = patch.touches_geometry();
        let request = self.send(
            SyncRequest::Update { id, patch },
            PendingOp::Update { id, restore },
        );

        let latest = self.latest_updates.entry(id).or_default();
        if touches_label {
            latest.label = Some(request);
        }
        if touches_geometry {
            latest.geometry = Some(request);
        }
    }

    /// Forget `request` as the newest update of `id`.
    ///
    /// Returns which parts, label and geometry, it was still the newest update for.
    fn settle_update(&mut self, id: AnnotationId, request: RequestId) -> (bool, bool) {
        let Some(latest) = self.latest_updates.get_mut(&id) else {
            return (false, false);
        };
        let label = latest.label == Some(request);
        let geometry = latest.geometry == Some(request);
        if label {
            latest.label = None;
        }
        if geometry {
            latest.geometry = None;
        }
        if latest.label.is_none() && latest.geometry.is_none() {
            self.latest_updates.remove(&id);
        }
        (label, geometry)
    }
}
