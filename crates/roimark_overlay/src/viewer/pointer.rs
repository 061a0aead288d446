//! Pointer input: hit testing, gesture transitions and commits.

use super::{PendingOp, Viewer};
use crate::event::{PointerEvent, PointerEventKind};
use crate::geometry::{ImagePoint, ScreenPoint, map_pointer};
use crate::gesture::{GestureOutcome, GestureUpdate};
use crate::model::{AnnotationPatch, NewAnnotation};
use crate::selection::{PointerTarget, hit_test};
use crate::sync::SyncRequest;

impl Viewer {
    /// Feed one pointer event. The overlay bounds are taken from the event itself
    /// every time, since the container may have moved since the last event.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        let point = map_pointer(event.position, &event.bounds);
        log::trace!(
            "Viewer: pointer {:?} at ({}, {})",
            event.kind,
            point.x,
            point.y
        );

        match event.kind {
            PointerEventKind::Down => self.pointer_down(point, event.position),
            PointerEventKind::Move => self.pointer_move(point, event.position),
            PointerEventKind::Up => {
                self.pointer_move(point, event.position);
                self.pointer_up();
            }
            PointerEventKind::DoubleClick => self.double_click(point),
        }
    }

    /// What a press at `point` would hit.
    pub fn target_at(&self, point: ImagePoint) -> PointerTarget {
        hit_test(
            &self.store,
            &self.selection,
            point,
            self.settings.handle_size,
        )
    }

    fn pointer_down(&mut self, point: ImagePoint, position: ScreenPoint) {
        if self.slice.is_none() {
            log::debug!("Viewer: ignoring press, no image displayed");
            return;
        }
        if !self.gesture.is_idle() {
            log::debug!(
                "Viewer: ignoring press during {}",
                self.gesture.session().name()
            );
            return;
        }

        match self.target_at(point) {
            PointerTarget::Handle(id, handle) => {
                if let Some(original) = self.store.get(id).map(|a| a.rect) {
                    self.gesture.begin_resizing(id, handle, position, original);
                }
            }
            PointerTarget::Body(id) => {
                if self.selection.select(id) {
                    log::debug!("Viewer: selected annotation {}", id);
                    self.dirty = true;
                }
            }
            PointerTarget::Background => {
                if self.selection.clear() {
                    log::debug!("Viewer: selection cleared");
                }
                self.gesture.begin_drawing(point);
                self.dirty = true;
            }
        }
    }

    fn pointer_move(&mut self, point: ImagePoint, position: ScreenPoint) {
        match self.gesture.update(point, position) {
            GestureUpdate::None => {}
            GestureUpdate::Preview(_) => self.dirty = true,
            GestureUpdate::Resize {
                target,
                handle,
                dx,
                dy,
            } => {
                if dx == 0 && dy == 0 {
                    return;
                }
                match self
                    .store
                    .update_rect(target, |rect| handle.apply(rect, dx, dy))
                {
                    Some(rect) => {
                        log::trace!("Viewer: annotation {} now {:?}", target, rect);
                        self.dirty = true;
                    }
                    None => {
                        log::debug!("Viewer: resize target {} is gone", target);
                        self.gesture.cancel();
                    }
                }
            }
        }
    }

    fn pointer_up(&mut self) {
        match self.gesture.finish() {
            GestureOutcome::None => {}
            GestureOutcome::Discarded(rect) => {
                log::debug!(
                    "Viewer: discarded {}x{} rectangle below minimum size",
                    rect.width,
                    rect.height
                );
                self.dirty = true;
            }
            GestureOutcome::Create(rect) => {
                self.dirty = true;
                let Some(image) = self.slice.as_ref().map(|slice| slice.key()) else {
                    return;
                };
                let draft = NewAnnotation {
                    image,
                    label: self.settings.default_label.clone(),
                    rect,
                };
                log::info!("Viewer: creating annotation at {:?}", rect);
                self.send(SyncRequest::Create(draft), PendingOp::Create);
            }
            GestureOutcome::Resized { target, original } => {
                let Some(annotation) = self.store.get_mut(target) else {
                    return;
                };
                annotation.rect = annotation.rect.normalized();
                let rect = annotation.rect;
                self.dirty = true;

                log::info!("Viewer: persisting annotation {} as {:?}", target, rect);
                self.send_update(
                    target,
                    AnnotationPatch::geometry(rect),
                    AnnotationPatch::geometry(original),
                );
            }
        }
    }

    fn double_click(&mut self, point: ImagePoint) {
        if let Some(id) = self.target_at(point).annotation() {
            self.delete_annotation(id);
        }
    }
}
