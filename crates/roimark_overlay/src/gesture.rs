//! Gesture state machine for drawing and resizing rectangles.
//!
//! Exactly one [`InteractionSession`] exists at a time. A gesture can only begin
//! from [`InteractionSession::Idle`], so two gestures can never overlap.
//!
//! ```text
//! Idle --press on background--> Drawing  --release--> Idle (create or discard)
//! Idle --press on handle------> Resizing --release--> Idle (persist geometry)
//! ```

use crate::geometry::{Handle, ImagePoint, Rect, ScreenPoint};
use crate::model::AnnotationId;

/// The transient interaction state of the overlay.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionSession {
    /// No active gesture.
    #[default]
    Idle,
    /// A new rectangle is being dragged into existence.
    Drawing {
        /// Image point where the press happened
        start: ImagePoint,
        /// Normalized rubber-band rectangle
        current: Rect,
    },
    /// An existing annotation is being reshaped from one of its corners.
    Resizing {
        /// Annotation being resized
        target: AnnotationId,
        /// Corner being dragged
        handle: Handle,
        /// Screen position of the previous pointer event
        last_pointer: ScreenPoint,
        /// Geometry before the gesture started
        original: Rect,
    },
}

impl InteractionSession {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionSession::Idle)
    }

    /// Check whether this session is resizing the given annotation.
    pub fn targets(&self, id: AnnotationId) -> bool {
        matches!(self, InteractionSession::Resizing { target, .. } if *target == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            InteractionSession::Idle => "idle",
            InteractionSession::Drawing { .. } => "drawing",
            InteractionSession::Resizing { .. } => "resizing",
        }
    }
}

/// Effect of a pointer move on the active gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureUpdate {
    /// No gesture in progress
    None,
    /// The rubber-band rectangle changed
    Preview(Rect),
    /// Apply this incremental delta to the target through the handle
    Resize {
        target: AnnotationId,
        handle: Handle,
        dx: i32,
        dy: i32,
    },
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// No gesture was in progress
    None,
    /// A drawn rectangle large enough to become an annotation
    Create(Rect),
    /// A drawn rectangle below the minimum size (an accidental click)
    Discarded(Rect),
    /// A resize finished; the store already holds the live geometry
    Resized {
        target: AnnotationId,
        original: Rect,
    },
}

/// Owns the interaction session and performs every transition on it.
#[derive(Debug, Clone)]
pub struct GestureMachine {
    session: InteractionSession,
    min_rect_size: i32,
}

impl GestureMachine {
    pub fn new(min_rect_size: i32) -> Self {
        Self {
            session: InteractionSession::Idle,
            min_rect_size,
        }
    }

    pub fn session(&self) -> &InteractionSession {
        &self.session
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_idle()
    }

    /// The rubber-band rectangle while drawing.
    pub fn working_rect(&self) -> Option<Rect> {
        match &self.session {
            InteractionSession::Drawing { current, .. } => Some(*current),
            _ => None,
        }
    }

    /// Start drawing at `start`. Returns false if a gesture is already active.
    pub fn begin_drawing(&mut self, start: ImagePoint) -> bool {
        if !self.session.is_idle() {
            log::warn!(
                "Gesture: cannot start drawing while {}",
                self.session.name()
            );
            return false;
        }
        self.session = InteractionSession::Drawing {
            start,
            current: Rect::at(start),
        };
        log::debug!("Gesture: drawing started at ({}, {})", start.x, start.y);
        true
    }

    /// Start resizing `target` by `handle`. Returns false if a gesture is already active.
    pub fn begin_resizing(
        &mut self,
        target: AnnotationId,
        handle: Handle,
        pointer: ScreenPoint,
        original: Rect,
    ) -> bool {
        if !self.session.is_idle() {
            log::warn!(
                "Gesture: cannot start resizing while {}",
                self.session.name()
            );
            return false;
        }
        self.session = InteractionSession::Resizing {
            target,
            handle,
            last_pointer: pointer,
            original,
        };
        log::debug!(
            "Gesture: resizing annotation {} from {}",
            target,
            handle.name()
        );
        true
    }

    /// Feed a pointer move.
    ///
    /// Drawing uses the mapped image point; resizing uses the screen delta since
    /// the previous move and then remembers the current position.
    pub fn update(&mut self, point: ImagePoint, pointer: ScreenPoint) -> GestureUpdate {
        match &mut self.session {
            InteractionSession::Idle => GestureUpdate::None,
            InteractionSession::Drawing { start, current } => {
                *current = Rect::from_corners(*start, point);
                GestureUpdate::Preview(*current)
            }
            InteractionSession::Resizing {
                target,
                handle,
                last_pointer,
                ..
            } => {
                let (last_x, last_y) = last_pointer.rounded();
                let (x, y) = pointer.rounded();
                *last_pointer = pointer;
                GestureUpdate::Resize {
                    target: *target,
                    handle: *handle,
                    dx: x - last_x,
                    dy: y - last_y,
                }
            }
        }
    }

    /// Release the pointer, ending the gesture. The session is Idle afterwards.
    pub fn finish(&mut self) -> GestureOutcome {
        match std::mem::take(&mut self.session) {
            InteractionSession::Idle => GestureOutcome::None,
            InteractionSession::Drawing { current, .. } => {
                if current.meets_minimum(self.min_rect_size) {
                    GestureOutcome::Create(current)
                } else {
                    GestureOutcome::Discarded(current)
                }
            }
            InteractionSession::Resizing {
                target, original, ..
            } => GestureOutcome::Resized { target, original },
        }
    }

    /// Abandon the active gesture without an outcome, returning what was abandoned.
    pub fn cancel(&mut self) -> InteractionSession {
        let abandoned = std::mem::take(&mut self.session);
        if !abandoned.is_idle() {
            log::debug!("Gesture: {} cancelled", abandoned.name());
        }
        abandoned
    }
}
