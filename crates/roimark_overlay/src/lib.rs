//! roimark overlay - pointer-driven rectangle annotation engine
//!
//! Turns pointer and keyboard input over a displayed image slice into rectangle
//! annotations: drawing, corner resizing, selection, deletion and slice-to-slice
//! navigation. The crate does no I/O; remote store calls and image resolution are
//! emitted as [`Effect`]s for the host to run and complete.

pub mod constants;
pub mod error;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod model;
pub mod navigation;
pub mod selection;
pub mod store;
pub mod sync;
mod viewer;

pub use error::{ImageUnavailable, LoadError, SyncError};
pub use event::{FocusTarget, Key, KeyEvent, PointerEvent, PointerEventKind};
pub use geometry::{Handle, ImagePoint, OverlayBounds, Rect, ScreenPoint, map_pointer};
pub use gesture::{GestureMachine, InteractionSession};
pub use model::{Annotation, AnnotationId, AnnotationPatch, ImageKey, ImageSlice, NewAnnotation};
pub use navigation::{Direction, EntryKind, FolderEntry, Navigator};
pub use selection::{PointerTarget, Selection};
pub use store::AnnotationStore;
pub use sync::{Effect, RequestId, SyncReply, SyncRequest};
pub use viewer::{ShortcutAction, Viewer, ViewerSettings};
