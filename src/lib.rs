//! roimark - rectangle region-of-interest annotation for image slice sequences
//!
//! Host side of the annotation overlay: configuration and keybindings, image
//! resolution, the remote label store client, keyboard listener registration, and
//! a [`session::Session`] that executes the effects the overlay core emits.

pub mod client;
pub mod config;
pub mod folder;
pub mod imaging;
pub mod keybindings;
pub mod listeners;
pub mod replay;
pub mod session;

pub use client::{AnnotationClient, MemoryStore};
pub use config::AppConfig;
pub use imaging::{ImageSource, RasterImageSource, StaticImageSource};
pub use keybindings::KeyBindings;
pub use listeners::{KeyboardHub, Subscription};
pub use session::{MountedView, Session, mount};
