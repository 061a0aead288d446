//! Headless replay of recorded viewer input.
//!
//! A script names a folder, optional pre-existing labels and a list of steps
//! (pointer events, key presses, navigation and label-list actions). The steps
//! run against an in-memory store and the outcome is summarised in a
//! [`ReplayReport`].
//!
//! ```json
//! {
//!   "folder": "study",
//!   "steps": [
//!     { "action": "pointer", "kind": "down", "x": 40, "y": 40 },
//!     { "action": "pointer", "kind": "up", "x": 120, "y": 90 },
//!     { "action": "key", "key": "ArrowRight" }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use roimark_overlay::{
    AnnotationId, Direction, FocusTarget, Key, KeyEvent, Navigator, OverlayBounds, PointerEvent,
    PointerEventKind, ScreenPoint, Viewer,
};

use crate::client::MemoryStore;
use crate::client::wire::LabelResponse;
use crate::config::AppConfig;
use crate::imaging::{ImageSource, RasterImageSource};
use crate::session::Session;

/// Errors that can occur while loading or running a replay script.
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to read script {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid replay script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to list folder '{folder}': {source}")]
    Folder {
        folder: String,
        #[source]
        source: std::io::Error,
    },
}

/// A recorded session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Folder (relative to the image root) whose images form the sequence
    #[serde(default)]
    pub folder: String,
    /// Image to display first; defaults to the first image of the folder
    #[serde(default)]
    pub open: Option<String>,
    /// Screen bounds of the overlay for pointer steps that carry none
    #[serde(default)]
    pub bounds: OverlayBounds,
    /// Labels already in the store before the first step
    #[serde(default)]
    pub seed: Vec<LabelResponse>,
    #[serde(default)]
    pub steps: Vec<ReplayStep>,
}

/// One recorded input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReplayStep {
    /// Pointer event at a screen position
    Pointer {
        kind: PointerEventKind,
        x: f64,
        y: f64,
        #[serde(default)]
        bounds: Option<OverlayBounds>,
    },
    /// Key press, matched against the configured keybindings
    Key {
        #[serde(with = "crate::keybindings::key_name")]
        key: Key,
        #[serde(default)]
        focus: FocusTarget,
    },
    /// Previous/next button
    Step { direction: Direction },
    /// File picked in the browser
    Open { path: String },
    /// Row clicked in the label list
    Select { id: AnnotationId },
    /// Delete button of a label list row
    Delete { id: AnnotationId },
    /// Label edited in the label list
    Rename { id: AnnotationId, label: String },
    /// Selection dismissed
    Deselect,
}

impl ReplayScript {
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let json = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let script = Self::from_json(&json)?;
        log::info!(
            "Loaded script {:?} with {} steps",
            path,
            script.steps.len()
        );
        Ok(script)
    }
}

/// State after a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// Path of the displayed image
    pub displayed: Option<String>,
    /// Subject of the displayed image
    pub subject: Option<String>,
    /// Position in the sequence, e.g. `"2/3"`
    pub progress: String,
    pub selected: Option<AnnotationId>,
    /// Annotations of the displayed image in drawing order
    pub annotations: Vec<LabelResponse>,
    /// Every label in the store
    pub remote: Vec<LabelResponse>,
    /// Load failure shown for the displayed image
    pub load_error: Option<String>,
    /// Number of effects executed
    pub effects: usize,
}

/// Replay a script over the images of `navigator`.
///
/// Every image of the sequence that `images` can resolve is registered with the
/// store first, so labels can be created for it.
pub fn run_script<S: ImageSource>(
    script: &ReplayScript,
    navigator: Navigator,
    images: S,
    config: &AppConfig,
) -> ReplayReport {
    let mut store = MemoryStore::new().with_labels(script.seed.clone());
    let paths = navigator
        .sequence()
        .iter()
        .cloned()
        .chain(script.open.clone());
    for path in paths {
        match images.resolve(&path) {
            Ok(slice) => store.register_image(slice.key()),
            Err(e) => log::warn!("Not registering {}: {}", path, e),
        }
    }

    let first = script
        .open
        .clone()
        .or_else(|| navigator.sequence().first().cloned());
    let viewer = Viewer::new(config.viewer_settings(), navigator);
    let mut session = Session::new(viewer, store, images);
    let mut effects = 0;

    match first {
        Some(path) => {
            session.viewer_mut().open(path);
            effects += session.run_until_idle();
        }
        None => log::warn!("Folder '{}' has no images", script.folder),
    }

    for (index, step) in script.steps.iter().enumerate() {
        log::debug!("Step {}: {:?}", index, step);
        apply_step(&mut session, step, script.bounds, config);
        effects += session.run_until_idle();
    }

    report(&session, effects)
}

fn apply_step<S: ImageSource>(
    session: &mut Session<MemoryStore, S>,
    step: &ReplayStep,
    default_bounds: OverlayBounds,
    config: &AppConfig,
) {
    let viewer = session.viewer_mut();
    let changed = match step {
        ReplayStep::Pointer { kind, x, y, bounds } => {
            let bounds = bounds.unwrap_or(default_bounds);
            viewer.handle_pointer(PointerEvent::new(*kind, ScreenPoint::new(*x, *y), bounds));
            true
        }
        ReplayStep::Key { key, focus } => match config.keybindings.action_for_key(*key) {
            Some(action) => viewer.handle_shortcut(action, *focus),
            None => false,
        },
        ReplayStep::Step { direction } => viewer.step(*direction),
        ReplayStep::Open { path } => {
            viewer.open(path.clone());
            true
        }
        ReplayStep::Select { id } => viewer.select_from_list(*id),
        ReplayStep::Delete { id } => viewer.delete_annotation(*id),
        ReplayStep::Rename { id, label } => viewer.rename_annotation(*id, label.clone()),
        ReplayStep::Deselect => viewer.clear_selection(),
    };
    if !changed {
        log::debug!("Step had no effect");
    }
}

fn report<S: ImageSource>(session: &Session<MemoryStore, S>, effects: usize) -> ReplayReport {
    let viewer = session.viewer();
    ReplayReport {
        displayed: viewer.navigator().current().map(str::to_string),
        subject: viewer.slice().map(|slice| slice.subject_name.clone()),
        progress: viewer.navigator().progress(),
        selected: viewer.selected(),
        annotations: viewer.annotations().iter().map(LabelResponse::from).collect(),
        remote: session.client().labels().to_vec(),
        load_error: viewer.load_error().map(|e| e.to_string()),
        effects,
    }
}

/// Replay a script over a folder on disk.
#[cfg(not(target_arch = "wasm32"))]
pub fn replay_folder(
    root: &Path,
    script: &ReplayScript,
    config: &AppConfig,
) -> Result<ReplayReport, ScriptError> {
    let navigator =
        crate::folder::scan_folder(root, &script.folder).map_err(|source| ScriptError::Folder {
            folder: script.folder.clone(),
            source,
        })?;
    Ok(run_script(
        script,
        navigator,
        RasterImageSource::new(root),
        config,
    ))
}
