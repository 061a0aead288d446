//! Slice navigation over an ordered sequence of image paths.

use serde::{Deserialize, Serialize};

/// Step direction through the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    /// Index offset: -1 for previous, +1 for next.
    pub fn offset(self) -> isize {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }

    /// Parse a numeric step; only -1 and +1 are directions.
    pub fn from_offset(offset: i32) -> Option<Self> {
        match offset {
            -1 => Some(Direction::Previous),
            1 => Some(Direction::Next),
            _ => None,
        }
    }
}

/// Kind of an entry in a folder listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One entry of a folder listing as reported by the file browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl FolderEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }
}

/// Ordered image sequence of the active folder plus the displayed image.
///
/// The displayed image is tracked by path, not index: it may have been opened
/// from outside the sequence, in which case stepping is a no-op.
#[derive(Clone, Debug, Default)]
pub struct Navigator {
    /// Active folder (relative, empty for the root)
    folder: String,
    /// Image paths in display order
    sequence: Vec<String>,
    /// Currently displayed image
    current: Option<String>,
}

impl Navigator {
    pub fn new(sequence: Vec<String>) -> Self {
        Self {
            folder: String::new(),
            sequence,
            current: None,
        }
    }

    /// Build the sequence from a folder listing: files only, prefixed with the folder.
    pub fn from_listing(folder: impl Into<String>, entries: &[FolderEntry]) -> Self {
        let folder = folder.into();
        let sequence = entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::File)
            .map(|entry| join_path(&folder, &entry.name))
            .collect();
        Self {
            folder,
            sequence,
            current: None,
        }
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn sequence(&self) -> &[String] {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Replace the sequence (folder changed). The displayed image is kept.
    pub fn set_sequence(&mut self, folder: impl Into<String>, sequence: Vec<String>) {
        self.folder = folder.into();
        self.sequence = sequence;
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Position of the displayed image in the sequence.
    pub fn current_index(&self) -> Option<usize> {
        let current = self.current.as_deref()?;
        self.sequence.iter().position(|path| path == current)
    }

    pub fn set_current(&mut self, path: impl Into<String>) {
        self.current = Some(path.into());
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    /// Index a step would land on, or None when out of bounds or not in the sequence.
    pub fn target(&self, direction: Direction) -> Option<usize> {
        let index = self.current_index()?;
        let next = index.checked_add_signed(direction.offset())?;
        (next < self.sequence.len()).then_some(next)
    }

    pub fn can_step(&self, direction: Direction) -> bool {
        self.target(direction).is_some()
    }

    /// Move one image in `direction`. Bounded, never wraps.
    /// Returns the newly displayed path, or None if nothing changed.
    pub fn step(&mut self, direction: Direction) -> Option<&str> {
        let index = self.target(direction)?;
        self.current = Some(self.sequence[index].clone());
        self.current.as_deref()
    }

    /// Get progress string like "3/15".
    pub fn progress(&self) -> String {
        match self.current_index() {
            Some(index) => format!("{}/{}", index + 1, self.sequence.len()),
            None => format!("-/{}", self.sequence.len()),
        }
    }
}

fn join_path(folder: &str, name: &str) -> String {
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", folder.trim_end_matches('/'), name)
    }
}
