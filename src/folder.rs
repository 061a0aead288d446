//! Folder listings and slice sequences.

use std::path::Path;

use roimark_overlay::{FolderEntry, Navigator};

use crate::imaging::is_image_filename;

/// List a folder under `root` the way the file browser reports it.
///
/// Entries are sorted by name. Only image files and directories are listed;
/// metadata sidecars and other files are skipped.
#[cfg(not(target_arch = "wasm32"))]
pub fn list_folder(root: &Path, folder: &str) -> std::io::Result<Vec<FolderEntry>> {
    let mut entries: Vec<FolderEntry> = std::fs::read_dir(root.join(folder))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            let path = entry.path();
            if path.is_dir() {
                Some(FolderEntry::directory(name))
            } else if path.is_file() && is_image_filename(&name) {
                Some(FolderEntry::file(name))
            } else {
                None
            }
        })
        .collect();

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    log::debug!(
        "Listed {:?}: {} entries",
        root.join(folder),
        entries.len()
    );
    Ok(entries)
}

/// Build the navigable sequence for a folder under `root`.
#[cfg(not(target_arch = "wasm32"))]
pub fn scan_folder(root: &Path, folder: &str) -> std::io::Result<Navigator> {
    let entries = list_folder(root, folder)?;
    let navigator = Navigator::from_listing(folder, &entries);
    log::info!(
        "Folder '{}' has {} images",
        folder,
        navigator.len()
    );
    Ok(navigator)
}
