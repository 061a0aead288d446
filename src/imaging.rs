//! Image resolution: turns a slice path into dimensions and metadata.
//!
//! Raster images are measured with the `image` crate. Metadata the raster format
//! cannot carry (instance identifier, subject name) comes from an optional JSON
//! sidecar next to the image, `<file>.meta.json`. A sidecar that also carries
//! `columns` and `rows` makes decoding unnecessary, which is how scans in
//! formats the `image` crate cannot read are made viewable.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use roimark_overlay::constants::UNKNOWN_SUBJECT;
use roimark_overlay::{ImageSlice, ImageUnavailable};

/// Supported image extensions
pub const IMAGE_EXTENSIONS: &[&str] = &["dcm", "png", "jpg", "jpeg", "bmp", "tiff", "tif", "webp"];

/// Suffix appended to an image filename to find its metadata sidecar.
pub const SIDECAR_SUFFIX: &str = ".meta.json";

/// Check if a filename (string) has a supported image extension.
pub fn is_image_filename(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}

/// Errors that can occur while resolving an image.
#[derive(Error, Debug)]
pub enum ImageError {
    /// No file at the resolved location
    #[error("No image file at {0:?}")]
    Missing(PathBuf),

    /// I/O error while reading the image or its sidecar
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The raster could not be decoded
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// The metadata sidecar is malformed
    #[error("Invalid metadata in {path:?}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Metadata stored in an image's sidecar file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceMetadata {
    /// Unique instance identifier of the image
    #[serde(default)]
    pub instance_uid: Option<String>,
    /// Human-readable subject name
    #[serde(default)]
    pub subject_name: Option<String>,
    /// Pixel columns, if known without decoding
    #[serde(default)]
    pub columns: Option<u32>,
    /// Pixel rows, if known without decoding
    #[serde(default)]
    pub rows: Option<u32>,
}

/// Resolves slice paths to image slices.
pub trait ImageSource {
    /// Read dimensions and metadata of the image at `path` (relative to the source).
    fn resolve(&self, path: &str) -> Result<ImageSlice, ImageError>;

    /// Resolve, converting failures to the overlay's error type.
    fn resolve_for_viewer(&self, path: &str) -> Result<ImageSlice, ImageUnavailable> {
        self.resolve(path).map_err(|e| {
            log::warn!("Failed to resolve image {}: {}", path, e);
            ImageUnavailable::new(path, e.to_string())
        })
    }
}

/// Image source backed by files under a root folder.
#[derive(Debug, Clone)]
pub struct RasterImageSource {
    root: PathBuf,
}

impl RasterImageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_metadata(&self, image_path: &Path) -> Result<SliceMetadata, ImageError> {
        let mut sidecar = image_path.as_os_str().to_owned();
        sidecar.push(SIDECAR_SUFFIX);
        let sidecar = PathBuf::from(sidecar);
        if !sidecar.is_file() {
            return Ok(SliceMetadata::default());
        }

        let json = std::fs::read_to_string(&sidecar)?;
        serde_json::from_str(&json).map_err(|source| ImageError::Metadata {
            path: sidecar,
            source,
        })
    }
}

impl ImageSource for RasterImageSource {
    fn resolve(&self, path: &str) -> Result<ImageSlice, ImageError> {
        let full = self.root.join(path);
        if !full.is_file() {
            return Err(ImageError::Missing(full));
        }

        let metadata = self.read_metadata(&full)?;
        let (columns, rows) = match (metadata.columns, metadata.rows) {
            (Some(columns), Some(rows)) => (columns, rows),
            _ => image::image_dimensions(&full)?,
        };

        // Without an identifier in the metadata the path itself keys the annotations
        let instance_uid = metadata.instance_uid.unwrap_or_else(|| path.to_string());
        let subject = metadata
            .subject_name
            .unwrap_or_else(|| UNKNOWN_SUBJECT.to_string());

        log::debug!("Resolved {} as {}x{} ({})", path, columns, rows, instance_uid);
        Ok(ImageSlice::new(path, columns, rows, instance_uid).with_subject(subject))
    }
}

/// Image source with fixed, in-memory slices.
#[derive(Debug, Clone, Default)]
pub struct StaticImageSource {
    slices: HashMap<String, ImageSlice>,
}

impl StaticImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, slice: ImageSlice) {
        self.slices.insert(slice.path.clone(), slice);
    }

    pub fn with(mut self, slice: ImageSlice) -> Self {
        self.insert(slice);
        self
    }
}

impl ImageSource for StaticImageSource {
    fn resolve(&self, path: &str) -> Result<ImageSlice, ImageError> {
        self.slices
            .get(path)
            .cloned()
            .ok_or_else(|| ImageError::Missing(PathBuf::from(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("roimark-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_is_image_filename() {
        assert!(is_image_filename("IM0001.dcm"));
        assert!(is_image_filename("scan.PNG"));
        assert!(!is_image_filename("notes.txt"));
        assert!(!is_image_filename("IM0001.dcm.meta.json"));
    }

    #[test]
    fn test_raster_dimensions_and_default_metadata() {
        let dir = temp_dir("raster");
        image::RgbImage::new(64, 48)
            .save(dir.join("slice.png"))
            .unwrap();

        let source = RasterImageSource::new(&dir);
        let slice = source.resolve("slice.png").unwrap();
        assert_eq!((slice.columns, slice.rows), (64, 48));
        assert_eq!(slice.instance_uid, "slice.png");
        assert_eq!(slice.subject_name, "Unknown");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_sidecar_supplies_metadata_without_decoding() {
        let dir = temp_dir("sidecar");
        std::fs::write(dir.join("IM0001.dcm"), b"not a raster").unwrap();
        std::fs::write(
            dir.join("IM0001.dcm.meta.json"),
            r#"{"instance_uid": "1.2.840.1", "subject_name": "Doe^Jane", "columns": 512, "rows": 256}"#,
        )
        .unwrap();

        let slice = RasterImageSource::new(&dir).resolve("IM0001.dcm").unwrap();
        assert_eq!(slice.instance_uid, "1.2.840.1");
        assert_eq!(slice.subject_name, "Doe^Jane");
        assert_eq!((slice.columns, slice.rows), (512, 256));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_undecodable_without_dimensions_fails() {
        let dir = temp_dir("undecodable");
        std::fs::write(dir.join("IM0002.dcm"), b"not a raster").unwrap();

        let source = RasterImageSource::new(&dir);
        assert!(source.resolve("IM0002.dcm").is_err());
        let err = source.resolve_for_viewer("IM0002.dcm").unwrap_err();
        assert_eq!(err.path, "IM0002.dcm");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let source = RasterImageSource::new(temp_dir("missing"));
        assert!(matches!(
            source.resolve("nope.png"),
            Err(ImageError::Missing(_))
        ));
    }

    #[test]
    fn test_static_source() {
        let source = StaticImageSource::new().with(ImageSlice::new("a.dcm", 10, 10, "1"));
        assert_eq!(source.resolve("a.dcm").unwrap().instance_uid, "1");
        assert!(source.resolve("b.dcm").is_err());
    }
}
