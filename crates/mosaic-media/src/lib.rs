//! Mosaic Media
//!
//! Resolves configured image sources into drawable bitmaps. Loading is
//! asynchronous and all-or-nothing: a batch either yields one bitmap per
//! source or a [`LoadFailure`] listing every source that failed.

mod cache;
mod decoder;
mod loader;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mosaic_canvas::ImageBitmap;

pub use cache::{BitmapCache, CacheStats, DEFAULT_BUDGET};
pub use decoder::{ImageDecoder, ImageFormat};
pub use loader::ImageLoader;

/// Where an image comes from
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// File on disk
    Path(PathBuf),
    /// Encoded bytes already in memory
    Bytes { label: String, data: Arc<[u8]> },
    /// Already decoded
    Bitmap(ImageBitmap),
}

impl ImageSource {
    /// Encoded bytes with a diagnostic label
    pub fn bytes(label: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self::Bytes {
            label: label.into(),
            data: data.into(),
        }
    }

    /// Human-readable description for logs and errors
    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Bytes { label, data } => format!("{} ({} bytes)", label, data.len()),
            Self::Bitmap(bitmap) => format!("bitmap {}x{}", bitmap.width(), bitmap.height()),
        }
    }

    /// File path, for sources the loader may cache
    pub(crate) fn path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Bytes { .. } | Self::Bitmap(_) => None,
        }
    }
}

impl From<ImageBitmap> for ImageSource {
    fn from(bitmap: ImageBitmap) -> Self {
        Self::Bitmap(bitmap)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

/// Why a single source failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Decode failed: {0}")]
    DecodeFailed(String),

    #[error("Image has no pixels")]
    EmptyImage,
}

/// One failed entry of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    /// Position in the requested source list
    pub index: usize,
    /// Source description
    pub source: String,
    pub reason: LoadError,
}

/// Aggregate failure of a load batch
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadFailure {
    pub failures: Vec<SourceFailure>,
}

impl LoadFailure {
    /// Number of failed sources
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Is empty?
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Reasons in source order
    pub fn reasons(&self) -> impl Iterator<Item = &LoadError> {
        self.failures.iter().map(|f| &f.reason)
    }
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} image source(s) failed to load", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "; #{} {}: {}", failure.index, failure.source, failure.reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for LoadFailure {}
