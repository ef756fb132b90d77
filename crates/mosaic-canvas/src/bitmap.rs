//! ImageBitmap
//!
//! Decoded, immutable image shared between tiles.

use std::fmt;
use std::sync::Arc;

use tiny_skia::{ColorU8, IntSize, Pixmap};

/// ImageBitmap - shared, immutable drawable
///
/// Cloning is cheap: every clone points at the same pixel storage, so a
/// bitmap can back any number of tiles.
#[derive(Clone)]
pub struct ImageBitmap {
    pixmap: Arc<Pixmap>,
    label: Arc<str>,
}

impl ImageBitmap {
    /// Create from straight (non-premultiplied) RGBA8 data
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Option<Self> {
        let size = IntSize::from_wh(width, height)?;
        if rgba.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }

        let mut data = Vec::with_capacity(rgba.len());
        for px in rgba.chunks_exact(4) {
            let c = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }

        let pixmap = Pixmap::from_vec(data, size)?;
        Some(Self::from_pixmap(pixmap))
    }

    /// Single-color bitmap
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Option<Self> {
        let data: Vec<u8> = rgba
            .iter()
            .copied()
            .cycle()
            .take((width as usize) * (height as usize) * 4)
            .collect();
        Self::from_rgba(width, height, &data)
    }

    /// Wrap an existing pixmap
    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self {
            pixmap: Arc::new(pixmap),
            label: Arc::from(""),
        }
    }

    /// Attach a label (usually the source URI) for diagnostics
    pub fn with_label(mut self, label: impl AsRef<str>) -> Self {
        self.label = Arc::from(label.as_ref());
        self
    }

    /// Get width
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Get height
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Diagnostic label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Underlying pixels
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// True when both handles share the same pixel storage
    pub fn ptr_eq(&self, other: &ImageBitmap) -> bool {
        Arc::ptr_eq(&self.pixmap, &other.pixmap)
    }

    /// Straight RGBA of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }
}

impl fmt::Debug for ImageBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBitmap")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("label", &self.label)
            .finish()
    }
}
