//! Mosaic Canvas
//!
//! Drawing surface used by the mosaic engine: a canvas element with a
//! CSS size and device pixel ratio, and a 2D rendering context backed by a
//! tiny-skia pixmap.

mod bitmap;
mod context2d;
mod element;
mod path;

pub use bitmap::ImageBitmap;
pub use context2d::{CanvasRenderingContext2D, CanvasState, Color};
pub use element::{CanvasContextType, CanvasElement};
pub use path::{Path2D, PathCommand};

/// Canvas errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CanvasError {
    #[error("Invalid canvas dimensions: {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },

    #[error("Invalid device pixel ratio: {0}")]
    InvalidPixelRatio(f32),

    #[error("Canvas context lost (backing store {width}x{height})")]
    ContextLost { width: u32, height: u32 },

    #[error("Invalid path: {0}")]
    InvalidPath(&'static str),
}
