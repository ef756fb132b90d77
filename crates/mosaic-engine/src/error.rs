//! Error types

use mosaic_canvas::{CanvasContextType, CanvasElement, CanvasError};
use mosaic_media::LoadFailure;

/// Invalid construction input. Raised before the canvas is touched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Image source list is empty")]
    EmptySources,

    #[error("Invalid item size {width}x{height} (must be positive)")]
    InvalidItemSize { width: f32, height: f32 },

    #[error("Gap must be non-negative, got {0}")]
    NegativeGap(f32),

    #[error("Radius must be non-negative, got {0}")]
    NegativeRadius(f32),

    #[error("Redundancy must be at least 1, got {0}")]
    InvalidRedundancy(usize),

    #[error("Canvas does not expose a 2D context ({0:?})")]
    MissingCanvasContext(CanvasContextType),
}

/// Failure while redrawing after a pan or resize
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DrawError {
    #[error("Canvas has no 2D context")]
    NoContext,

    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

/// Mosaic errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MosaicError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Load failure: {0}")]
    Load(#[from] LoadFailure),

    #[error("Draw error: {0}")]
    Draw(#[from] DrawError),

    #[error("Mosaic has been destroyed")]
    Destroyed,
}

impl MosaicError {
    /// True for errors raised while building the mosaic
    pub fn is_construction(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Load(_))
    }
}

/// A rejected construction. Carries the canvas back to the caller exactly
/// as it was passed in, so it can be reused.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct ConstructionError {
    pub error: MosaicError,
    pub canvas: CanvasElement,
}

impl ConstructionError {
    pub fn into_canvas(self) -> CanvasElement {
        self.canvas
    }
}

impl From<ConstructionError> for MosaicError {
    fn from(err: ConstructionError) -> Self {
        err.error
    }
}
