//! Recycling strategies
//!
//! Both strategies keep a bounded tile set covering the viewport while it
//! pans. They differ in how they pay for it:
//!
//! - [`PatchStrategy`]: rows of tiles; new tiles are stitched in at the edge
//!   a gap opens on and tiles pushed past the opposite edge are dropped.
//! - [`WrapStrategy`]: a fixed pool sized to the viewport plus a redundancy
//!   border; coordinates wrap modulo the pool extent, nothing is allocated
//!   after construction.

mod patch;
mod wrap;

use std::fmt;

use mosaic_canvas::ImageBitmap;

pub use patch::{PatchStrategy, TileRow};
pub use wrap::WrapStrategy;

use crate::{ConfigError, Geometry, Tile};

/// Which recycling strategy a mosaic uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    #[default]
    Patch,
    Wrap,
}

/// Boundary maintenance for a panning tile set
pub trait RecycleStrategy: fmt::Debug {
    fn kind(&self) -> StrategyKind;

    /// Move every tile by `(dx, dy)` and restore full viewport coverage.
    /// Axis locks are applied by the caller (a locked axis arrives as 0).
    fn pan(&mut self, dx: f32, dy: f32, geometry: &Geometry);

    /// Reconcile the tile set with new geometry without reloading sources
    fn reflow(&mut self, geometry: &Geometry, sources: &[ImageBitmap]);

    /// Current tiles in draw order
    fn tiles(&self) -> Box<dyn Iterator<Item = &Tile> + '_>;

    fn tile_count(&self) -> usize;

    /// Release every tile
    fn clear(&mut self);
}

/// Build the initial tile set for `kind`
pub fn create(
    kind: StrategyKind,
    sources: &[ImageBitmap],
    geometry: &Geometry,
    redundancy: usize,
) -> Result<Box<dyn RecycleStrategy>, ConfigError> {
    Ok(match kind {
        StrategyKind::Patch => Box::new(PatchStrategy::new(sources, geometry)?),
        StrategyKind::Wrap => Box::new(WrapStrategy::new(sources, geometry, redundancy)?),
    })
}
