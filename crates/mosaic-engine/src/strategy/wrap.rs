//! Wrap strategy: fixed pool, modular coordinates
//!
//! The pool holds `(columnCapacity + 2r) × (rowCapacity + 2r)` tiles laid
//! out one period wide and one period tall. Panning never allocates; a tile
//! leaving one side re-enters on the other because its coordinate is taken
//! modulo the period.

use mosaic_canvas::ImageBitmap;

use super::{RecycleStrategy, StrategyKind};
use crate::{ConfigError, Geometry, GridBuilder, GridLayout, Tile};

/// Modular recycler over a fixed tile pool
#[derive(Debug)]
pub struct WrapStrategy {
    tiles: Vec<Tile>,
    columns: usize,
    rows: usize,
    redundancy: usize,
    /// Accumulated pan, reduced modulo the period
    offset_x: f32,
    offset_y: f32,
}

impl WrapStrategy {
    pub fn new(
        sources: &[ImageBitmap],
        geometry: &Geometry,
        redundancy: usize,
    ) -> Result<Self, ConfigError> {
        if redundancy == 0 {
            return Err(ConfigError::InvalidRedundancy(redundancy));
        }
        let layout = GridLayout::padded(geometry, redundancy);
        let tiles = GridBuilder::new(sources, *geometry)?.build(&layout);
        tracing::debug!(
            "Wrap pool {}x{} ({} tiles, redundancy {})",
            layout.columns,
            layout.rows,
            tiles.len(),
            redundancy
        );
        let mut wrap = Self {
            tiles,
            columns: layout.columns,
            rows: layout.rows,
            redundancy,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        wrap.wrap_all(geometry);
        Ok(wrap)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn redundancy(&self) -> usize {
        self.redundancy
    }

    /// Horizontal period of the pool
    pub fn period_x(&self, geometry: &Geometry) -> f32 {
        self.columns as f32 * geometry.block_width()
    }

    /// Vertical period of the pool
    pub fn period_y(&self, geometry: &Geometry) -> f32 {
        self.rows as f32 * geometry.block_height()
    }

    /// Extent of the pool without its trailing gap
    pub fn range_width(&self, geometry: &Geometry) -> f32 {
        self.period_x(geometry) - geometry.gap()
    }

    pub fn range_height(&self, geometry: &Geometry) -> f32 {
        self.period_y(geometry) - geometry.gap()
    }

    fn wrap_all(&mut self, geometry: &Geometry) {
        let (px, py) = (self.period_x(geometry), self.period_y(geometry));
        let (iw, ih) = (geometry.item_width(), geometry.item_height());
        for tile in &mut self.tiles {
            tile.x = wrap(tile.x, px, iw);
            tile.y = wrap(tile.y, py, ih);
        }
    }
}

impl RecycleStrategy for WrapStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Wrap
    }

    fn pan(&mut self, dx: f32, dy: f32, geometry: &Geometry) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        for tile in &mut self.tiles {
            tile.translate(dx, dy);
        }
        self.wrap_all(geometry);
        self.offset_x = (self.offset_x + dx).rem_euclid(self.period_x(geometry));
        self.offset_y = (self.offset_y + dy).rem_euclid(self.period_y(geometry));
    }

    /// Grow the pool when the viewport outgrows it; a shrinking viewport
    /// keeps the larger pool.
    fn reflow(&mut self, geometry: &Geometry, sources: &[ImageBitmap]) {
        let border = 2 * self.redundancy;
        let columns = self.columns.max(geometry.column_capacity() + border);
        let rows = self.rows.max(geometry.row_capacity() + border);
        if columns == self.columns && rows == self.rows {
            self.wrap_all(geometry);
            return;
        }

        let Ok(builder) = GridBuilder::new(sources, *geometry) else {
            tracing::warn!("Wrap reflow without sources; keeping {} tiles", self.tiles.len());
            return;
        };
        let layout = GridLayout {
            columns,
            rows,
            ..GridLayout::padded(geometry, self.redundancy)
        };
        self.tiles = builder.build(&layout);
        self.columns = columns;
        self.rows = rows;
        for tile in &mut self.tiles {
            tile.translate(self.offset_x, self.offset_y);
        }
        self.wrap_all(geometry);
        tracing::debug!("Wrap pool grown to {}x{} ({} tiles)", columns, rows, self.tiles.len());
    }

    fn tiles(&self) -> Box<dyn Iterator<Item = &Tile> + '_> {
        Box::new(self.tiles.iter())
    }

    fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    fn clear(&mut self) {
        self.tiles.clear();
    }
}

/// Reduce `v` into `[-item, period - item)`.
///
/// With `period = range + gap` the upper bound equals `range` only while
/// `gap <= item`. A wider gap puts the last slot in `[range, range + gap - item)`;
/// no single interval of length `period` can start at `-item` and end at
/// `range` then, and the tile there still lies past the canvas edge.
fn wrap(v: f32, period: f32, item: f32) -> f32 {
    if period <= 0.0 {
        return v;
    }
    let r = (v + item).rem_euclid(period);
    // rem_euclid can round up to `period` for tiny negative inputs
    let r = if r >= period { 0.0 } else { r };
    r - item
}
