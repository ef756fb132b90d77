//! Grid builder
//!
//! Lays out the initial tile set. Cell `i` (row-major) gets source
//! `sources[i mod n]`, so short source lists repeat.

use mosaic_canvas::ImageBitmap;

use crate::{ConfigError, Geometry, Tile};

/// Shape and origin of a freshly built grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub rows: usize,
    /// Position of cell (0, 0)
    pub offset_x: f32,
    pub offset_y: f32,
}

impl GridLayout {
    /// Exactly the visible capacity, anchored at the canvas origin
    pub fn visible(geometry: &Geometry) -> Self {
        Self {
            columns: geometry.column_capacity(),
            rows: geometry.row_capacity(),
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Visible capacity plus a border of `redundancy` cells on every side
    pub fn padded(geometry: &Geometry, redundancy: usize) -> Self {
        Self {
            columns: geometry.column_capacity() + 2 * redundancy,
            rows: geometry.row_capacity() + 2 * redundancy,
            offset_x: -(redundancy as f32) * geometry.block_width(),
            offset_y: -(redundancy as f32) * geometry.block_height(),
        }
    }

    pub fn len(&self) -> usize {
        self.columns * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds tile sets from an ordered, non-empty source list
#[derive(Debug, Clone)]
pub struct GridBuilder<'a> {
    sources: &'a [ImageBitmap],
    geometry: Geometry,
}

impl<'a> GridBuilder<'a> {
    pub fn new(sources: &'a [ImageBitmap], geometry: Geometry) -> Result<Self, ConfigError> {
        if sources.is_empty() {
            return Err(ConfigError::EmptySources);
        }
        Ok(Self { sources, geometry })
    }

    /// Tile for linear cell `index` of `layout`
    pub fn tile_at(&self, layout: &GridLayout, index: usize) -> Tile {
        let columns = layout.columns.max(1);
        let column = index % columns;
        let row = index / columns;
        let source_index = index % self.sources.len();

        Tile::new(
            self.sources[source_index].clone(),
            layout.offset_x + column as f32 * self.geometry.block_width(),
            layout.offset_y + row as f32 * self.geometry.block_height(),
        )
        .with_origin(source_index)
    }

    /// Row-major tile list covering `layout`
    pub fn build(&self, layout: &GridLayout) -> Vec<Tile> {
        (0..layout.len()).map(|i| self.tile_at(layout, i)).collect()
    }
}
