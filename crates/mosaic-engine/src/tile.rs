//! Tile: one (source, position) pair

use mosaic_canvas::ImageBitmap;

/// Atomic unit of recycling
#[derive(Debug, Clone)]
pub struct Tile {
    /// Shared drawable owned by the loader
    pub source: ImageBitmap,
    /// Top-left corner, CSS units
    pub x: f32,
    pub y: f32,
    /// Index into the configured source list
    pub origin_index: Option<usize>,
}

impl Tile {
    pub fn new(source: ImageBitmap, x: f32, y: f32) -> Self {
        Self {
            source,
            x,
            y,
            origin_index: None,
        }
    }

    pub fn with_origin(mut self, index: usize) -> Self {
        self.origin_index = Some(index);
        self
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    /// Copy sharing this tile's source, placed elsewhere
    pub fn relocated(&self, x: f32, y: f32) -> Self {
        Self {
            source: self.source.clone(),
            x,
            y,
            origin_index: self.origin_index,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}
