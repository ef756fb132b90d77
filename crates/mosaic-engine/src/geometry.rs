//! Viewport geometry
//!
//! Pure queries over the canvas size and cell style. Everything is in CSS
//! units; the device pixel ratio only matters to the canvas backing store.

use crate::ConfigError;

/// Default spacing between cells
pub const DEFAULT_GAP: f32 = 20.0;

/// Default cell edge when none is configured
pub const DEFAULT_ITEM_SIZE: f32 = 200.0;

/// Cell style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileStyle {
    pub width: f32,
    pub height: f32,
    pub gap: f32,
    /// Corner radius of the clip; 0 disables clipping
    pub radius: f32,
}

impl Default for TileStyle {
    fn default() -> Self {
        Self {
            width: DEFAULT_ITEM_SIZE,
            height: DEFAULT_ITEM_SIZE,
            gap: DEFAULT_GAP,
            radius: 0.0,
        }
    }
}

impl TileStyle {
    /// Cell of the given size with default gap and no rounding
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Reject non-positive sizes and negative (or non-finite) gap/radius
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.width) || !positive(self.height) {
            return Err(ConfigError::InvalidItemSize {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.gap.is_finite() && self.gap >= 0.0) {
            return Err(ConfigError::NegativeGap(self.gap));
        }
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            return Err(ConfigError::NegativeRadius(self.radius));
        }
        Ok(())
    }
}

/// Derived layout of the viewport. Never stored authoritatively; rebuilt
/// from the canvas size on every resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    canvas_width: f32,
    canvas_height: f32,
    style: TileStyle,
}

impl Geometry {
    pub fn new(canvas_width: f32, canvas_height: f32, style: TileStyle) -> Self {
        Self {
            canvas_width,
            canvas_height,
            style,
        }
    }

    pub fn canvas_width(&self) -> f32 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> f32 {
        self.canvas_height
    }

    pub fn style(&self) -> &TileStyle {
        &self.style
    }

    pub fn item_width(&self) -> f32 {
        self.style.width
    }

    pub fn item_height(&self) -> f32 {
        self.style.height
    }

    pub fn gap(&self) -> f32 {
        self.style.gap
    }

    pub fn radius(&self) -> f32 {
        self.style.radius
    }

    /// Cell width plus gap: the horizontal translation period of the grid
    pub fn block_width(&self) -> f32 {
        self.style.width + self.style.gap
    }

    /// Cell height plus gap
    pub fn block_height(&self) -> f32 {
        self.style.height + self.style.gap
    }

    /// Columns needed to cover the viewport, partial cells included
    pub fn column_capacity(&self) -> usize {
        (self.canvas_width / self.block_width()).ceil().max(0.0) as usize
    }

    /// Rows needed to cover the viewport, partial cells included
    pub fn row_capacity(&self) -> usize {
        (self.canvas_height / self.block_height()).ceil().max(0.0) as usize
    }

    /// Whole columns fully inside the viewport
    pub fn column_size(&self) -> usize {
        (self.canvas_width / self.block_width()).floor().max(0.0) as usize
    }

    /// Whole rows fully inside the viewport
    pub fn row_size(&self) -> usize {
        (self.canvas_height / self.block_height()).floor().max(0.0) as usize
    }

    pub fn visible_capacity(&self) -> usize {
        self.column_capacity() * self.row_capacity()
    }

    /// Tile at `x` lies outside `[-itemWidth, canvasWidth]`
    pub fn overflows_x(&self, x: f32) -> bool {
        x < -self.style.width || x > self.canvas_width
    }

    /// Tile at `y` lies outside `[-itemHeight, canvasHeight]`
    pub fn overflows_y(&self, y: f32) -> bool {
        y < -self.style.height || y > self.canvas_height
    }

    /// Tile at `(x, y)` is fully outside the viewport band
    pub fn overflows(&self, x: f32, y: f32) -> bool {
        self.overflows_x(x) || self.overflows_y(y)
    }

    /// Tile at `(x, y)` has at least one pixel inside the canvas
    pub fn intersects_viewport(&self, x: f32, y: f32) -> bool {
        x < self.canvas_width
            && x + self.style.width > 0.0
            && y < self.canvas_height
            && y + self.style.height > 0.0
    }
}
