//! Canvas 2D Rendering Context
//!
//! CanvasRenderingContext2D subset backed by a tiny-skia pixmap. All drawing
//! calls take CSS units; the device pixel ratio is applied as a base
//! transform underneath the user transform.

use std::fmt;

use tiny_skia::{BlendMode, FillRule, FilterQuality, Mask, Pixmap, PixmapPaint, Transform};

use crate::path::Path2D;
use crate::{CanvasError, ImageBitmap};

/// Canvas 2D rendering context
pub struct CanvasRenderingContext2D {
    /// Backing store; `None` while the context is lost
    pixmap: Option<Pixmap>,
    pixel_width: u32,
    pixel_height: u32,
    pixel_ratio: f32,
    state: CanvasState,
    stack: Vec<CanvasState>,
    current_path: Path2D,
}

/// Canvas state (for save/restore)
#[derive(Clone)]
pub struct CanvasState {
    pub transform: Transform,
    pub global_alpha: f32,
    pub image_smoothing_enabled: bool,
    clip: Option<Mask>,
}

/// Color (RGBA)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            global_alpha: 1.0,
            image_smoothing_enabled: true,
            clip: None,
        }
    }
}

impl CanvasState {
    /// Whether a clip region is active
    pub fn has_clip(&self) -> bool {
        self.clip.is_some()
    }
}

impl fmt::Debug for CanvasState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasState")
            .field("transform", &self.transform)
            .field("global_alpha", &self.global_alpha)
            .field("image_smoothing_enabled", &self.image_smoothing_enabled)
            .field("clip", &self.clip.is_some())
            .finish()
    }
}

impl CanvasRenderingContext2D {
    /// Create a new 2D context with the given backing-store size
    pub fn new(pixel_width: u32, pixel_height: u32, pixel_ratio: f32) -> Self {
        Self {
            pixmap: Pixmap::new(pixel_width, pixel_height),
            pixel_width,
            pixel_height,
            pixel_ratio,
            state: CanvasState::default(),
            stack: Vec::new(),
            current_path: Path2D::new(),
        }
    }

    /// Reallocate the backing store. Resets all state, like a canvas
    /// element whose width/height attributes were assigned.
    pub fn resize(&mut self, pixel_width: u32, pixel_height: u32, pixel_ratio: f32) {
        self.pixmap = Pixmap::new(pixel_width, pixel_height);
        self.pixel_width = pixel_width;
        self.pixel_height = pixel_height;
        self.pixel_ratio = pixel_ratio;
        self.state = CanvasState::default();
        self.stack.clear();
        self.current_path = Path2D::new();

        if self.pixmap.is_none() {
            tracing::warn!("Canvas backing store {}x{} unavailable, context lost", pixel_width, pixel_height);
        }
    }

    /// Backing store width in device pixels
    pub fn width(&self) -> u32 {
        self.pixel_width
    }

    /// Backing store height in device pixels
    pub fn height(&self) -> u32 {
        self.pixel_height
    }

    /// Device pixel ratio applied under the user transform
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// True while the backing store is unavailable
    pub fn is_lost(&self) -> bool {
        self.pixmap.is_none()
    }

    /// Raw pixel storage (premultiplied RGBA)
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    // State management

    /// Save current state
    pub fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    /// Restore previous state
    pub fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    /// Get current state
    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    /// Get mutable current state
    pub fn state_mut(&mut self) -> &mut CanvasState {
        &mut self.state
    }

    fn device_transform(&self) -> Transform {
        Transform::from_scale(self.pixel_ratio, self.pixel_ratio).pre_concat(self.state.transform)
    }

    fn lost(&self) -> CanvasError {
        CanvasError::ContextLost {
            width: self.pixel_width,
            height: self.pixel_height,
        }
    }

    // Clearing

    /// Blank the whole backing store, ignoring transform and clip
    pub fn clear(&mut self) -> Result<(), CanvasError> {
        let pixmap = self.pixmap.as_mut().ok_or_else(|| CanvasError::ContextLost {
            width: self.pixel_width,
            height: self.pixel_height,
        })?;
        pixmap.fill(tiny_skia::Color::TRANSPARENT);
        Ok(())
    }

    // Path methods

    /// Begin a new path
    pub fn begin_path(&mut self) {
        self.current_path = Path2D::new();
    }

    /// Add a rounded rectangle to the current path
    pub fn round_rect(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32) {
        self.current_path.round_rect(x, y, width, height, radius);
    }

    /// Current path
    pub fn current_path(&self) -> &Path2D {
        &self.current_path
    }

    /// Intersect the clip region with the current path
    pub fn clip(&mut self) -> Result<(), CanvasError> {
        if self.pixmap.is_none() {
            return Err(self.lost());
        }
        let path = self
            .current_path
            .to_skia()
            .ok_or(CanvasError::InvalidPath("empty clip path"))?;
        let transform = self.device_transform();

        match self.state.clip.as_mut() {
            Some(mask) => mask.intersect_path(&path, FillRule::Winding, true, transform),
            None => {
                let mut mask = Mask::new(self.pixel_width, self.pixel_height).ok_or_else(|| self.lost())?;
                mask.fill_path(&path, FillRule::Winding, true, transform);
                self.state.clip = Some(mask);
            }
        }
        Ok(())
    }

    // Images

    /// Draw a bitmap scaled into the destination rectangle
    pub fn draw_image(
        &mut self,
        image: &ImageBitmap,
        dx: f32,
        dy: f32,
        dw: f32,
        dh: f32,
    ) -> Result<(), CanvasError> {
        if self.pixmap.is_none() {
            return Err(self.lost());
        }
        if !(dw > 0.0 && dh > 0.0) {
            return Ok(());
        }

        let sx = dw / image.width() as f32;
        let sy = dh / image.height() as f32;
        let transform = self.device_transform().pre_translate(dx, dy).pre_scale(sx, sy);
        let paint = PixmapPaint {
            opacity: self.state.global_alpha,
            blend_mode: BlendMode::SourceOver,
            quality: if self.state.image_smoothing_enabled {
                FilterQuality::Bilinear
            } else {
                FilterQuality::Nearest
            },
        };

        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.draw_pixmap(0, 0, image.pixmap().as_ref(), &paint, transform, self.state.clip.as_ref());
        }
        Ok(())
    }

    // Pixel access

    /// Straight-alpha color of one device pixel
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        let c = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some(Color::rgba(c.red(), c.green(), c.blue(), c.alpha()))
    }
}

impl fmt::Debug for CanvasRenderingContext2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasRenderingContext2D")
            .field("pixel_width", &self.pixel_width)
            .field("pixel_height", &self.pixel_height)
            .field("pixel_ratio", &self.pixel_ratio)
            .field("lost", &self.is_lost())
            .field("state", &self.state)
            .field("saved", &self.stack.len())
            .finish()
    }
}
