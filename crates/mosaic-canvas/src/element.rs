//! Canvas Element
//!
//! The drawing surface handed to a mosaic: CSS size, device pixel ratio and
//! a lazily created 2D context whose backing store tracks both.

use crate::{CanvasError, CanvasRenderingContext2D};

/// Canvas context type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasContextType {
    #[default]
    Context2D,
    WebGL,
    WebGL2,
    BitmapRenderer,
}

/// Canvas element
#[derive(Debug)]
pub struct CanvasElement {
    css_width: f32,
    css_height: f32,
    device_pixel_ratio: f32,
    context_type: CanvasContextType,
    context: Option<CanvasRenderingContext2D>,
    resize_pending: bool,
}

impl CanvasElement {
    /// Create a canvas with the given CSS size and a pixel ratio of 1
    pub fn new(css_width: f32, css_height: f32) -> Result<Self, CanvasError> {
        validate_size(css_width, css_height)?;
        Ok(Self {
            css_width,
            css_height,
            device_pixel_ratio: 1.0,
            context_type: CanvasContextType::Context2D,
            context: None,
            resize_pending: false,
        })
    }

    /// Set the device pixel ratio
    pub fn with_pixel_ratio(mut self, ratio: f32) -> Result<Self, CanvasError> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(CanvasError::InvalidPixelRatio(ratio));
        }
        self.device_pixel_ratio = ratio;
        self.sync_backing_store();
        Ok(self)
    }

    /// Set the context kind this canvas was created for
    pub fn with_context_type(mut self, context_type: CanvasContextType) -> Self {
        self.context_type = context_type;
        self.context = None;
        self
    }

    /// CSS width
    pub fn css_width(&self) -> f32 {
        self.css_width
    }

    /// CSS height
    pub fn css_height(&self) -> f32 {
        self.css_height
    }

    /// Device pixel ratio
    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    /// Context kind
    pub fn context_type(&self) -> CanvasContextType {
        self.context_type
    }

    /// Backing store width in device pixels
    pub fn pixel_width(&self) -> u32 {
        (self.css_width * self.device_pixel_ratio).ceil() as u32
    }

    /// Backing store height in device pixels
    pub fn pixel_height(&self) -> u32 {
        (self.css_height * self.device_pixel_ratio).ceil() as u32
    }

    /// Whether a 2D context can be obtained
    pub fn supports_2d(&self) -> bool {
        self.context_type == CanvasContextType::Context2D
    }

    /// Get the 2D context, creating it on first use
    pub fn context_2d(&mut self) -> Option<&mut CanvasRenderingContext2D> {
        if !self.supports_2d() {
            return None;
        }
        let (w, h, ratio) = (self.pixel_width(), self.pixel_height(), self.device_pixel_ratio);
        Some(
            self.context
                .get_or_insert_with(|| CanvasRenderingContext2D::new(w, h, ratio)),
        )
    }

    /// Get the 2D context if it was already created
    pub fn context_2d_ref(&self) -> Option<&CanvasRenderingContext2D> {
        self.context.as_ref()
    }

    /// Change the CSS size. The change is reported once through
    /// [`CanvasElement::take_resize`].
    pub fn set_size(&mut self, css_width: f32, css_height: f32) -> Result<(), CanvasError> {
        validate_size(css_width, css_height)?;
        if css_width != self.css_width || css_height != self.css_height {
            self.css_width = css_width;
            self.css_height = css_height;
            self.resize_pending = true;
        }
        Ok(())
    }

    /// Change the device pixel ratio (moving between displays)
    pub fn set_pixel_ratio(&mut self, ratio: f32) -> Result<(), CanvasError> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(CanvasError::InvalidPixelRatio(ratio));
        }
        if ratio != self.device_pixel_ratio {
            self.device_pixel_ratio = ratio;
            self.resize_pending = true;
        }
        Ok(())
    }

    /// Consume a pending size notification
    pub fn take_resize(&mut self) -> bool {
        std::mem::take(&mut self.resize_pending)
    }

    /// Reallocate the context's backing store for the current CSS size and
    /// pixel ratio. Returns the new device-pixel size.
    pub fn sync_backing_store(&mut self) -> (u32, u32) {
        let (w, h, ratio) = (self.pixel_width(), self.pixel_height(), self.device_pixel_ratio);
        if let Some(ctx) = self.context.as_mut() {
            if ctx.width() != w || ctx.height() != h || ctx.pixel_ratio() != ratio {
                tracing::debug!("Canvas backing store {}x{} -> {}x{} @{}", ctx.width(), ctx.height(), w, h, ratio);
                ctx.resize(w, h, ratio);
            }
        }
        (w, h)
    }
}

fn validate_size(width: f32, height: f32) -> Result<(), CanvasError> {
    if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
        return Err(CanvasError::InvalidDimensions { width, height });
    }
    Ok(())
}
