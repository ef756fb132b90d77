//! Mosaic configuration

use std::fmt;

use mosaic_media::ImageSource;

use crate::{ConfigError, Mosaic, MosaicError, StrategyKind, TileStyle};

/// Invoked once, after the first successful render
pub type ReadyCallback = Box<dyn FnOnce(&Mosaic)>;

/// Invoked for every reported error
pub type ErrorCallback = Box<dyn FnMut(&MosaicError)>;

/// Construction options
pub struct MosaicConfig {
    /// Ordered image sources; cells repeat them cyclically
    pub items: Vec<ImageSource>,
    pub style: TileStyle,
    pub strategy: StrategyKind,
    /// Border width in cells around the visible grid (wrap strategy)
    pub redundancy: usize,
    pub disable_horizontal: bool,
    pub disable_vertical: bool,
    /// Ask the host to suppress page scrolling for wheel events
    pub wheel_prevents_default: bool,
    pub on_ready: Option<ReadyCallback>,
    pub on_error: Option<ErrorCallback>,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            style: TileStyle::default(),
            strategy: StrategyKind::default(),
            redundancy: 1,
            disable_horizontal: false,
            disable_vertical: false,
            wheel_prevents_default: true,
            on_ready: None,
            on_error: None,
        }
    }
}

impl MosaicConfig {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ImageSource>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: TileStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_item_size(mut self, width: f32, height: f32) -> Self {
        self.style.width = width;
        self.style.height = height;
        self
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.style.gap = gap;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.style.radius = radius;
        self
    }

    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_redundancy(mut self, redundancy: usize) -> Self {
        self.redundancy = redundancy;
        self
    }

    /// Initial axis locks
    pub fn with_axis_locks(mut self, horizontal: bool, vertical: bool) -> Self {
        self.disable_horizontal = horizontal;
        self.disable_vertical = vertical;
        self
    }

    pub fn with_wheel_prevents_default(mut self, prevent: bool) -> Self {
        self.wheel_prevents_default = prevent;
        self
    }

    pub fn on_ready(mut self, callback: impl FnOnce(&Mosaic) + 'static) -> Self {
        self.on_ready = Some(Box::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl FnMut(&MosaicError) + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Check everything that does not need the canvas or decoded images
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.items.is_empty() {
            return Err(ConfigError::EmptySources);
        }
        self.style.validate()?;
        if self.strategy == StrategyKind::Wrap && self.redundancy < 1 {
            return Err(ConfigError::InvalidRedundancy(self.redundancy));
        }
        Ok(())
    }
}

impl fmt::Debug for MosaicConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MosaicConfig")
            .field("items", &self.items.len())
            .field("style", &self.style)
            .field("strategy", &self.strategy)
            .field("redundancy", &self.redundancy)
            .field("disable_horizontal", &self.disable_horizontal)
            .field("disable_vertical", &self.disable_vertical)
            .field("wheel_prevents_default", &self.wheel_prevents_default)
            .field("on_ready", &self.on_ready.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
