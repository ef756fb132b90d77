//! Mosaic Engine
//!
//! Renders an unbounded image mosaic onto a canvas by recycling a bounded
//! set of tiles as the viewport pans.
//!
//! This crate provides:
//! - Viewport geometry (cell capacity, block size, overflow tests)
//! - Grid builder assigning sources to cells cyclically
//! - Two recycling strategies behind [`RecycleStrategy`]:
//!   row/column stitching ([`PatchStrategy`]) and modulo wrapping
//!   ([`WrapStrategy`])
//! - Resize coordination and rounded-rect tile rendering
//! - Pointer/wheel translation and listener bookkeeping
//!
//! # Example
//! ```rust,ignore
//! use mosaic_canvas::CanvasElement;
//! use mosaic_engine::{Mosaic, MosaicConfig, TileStyle};
//!
//! let canvas = CanvasElement::new(800.0, 600.0)?;
//! let config = MosaicConfig::new(sources).with_style(TileStyle::new(160.0, 120.0));
//! let mut mosaic = Mosaic::new(canvas, config)?;
//! mosaic.pan(-42.0, 0.0)?;
//! ```

mod builder;
mod config;
mod error;
mod geometry;
mod input;
mod listeners;
mod mosaic;
mod render;
mod resize;
pub mod strategy;
mod tile;

pub use builder::{GridBuilder, GridLayout};
pub use config::{ErrorCallback, MosaicConfig, ReadyCallback};
pub use error::{ConfigError, ConstructionError, DrawError, MosaicError};
pub use geometry::{DEFAULT_GAP, DEFAULT_ITEM_SIZE, Geometry, TileStyle};
pub use input::{DragState, EventKind, EventResponse, InputEvent};
pub use listeners::{EventListener, ListenerRegistry};
pub use mosaic::{AxisLocks, Mosaic};
pub use render::{RenderStats, Renderer};
pub use strategy::{PatchStrategy, RecycleStrategy, StrategyKind, TileRow, WrapStrategy};
pub use tile::Tile;

pub use mosaic_canvas as canvas;
pub use mosaic_media as media;
