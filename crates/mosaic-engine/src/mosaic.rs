//! Mosaic instance
//!
//! Owns the canvas, the tile set and every listener registration. All
//! operations run synchronously on the caller's thread; only image loading
//! during construction is asynchronous.

use mosaic_canvas::{CanvasElement, ImageBitmap};
use mosaic_media::ImageLoader;

use crate::input::wheel_delta;
use crate::{
    ConfigError, ConstructionError, DragState, DrawError, ErrorCallback, EventKind, EventResponse,
    Geometry, InputEvent, ListenerRegistry, MosaicConfig, MosaicError, ReadyCallback,
    RecycleStrategy, RenderStats, Renderer, StrategyKind, Tile, TileStyle, resize, strategy,
};

/// Per-axis pan locks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisLocks {
    pub horizontal: bool,
    pub vertical: bool,
}

impl AxisLocks {
    pub fn all_locked(&self) -> bool {
        self.horizontal && self.vertical
    }

    /// Zero out the locked components of a delta
    pub fn apply(&self, dx: f32, dy: f32) -> (f32, f32) {
        (
            if self.horizontal { 0.0 } else { dx },
            if self.vertical { 0.0 } else { dy },
        )
    }
}

/// A pannable image mosaic bound to one canvas
pub struct Mosaic {
    canvas: CanvasElement,
    geometry: Geometry,
    style: TileStyle,
    sources: Vec<ImageBitmap>,
    strategy: Box<dyn RecycleStrategy>,
    renderer: Renderer,
    locks: AxisLocks,
    drag: DragState,
    listeners: ListenerRegistry,
    last_stats: RenderStats,
    on_ready: Option<ReadyCallback>,
    on_error: Option<ErrorCallback>,
    destroyed: bool,
}

/// Everything construction derives before it takes the canvas
struct Prepared {
    geometry: Geometry,
    sources: Vec<ImageBitmap>,
    strategy: Box<dyn RecycleStrategy>,
    listeners: ListenerRegistry,
}

impl Mosaic {
    /// Build a mosaic, blocking on image loading
    pub fn new(canvas: CanvasElement, config: MosaicConfig) -> Result<Self, MosaicError> {
        smol::block_on(Self::load(canvas, config))
    }

    /// Validate, load every source, build the grid and draw the first frame.
    ///
    /// Construction errors are passed to `on_error` (when configured) and
    /// returned.
    pub async fn load(canvas: CanvasElement, config: MosaicConfig) -> Result<Self, MosaicError> {
        let mut loader = ImageLoader::new();
        Self::load_with(canvas, config, &mut loader)
            .await
            .map_err(MosaicError::from)
    }

    /// Blocking [`Mosaic::load_with`]
    pub fn with_loader(
        canvas: CanvasElement,
        config: MosaicConfig,
        loader: &mut ImageLoader,
    ) -> Result<Self, ConstructionError> {
        smol::block_on(Self::load_with(canvas, config, loader))
    }

    /// Like [`Mosaic::load`], decoding through `loader` so files already
    /// decoded for an earlier mosaic are reused. A rejected construction
    /// hands the canvas back unmodified.
    pub async fn load_with(
        mut canvas: CanvasElement,
        mut config: MosaicConfig,
        loader: &mut ImageLoader,
    ) -> Result<Self, ConstructionError> {
        let mut on_error = config.on_error.take();

        let prepared = match Self::prepare(&mut canvas, &config, loader).await {
            Ok(prepared) => prepared,
            Err(error) => {
                tracing::error!("Mosaic construction failed: {}", error);
                if let Some(callback) = on_error.as_mut() {
                    callback(&error);
                }
                return Err(ConstructionError { error, canvas });
            }
        };

        let mut mosaic = Self {
            canvas,
            geometry: prepared.geometry,
            style: config.style,
            sources: prepared.sources,
            strategy: prepared.strategy,
            renderer: Renderer::new(),
            locks: AxisLocks {
                horizontal: config.disable_horizontal,
                vertical: config.disable_vertical,
            },
            drag: DragState::new(),
            listeners: prepared.listeners,
            last_stats: RenderStats::default(),
            on_ready: config.on_ready.take(),
            on_error,
            destroyed: false,
        };

        if let Err(err) = mosaic.render() {
            tracing::debug!("First frame not drawn, ready notification deferred: {}", err);
        }
        Ok(mosaic)
    }

    /// Every check and allocation that can fail. The canvas is only asked
    /// for its 2D context once everything else has succeeded.
    async fn prepare(
        canvas: &mut CanvasElement,
        config: &MosaicConfig,
        loader: &mut ImageLoader,
    ) -> Result<Prepared, MosaicError> {
        config.validate()?;
        if !canvas.supports_2d() {
            return Err(ConfigError::MissingCanvasContext(canvas.context_type()).into());
        }

        let sources = loader.load_all(&config.items).await?;
        let geometry = Geometry::new(canvas.css_width(), canvas.css_height(), config.style);
        let strategy = strategy::create(config.strategy, &sources, &geometry, config.redundancy)?;

        if canvas.context_2d().is_none() {
            return Err(ConfigError::MissingCanvasContext(canvas.context_type()).into());
        }

        let mut listeners = ListenerRegistry::new();
        for kind in EventKind::ALL {
            let passive = kind != EventKind::Wheel || !config.wheel_prevents_default;
            listeners.register(kind, passive);
        }

        tracing::info!(
            "Mosaic ready: {} sources, {:?} strategy, {}x{} cells, {} tiles",
            sources.len(),
            config.strategy,
            geometry.column_capacity(),
            geometry.row_capacity(),
            strategy.tile_count()
        );

        Ok(Prepared {
            geometry,
            sources,
            strategy,
            listeners,
        })
    }

    // === Panning ===

    /// Move the mosaic by `(dx, dy)` CSS pixels and redraw
    pub fn pan(&mut self, dx: f32, dy: f32) -> Result<(), MosaicError> {
        self.ensure_alive()?;
        if self.locks.all_locked() {
            return Ok(());
        }
        let (dx, dy) = self.locks.apply(dx, dy);
        if !dx.is_finite() || !dy.is_finite() {
            tracing::warn!("Ignoring non-finite pan ({}, {})", dx, dy);
            return Ok(());
        }
        if dx == 0.0 && dy == 0.0 {
            return Ok(());
        }

        self.strategy.pan(dx, dy, &self.geometry);
        self.render()
    }

    /// Dispatch one input event to its registered listener
    pub fn handle_event(&mut self, event: InputEvent) -> Result<EventResponse, MosaicError> {
        self.ensure_alive()?;
        let Some(listener) = self.listeners.get(event.kind()) else {
            return Ok(EventResponse::IGNORED);
        };
        let prevent_default = !listener.passive;

        match event {
            InputEvent::PointerDown { x, y } => self.drag.start(x, y),
            InputEvent::PointerMove { x, y } => {
                if let Some((dx, dy)) = self.drag.update(x, y) {
                    self.pan(dx, dy)?;
                }
            }
            InputEvent::PointerUp | InputEvent::PointerLeave => self.drag.end(),
            InputEvent::Wheel { delta_x, delta_y } => {
                let (dx, dy) = wheel_delta(delta_x, delta_y);
                self.pan(dx, dy)?;
            }
            InputEvent::Resize { width, height } => self.observe_resize(width, height)?,
        }

        Ok(EventResponse {
            handled: true,
            prevent_default,
        })
    }

    /// Record a new CSS size for the canvas and reflow if it changed
    pub fn observe_resize(&mut self, width: f32, height: f32) -> Result<(), MosaicError> {
        self.ensure_alive()?;
        if let Err(err) = self.canvas.set_size(width, height) {
            return self.report(DrawError::from(err).into());
        }
        if self.canvas.take_resize() {
            self.reflow()?;
        }
        Ok(())
    }

    /// Record a new device pixel ratio (the canvas moved to another
    /// display) and reallocate the backing store
    pub fn observe_pixel_ratio(&mut self, ratio: f32) -> Result<(), MosaicError> {
        self.ensure_alive()?;
        if let Err(err) = self.canvas.set_pixel_ratio(ratio) {
            return self.report(DrawError::from(err).into());
        }
        if self.canvas.take_resize() {
            self.reflow()?;
        }
        Ok(())
    }

    // === Public operations ===

    /// Unlock the selected axes
    pub fn enable(&mut self, horizontal: bool, vertical: bool) -> Result<(), MosaicError> {
        self.ensure_alive()?;
        if horizontal {
            self.locks.horizontal = false;
        }
        if vertical {
            self.locks.vertical = false;
        }
        Ok(())
    }

    /// Lock the selected axes
    pub fn disable(&mut self, horizontal: bool, vertical: bool) -> Result<(), MosaicError> {
        self.ensure_alive()?;
        if horizontal {
            self.locks.horizontal = true;
        }
        if vertical {
            self.locks.vertical = true;
        }
        Ok(())
    }

    /// Blank the canvas
    pub fn clear(&mut self) -> Result<(), MosaicError> {
        self.ensure_alive()?;
        let result = match self.canvas.context_2d() {
            Some(ctx) => ctx.clear().map_err(DrawError::from),
            None => Err(DrawError::NoContext),
        };
        match result {
            Ok(()) => Ok(()),
            Err(err) => self.report(err.into()),
        }
    }

    /// Re-run the resize coordinator for the canvas's current size
    pub fn resize(&mut self) -> Result<(), MosaicError> {
        self.ensure_alive()?;
        self.canvas.take_resize();
        self.reflow()
    }

    /// Clear and redraw every tile. Fires `on_ready` after the first
    /// successful frame.
    pub fn render(&mut self) -> Result<(), MosaicError> {
        self.ensure_alive()?;
        match self.draw_frame() {
            Ok(stats) => {
                self.last_stats = stats;
                if let Some(ready) = self.on_ready.take() {
                    ready(self);
                }
                Ok(())
            }
            Err(err) => self.report(err.into()),
        }
    }

    /// Release tiles and listeners. Idempotent; later operations fail with
    /// [`MosaicError::Destroyed`] and never touch the canvas.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        let released = self.listeners.clear();
        self.strategy.clear();
        self.drag.end();
        self.on_ready = None;
        self.on_error = None;
        self.destroyed = true;
        tracing::info!("Mosaic destroyed ({} listeners released)", released);
    }

    // === Accessors ===

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn column_capacity(&self) -> usize {
        self.geometry.column_capacity()
    }

    pub fn row_capacity(&self) -> usize {
        self.geometry.row_capacity()
    }

    pub fn column_size(&self) -> usize {
        self.geometry.column_size()
    }

    pub fn row_size(&self) -> usize {
        self.geometry.row_size()
    }

    pub fn block_width(&self) -> f32 {
        self.geometry.block_width()
    }

    pub fn block_height(&self) -> f32 {
        self.geometry.block_height()
    }

    pub fn gap(&self) -> f32 {
        self.geometry.gap()
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn axis_locks(&self) -> AxisLocks {
        self.locks
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn tile_count(&self) -> usize {
        self.strategy.tile_count()
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.strategy.tiles()
    }

    /// Counters from the last successful frame
    pub fn last_stats(&self) -> RenderStats {
        self.last_stats
    }

    pub fn canvas(&self) -> &CanvasElement {
        &self.canvas
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // === Internals ===

    fn ensure_alive(&self) -> Result<(), MosaicError> {
        if self.destroyed {
            Err(MosaicError::Destroyed)
        } else {
            Ok(())
        }
    }

    fn reflow(&mut self) -> Result<(), MosaicError> {
        self.geometry = resize::reflow(
            &mut self.canvas,
            self.style,
            self.strategy.as_mut(),
            &self.sources,
        );
        self.render()
    }

    fn draw_frame(&mut self) -> Result<RenderStats, DrawError> {
        let ctx = self.canvas.context_2d().ok_or(DrawError::NoContext)?;
        ctx.clear()?;
        self.renderer.render(ctx, self.strategy.tiles(), &self.geometry)
    }

    /// Hand an error to `on_error`, or log and return it when no handler is set
    fn report(&mut self, err: MosaicError) -> Result<(), MosaicError> {
        match self.on_error.as_mut() {
            Some(callback) => {
                tracing::debug!("Reporting to error handler: {}", err);
                callback(&err);
                Ok(())
            }
            None => {
                tracing::error!("{}", err);
                Err(err)
            }
        }
    }
}

impl Drop for Mosaic {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl std::fmt::Debug for Mosaic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mosaic")
            .field("geometry", &self.geometry)
            .field("strategy", &self.strategy.kind())
            .field("tiles", &self.strategy.tile_count())
            .field("locks", &self.locks)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
