//! Edge case tests for mosaic-engine
//!
//! Construction failures, error routing, lifecycle and degenerate canvases.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use mosaic_engine::canvas::{CanvasContextType, CanvasElement, CanvasError, Color, ImageBitmap};
use mosaic_engine::media::{ImageLoader, ImageSource};
use mosaic_engine::{ConfigError, DrawError, InputEvent, Mosaic, MosaicConfig, MosaicError, StrategyKind};

fn red() -> ImageBitmap {
    ImageBitmap::solid(1, 1, [255, 0, 0, 255]).unwrap()
}

fn config() -> MosaicConfig {
    MosaicConfig::new(vec![red()])
        .with_item_size(50.0, 50.0)
        .with_gap(0.0)
}

fn canvas() -> CanvasElement {
    CanvasElement::new(300.0, 300.0).unwrap()
}

/// Error handler that records messages
fn recorder() -> (Rc<RefCell<Vec<MosaicError>>>, impl FnMut(&MosaicError) + 'static) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    (seen, move |err: &MosaicError| sink.borrow_mut().push(err.clone()))
}

// ============================================================================
// CONFIGURATION ERRORS
// ============================================================================

#[test]
fn test_empty_sources_rejected() {
    let config = MosaicConfig::new(Vec::<ImageBitmap>::new());
    let err = Mosaic::new(canvas(), config).unwrap_err();
    assert_eq!(err, MosaicError::Config(ConfigError::EmptySources));
    assert!(err.is_construction());
}

#[test]
fn test_invalid_style_rejected() {
    let err = Mosaic::new(canvas(), config().with_item_size(0.0, 50.0)).unwrap_err();
    assert!(matches!(err, MosaicError::Config(ConfigError::InvalidItemSize { .. })));

    let err = Mosaic::new(canvas(), config().with_gap(-1.0)).unwrap_err();
    assert_eq!(err, MosaicError::Config(ConfigError::NegativeGap(-1.0)));

    let err = Mosaic::new(canvas(), config().with_radius(-4.0)).unwrap_err();
    assert_eq!(err, MosaicError::Config(ConfigError::NegativeRadius(-4.0)));
}

#[test]
fn test_validation_runs_before_loading() {
    // The missing file would be a load failure; the bad gap must win
    let config = MosaicConfig::new(vec![ImageSource::Path("/nonexistent/a.png".into())]).with_gap(-2.0);
    let err = Mosaic::new(canvas(), config).unwrap_err();
    assert_eq!(err, MosaicError::Config(ConfigError::NegativeGap(-2.0)));
}

#[test]
fn test_non_2d_canvas_rejected() {
    let canvas = canvas().with_context_type(CanvasContextType::WebGL);
    let err = Mosaic::new(canvas, config()).unwrap_err();
    assert_eq!(
        err,
        MosaicError::Config(ConfigError::MissingCanvasContext(CanvasContextType::WebGL))
    );
}

#[test]
fn test_wrap_requires_redundancy() {
    let config = config().with_strategy(StrategyKind::Wrap).with_redundancy(0);
    let err = Mosaic::new(canvas(), config).unwrap_err();
    assert_eq!(err, MosaicError::Config(ConfigError::InvalidRedundancy(0)));
}

#[test]
fn test_config_error_reaches_handler() {
    let (seen, handler) = recorder();
    let config = config().with_gap(-1.0).on_error(handler);
    assert!(Mosaic::new(canvas(), config).is_err());
    assert_eq!(seen.borrow().len(), 1);
}

// ============================================================================
// REJECTED CONSTRUCTION
// ============================================================================

fn painted_canvas() -> CanvasElement {
    let mut canvas = canvas();
    let blue = ImageBitmap::solid(1, 1, [0, 0, 255, 255]).unwrap();
    canvas
        .context_2d()
        .unwrap()
        .draw_image(&blue, 0.0, 0.0, 300.0, 300.0)
        .unwrap();
    canvas
}

#[test]
fn test_rejected_config_returns_canvas_untouched() {
    let mut loader = ImageLoader::new();
    let err = Mosaic::with_loader(painted_canvas(), config().with_gap(-1.0), &mut loader).unwrap_err();
    assert_eq!(err.error, MosaicError::Config(ConfigError::NegativeGap(-1.0)));

    let mut canvas = err.into_canvas();
    assert!(!canvas.take_resize());
    assert_eq!(canvas.css_width(), 300.0);
    let ctx = canvas.context_2d_ref().unwrap();
    assert_eq!(ctx.get_pixel(150, 150), Some(Color::rgb(0, 0, 255)));

    // The same canvas can be used for another attempt
    let mosaic = Mosaic::with_loader(canvas, config(), &mut loader).unwrap();
    let pixel = mosaic.canvas().context_2d_ref().unwrap().get_pixel(150, 150);
    assert_eq!(pixel, Some(Color::rgb(255, 0, 0)));
}

#[test]
fn test_rejected_load_returns_canvas_untouched() {
    let mut loader = ImageLoader::new();
    let config = MosaicConfig::new(vec![ImageSource::Path("/nonexistent/b.png".into())]);
    let err = Mosaic::with_loader(painted_canvas(), config, &mut loader).unwrap_err();
    assert!(matches!(err.error, MosaicError::Load(_)));

    let canvas = err.into_canvas();
    let ctx = canvas.context_2d_ref().unwrap();
    assert_eq!(ctx.get_pixel(150, 150), Some(Color::rgb(0, 0, 255)));
}

// ============================================================================
// LOADING
// ============================================================================

#[test]
fn test_shared_loader_reuses_decoded_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("red.png");
    std::fs::write(&path, red().pixmap().encode_png().unwrap()).unwrap();
    let config = || MosaicConfig::new(vec![path.clone(); 5]).with_item_size(50.0, 50.0);

    let mut loader = ImageLoader::new();
    let first = Mosaic::with_loader(canvas(), config(), &mut loader).unwrap();
    assert_eq!(loader.stats().misses, 1);
    assert_eq!(loader.stats().hits, 0);

    let second = Mosaic::with_loader(canvas(), config(), &mut loader).unwrap();
    assert_eq!(loader.stats().misses, 1);
    assert!(loader.stats().hits >= 1);
    assert_eq!(loader.cache().len(), 1);

    let a = first.tiles().next().unwrap();
    let b = second.tiles().next().unwrap();
    assert!(a.source.ptr_eq(&b.source));
}

// ============================================================================
// LOAD FAILURES
// ============================================================================

#[test]
fn test_load_failure_lists_every_source() {
    let (seen, handler) = recorder();
    let config = MosaicConfig::new(vec![
        ImageSource::from(red()),
        ImageSource::bytes("garbage", vec![1u8, 2, 3, 4]),
        ImageSource::Path("/nonexistent/mosaic.png".into()),
    ])
    .on_error(handler);

    let err = Mosaic::new(canvas(), config).unwrap_err();
    let MosaicError::Load(failure) = &err else {
        panic!("expected load failure, got {err:?}");
    };
    assert_eq!(failure.len(), 2);
    assert_eq!(failure.failures[0].index, 1);
    assert_eq!(failure.failures[1].index, 2);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], err);
}

#[test]
fn test_on_ready_not_called_on_failure() {
    let ready = Rc::new(Cell::new(0));
    let counter = Rc::clone(&ready);
    let config = MosaicConfig::new(vec![ImageSource::bytes("bad", vec![0u8; 8])])
        .on_ready(move |_| counter.set(counter.get() + 1));

    assert!(Mosaic::new(canvas(), config).is_err());
    assert_eq!(ready.get(), 0);
}

// ============================================================================
// READY CALLBACK
// ============================================================================

#[test]
fn test_on_ready_fires_once_after_render() {
    let ready = Rc::new(Cell::new(0));
    let counter = Rc::clone(&ready);
    let config = config().on_ready(move |mosaic| {
        assert_eq!(mosaic.tile_count(), 36);
        counter.set(counter.get() + 1);
    });

    let mut mosaic = Mosaic::new(canvas(), config).unwrap();
    assert_eq!(ready.get(), 1);

    mosaic.pan(25.0, 25.0).unwrap();
    mosaic.render().unwrap();
    assert_eq!(ready.get(), 1);
}

#[test]
fn test_on_ready_waits_for_drawable_canvas() {
    let ready = Rc::new(Cell::new(0));
    let counter = Rc::clone(&ready);
    let (seen, handler) = recorder();
    let config = config()
        .on_ready(move |_| counter.set(counter.get() + 1))
        .on_error(handler);

    let mut mosaic = Mosaic::new(CanvasElement::new(0.0, 0.0).unwrap(), config).unwrap();
    assert_eq!(ready.get(), 0);
    assert!(matches!(
        seen.borrow()[0],
        MosaicError::Draw(DrawError::Canvas(CanvasError::ContextLost { .. }))
    ));

    mosaic.observe_resize(300.0, 300.0).unwrap();
    assert_eq!(ready.get(), 1);
    assert_eq!(mosaic.tile_count(), 36);
}

// ============================================================================
// RUNTIME DRAW ERRORS
// ============================================================================

#[test]
fn test_lost_context_reported_and_recoverable() {
    let (seen, handler) = recorder();
    let mut mosaic = Mosaic::new(canvas(), config().on_error(handler)).unwrap();

    mosaic.observe_resize(0.0, 0.0).unwrap();
    mosaic.pan(10.0, 10.0).unwrap();
    assert!(!seen.borrow().is_empty());

    mosaic.observe_resize(300.0, 300.0).unwrap();
    let pixel = mosaic.canvas().context_2d_ref().unwrap().get_pixel(150, 150);
    assert_eq!(pixel, Some(Color::rgb(255, 0, 0)));
}

#[test]
fn test_lost_context_without_handler_is_returned() {
    let mut mosaic = Mosaic::new(canvas(), config()).unwrap();
    let err = mosaic.observe_resize(0.0, 0.0).unwrap_err();
    assert!(matches!(err, MosaicError::Draw(_)));
    assert!(!mosaic.is_destroyed());
}

#[test]
fn test_invalid_resize_reported() {
    let (seen, handler) = recorder();
    let mut mosaic = Mosaic::new(canvas(), config().on_error(handler)).unwrap();
    mosaic.observe_resize(f32::NAN, 10.0).unwrap();

    assert!(matches!(
        seen.borrow()[0],
        MosaicError::Draw(DrawError::Canvas(CanvasError::InvalidDimensions { .. }))
    ));
    assert_eq!(mosaic.column_capacity(), 6);
}

#[test]
fn test_non_finite_pan_ignored() {
    let mut mosaic = Mosaic::new(canvas(), config()).unwrap();
    mosaic.pan(f32::NAN, 5.0).unwrap();
    mosaic.pan(f32::INFINITY, 0.0).unwrap();
    assert!(mosaic.tiles().all(|t| t.x.is_finite() && t.y.is_finite()));
}

#[test]
fn test_pixel_ratio_change_reallocates() {
    let mut mosaic = Mosaic::new(canvas(), config()).unwrap();
    mosaic.observe_pixel_ratio(2.0).unwrap();

    assert_eq!(mosaic.canvas().pixel_width(), 600);
    assert_eq!(mosaic.column_capacity(), 6);
    assert_eq!(mosaic.tile_count(), 36);
    let ctx = mosaic.canvas().context_2d_ref().unwrap();
    assert_eq!(ctx.width(), 600);
    assert_eq!(ctx.get_pixel(590, 590), Some(Color::rgb(255, 0, 0)));
}

#[test]
fn test_invalid_pixel_ratio_reported() {
    let (seen, handler) = recorder();
    let mut mosaic = Mosaic::new(canvas(), config().on_error(handler)).unwrap();
    mosaic.observe_pixel_ratio(0.0).unwrap();

    assert_eq!(
        seen.borrow()[0],
        MosaicError::Draw(DrawError::Canvas(CanvasError::InvalidPixelRatio(0.0)))
    );
    assert_eq!(mosaic.canvas().pixel_width(), 300);
}

// ============================================================================
// LIFECYCLE
// ============================================================================

#[test]
fn test_destroy_is_idempotent() {
    let mut mosaic = Mosaic::new(canvas(), config()).unwrap();
    mosaic.destroy();
    mosaic.destroy();

    assert!(mosaic.is_destroyed());
    assert_eq!(mosaic.listener_count(), 0);
    assert_eq!(mosaic.tile_count(), 0);
}

#[test]
fn test_operations_after_destroy_fail() {
    let mut mosaic = Mosaic::new(canvas(), config()).unwrap();
    mosaic.destroy();

    assert_eq!(mosaic.pan(5.0, 5.0), Err(MosaicError::Destroyed));
    assert_eq!(mosaic.render(), Err(MosaicError::Destroyed));
    assert_eq!(mosaic.clear(), Err(MosaicError::Destroyed));
    assert_eq!(mosaic.resize(), Err(MosaicError::Destroyed));
    assert_eq!(mosaic.enable(true, true), Err(MosaicError::Destroyed));
    assert_eq!(
        mosaic.handle_event(InputEvent::PointerUp),
        Err(MosaicError::Destroyed)
    );
}

#[test]
fn test_destroy_skips_error_handler() {
    let (seen, handler) = recorder();
    let mut mosaic = Mosaic::new(canvas(), config().on_error(handler)).unwrap();
    mosaic.destroy();
    let _ = mosaic.observe_resize(0.0, 0.0);
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_clear_blanks_canvas() {
    let mut mosaic = Mosaic::new(canvas(), config()).unwrap();
    mosaic.clear().unwrap();
    let pixel = mosaic.canvas().context_2d_ref().unwrap().get_pixel(10, 10);
    assert_eq!(pixel.map(|c| c.a), Some(0));
}

// ============================================================================
// INPUT
// ============================================================================

#[test]
fn test_pointer_leave_ends_drag() {
    let mut mosaic = Mosaic::new(canvas(), config()).unwrap();
    let response = mosaic
        .handle_event(InputEvent::PointerDown { x: 5.0, y: 5.0 })
        .unwrap();
    assert!(response.handled && !response.prevent_default);
    assert!(mosaic.is_dragging());

    mosaic.handle_event(InputEvent::PointerLeave).unwrap();
    assert!(!mosaic.is_dragging());
}

#[test]
fn test_rounded_tiles_clip_corners() {
    let config = config().with_item_size(100.0, 100.0).with_radius(30.0);
    let mosaic = Mosaic::new(canvas(), config).unwrap();
    let ctx = mosaic.canvas().context_2d_ref().unwrap();

    assert_eq!(ctx.get_pixel(0, 0).map(|c| c.a), Some(0));
    assert_eq!(ctx.get_pixel(50, 50), Some(Color::rgb(255, 0, 0)));
}
