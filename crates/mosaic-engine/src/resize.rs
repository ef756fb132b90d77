//! Resize coordinator
//!
//! Brings the backing store, the geometry and the tile set back in line
//! with the canvas size. Sources are reused; nothing is reloaded.

use mosaic_canvas::{CanvasElement, ImageBitmap};

use crate::{Geometry, RecycleStrategy, TileStyle};

/// Reallocate the backing store for the current CSS size and pixel ratio,
/// then reflow `strategy` into the recomputed geometry.
pub(crate) fn reflow(
    canvas: &mut CanvasElement,
    style: TileStyle,
    strategy: &mut dyn RecycleStrategy,
    sources: &[ImageBitmap],
) -> Geometry {
    let (pixel_width, pixel_height) = canvas.sync_backing_store();
    let geometry = Geometry::new(canvas.css_width(), canvas.css_height(), style);
    let before = strategy.tile_count();
    strategy.reflow(&geometry, sources);

    tracing::debug!(
        "Resized to {}x{} css ({}x{} px): {}x{} cells, tiles {} -> {}",
        geometry.canvas_width(),
        geometry.canvas_height(),
        pixel_width,
        pixel_height,
        geometry.column_capacity(),
        geometry.row_capacity(),
        before,
        strategy.tile_count()
    );
    geometry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PatchStrategy;

    #[test]
    fn test_reflow_follows_canvas() {
        let sources = vec![ImageBitmap::solid(1, 1, [9, 9, 9, 255]).unwrap()];
        let style = TileStyle::new(50.0, 50.0).with_gap(0.0);
        let mut canvas = CanvasElement::new(300.0, 300.0).unwrap();
        let initial = Geometry::new(300.0, 300.0, style);
        let mut patch = PatchStrategy::new(&sources, &initial).unwrap();

        canvas.set_size(100.0, 150.0).unwrap();
        let geometry = reflow(&mut canvas, style, &mut patch, &sources);

        assert_eq!(geometry.column_capacity(), 2);
        assert_eq!(geometry.row_capacity(), 3);
        assert_eq!(patch.tile_count(), 6);
    }
}
