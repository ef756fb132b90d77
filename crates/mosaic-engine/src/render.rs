//! Tile renderer

use mosaic_canvas::CanvasRenderingContext2D;

use crate::{DrawError, Geometry, Tile};

/// Counters from one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Tiles with at least one pixel on the canvas
    pub drawn: usize,
    /// Live tiles skipped because they lie entirely off-canvas
    pub culled: usize,
}

/// Draws tiles onto a 2D context
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw every visible tile's source scaled to the cell size.
    ///
    /// With a positive radius all cells are gathered into one rounded-rect
    /// path and clipped once, so the state stack is touched once per frame.
    /// The caller clears the canvas beforehand.
    pub fn render<'a>(
        &self,
        ctx: &mut CanvasRenderingContext2D,
        tiles: impl IntoIterator<Item = &'a Tile>,
        geometry: &Geometry,
    ) -> Result<RenderStats, DrawError> {
        let (w, h) = (geometry.item_width(), geometry.item_height());
        let mut stats = RenderStats::default();
        let visible: Vec<&Tile> = tiles
            .into_iter()
            .filter(|t| {
                let keep = geometry.intersects_viewport(t.x, t.y);
                if !keep {
                    stats.culled += 1;
                }
                keep
            })
            .collect();

        if visible.is_empty() {
            return Ok(stats);
        }

        let radius = geometry.radius();
        if radius > 0.0 {
            ctx.save();
            ctx.begin_path();
            for tile in &visible {
                ctx.round_rect(tile.x, tile.y, w, h, radius);
            }
            if let Err(e) = ctx.clip() {
                ctx.restore();
                return Err(e.into());
            }
        }

        let drawn = visible
            .iter()
            .try_for_each(|tile| ctx.draw_image(&tile.source, tile.x, tile.y, w, h));

        if radius > 0.0 {
            ctx.restore();
        }
        drawn?;

        stats.drawn = visible.len();
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TileStyle;
    use mosaic_canvas::{Color, ImageBitmap};

    fn red() -> ImageBitmap {
        ImageBitmap::solid(1, 1, [255, 0, 0, 255]).unwrap()
    }

    #[test]
    fn test_render_culls_offscreen() {
        let g = Geometry::new(100.0, 100.0, TileStyle::new(50.0, 50.0).with_gap(0.0));
        let mut ctx = CanvasRenderingContext2D::new(100, 100, 1.0);
        let tiles = vec![
            Tile::new(red(), 0.0, 0.0),
            Tile::new(red(), 50.0, 50.0),
            Tile::new(red(), -50.0, 0.0),
            Tile::new(red(), 100.0, 0.0),
        ];

        let stats = Renderer::new().render(&mut ctx, &tiles, &g).unwrap();
        assert_eq!(stats, RenderStats { drawn: 2, culled: 2 });
        assert_eq!(ctx.get_pixel(10, 10), Some(Color::rgb(255, 0, 0)));
        assert_eq!(ctx.get_pixel(60, 10).map(|c| c.a), Some(0));
        assert_eq!(ctx.get_pixel(75, 75), Some(Color::rgb(255, 0, 0)));
    }

    #[test]
    fn test_render_rounded_clip() {
        let g = Geometry::new(100.0, 100.0, TileStyle::new(100.0, 100.0).with_radius(30.0));
        let mut ctx = CanvasRenderingContext2D::new(100, 100, 1.0);
        let tiles = [Tile::new(red(), 0.0, 0.0)];

        Renderer::new().render(&mut ctx, &tiles, &g).unwrap();
        assert_eq!(ctx.get_pixel(0, 0).map(|c| c.a), Some(0));
        assert_eq!(ctx.get_pixel(50, 50), Some(Color::rgb(255, 0, 0)));
        // Clip does not leak into later frames
        assert!(!ctx.state().has_clip());
    }

    #[test]
    fn test_render_lost_context() {
        let g = Geometry::new(10.0, 10.0, TileStyle::new(5.0, 5.0));
        let mut ctx = CanvasRenderingContext2D::new(0, 0, 1.0);
        let tiles = [Tile::new(red(), 0.0, 0.0)];

        let err = Renderer::new().render(&mut ctx, &tiles, &g).unwrap_err();
        assert!(matches!(err, DrawError::Canvas(_)));
    }
}
