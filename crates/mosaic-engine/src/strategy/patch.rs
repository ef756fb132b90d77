//! Patch strategy: row/column stitching
//!
//! Tiles live in rows (ascending `x`), rows are ordered by ascending `y`.
//! When a gap opens on an edge a tile is stitched into it; tiles pushed past
//! the opposite edge are dropped. Whole rows are recycled the same way
//! vertically.
//!
//! Each row remembers the lattice column of its first tile and its own
//! lattice row, and stitched tiles take their source from the grid built at
//! construction (or at the last reflow), repeated periodically. Opening the
//! left edge of a freshly built row therefore reuses the rightmost tile's
//! source, and panning back and forth lands every source where it started.

use std::collections::VecDeque;

use mosaic_canvas::ImageBitmap;

use super::{RecycleStrategy, StrategyKind};
use crate::{ConfigError, Geometry, GridBuilder, GridLayout, Tile};

/// One row of tiles plus its lattice coordinates
#[derive(Debug, Clone)]
pub struct TileRow {
    /// Lattice row
    index: i64,
    /// Lattice column of the front tile
    first_column: i64,
    tiles: VecDeque<Tile>,
}

impl TileRow {
    pub fn tiles(&self) -> &VecDeque<Tile> {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    fn y(&self) -> Option<f32> {
        self.tiles.front().map(|t| t.y)
    }
}

impl std::ops::Index<usize> for TileRow {
    type Output = Tile;

    fn index(&self, i: usize) -> &Tile {
        &self.tiles[i]
    }
}

/// Source assignment repeated across the lattice
#[derive(Debug, Clone, Default)]
struct Pattern {
    cells: Vec<Tile>,
    columns: usize,
    rows: usize,
}

impl Pattern {
    fn new(cells: Vec<Tile>, columns: usize) -> Self {
        let rows = if columns == 0 { 0 } else { cells.len().div_ceil(columns) };
        Self { cells, columns, rows }
    }

    /// Tile for lattice cell `(column, row)` placed at `(x, y)`
    fn spawn(&self, column: i64, row: i64, x: f32, y: f32) -> Option<Tile> {
        if self.columns == 0 || self.rows == 0 {
            return None;
        }
        let c = column.rem_euclid(self.columns as i64) as usize;
        let r = row.rem_euclid(self.rows as i64) as usize;
        // A short last row falls back to the first row's cell
        let cell = self
            .cells
            .get(r * self.columns + c)
            .or_else(|| self.cells.get(c))?;
        Some(cell.relocated(x, y))
    }
}

/// Stitching recycler over a 2-D grid
#[derive(Debug, Default)]
pub struct PatchStrategy {
    rows: VecDeque<TileRow>,
    pattern: Pattern,
}

impl PatchStrategy {
    /// Grid exactly covering `column_capacity × row_capacity` cells
    pub fn new(sources: &[ImageBitmap], geometry: &Geometry) -> Result<Self, ConfigError> {
        let builder = GridBuilder::new(sources, *geometry)?;
        let layout = GridLayout::visible(geometry);
        let tiles = builder.build(&layout);
        Ok(Self::from_grid(tiles, layout.columns))
    }

    fn from_grid(tiles: Vec<Tile>, columns: usize) -> Self {
        let pattern = Pattern::new(tiles.clone(), columns);
        let mut rows = VecDeque::new();
        if columns > 0 {
            let mut iter = tiles.into_iter().peekable();
            let mut index = 0;
            while iter.peek().is_some() {
                rows.push_back(TileRow {
                    index,
                    first_column: 0,
                    tiles: iter.by_ref().take(columns).collect(),
                });
                index += 1;
            }
        }
        Self { rows, pattern }
    }

    /// Rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &TileRow> {
        self.rows.iter()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn cover(&mut self, geometry: &Geometry) {
        for row in self.rows.iter_mut() {
            stitch_row(row, &self.pattern, geometry);
        }
        stitch_rows(&mut self.rows, &self.pattern, geometry);
    }
}

impl RecycleStrategy for PatchStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Patch
    }

    fn pan(&mut self, dx: f32, dy: f32, geometry: &Geometry) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        for tile in self.rows.iter_mut().flat_map(|row| row.tiles.iter_mut()) {
            tile.translate(dx, dy);
        }
        self.cover(geometry);
        tracing::trace!(
            "Patch pan ({}, {}): {} rows, {} tiles",
            dx,
            dy,
            self.rows.len(),
            self.tile_count()
        );
    }

    /// Re-chunk the current tiles into the new column capacity, keeping the
    /// pan phase, then stitch so a grown viewport is covered immediately.
    fn reflow(&mut self, geometry: &Geometry, sources: &[ImageBitmap]) {
        let flat: Vec<Tile> = self.rows.drain(..).flat_map(|row| row.tiles).collect();
        let (offset_x, offset_y) = flat
            .first()
            .map(|t| {
                (
                    phase(t.x, geometry.block_width(), geometry.gap()),
                    phase(t.y, geometry.block_height(), geometry.gap()),
                )
            })
            .unwrap_or((0.0, 0.0));

        let layout = GridLayout {
            columns: geometry.column_capacity(),
            rows: geometry.row_capacity(),
            offset_x,
            offset_y,
        };
        let mut next_origin = flat
            .last()
            .and_then(|t| t.origin_index)
            .map_or(0, |i| i + 1);
        let mut existing = flat.into_iter();

        let mut tiles = Vec::with_capacity(layout.len());
        for i in 0..layout.len() {
            let x = layout.offset_x + (i % layout.columns) as f32 * geometry.block_width();
            let y = layout.offset_y + (i / layout.columns) as f32 * geometry.block_height();

            let tile = match existing.next() {
                Some(mut tile) => {
                    tile.x = x;
                    tile.y = y;
                    tile
                }
                None if !sources.is_empty() => {
                    let index = next_origin % sources.len();
                    next_origin += 1;
                    Tile::new(sources[index].clone(), x, y).with_origin(index)
                }
                None => break,
            };
            tiles.push(tile);
        }

        *self = Self::from_grid(tiles, layout.columns);
        self.cover(geometry);
        tracing::debug!(
            "Patch reflow to {}x{} cells: {} tiles",
            layout.columns,
            layout.rows,
            self.tile_count()
        );
    }

    fn tiles(&self) -> Box<dyn Iterator<Item = &Tile> + '_> {
        Box::new(self.rows.iter().flat_map(|row| row.tiles.iter()))
    }

    fn tile_count(&self) -> usize {
        self.rows.iter().map(TileRow::len).sum()
    }

    fn clear(&mut self) {
        self.rows.clear();
        self.pattern = Pattern::default();
    }
}

/// Offset of the grid modulo one block, in `(gap - block, gap]`
fn phase(v: f32, block: f32, gap: f32) -> f32 {
    let p = v.rem_euclid(block);
    if p > gap { p - block } else { p }
}

/// Horizontal maintenance for one row
fn stitch_row(row: &mut TileRow, pattern: &Pattern, geometry: &Geometry) {
    let block = geometry.block_width();
    let gap = geometry.gap();
    let right_limit = geometry.canvas_width() - block;

    skip_column_periods(row, pattern, geometry);

    // Left edge opened
    while let Some(first) = row.tiles.front() {
        if first.x <= gap {
            break;
        }
        let Some(tile) = pattern.spawn(row.first_column - 1, row.index, first.x - block, first.y) else {
            break;
        };
        row.tiles.push_front(tile);
        row.first_column -= 1;
        while row.tiles.len() > 1 && row.tiles.back().is_some_and(|t| geometry.overflows_x(t.x)) {
            row.tiles.pop_back();
        }
    }

    // Right edge opened
    while let Some(last) = row.tiles.back() {
        if last.x >= right_limit {
            break;
        }
        let column = row.first_column + row.tiles.len() as i64;
        let Some(tile) = pattern.spawn(column, row.index, last.x + block, last.y) else {
            break;
        };
        row.tiles.push_back(tile);
        while row.tiles.len() > 1 && row.tiles.front().is_some_and(|t| geometry.overflows_x(t.x)) {
            row.tiles.pop_front();
            row.first_column += 1;
        }
    }

    while row.tiles.front().is_some_and(|t| geometry.overflows_x(t.x)) {
        row.tiles.pop_front();
        row.first_column += 1;
    }
    while row.tiles.back().is_some_and(|t| geometry.overflows_x(t.x)) {
        row.tiles.pop_back();
    }
}

/// A row displaced by more than one pattern period only needs whole
/// periods of stitching, which change no source; relabel it in one step.
fn skip_column_periods(row: &mut TileRow, pattern: &Pattern, geometry: &Geometry) {
    let (Some(first), Some(last)) = (row.tiles.front(), row.tiles.back()) else {
        return;
    };
    if pattern.columns == 0 {
        return;
    }
    let span = pattern.columns as f32 * geometry.block_width();
    let lead = first.x - geometry.gap();
    let trail = (geometry.canvas_width() - geometry.block_width()) - last.x;

    let periods = if lead > span {
        -(lead / span).floor()
    } else if trail > span {
        (trail / span).floor()
    } else {
        return;
    };
    for tile in row.tiles.iter_mut() {
        tile.x += periods * span;
    }
    row.first_column += periods as i64 * pattern.columns as i64;
}

/// Row for lattice row `index` at `y`, sharing `like`'s columns
fn spawn_row(like: &TileRow, index: i64, y: f32, pattern: &Pattern) -> TileRow {
    let tiles = like
        .tiles
        .iter()
        .enumerate()
        .filter_map(|(k, t)| pattern.spawn(like.first_column + k as i64, index, t.x, y))
        .collect();
    TileRow {
        index,
        first_column: like.first_column,
        tiles,
    }
}

/// Vertical maintenance: the same stitching with whole rows
fn stitch_rows(rows: &mut VecDeque<TileRow>, pattern: &Pattern, geometry: &Geometry) {
    let block = geometry.block_height();
    let gap = geometry.gap();
    let bottom_limit = geometry.canvas_height() - block;

    rows.retain(|row| !row.is_empty());
    skip_row_periods(rows, pattern, geometry);

    // Top edge opened
    while let Some(first) = rows.front() {
        let Some(first_y) = first.y() else { break };
        if first_y <= gap {
            break;
        }
        let row = spawn_row(first, first.index - 1, first_y - block, pattern);
        if row.is_empty() {
            break;
        }
        rows.push_front(row);
        while rows.len() > 1 && rows.back().and_then(TileRow::y).is_some_and(|y| geometry.overflows_y(y)) {
            rows.pop_back();
        }
    }

    // Bottom edge opened
    while let Some(last) = rows.back() {
        let Some(last_y) = last.y() else { break };
        if last_y >= bottom_limit {
            break;
        }
        let row = spawn_row(last, last.index + 1, last_y + block, pattern);
        if row.is_empty() {
            break;
        }
        rows.push_back(row);
        while rows.len() > 1 && rows.front().and_then(TileRow::y).is_some_and(|y| geometry.overflows_y(y)) {
            rows.pop_front();
        }
    }

    rows.retain(|row| row.y().is_some_and(|y| !geometry.overflows_y(y)));
}

fn skip_row_periods(rows: &mut VecDeque<TileRow>, pattern: &Pattern, geometry: &Geometry) {
    let (Some(first_y), Some(last_y)) = (
        rows.front().and_then(TileRow::y),
        rows.back().and_then(TileRow::y),
    ) else {
        return;
    };
    if pattern.rows == 0 {
        return;
    }
    let span = pattern.rows as f32 * geometry.block_height();
    let lead = first_y - geometry.gap();
    let trail = (geometry.canvas_height() - geometry.block_height()) - last_y;

    let periods = if lead > span {
        -(lead / span).floor()
    } else if trail > span {
        (trail / span).floor()
    } else {
        return;
    };
    for row in rows.iter_mut() {
        row.index += periods as i64 * pattern.rows as i64;
        for tile in row.tiles.iter_mut() {
            tile.y += periods * span;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TileStyle;

    fn sources(n: usize) -> Vec<ImageBitmap> {
        (0..n)
            .map(|i| ImageBitmap::solid(1, 1, [i as u8, 0, 0, 255]).unwrap())
            .collect()
    }

    fn geometry() -> Geometry {
        Geometry::new(300.0, 300.0, TileStyle::new(50.0, 50.0).with_gap(0.0))
    }

    fn xs(row: &TileRow) -> Vec<f32> {
        row.tiles().iter().map(|t| t.x).collect()
    }

    #[test]
    fn test_initial_rows() {
        let g = geometry();
        let patch = PatchStrategy::new(&sources(1), &g).unwrap();
        assert_eq!(patch.row_count(), 6);
        assert_eq!(patch.tile_count(), 36);
        for row in patch.rows() {
            assert_eq!(xs(row), vec![0.0, 50.0, 100.0, 150.0, 200.0, 250.0]);
        }
    }

    #[test]
    fn test_pan_right_stitches_left_edge() {
        let g = geometry();
        let src = sources(6);
        let mut patch = PatchStrategy::new(&src, &g).unwrap();
        patch.pan(60.0, 0.0, &g);

        let row = patch.rows().next().unwrap();
        // The tile pushed to x=310 is gone; its source now sits at x=10
        assert_eq!(xs(row), vec![-40.0, 10.0, 60.0, 110.0, 160.0, 210.0, 260.0]);
        assert_eq!(row[1].origin_index, Some(5));
        assert_eq!(row[2].origin_index, Some(0));
        assert!(row.tiles().iter().all(|t| !g.overflows_x(t.x)));
    }

    #[test]
    fn test_pan_left_stitches_right_edge() {
        let g = geometry();
        let mut patch = PatchStrategy::new(&sources(6), &g).unwrap();
        patch.pan(-20.0, 0.0, &g);

        let row = patch.rows().next().unwrap();
        assert_eq!(xs(row), vec![-20.0, 30.0, 80.0, 130.0, 180.0, 230.0, 280.0]);
        assert_eq!(row[6].origin_index, Some(0));
    }

    #[test]
    fn test_pan_down_stitches_top_rows() {
        let g = geometry();
        let mut patch = PatchStrategy::new(&sources(36), &g).unwrap();
        patch.pan(0.0, 25.0, &g);

        let ys: Vec<f32> = patch.rows().map(|r| r[0].y).collect();
        assert_eq!(ys, vec![-25.0, 25.0, 75.0, 125.0, 175.0, 225.0, 275.0]);
        // New top row repeats the bottom row's sources
        assert_eq!(patch.rows().next().unwrap()[0].origin_index, Some(30));
    }

    #[test]
    fn test_pan_back_restores_sources() {
        let g = geometry();
        let mut patch = PatchStrategy::new(&sources(6), &g).unwrap();
        patch.pan(60.0, 0.0, &g);
        patch.pan(-60.0, 0.0, &g);

        let row = patch.rows().next().unwrap();
        let visible: Vec<_> = row
            .tiles()
            .iter()
            .filter(|t| g.intersects_viewport(t.x, t.y))
            .map(|t| (t.x, t.origin_index))
            .collect();
        let expected: Vec<_> = (0..6).map(|i| (i as f32 * 50.0, Some(i))).collect();
        assert_eq!(visible, expected);
    }

    #[test]
    fn test_large_delta_keeps_bounded() {
        let g = geometry();
        let mut patch = PatchStrategy::new(&sources(3), &g).unwrap();
        patch.pan(10_000.0, -7_777.0, &g);

        assert!(patch.tile_count() <= 8 * 8);
        for row in patch.rows() {
            assert!(row[0].x <= g.gap());
            assert!(row[row.len() - 1].x >= g.canvas_width() - g.block_width());
        }
    }

    #[test]
    fn test_reflow_shrink_and_grow() {
        let g = geometry();
        let src = sources(4);
        let mut patch = PatchStrategy::new(&src, &g).unwrap();
        patch.pan(-10.0, -10.0, &g);

        let small = Geometry::new(200.0, 100.0, *g.style());
        patch.reflow(&small, &src);
        assert!(patch.tile_count() < 36);
        assert_eq!(patch.rows().next().unwrap()[0].x, -10.0);

        let big = Geometry::new(600.0, 400.0, *g.style());
        patch.reflow(&big, &src);
        for row in patch.rows() {
            assert!(row[row.len() - 1].x >= 600.0 - 50.0);
        }
        let last_row = patch.rows().last().unwrap();
        assert!(last_row[0].y >= 400.0 - 50.0);
    }

    #[test]
    fn test_zero_delta_is_noop() {
        let g = geometry();
        let mut patch = PatchStrategy::new(&sources(2), &g).unwrap();
        patch.pan(0.0, 0.0, &g);
        assert_eq!(patch.tile_count(), 36);
    }
}
