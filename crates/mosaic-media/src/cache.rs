//! Decoded bitmap cache
//!
//! Keeps decoded files between batches, so a loader shared by several
//! mosaics decodes each path once. When the byte budget is exceeded the
//! least recently used files are dropped first.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use mosaic_canvas::ImageBitmap;

/// Default budget: 64 MiB of decoded pixels
pub const DEFAULT_BUDGET: usize = 64 * 1024 * 1024;

/// Lookup counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Path-keyed bitmap cache with a byte budget
#[derive(Debug)]
pub struct BitmapCache {
    bitmaps: HashMap<PathBuf, ImageBitmap>,
    /// Least recently used at the front
    recency: VecDeque<PathBuf>,
    budget: usize,
    used: usize,
    stats: CacheStats,
}

fn footprint(bitmap: &ImageBitmap) -> usize {
    bitmap.pixmap().data().len()
}

impl BitmapCache {
    pub fn new(budget: usize) -> Self {
        Self {
            bitmaps: HashMap::new(),
            recency: VecDeque::new(),
            budget,
            used: 0,
            stats: CacheStats::default(),
        }
    }

    /// Bitmap decoded earlier from `path`, marking it as recently used
    pub fn lookup(&mut self, path: &Path) -> Option<ImageBitmap> {
        let Some(bitmap) = self.bitmaps.get(path) else {
            self.stats.misses += 1;
            return None;
        };
        self.stats.hits += 1;
        if let Some(pos) = self.recency.iter().position(|p| p == path) {
            if let Some(key) = self.recency.remove(pos) {
                self.recency.push_back(key);
            }
        }
        Some(bitmap.clone())
    }

    /// Keep `bitmap` for `path`. Bitmaps larger than the whole budget are
    /// not kept.
    pub fn store(&mut self, path: PathBuf, bitmap: ImageBitmap) {
        let size = footprint(&bitmap);
        if size > self.budget {
            tracing::debug!("{} exceeds the cache budget ({} bytes)", path.display(), size);
            return;
        }
        self.forget(&path);
        while self.used + size > self.budget {
            let Some(oldest) = self.recency.pop_front() else { break };
            if let Some(evicted) = self.bitmaps.remove(&oldest) {
                self.used -= footprint(&evicted);
                self.stats.evictions += 1;
                tracing::trace!("Evicted {}", oldest.display());
            }
        }
        self.used += size;
        self.recency.push_back(path.clone());
        self.bitmaps.insert(path, bitmap);
    }

    fn forget(&mut self, path: &Path) {
        if let Some(old) = self.bitmaps.remove(path) {
            self.used -= footprint(&old);
            self.recency.retain(|p| p != path);
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.bitmaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bitmaps.is_empty()
    }

    /// Decoded bytes currently held
    pub fn bytes_used(&self) -> usize {
        self.used
    }
}

impl Default for BitmapCache {
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET)
    }
}
