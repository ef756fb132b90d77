//! Batch image loader
//!
//! Decodes sources on smol's blocking pool and joins them into one result.

use std::collections::HashMap;
use std::path::Path;

use mosaic_canvas::ImageBitmap;
use smol::Task;

use crate::{BitmapCache, CacheStats, ImageDecoder, ImageSource, LoadError, LoadFailure, SourceFailure};

/// Loads image batches, sharing decoded bitmaps across duplicate paths.
/// Keep one loader around to reuse decoded files across batches.
#[derive(Debug, Default)]
pub struct ImageLoader {
    cache: BitmapCache,
}

enum Pending {
    Ready(ImageBitmap),
    Decoding(usize),
}

impl ImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader whose cache holds at most `budget` decoded bytes
    pub fn with_budget(budget: usize) -> Self {
        Self {
            cache: BitmapCache::new(budget),
        }
    }

    pub fn cache(&self) -> &BitmapCache {
        &self.cache
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Resolve every source. Waits for all of them, even after a failure,
    /// so the error lists each source that could not be loaded.
    pub async fn load_all(&mut self, sources: &[ImageSource]) -> Result<Vec<ImageBitmap>, LoadFailure> {
        let mut tasks: Vec<(Option<&Path>, Task<Result<ImageBitmap, LoadError>>)> = Vec::new();
        let mut in_flight: HashMap<&Path, usize> = HashMap::new();
        let mut pending = Vec::with_capacity(sources.len());

        for source in sources {
            if let ImageSource::Bitmap(bitmap) = source {
                pending.push(Pending::Ready(bitmap.clone()));
                continue;
            }

            let path = source.path();
            if let Some(path) = path {
                // Repeats within the batch join the first decode
                if let Some(&task) = in_flight.get(path) {
                    pending.push(Pending::Decoding(task));
                    continue;
                }
                if let Some(bitmap) = self.cache.lookup(path) {
                    pending.push(Pending::Ready(bitmap));
                    continue;
                }
                in_flight.insert(path, tasks.len());
            }

            let owned = source.clone();
            pending.push(Pending::Decoding(tasks.len()));
            tasks.push((path, smol::unblock(move || decode_source(&owned))));
        }

        tracing::debug!("Loading {} image sources ({} decodes)", sources.len(), tasks.len());

        let mut decoded = Vec::with_capacity(tasks.len());
        for (path, task) in tasks {
            let result = task.await;
            if let (Some(path), Ok(bitmap)) = (path, &result) {
                self.cache.store(path.to_path_buf(), bitmap.clone());
            }
            decoded.push(result);
        }

        let mut bitmaps = Vec::with_capacity(sources.len());
        let mut failure = LoadFailure::default();
        for (index, (source, slot)) in sources.iter().zip(pending).enumerate() {
            match slot {
                Pending::Ready(bitmap) => bitmaps.push(bitmap),
                Pending::Decoding(task) => match &decoded[task] {
                    Ok(bitmap) => bitmaps.push(bitmap.clone()),
                    Err(reason) => failure.failures.push(SourceFailure {
                        index,
                        source: source.describe(),
                        reason: reason.clone(),
                    }),
                },
            }
        }

        if failure.is_empty() {
            tracing::info!("Loaded {} image sources", bitmaps.len());
            Ok(bitmaps)
        } else {
            tracing::warn!("{}", failure);
            Err(failure)
        }
    }
}

fn decode_source(source: &ImageSource) -> Result<ImageBitmap, LoadError> {
    match source {
        ImageSource::Path(path) => {
            let data = std::fs::read(path).map_err(|e| LoadError::Io(format!("{}: {}", path.display(), e)))?;
            Ok(ImageDecoder::decode(&data)?.with_label(path.display().to_string()))
        }
        ImageSource::Bytes { label, data } => Ok(ImageDecoder::decode(data)?.with_label(label)),
        ImageSource::Bitmap(bitmap) => Ok(bitmap.clone()),
    }
}
