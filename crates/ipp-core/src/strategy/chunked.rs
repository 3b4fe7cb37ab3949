use std::any::Any;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

use crate::buffer::{PixelBuffer, Rgb, Window};
use crate::error::{IppError, Result};
use crate::kernel::PixelKernel;
use crate::observer::{NoOpObserver, Observer};

use super::flat::process_rows;
use super::ExecutionStrategy;

/// Splits the image into horizontal bands and runs each band on its own
/// worker of a dedicated thread pool.
///
/// Every band reads from the same immutable input, widened by the kernel's
/// halo, and returns its own output rows. Bands are stitched back together
/// by row index after all workers have joined, so the result does not depend
/// on scheduling.
pub struct ChunkedParallelStrategy {
    workers: usize,
    pool: rayon::ThreadPool,
    observer: Arc<dyn Observer>,
}

/// One band of work: the output rows it owns and the rows it may read.
struct Chunk<'a> {
    index: usize,
    rows: Range<usize>,
    window: Window<'a>,
}

impl ChunkedParallelStrategy {
    /// Build a strategy with a pool of exactly `workers` threads.
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(IppError::InvalidParameter(
                "worker count must be at least 1".into(),
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("ipp-band-{i}"))
            .build()
            .map_err(|e| IppError::ThreadPool(e.to_string()))?;
        Ok(Self {
            workers,
            pool,
            observer: Arc::new(NoOpObserver),
        })
    }

    /// Report per-band timings to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    fn run_chunk(&self, kernel: &dyn PixelKernel, chunk: Chunk<'_>) -> Result<Vec<Rgb>> {
        let start = Instant::now();
        let Chunk {
            index,
            rows,
            window,
        } = chunk;

        let band = panic::catch_unwind(AssertUnwindSafe(|| {
            process_rows(kernel, &window, rows.clone())
        }))
        .map_err(|payload| IppError::WorkerFailure {
            band: index,
            message: panic_message(payload.as_ref()),
        })?;

        let elapsed = start.elapsed();
        debug!(
            band = index,
            rows = ?rows,
            window = ?window.row_range(),
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "Band complete"
        );
        self.observer.band_finished(index, rows, elapsed);
        Ok(band)
    }
}

impl ExecutionStrategy for ChunkedParallelStrategy {
    fn name(&self) -> &str {
        "Chunked"
    }

    fn execute(&self, kernel: &dyn PixelKernel, input: &PixelBuffer) -> Result<PixelBuffer> {
        kernel.prepare(input)?;

        let (w, h) = input.dimensions();
        let chunks = make_chunks(input, self.workers, kernel.halo());

        // Collecting into Result keeps band order and fails if any band failed.
        let bands: Vec<Vec<Rgb>> = self.pool.install(|| {
            chunks
                .into_par_iter()
                .map(|chunk| self.run_chunk(kernel, chunk))
                .collect::<Result<Vec<_>>>()
        })?;

        let mut samples = Vec::with_capacity(w * h);
        for band in bands {
            samples.extend(band);
        }
        PixelBuffer::new(w, h, samples)
    }
}

/// Split `height` rows into `bands` contiguous ranges.
///
/// Every band gets `height / bands` rows and the last band also takes the
/// remainder, so with more bands than rows all but the last are empty.
pub fn partition_rows(height: usize, bands: usize) -> Vec<Range<usize>> {
    if bands == 0 {
        return Vec::new();
    }
    let base = height / bands;
    (0..bands)
        .map(|i| {
            let start = i * base;
            let end = if i + 1 == bands { height } else { start + base };
            start..end
        })
        .collect()
}

fn make_chunks(input: &PixelBuffer, bands: usize, halo: usize) -> Vec<Chunk<'_>> {
    partition_rows(input.height(), bands)
        .into_iter()
        .enumerate()
        .map(|(index, rows)| {
            let read = rows.start.saturating_sub(halo)..rows.end.saturating_add(halo);
            Chunk {
                index,
                window: input.window_rows(read),
                rows,
            }
        })
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
