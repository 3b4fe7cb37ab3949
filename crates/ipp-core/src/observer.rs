use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Phase of processing a single image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Decode,
    Kernel,
    Encode,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode => write!(f, "Decoding"),
            Self::Kernel => write!(f, "Running kernel"),
            Self::Encode => write!(f, "Encoding"),
        }
    }
}

/// Thread-safe sink for timing and progress events.
///
/// Passed explicitly to the job layer and to the chunked strategy. All
/// methods default to no-ops so implementors only override what they need.
pub trait Observer: Send + Sync {
    /// A job over `total_files` inputs is starting.
    fn job_started(&self, _total_files: usize) {}

    /// A processing stage of the current image finished.
    fn stage_finished(&self, _stage: Stage, _elapsed: Duration) {}

    /// One band of a chunked run finished. May be called from worker threads
    /// in any order.
    fn band_finished(&self, _band: usize, _rows: Range<usize>, _elapsed: Duration) {}

    /// An output image was written.
    fn file_finished(&self, _input: &Path, _output: &Path) {}
}

/// Observer that ignores every event.
pub struct NoOpObserver;
impl Observer for NoOpObserver {}

/// Timing of one completed band.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BandTiming {
    /// Position of the input file within the job, counted from 0.
    pub file: usize,
    pub band: usize,
    pub rows: Range<usize>,
    pub elapsed: Duration,
}

/// Observer that records every stage and band timing it receives.
///
/// Bands are attributed to the file being processed, which is the one after
/// the last reported [`Observer::file_finished`].
#[derive(Debug, Default)]
pub struct TimingCollector {
    stages: Mutex<Vec<(Stage, Duration)>>,
    bands: Mutex<Vec<BandTiming>>,
    files: Mutex<Vec<PathBuf>>,
}

impl TimingCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage timings in the order they were reported.
    pub fn stages(&self) -> Vec<(Stage, Duration)> {
        self.stages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Band timings sorted by file, then band index.
    pub fn bands(&self) -> Vec<BandTiming> {
        let mut bands = self
            .bands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        bands.sort_by_key(|b| (b.file, b.band));
        bands
    }

    /// Inputs finished so far, in job order. Index matches [`BandTiming::file`].
    pub fn files(&self) -> Vec<PathBuf> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Sum of all recorded stage durations for `stage`.
    pub fn total_for(&self, stage: Stage) -> Duration {
        self.stages()
            .into_iter()
            .filter(|(s, _)| *s == stage)
            .map(|(_, d)| d)
            .sum()
    }

    /// Sum of all recorded stage durations.
    pub fn total(&self) -> Duration {
        self.stages().into_iter().map(|(_, d)| d).sum()
    }
}

impl Observer for TimingCollector {
    fn stage_finished(&self, stage: Stage, elapsed: Duration) {
        self.stages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((stage, elapsed));
    }

    fn band_finished(&self, band: usize, rows: Range<usize>, elapsed: Duration) {
        let file = self.files.lock().unwrap_or_else(PoisonError::into_inner).len();
        self.bands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(BandTiming {
                file,
                band,
                rows,
                elapsed,
            });
    }

    fn file_finished(&self, input: &Path, _output: &Path) {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(input.to_path_buf());
    }
}
