use std::ops::Range;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use ipp_core::observer::{Observer, Stage, TimingCollector};

/// Drives a per-file progress bar and records timings for the summary.
pub struct ProgressObserver {
    bar: ProgressBar,
    timings: TimingCollector,
}

impl ProgressObserver {
    pub fn new() -> Result<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg:20} [{bar:40}] {pos}/{len}")?
                .progress_chars("=> "),
        );
        Ok(Self {
            bar,
            timings: TimingCollector::new(),
        })
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Done");
    }

    pub fn timings(&self) -> &TimingCollector {
        &self.timings
    }
}

impl Observer for ProgressObserver {
    fn job_started(&self, total_files: usize) {
        self.bar.set_length(total_files as u64);
        self.bar.set_position(0);
    }

    fn stage_finished(&self, stage: Stage, elapsed: Duration) {
        self.bar.set_message(stage.to_string());
        self.timings.stage_finished(stage, elapsed);
    }

    fn band_finished(&self, band: usize, rows: Range<usize>, elapsed: Duration) {
        self.timings.band_finished(band, rows, elapsed);
    }

    fn file_finished(&self, input: &Path, output: &Path) {
        self.timings.file_finished(input, output);
        self.bar.inc(1);
    }
}
