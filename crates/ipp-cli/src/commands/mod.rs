pub mod config;
pub mod morph;
pub mod run;
pub mod subtract;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use ipp_core::pipeline::{run_job, ExecutionConfig, JobConfig};
use ipp_core::strategy::StrategyKind;
use tracing::info;

use crate::progress::ProgressObserver;
use crate::summary::{print_job_summary, print_timings};

#[derive(Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Scalar,
    Flat,
    Chunked,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Scalar => StrategyKind::Scalar,
            StrategyArg::Flat => StrategyKind::Flat,
            StrategyArg::Chunked => StrategyKind::Chunked,
        }
    }
}

/// Flags shared by every kernel subcommand.
#[derive(Args)]
pub struct ExecutionArgs {
    /// Execution strategy
    #[arg(long, value_enum, default_value = "chunked")]
    pub strategy: StrategyArg,

    /// Worker threads for the chunked strategy (default: available cores)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Write outputs here instead of next to each input
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Print per-stage timings after the run
    #[arg(long)]
    pub timings: bool,
}

impl ExecutionArgs {
    pub fn execution_config(&self) -> ExecutionConfig {
        ExecutionConfig {
            strategy: self.strategy.into(),
            workers: self.workers,
        }
    }
}

/// Print the summary, run the job with a progress bar, and report results.
pub fn execute_job(config: &JobConfig, show_timings: bool) -> Result<()> {
    print_job_summary(config);

    let observer = Arc::new(ProgressObserver::new()?);
    let outputs = run_job(config, observer.clone())
        .with_context(|| format!("{} failed", config.operation.name()))?;
    observer.finish();
    info!(
        operation = config.operation.name(),
        outputs = outputs.len(),
        elapsed_ms = observer.timings().total().as_secs_f64() * 1000.0,
        "Job finished"
    );

    for output in &outputs {
        println!("  Saved {}", output.display());
    }
    if show_timings {
        print_timings(observer.timings());
    }
    Ok(())
}
