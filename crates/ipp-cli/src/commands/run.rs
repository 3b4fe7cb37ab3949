use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use ipp_core::pipeline::JobConfig;

use super::execute_job;

#[derive(Args)]
pub struct RunArgs {
    /// Job config file (TOML)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Override the config's output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Print per-stage timings after the run
    #[arg(long)]
    pub timings: bool,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let mut config = JobConfig::load(&args.config)
        .with_context(|| format!("Failed to read config {}", args.config.display()))?;
    if args.output_dir.is_some() {
        config.output_dir = args.output_dir.clone();
    }

    execute_job(&config, args.timings)
}
