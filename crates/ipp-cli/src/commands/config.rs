use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use ipp_core::consts::DEFAULT_THRESHOLD;
use ipp_core::kernel::{DifferenceParams, DistanceMode};
use ipp_core::pipeline::{ExecutionConfig, JobConfig, Operation};

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save a default background-subtraction job as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let config = JobConfig {
        inputs: vec![PathBuf::from("frame.png")],
        reference: Some(PathBuf::from("background.png")),
        output_dir: None,
        operation: Operation::BackgroundSubtraction(DifferenceParams {
            threshold: DEFAULT_THRESHOLD,
            mode: DistanceMode::hsv_default(),
        }),
        execution: ExecutionConfig::default(),
    };
    let toml_str = config.to_toml_string()?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Default config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
