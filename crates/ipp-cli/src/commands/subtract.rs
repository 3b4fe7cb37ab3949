use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use ipp_core::color::HsvWeights;
use ipp_core::consts::DEFAULT_THRESHOLD;
use ipp_core::kernel::{DifferenceParams, DistanceMode};
use ipp_core::pipeline::{JobConfig, Operation};

use super::{execute_job, ExecutionArgs};

#[derive(Args)]
pub struct SubtractArgs {
    /// Background reference image
    pub reference: PathBuf,

    /// Images to compare against the reference
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Pixels whose distance exceeds this become white
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Compare in HSV space instead of RGB
    #[arg(long)]
    pub hsv: bool,

    /// HSV weights as "hue,saturation,value" (e.g. "0.6,0.6,0.1"); implies --hsv
    #[arg(long)]
    pub weights: Option<String>,

    #[command(flatten)]
    pub execution: ExecutionArgs,
}

pub fn run(args: &SubtractArgs) -> Result<()> {
    let mode = match args.weights {
        Some(ref weights) => DistanceMode::Hsv(parse_weights(weights)?),
        None if args.hsv => DistanceMode::hsv_default(),
        None => DistanceMode::Rgb,
    };

    let config = JobConfig {
        inputs: args.images.clone(),
        reference: Some(args.reference.clone()),
        output_dir: args.execution.output_dir.clone(),
        operation: Operation::BackgroundSubtraction(DifferenceParams {
            threshold: args.threshold,
            mode,
        }),
        execution: args.execution.execution_config(),
    };

    execute_job(&config, args.execution.timings)
}

fn parse_weights(s: &str) -> Result<HsvWeights> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .context("Invalid weights format (expected 'hue,saturation,value')")?;
    if parts.len() != 3 {
        anyhow::bail!("Weights require exactly 3 values: hue,saturation,value");
    }
    Ok(HsvWeights::new(parts[0], parts[1], parts[2]))
}
