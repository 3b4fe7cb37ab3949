use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use ipp_core::consts::DEFAULT_RADIUS;
use ipp_core::kernel::MorphOp;
use ipp_core::pipeline::{JobConfig, Operation};

use super::{execute_job, ExecutionArgs};

#[derive(Args)]
pub struct MorphArgs {
    /// Black/white mask images
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Neighborhood radius in pixels
    #[arg(short, long, default_value_t = DEFAULT_RADIUS as i64, allow_negative_numbers = true)]
    pub radius: i64,

    #[command(flatten)]
    pub execution: ExecutionArgs,
}

pub fn run(args: &MorphArgs, op: MorphOp) -> Result<()> {
    let operation = match op {
        MorphOp::Erode => Operation::Erode {
            radius: args.radius,
        },
        MorphOp::Dilate => Operation::Dilate {
            radius: args.radius,
        },
    };

    let config = JobConfig {
        inputs: args.images.clone(),
        reference: None,
        output_dir: args.execution.output_dir.clone(),
        operation,
        execution: args.execution.execution_config(),
    };

    execute_job(&config, args.execution.timings)
}
