use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::buffer::PixelBuffer;
use crate::error::{IppError, Result};
use crate::io::{decode, encode};
use crate::kernel::{dilate, erode, subtract_background, validate_radius};
use crate::observer::{Observer, Stage};
use crate::strategy::{create_strategy, ExecutionStrategy};

use super::config::{JobConfig, Operation};

/// Run `op` on an already decoded image.
///
/// `reference` is required for background subtraction and ignored otherwise.
pub fn apply_operation(
    op: &Operation,
    reference: Option<&PixelBuffer>,
    input: &PixelBuffer,
    strategy: &dyn ExecutionStrategy,
) -> Result<PixelBuffer> {
    match op {
        Operation::BackgroundSubtraction(params) => {
            let reference = reference.ok_or_else(|| {
                IppError::InvalidParameter(format!("{} requires a reference image", op.name()))
            })?;
            subtract_background(reference, input, params, strategy)
        }
        Operation::Erode { radius } => erode(input, validate_radius(*radius)?, strategy),
        Operation::Dilate { radius } => dilate(input, validate_radius(*radius)?, strategy),
    }
}

/// `<dir>/<operation>_<file name>`, where `dir` is `output_dir` or the
/// input's own directory.
pub fn output_path_for(op: &Operation, input: &Path, output_dir: Option<&Path>) -> Result<PathBuf> {
    let file_name = input.file_name().ok_or_else(|| {
        IppError::InvalidParameter(format!("{} has no file name", input.display()))
    })?;
    let mut name = OsString::from(format!("{}_", op.name()));
    name.push(file_name);

    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    Ok(dir.join(name))
}

/// Decode `input_path`, run `op`, and encode the result to `output_path`.
///
/// Nothing is written unless the kernel succeeds. A failed encode removes
/// the partial file it left behind but never a file that was already there.
pub fn process_file(
    op: &Operation,
    strategy: &dyn ExecutionStrategy,
    reference: Option<&PixelBuffer>,
    input_path: &Path,
    output_path: &Path,
    observer: &dyn Observer,
) -> Result<()> {
    let image = timed(observer, Stage::Decode, || decode(input_path))?;
    let result = timed(observer, Stage::Kernel, || {
        apply_operation(op, reference, &image, strategy)
    })?;

    let start = Instant::now();
    let existed = output_path.exists();
    if let Err(e) = encode(&result, output_path) {
        if !existed && output_path.exists() {
            if let Err(remove_err) = std::fs::remove_file(output_path) {
                warn!(path = %output_path.display(), error = %remove_err, "Could not remove partial output");
            }
        }
        return Err(e);
    }
    observer.stage_finished(Stage::Encode, start.elapsed());
    observer.file_finished(input_path, output_path);
    Ok(())
}

/// Run a whole job, returning the written output paths in input order.
///
/// Stops at the first failing input.
pub fn run_job(config: &JobConfig, observer: Arc<dyn Observer>) -> Result<Vec<PathBuf>> {
    config.validate()?;
    let strategy = create_strategy(
        config.execution.strategy,
        config.execution.workers,
        Some(observer.clone()),
    )?;

    info!(
        operation = config.operation.name(),
        inputs = config.inputs.len(),
        strategy = strategy.name(),
        "Starting job"
    );
    observer.job_started(config.inputs.len());

    let reference = match &config.reference {
        Some(path) if config.operation.needs_reference() => {
            Some(timed(observer.as_ref(), Stage::Decode, || decode(path))?)
        }
        _ => None,
    };

    if let Some(dir) = &config.output_dir {
        std::fs::create_dir_all(dir)?;
    }

    let mut outputs = Vec::with_capacity(config.inputs.len());
    for input in &config.inputs {
        let output = output_path_for(&config.operation, input, config.output_dir.as_deref())?;
        process_file(
            &config.operation,
            strategy.as_ref(),
            reference.as_ref(),
            input,
            &output,
            observer.as_ref(),
        )?;
        outputs.push(output);
    }

    info!(outputs = outputs.len(), "Job complete");
    Ok(outputs)
}

fn timed<T, F>(observer: &dyn Observer, stage: Stage, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let start = Instant::now();
    let out = f()?;
    observer.stage_finished(stage, start.elapsed());
    Ok(out)
}
