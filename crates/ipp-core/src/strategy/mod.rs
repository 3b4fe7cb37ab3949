mod chunked;
mod flat;
mod scalar;

pub use chunked::{partition_rows, ChunkedParallelStrategy};
pub use flat::FlatStrategy;
pub use scalar::ScalarStrategy;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::consts::FALLBACK_WORKER_COUNT;
use crate::error::Result;
use crate::kernel::PixelKernel;
use crate::observer::Observer;

/// Drives a [`PixelKernel`] over a whole image.
///
/// Every implementation must return exactly what [`ScalarStrategy`] returns
/// for the same kernel and input.
pub trait ExecutionStrategy: Send + Sync {
    /// Human-readable strategy name.
    fn name(&self) -> &str;

    /// Run `kernel` over `input` and return a new buffer of the same size.
    fn execute(&self, kernel: &dyn PixelKernel, input: &PixelBuffer) -> Result<PixelBuffer>;
}

/// Which execution strategy to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Nested row/column loop on the calling thread.
    Scalar,
    /// Single linear-index loop on the calling thread.
    Flat,
    /// Horizontal bands processed on a fixed-size worker pool.
    #[default]
    Chunked,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar => write!(f, "Scalar"),
            Self::Flat => write!(f, "Flat"),
            Self::Chunked => write!(f, "Chunked"),
        }
    }
}

/// Worker count used when none is configured.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_WORKER_COUNT)
}

/// Create a strategy. `workers` and `observer` only apply to
/// [`StrategyKind::Chunked`]; workers default to [`default_worker_count`].
pub fn create_strategy(
    kind: StrategyKind,
    workers: Option<usize>,
    observer: Option<Arc<dyn Observer>>,
) -> Result<Arc<dyn ExecutionStrategy>> {
    match kind {
        StrategyKind::Scalar => Ok(Arc::new(ScalarStrategy)),
        StrategyKind::Flat => Ok(Arc::new(FlatStrategy)),
        StrategyKind::Chunked => {
            let workers = workers.unwrap_or_else(default_worker_count);
            let strategy = ChunkedParallelStrategy::new(workers)?;
            Ok(Arc::new(match observer {
                Some(observer) => strategy.with_observer(observer),
                None => strategy,
            }))
        }
    }
}
