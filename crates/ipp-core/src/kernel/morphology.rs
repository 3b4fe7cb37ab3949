use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::buffer::{PixelBuffer, Rgb, Window, BLACK, WHITE};
use crate::error::{IppError, Result};
use crate::strategy::ExecutionStrategy;

use super::PixelKernel;

/// Binary morphological operation on a black/white mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MorphOp {
    /// Grow the black region.
    Erode,
    /// Grow the white region.
    Dilate,
}

impl MorphOp {
    /// Sample that wins when it appears anywhere in the neighborhood.
    pub fn target(self) -> Rgb {
        match self {
            Self::Erode => BLACK,
            Self::Dilate => WHITE,
        }
    }

    /// Sample written when the target is absent from the neighborhood.
    pub fn fallback(self) -> Rgb {
        match self {
            Self::Erode => WHITE,
            Self::Dilate => BLACK,
        }
    }
}

impl std::fmt::Display for MorphOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Erode => write!(f, "erode"),
            Self::Dilate => write!(f, "dilate"),
        }
    }
}

/// Convert a user-supplied radius to a neighborhood size.
pub fn validate_radius(radius: i64) -> Result<usize> {
    usize::try_from(radius).map_err(|_| {
        IppError::InvalidParameter(format!("radius must be >= 0, got {radius}"))
    })
}

/// True if any sample in the square neighborhood of `(x, y)` equals `target`.
///
/// The neighborhood is clipped to the image on each axis independently; there
/// is no padding, reflection or wraparound.
pub fn any_neighbor_matches(
    window: &Window<'_>,
    x: usize,
    y: usize,
    radius: usize,
    target: Rgb,
) -> bool {
    let reach = radius.saturating_add(1);
    let xs = x.saturating_sub(radius)..x.saturating_add(reach).min(window.width());
    let mut ys = y.saturating_sub(radius)..y.saturating_add(reach).min(window.image_height());

    ys.any(|ny| xs.clone().any(|nx| window.get(nx, ny) == target))
}

/// Square-neighborhood erosion or dilation.
#[derive(Clone, Copy, Debug)]
pub struct MorphologyKernel {
    op: MorphOp,
    radius: usize,
}

impl MorphologyKernel {
    pub fn new(op: MorphOp, radius: usize) -> Self {
        Self { op, radius }
    }

    pub fn op(&self) -> MorphOp {
        self.op
    }

    pub fn radius(&self) -> usize {
        self.radius
    }
}

impl PixelKernel for MorphologyKernel {
    fn name(&self) -> &str {
        match self.op {
            MorphOp::Erode => "erode",
            MorphOp::Dilate => "dilate",
        }
    }

    fn halo(&self) -> usize {
        self.radius
    }

    fn evaluate(&self, window: &Window<'_>, x: usize, y: usize) -> Rgb {
        let target = self.op.target();
        if any_neighbor_matches(window, x, y, self.radius, target) {
            target
        } else {
            self.op.fallback()
        }
    }
}

/// Apply `op` with a `(2 * radius + 1)` square neighborhood.
pub fn morph(
    input: &PixelBuffer,
    op: MorphOp,
    radius: usize,
    strategy: &dyn ExecutionStrategy,
) -> Result<PixelBuffer> {
    if !input.is_mask() {
        warn!(%op, "Input is not a black/white mask; only exact matches count");
    }
    info!(
        width = input.width(),
        height = input.height(),
        %op,
        radius,
        strategy = strategy.name(),
        "Morphology"
    );
    strategy.execute(&MorphologyKernel::new(op, radius), input)
}

/// A pixel turns black if any neighbor within `radius` is black.
pub fn erode(
    input: &PixelBuffer,
    radius: usize,
    strategy: &dyn ExecutionStrategy,
) -> Result<PixelBuffer> {
    morph(input, MorphOp::Erode, radius, strategy)
}

/// A pixel turns white if any neighbor within `radius` is white.
pub fn dilate(
    input: &PixelBuffer,
    radius: usize,
    strategy: &dyn ExecutionStrategy,
) -> Result<PixelBuffer> {
    morph(input, MorphOp::Dilate, radius, strategy)
}
