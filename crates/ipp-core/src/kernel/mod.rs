pub mod difference;
pub mod morphology;

pub use difference::{subtract_background, DifferenceKernel, DifferenceParams, DistanceMode};
pub use morphology::{dilate, erode, morph, validate_radius, MorphOp, MorphologyKernel};

use crate::buffer::{PixelBuffer, Rgb, Window};
use crate::error::Result;

/// A per-pixel transform that every execution strategy can drive.
///
/// A kernel computes each output sample as a pure function of a read-only
/// input window, so strategies are free to visit pixels in any order or on
/// any thread and still produce identical output.
pub trait PixelKernel: Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Rows of input needed above and below an output row. A strategy that
    /// splits the image must make this many extra rows readable on each side
    /// of a band (clipped to the image).
    fn halo(&self) -> usize {
        0
    }

    /// Check that the kernel can run against `input` before any pixel work.
    fn prepare(&self, _input: &PixelBuffer) -> Result<()> {
        Ok(())
    }

    /// Output sample at image coordinates `(x, y)`.
    fn evaluate(&self, window: &Window<'_>, x: usize, y: usize) -> Rgb;

    /// Output sample at image linear index `y * width + x`.
    fn evaluate_index(&self, window: &Window<'_>, index: usize) -> Rgb {
        let width = window.width();
        self.evaluate(window, index % width, index / width)
    }
}
