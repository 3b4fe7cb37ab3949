use std::ops::Range;

use crate::buffer::{PixelBuffer, Rgb, Window};
use crate::error::Result;
use crate::kernel::PixelKernel;

use super::ExecutionStrategy;

/// Single-threaded strategy over the linearized buffer.
pub struct FlatStrategy;

impl ExecutionStrategy for FlatStrategy {
    fn name(&self) -> &str {
        "Flat"
    }

    fn execute(&self, kernel: &dyn PixelKernel, input: &PixelBuffer) -> Result<PixelBuffer> {
        kernel.prepare(input)?;

        let (w, h) = input.dimensions();
        let samples = process_rows(kernel, &input.window(), 0..h);
        PixelBuffer::new(w, h, samples)
    }
}

/// Evaluate `kernel` for every pixel of `rows`, in linear index order.
///
/// `window` must cover `rows` plus the kernel's halo (clipped to the image).
pub(crate) fn process_rows(
    kernel: &dyn PixelKernel,
    window: &Window<'_>,
    rows: Range<usize>,
) -> Vec<Rgb> {
    let width = window.width();
    (rows.start * width..rows.end * width)
        .map(|index| kernel.evaluate_index(window, index))
        .collect()
}
