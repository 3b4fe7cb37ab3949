use crate::buffer::{PixelBuffer, BLACK};
use crate::error::Result;
use crate::kernel::PixelKernel;

use super::ExecutionStrategy;

/// Reference strategy: visits every `(x, y)` in row-major order on the
/// calling thread.
pub struct ScalarStrategy;

impl ExecutionStrategy for ScalarStrategy {
    fn name(&self) -> &str {
        "Scalar"
    }

    fn execute(&self, kernel: &dyn PixelKernel, input: &PixelBuffer) -> Result<PixelBuffer> {
        kernel.prepare(input)?;

        let (w, h) = input.dimensions();
        let window = input.window();
        let mut output = PixelBuffer::filled(w, h, BLACK);

        for y in 0..h {
            for x in 0..w {
                output.set(x, y, kernel.evaluate(&window, x, y));
            }
        }

        Ok(output)
    }
}
