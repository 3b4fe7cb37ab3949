use std::path::{Path, PathBuf};
use std::sync::Arc;

use ipp_core::buffer::{PixelBuffer, Rgb, BLACK, WHITE};
use ipp_core::io::encode;
use ipp_core::strategy::{
    ChunkedParallelStrategy, ExecutionStrategy, FlatStrategy, ScalarStrategy,
};

/// Deterministic xorshift generator so test images are reproducible.
pub struct XorShift(u64);

impl XorShift {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    pub fn next_u8(&mut self) -> u8 {
        (self.next_u64() >> 56) as u8
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Image with independent random channels.
pub fn noise_buffer(w: usize, h: usize, seed: u64) -> PixelBuffer {
    let mut rng = XorShift::new(seed);
    PixelBuffer::from_fn(w, h, |_, _| [rng.next_u8(), rng.next_u8(), rng.next_u8()])
}

/// `base` with each channel nudged by up to `±spread`.
pub fn perturbed(base: &PixelBuffer, spread: u8, seed: u64) -> PixelBuffer {
    let mut rng = XorShift::new(seed);
    let span = spread as i32 * 2 + 1;
    PixelBuffer::from_fn(base.width(), base.height(), |x, y| {
        let s = base.get(x, y);
        let mut out: Rgb = [0; 3];
        for c in 0..3 {
            let delta = (rng.next_u64() % span as u64) as i32 - spread as i32;
            out[c] = (s[c] as i32 + delta).clamp(0, 255) as u8;
        }
        out
    })
}

/// Random black/white mask where each pixel is white with probability `white`.
pub fn random_mask(w: usize, h: usize, white: f64, seed: u64) -> PixelBuffer {
    let mut rng = XorShift::new(seed);
    PixelBuffer::from_fn(w, h, |_, _| if rng.next_f64() < white { WHITE } else { BLACK })
}

/// All-`fill` mask with `dot` at each listed `(x, y)`.
pub fn mask_with_dots(w: usize, h: usize, fill: Rgb, dot: Rgb, dots: &[(usize, usize)]) -> PixelBuffer {
    let mut mask = PixelBuffer::filled(w, h, fill);
    for &(x, y) in dots {
        mask.set(x, y, dot);
    }
    mask
}

/// Every strategy worth comparing against the scalar reference.
pub fn strategies_under_test() -> Vec<(String, Arc<dyn ExecutionStrategy>)> {
    let mut out: Vec<(String, Arc<dyn ExecutionStrategy>)> = vec![
        ("scalar".into(), Arc::new(ScalarStrategy)),
        ("flat".into(), Arc::new(FlatStrategy)),
    ];
    for workers in [1, 2, 3, 4, 7, 16] {
        out.push((
            format!("chunked({workers})"),
            Arc::new(ChunkedParallelStrategy::new(workers).expect("build pool")),
        ));
    }
    out
}

/// Write `buffer` as PNG into `dir` and return its path.
pub fn write_png(dir: &Path, name: &str, buffer: &PixelBuffer) -> PathBuf {
    let path = dir.join(name);
    encode(buffer, &path).expect("encode test image");
    path
}

/// Count white pixels.
pub fn count_white(buffer: &PixelBuffer) -> usize {
    buffer.samples().filter(|&&s| s == WHITE).count()
}
