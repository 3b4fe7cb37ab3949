use std::path::Path;

use image::RgbImage;
use tracing::debug;

use crate::buffer::{PixelBuffer, Rgb};
use crate::consts::CHANNEL_COUNT;
use crate::error::{IppError, Result};

/// Load an image file as 8-bit RGB.
///
/// Any source format the `image` crate understands is converted to RGB;
/// alpha is discarded and deeper bit depths are reduced to 8 bits.
pub fn decode(path: &Path) -> Result<PixelBuffer> {
    let rgb = image::open(path)?.to_rgb8();
    let (w, h) = rgb.dimensions();
    debug!(path = %path.display(), width = w, height = h, "Decoded image");

    let samples: Vec<Rgb> = rgb
        .as_raw()
        .chunks_exact(CHANNEL_COUNT)
        .map(|c| [c[0], c[1], c[2]])
        .collect();

    PixelBuffer::new(w as usize, h as usize, samples)
}

/// Write `buffer` verbatim as 8-bit RGB, format chosen from the extension.
pub fn encode(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    let (w, h) = buffer.dimensions();
    let invalid = || IppError::InvalidDimensions {
        width: w,
        height: h,
        samples: buffer.len(),
    };
    let width = u32::try_from(w).map_err(|_| invalid())?;
    let height = u32::try_from(h).map_err(|_| invalid())?;

    let raw: Vec<u8> = buffer.samples().flatten().copied().collect();
    let img = RgbImage::from_raw(width, height, raw).ok_or_else(invalid)?;
    img.save(path)?;
    debug!(path = %path.display(), width = w, height = h, "Encoded image");
    Ok(())
}
