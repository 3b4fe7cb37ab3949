use std::ops::Range;

use ndarray::{s, Array2, ArrayView2};

use crate::error::{IppError, Result};

/// One 8-bit RGB sample.
pub type Rgb = [u8; 3];

/// Foreground sentinel of a mask.
pub const WHITE: Rgb = [255, 255, 255];

/// Background sentinel of a mask.
pub const BLACK: Rgb = [0, 0, 0];

/// A dense RGB image.
///
/// Samples are stored row-major with shape `(height, width)`, so the linear
/// index of `(x, y)` is `y * width + x`. The only way to build a buffer from
/// raw samples is [`PixelBuffer::new`], which checks the sample count once;
/// every kernel relies on that invariant afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Array2<Rgb>,
}

impl PixelBuffer {
    /// Build a buffer from row-major samples.
    ///
    /// Fails with [`IppError::InvalidDimensions`] unless
    /// `samples.len() == width * height`.
    pub fn new(width: usize, height: usize, samples: Vec<Rgb>) -> Result<Self> {
        let count = samples.len();
        let invalid = || IppError::InvalidDimensions {
            width,
            height,
            samples: count,
        };
        let expected = width.checked_mul(height).ok_or_else(invalid)?;
        if count != expected {
            return Err(invalid());
        }
        let data = Array2::from_shape_vec((height, width), samples).map_err(|_| invalid())?;
        Ok(Self { data })
    }

    /// Buffer with every sample set to `sample`.
    pub fn filled(width: usize, height: usize, sample: Rgb) -> Self {
        Self {
            data: Array2::from_elem((height, width), sample),
        }
    }

    /// Buffer whose sample at `(x, y)` is `f(x, y)`.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Rgb,
    {
        Self {
            data: Array2::from_shape_fn((height, width), |(y, x)| f(x, y)),
        }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.data[[y, x]]
    }

    pub fn set(&mut self, x: usize, y: usize, sample: Rgb) {
        self.data[[y, x]] = sample;
    }

    /// Iterate samples in row-major order.
    pub fn samples(&self) -> impl Iterator<Item = &Rgb> + '_ {
        self.data.iter()
    }

    /// Samples in row-major order as an owned vector.
    pub fn to_samples(&self) -> Vec<Rgb> {
        self.data.iter().copied().collect()
    }

    /// Borrow the samples as a `(height, width)` array view.
    pub fn view(&self) -> ArrayView2<'_, Rgb> {
        self.data.view()
    }

    /// True if every sample is exactly [`WHITE`] or [`BLACK`].
    pub fn is_mask(&self) -> bool {
        self.data.iter().all(|&s| s == WHITE || s == BLACK)
    }

    /// Fail with [`IppError::DimensionMismatch`] unless `other` has the same
    /// width and height. `self` is reported as the expected side.
    pub fn ensure_same_dimensions(&self, other: &PixelBuffer) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(IppError::DimensionMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            });
        }
        Ok(())
    }

    /// Read window over the whole image.
    pub fn window(&self) -> Window<'_> {
        self.window_rows(0..self.height())
    }

    /// Read window over `rows`, clipped to the image.
    pub fn window_rows(&self, rows: Range<usize>) -> Window<'_> {
        let end = rows.end.min(self.height());
        let start = rows.start.min(end);
        Window {
            rows: self.data.slice(s![start..end, ..]),
            first_row: start,
            image_height: self.height(),
        }
    }
}

/// Read-only view over a contiguous row range of a [`PixelBuffer`].
///
/// Coordinates passed to a window are always image coordinates, not
/// window-relative ones. Reading a row outside [`Window::row_range`] panics.
#[derive(Clone, Copy, Debug)]
pub struct Window<'a> {
    rows: ArrayView2<'a, Rgb>,
    first_row: usize,
    image_height: usize,
}

impl<'a> Window<'a> {
    /// Image width (every window spans full rows).
    pub fn width(&self) -> usize {
        self.rows.ncols()
    }

    /// Height of the image this window was taken from.
    pub fn image_height(&self) -> usize {
        self.image_height
    }

    /// Image rows readable through this window.
    pub fn row_range(&self) -> Range<usize> {
        self.first_row..self.first_row + self.rows.nrows()
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        debug_assert!(
            self.row_range().contains(&y),
            "row {y} outside window {:?}",
            self.row_range()
        );
        self.rows[[y - self.first_row, x]]
    }

    /// Sample at image linear index `y * width + x`.
    pub fn get_index(&self, index: usize) -> Rgb {
        let width = self.width();
        self.get(index % width, index / width)
    }
}
