use serde::{Deserialize, Serialize};
use tracing::info;

use crate::buffer::{PixelBuffer, Rgb, Window, BLACK, WHITE};
use crate::color::{rgb_to_hsv, weighted_distance, HsvWeights};
use crate::consts::DEFAULT_THRESHOLD;
use crate::error::{IppError, Result};
use crate::strategy::ExecutionStrategy;

use super::PixelKernel;

/// How the distance between a reference and an input sample is measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum DistanceMode {
    /// Mean absolute per-channel difference, in `[0, 255]`.
    #[default]
    Rgb,
    /// Weighted HSV distance, scaled to `[0, 255]`.
    Hsv(HsvWeights),
}

impl DistanceMode {
    /// HSV mode with the background-subtraction default weights.
    pub fn hsv_default() -> Self {
        Self::Hsv(HsvWeights::subtraction_default())
    }
}

impl std::fmt::Display for DistanceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rgb => write!(f, "RGB"),
            Self::Hsv(w) => write!(f, "HSV ({}, {}, {})", w.hue, w.saturation, w.value),
        }
    }
}

/// Parameters of background subtraction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifferenceParams {
    /// Pixels whose distance is strictly greater than this become white.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub mode: DistanceMode,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for DifferenceParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            mode: DistanceMode::default(),
        }
    }
}

impl DifferenceParams {
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            return Err(IppError::InvalidParameter(format!(
                "threshold must be finite, got {}",
                self.threshold
            )));
        }
        if let DistanceMode::Hsv(weights) = &self.mode {
            weights.validate()?;
        }
        Ok(())
    }
}

/// Mean absolute channel difference of two RGB samples.
pub fn rgb_distance(a: Rgb, b: Rgb) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&ca, &cb)| (ca as f64 - cb as f64).abs() / 3.0)
        .sum()
}

/// Distance between two samples under `mode`.
pub fn pixel_distance(a: Rgb, b: Rgb, mode: &DistanceMode) -> f64 {
    match mode {
        DistanceMode::Rgb => rgb_distance(a, b),
        DistanceMode::Hsv(weights) => weighted_distance(&rgb_to_hsv(a), &rgb_to_hsv(b), weights),
    }
}

/// White if `distance > threshold`, black otherwise (equality is background).
pub fn classify(distance: f64, threshold: f64) -> Rgb {
    if distance > threshold {
        WHITE
    } else {
        BLACK
    }
}

/// Compares every input pixel against the same pixel of a reference image.
pub struct DifferenceKernel<'a> {
    reference: &'a PixelBuffer,
    reference_window: Window<'a>,
    params: DifferenceParams,
}

impl<'a> DifferenceKernel<'a> {
    pub fn new(reference: &'a PixelBuffer, params: DifferenceParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            reference,
            reference_window: reference.window(),
            params,
        })
    }

    pub fn params(&self) -> &DifferenceParams {
        &self.params
    }
}

impl PixelKernel for DifferenceKernel<'_> {
    fn name(&self) -> &str {
        "background_subtraction"
    }

    fn prepare(&self, input: &PixelBuffer) -> Result<()> {
        self.reference.ensure_same_dimensions(input)
    }

    fn evaluate(&self, window: &Window<'_>, x: usize, y: usize) -> Rgb {
        let distance = pixel_distance(
            self.reference_window.get(x, y),
            window.get(x, y),
            &self.params.mode,
        );
        classify(distance, self.params.threshold)
    }

    fn evaluate_index(&self, window: &Window<'_>, index: usize) -> Rgb {
        let distance = pixel_distance(
            self.reference_window.get_index(index),
            window.get_index(index),
            &self.params.mode,
        );
        classify(distance, self.params.threshold)
    }
}

/// Build a change mask of `input` against `reference`.
///
/// Fails with [`IppError::DimensionMismatch`] before touching any pixel when
/// the two images differ in size.
pub fn subtract_background(
    reference: &PixelBuffer,
    input: &PixelBuffer,
    params: &DifferenceParams,
    strategy: &dyn ExecutionStrategy,
) -> Result<PixelBuffer> {
    reference.ensure_same_dimensions(input)?;
    let kernel = DifferenceKernel::new(reference, *params)?;
    info!(
        width = input.width(),
        height = input.height(),
        threshold = params.threshold,
        mode = %params.mode,
        strategy = strategy.name(),
        "Background subtraction"
    );
    strategy.execute(&kernel, input)
}
