use serde::{Deserialize, Serialize};

use crate::buffer::Rgb;
use crate::consts::{CHANNEL_MAX, DEFAULT_SUBTRACTION_WEIGHTS, HUE_CIRCLE};
use crate::error::{IppError, Result};

/// A color in HSV space.
///
/// `hue` is in degrees `[0, 360)`; `saturation` and `value` are in `[0, 1]`.
/// Always derived from an RGB sample on demand and never stored in a buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsv {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

/// Per-component weights of [`weighted_distance`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HsvWeights {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

impl Default for HsvWeights {
    /// Neutral weighting: every component counts equally.
    fn default() -> Self {
        Self {
            hue: 1.0,
            saturation: 1.0,
            value: 1.0,
        }
    }
}

impl HsvWeights {
    pub fn new(hue: f64, saturation: f64, value: f64) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    /// Weights used by background subtraction when none are configured.
    pub fn subtraction_default() -> Self {
        let (hue, saturation, value) = DEFAULT_SUBTRACTION_WEIGHTS;
        Self::new(hue, saturation, value)
    }

    /// Reject negative or non-finite weights.
    pub fn validate(&self) -> Result<()> {
        for (name, w) in [
            ("hue", self.hue),
            ("saturation", self.saturation),
            ("value", self.value),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(IppError::InvalidParameter(format!(
                    "{name} weight must be a finite non-negative number, got {w}"
                )));
            }
        }
        Ok(())
    }
}

/// Convert an RGB sample to HSV.
///
/// When two channels tie for the maximum, the first of red, green, blue wins.
pub fn rgb_to_hsv(rgb: Rgb) -> Hsv {
    let red = rgb[0] as f64 / CHANNEL_MAX;
    let green = rgb[1] as f64 / CHANNEL_MAX;
    let blue = rgb[2] as f64 / CHANNEL_MAX;

    let max = red.max(green).max(blue);
    let min = red.min(green).min(blue);
    let delta = max - min;

    let hue = if delta == 0.0 {
        0.0
    } else if max == red {
        60.0 * ((green - blue) / delta).rem_euclid(6.0)
    } else if max == green {
        60.0 * ((blue - red) / delta + 2.0)
    } else {
        60.0 * ((red - green) / delta + 4.0)
    };

    let saturation = if max == 0.0 { 0.0 } else { delta / max };

    Hsv {
        hue,
        saturation,
        value: max,
    }
}

/// Convert HSV back to the nearest RGB sample.
pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let chroma = hsv.value * hsv.saturation;
    let sector = hsv.hue.rem_euclid(HUE_CIRCLE) / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = hsv.value - chroma;
    let to_channel = |c: f64| ((c + m) * CHANNEL_MAX).round().clamp(0.0, CHANNEL_MAX) as u8;
    [to_channel(r), to_channel(g), to_channel(b)]
}

/// Shortest distance between two hues on the circle, normalized to `[0, 0.5]`.
pub fn cyclic_hue_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    diff.min(HUE_CIRCLE - diff) / HUE_CIRCLE
}

/// Weighted Euclidean distance between two HSV colors, scaled to `[0, 255]`
/// so that it can be compared against the same thresholds as the RGB
/// mean-absolute distance.
pub fn weighted_distance(a: &Hsv, b: &Hsv, weights: &HsvWeights) -> f64 {
    let dh = cyclic_hue_distance(a.hue, b.hue);
    let ds = (a.saturation - b.saturation).abs();
    let dv = (a.value - b.value).abs();

    (weights.hue * dh * dh + weights.saturation * ds * ds + weights.value * dv * dv).sqrt()
        * CHANNEL_MAX
}
