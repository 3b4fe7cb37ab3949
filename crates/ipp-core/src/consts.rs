/// Number of channels per sample (R, G, B).
pub const CHANNEL_COUNT: usize = 3;

/// Maximum value of an 8-bit channel.
pub const CHANNEL_MAX: f64 = 255.0;

/// Full hue circle in degrees.
pub const HUE_CIRCLE: f64 = 360.0;

/// Default distance threshold for background subtraction.
pub const DEFAULT_THRESHOLD: f64 = 7.0;

/// Default neighborhood radius for erosion and dilation.
pub const DEFAULT_RADIUS: usize = 2;

/// HSV weights used by background subtraction unless configured otherwise.
/// Value (brightness) carries little weight.
pub const DEFAULT_SUBTRACTION_WEIGHTS: (f64, f64, f64) = (0.6, 0.6, 0.1);

/// Fallback worker count when the available parallelism cannot be queried.
pub const FALLBACK_WORKER_COUNT: usize = 4;
