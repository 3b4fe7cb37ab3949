pub mod hsv;

pub use hsv::{cyclic_hue_distance, hsv_to_rgb, rgb_to_hsv, weighted_distance, Hsv, HsvWeights};
