use thiserror::Error;

#[derive(Error, Debug)]
pub enum IppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error(
        "Dimension mismatch: reference is {}x{}, input is {}x{}",
        expected.0, expected.1, actual.0, actual.1
    )]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Invalid image dimensions: {width}x{height} with {samples} samples")]
    InvalidDimensions {
        width: usize,
        height: usize,
        samples: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Worker for band {band} failed: {message}")]
    WorkerFailure { band: usize, message: String },

    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, IppError>;
