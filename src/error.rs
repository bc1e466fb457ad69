use thiserror::Error;

/// Errors raised while building datasets, training, or writing output.
///
/// Viewer delivery failures are deliberately absent: they are logged by the
/// broadcaster and never reach the training path.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    #[error("train fraction must be in (0, 1], got {0}")]
    InvalidSplit(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("shape mismatch: expected {expected} inputs, got {actual}")]
    Shape { expected: usize, actual: usize },

    #[error("label {value} of sample {index} is outside the label domain")]
    Label { index: usize, value: f64 },

    #[error("chart error: {0}")]
    Chart(#[from] image::ImageError),

    #[error("server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
