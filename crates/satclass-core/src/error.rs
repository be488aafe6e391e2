use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid font: {0}")]
    InvalidFont(#[from] ab_glyph::InvalidFont),

    #[error("dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("invalid buckets: {0}")]
    InvalidBuckets(String),

    #[error("input directory not found: {0}")]
    MissingInputDir(String),
}
