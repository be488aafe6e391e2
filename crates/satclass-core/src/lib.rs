//! Tag-driven classification of rendered satellite imagery.
//!
//! Pipeline per image:
//!   decode → enhance → dispatch by filename tag → classify → compose report.

pub mod category;
pub mod classify;
pub mod color;
pub mod config;
pub mod enhance;
pub mod error;
pub mod field;
pub mod histogram;
pub mod mask;
pub mod pipeline;
pub mod report;
pub mod stats;

pub use category::{classify, Category};
pub use classify::{classify_raster, ClassificationResult};
pub use config::AnalyzerConfig;
pub use error::{AnalysisError, Result};
pub use field::ScalarField;
pub use mask::Mask;
pub use pipeline::{BatchProcessor, BatchSummary, ImageReport};
pub use stats::PercentageBreakdown;

/// 8-bit RGB raster, row-major.
pub type Raster = image::RgbImage;
