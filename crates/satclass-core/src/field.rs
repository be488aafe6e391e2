use crate::error::{AnalysisError, Result};

/// A 2D single-channel field of derived values, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    pub data: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl ScalarField {
    /// Wrap existing row-major data; `data.len()` must equal `width × height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != width * height {
            return Err(AnalysisError::DimensionMismatch {
                expected: (width, height),
                actual: (data.len(), 1),
            });
        }
        Ok(Self { data, width, height })
    }

    /// Apply `f` to every value, producing a new field of the same shape.
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            data: self.data.iter().map(|&v| f(v)).collect(),
            width: self.width,
            height: self.height,
        }
    }
}
