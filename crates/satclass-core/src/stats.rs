//! Percentage aggregates over masks and scalar fields.
//!
//! Every percentage is relative to an explicit denominator. An empty
//! denominator yields `None` ("no data"), never a division by zero.

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::mask::Mask;
use crate::Raster;

/// One labelled share of a breakdown, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub label: String,
    pub percent: f64,
}

/// Ordered `(label, percent)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PercentageBreakdown {
    pub entries: Vec<BreakdownEntry>,
}

impl PercentageBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, percent: f64) {
        self.entries.push(BreakdownEntry { label: label.into(), percent });
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.label == label).map(|e| e.percent)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.percent).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `count(mask) / count(denominator) × 100`, where a missing denominator means
/// every pixel. Returns `Ok(None)` when the denominator count is zero.
pub fn mask_percentage(mask: &Mask, denominator: Option<&Mask>) -> Result<Option<f64>> {
    let denom = match denominator {
        Some(d) => {
            d.check_dimensions(mask.width, mask.height)?;
            d.count()
        }
        None => mask.len(),
    };
    if denom == 0 {
        return Ok(None);
    }
    Ok(Some(mask.count() as f64 / denom as f64 * 100.0))
}

/// Share of `values` falling in each interval defined by ascending `boundaries`.
///
/// `n` boundaries define `n + 1` intervals:
/// `(-∞, b0)`, `[b0, b1)`, …, `[b(n-1), +∞]`. Every interval is closed below
/// and open above, except the last which also includes the top of the range.
/// `labels` name the intervals in the same order. Returns `Ok(None)` for empty
/// input.
pub fn bucket_percentages(
    values: &[f32],
    boundaries: &[f32],
    labels: &[&str],
) -> Result<Option<PercentageBreakdown>> {
    if labels.len() != boundaries.len() + 1 {
        return Err(AnalysisError::InvalidBuckets(format!(
            "{} boundaries need {} labels, got {}",
            boundaries.len(),
            boundaries.len() + 1,
            labels.len()
        )));
    }
    if boundaries.windows(2).any(|w| !(w[0] < w[1])) {
        return Err(AnalysisError::InvalidBuckets(format!(
            "boundaries must be strictly ascending: {boundaries:?}"
        )));
    }
    if values.is_empty() {
        return Ok(None);
    }

    let mut counts = vec![0usize; labels.len()];
    for &v in values {
        counts[bucket_index(v, boundaries)] += 1;
    }

    let total = values.len() as f64;
    let mut breakdown = PercentageBreakdown::new();
    for (label, count) in labels.iter().zip(counts) {
        breakdown.push(*label, count as f64 / total * 100.0);
    }
    Ok(Some(breakdown))
}

/// Interval of `value` under the boundary convention of [`bucket_percentages`].
#[inline]
pub fn bucket_index(value: f32, boundaries: &[f32]) -> usize {
    boundaries.partition_point(|&b| b <= value)
}

/// 256-bin histogram of grayscale intensities.
pub fn gray_histogram(raster: &Raster) -> [u32; 256] {
    let mut hist = [0u32; 256];
    for &px in raster.pixels() {
        hist[crate::color::luma(px) as usize] += 1;
    }
    hist
}

/// 256-bin histograms of the R, G and B channels.
pub fn channel_histograms(raster: &Raster) -> [[u32; 256]; 3] {
    let mut hists = [[0u32; 256]; 3];
    for px in raster.pixels() {
        for (c, hist) in hists.iter_mut().enumerate() {
            hist[px.0[c] as usize] += 1;
        }
    }
    hists
}
