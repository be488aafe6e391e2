//! Boolean pixel masks and the overlay rasters derived from them.
//!
//! Overlays are always new rasters; the base raster is only borrowed.

use image::Rgb;

use crate::color::{rgb_to_hsv, Hsv};
use crate::error::{AnalysisError, Result};
use crate::Raster;

/// Inclusive 8-bit HSV range, `lower ≤ px ≤ upper` per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    #[inline]
    pub fn contains(&self, hsv: Hsv) -> bool {
        let px = [hsv.h, hsv.s, hsv.v];
        (0..3).all(|c| self.lower[c] <= px[c] && px[c] <= self.upper[c])
    }
}

/// A boolean field over a raster's pixel grid, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    pub data: Vec<bool>,
    pub width: usize,
    pub height: usize,
}

impl Mask {
    /// An all-false mask.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![false; width * height],
            width,
            height,
        }
    }

    /// Pixels whose HSV value lies inside `range`.
    pub fn from_hsv_range(raster: &Raster, range: HsvRange) -> Self {
        Self {
            data: raster.pixels().map(|&px| range.contains(rgb_to_hsv(px))).collect(),
            width: raster.width() as usize,
            height: raster.height() as usize,
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.data[row * self.width + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, val: bool) {
        self.data[row * self.width + col] = val;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of true pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&b| b).count()
    }

    /// Error unless this mask covers a `width × height` grid.
    pub fn check_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if self.width == width && self.height == height {
            Ok(())
        } else {
            Err(AnalysisError::DimensionMismatch {
                expected: (width, height),
                actual: (self.width, self.height),
            })
        }
    }

    fn check_raster(&self, raster: &Raster) -> Result<()> {
        self.check_dimensions(raster.width() as usize, raster.height() as usize)
    }
}

/// Copy of `base` with every masked pixel replaced by `color`.
pub fn paint_mask(base: &Raster, mask: &Mask, color: Rgb<u8>) -> Result<Raster> {
    mask.check_raster(base)?;
    let mut out = base.clone();
    for (px, &hit) in out.pixels_mut().zip(mask.data.iter()) {
        if hit {
            *px = color;
        }
    }
    Ok(out)
}

/// `base_weight·base + (1 − base_weight)·layer`, where the layer is `color` on
/// masked pixels and black elsewhere. Every pixel of the result is blended.
pub fn blend_mask(base: &Raster, mask: &Mask, color: Rgb<u8>, base_weight: f32) -> Result<Raster> {
    mask.check_raster(base)?;
    let layer_weight = 1.0 - base_weight;
    let mut out = Raster::new(base.width(), base.height());
    for ((dst, src), &hit) in out.pixels_mut().zip(base.pixels()).zip(mask.data.iter()) {
        let layer = if hit { color.0 } else { [0, 0, 0] };
        for c in 0..3 {
            let v = base_weight * src.0[c] as f32 + layer_weight * layer[c] as f32;
            dst.0[c] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
    Ok(out)
}
