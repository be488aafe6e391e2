//! Fixed enhancement chain applied before classification.
//!
//! Stages, in order:
//!   1. Bicubic (Catmull-Rom) upscale by `scale`.
//!   2. Gaussian blur (skipped when `blur_sigma` is 0).
//!   3. Contrast-limited adaptive histogram equalization on CIELAB lightness.
//!   4. Color bilateral filter (edge-preserving denoise).

use image::imageops::{self, FilterType};
use image::Rgb;
use serde::{Deserialize, Serialize};

use crate::color::{lab_to_rgb, rgb_to_lab};
use crate::error::{AnalysisError, Result};
use crate::Raster;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceParams {
    /// Integer upscale factor; 1 disables resizing.
    pub scale: u32,
    /// Gaussian sigma in pixels; 0 disables the blur.
    pub blur_sigma: f32,
    /// CLAHE clip limit relative to a uniform histogram; 0 disables clipping.
    pub clahe_clip_limit: f32,
    /// CLAHE tile grid size per axis; 0 disables equalization.
    pub clahe_tiles: u32,
    /// Bilateral neighbourhood diameter; values below 3 disable the filter.
    pub bilateral_diameter: u32,
    pub bilateral_sigma_color: f32,
    pub bilateral_sigma_space: f32,
}

impl Default for EnhanceParams {
    fn default() -> Self {
        Self {
            scale: 2,
            blur_sigma: 0.0,
            clahe_clip_limit: 2.0,
            clahe_tiles: 8,
            bilateral_diameter: 9,
            bilateral_sigma_color: 75.0,
            bilateral_sigma_space: 75.0,
        }
    }
}

/// Run the full chain, returning a new raster.
pub fn enhance(raster: &Raster, params: &EnhanceParams) -> Result<Raster> {
    if raster.width() == 0 || raster.height() == 0 {
        return Ok(raster.clone());
    }

    let mut img = if params.scale > 1 {
        let scaled = |side: u32| {
            side.checked_mul(params.scale).ok_or_else(|| {
                AnalysisError::InvalidParams(format!(
                    "scale {} overflows a {}×{} raster",
                    params.scale,
                    raster.width(),
                    raster.height()
                ))
            })
        };
        imageops::resize(
            raster,
            scaled(raster.width())?,
            scaled(raster.height())?,
            FilterType::CatmullRom,
        )
    } else {
        raster.clone()
    };

    if params.blur_sigma > 0.0 {
        img = imageproc::filter::gaussian_blur_f32(&img, params.blur_sigma);
    }

    if params.clahe_tiles > 0 {
        img = clahe_lightness(&img, params.clahe_clip_limit, params.clahe_tiles);
    }

    if params.bilateral_diameter >= 3 {
        img = bilateral_filter(
            &img,
            params.bilateral_diameter,
            params.bilateral_sigma_color,
            params.bilateral_sigma_space,
        )?;
    }

    Ok(img)
}

// ── CLAHE ─────────────────────────────────────────────────────────────────────

/// Equalize CIELAB lightness per tile, bilinearly blending neighbouring tile LUTs.
pub fn clahe_lightness(raster: &Raster, clip_limit: f32, tiles: u32) -> Raster {
    let (w, h) = (raster.width() as usize, raster.height() as usize);
    if w == 0 || h == 0 {
        return raster.clone();
    }

    let lab: Vec<[f32; 3]> = raster.pixels().map(|&px| rgb_to_lab(px)).collect();
    let lightness: Vec<u8> = lab
        .iter()
        .map(|p| (p[0] * 255.0 / 100.0).round().clamp(0.0, 255.0) as u8)
        .collect();

    let tiles_x = (tiles as usize).clamp(1, w);
    let tiles_y = (tiles as usize).clamp(1, h);
    let tile_w = w as f32 / tiles_x as f32;
    let tile_h = h as f32 / tiles_y as f32;
    let tile_of = |v: usize, size: f32, n: usize| ((v as f32 / size) as usize).min(n - 1);

    let mut hists = vec![[0u32; 256]; tiles_x * tiles_y];
    for y in 0..h {
        let ty = tile_of(y, tile_h, tiles_y);
        for x in 0..w {
            let tx = tile_of(x, tile_w, tiles_x);
            hists[ty * tiles_x + tx][lightness[y * w + x] as usize] += 1;
        }
    }
    let luts: Vec<[u8; 256]> = hists.iter().map(|hist| clipped_lut(hist, clip_limit)).collect();

    // Tile-centre coordinates → (lower tile, upper tile, weight of upper).
    let axis = |v: usize, size: f32, n: usize| {
        let f = (v as f32 + 0.5) / size - 0.5;
        let lo = f.floor();
        let weight = f - lo;
        let t0 = (lo as isize).clamp(0, n as isize - 1) as usize;
        let t1 = (lo as isize + 1).clamp(0, n as isize - 1) as usize;
        (t0, t1, weight)
    };

    let mut out = Raster::new(w as u32, h as u32);
    for y in 0..h {
        let (ty0, ty1, wy) = axis(y, tile_h, tiles_y);
        for x in 0..w {
            let (tx0, tx1, wx) = axis(x, tile_w, tiles_x);
            let idx = y * w + x;
            let l = lightness[idx] as usize;
            let lut = |tx: usize, ty: usize| luts[ty * tiles_x + tx][l] as f32;

            let top = lut(tx0, ty0) * (1.0 - wx) + lut(tx1, ty0) * wx;
            let bottom = lut(tx0, ty1) * (1.0 - wx) + lut(tx1, ty1) * wx;
            let eq = top * (1.0 - wy) + bottom * wy;

            let [_, a, b] = lab[idx];
            out.put_pixel(x as u32, y as u32, lab_to_rgb([eq * 100.0 / 255.0, a, b]));
        }
    }
    out
}

/// Equalization LUT of one tile histogram after clipping at
/// `clip_limit × area / 256` and redistributing the excess uniformly.
fn clipped_lut(hist: &[u32; 256], clip_limit: f32) -> [u8; 256] {
    let area: u32 = hist.iter().sum();
    let mut lut = [0u8; 256];
    if area == 0 {
        return lut;
    }

    let mut hist = *hist;
    if clip_limit > 0.0 {
        let clip = ((clip_limit * area as f32 / 256.0) as u32).max(1);
        let mut excess = 0u32;
        for bin in hist.iter_mut() {
            if *bin > clip {
                excess += *bin - clip;
                *bin = clip;
            }
        }
        let batch = excess / 256;
        let residual = (excess % 256) as usize;
        for bin in hist.iter_mut() {
            *bin += batch;
        }
        if residual > 0 {
            let step = (256 / residual).max(1);
            for bin in hist.iter_mut().step_by(step).take(residual) {
                *bin += 1;
            }
        }
    }

    let scale = 255.0 / area as f32;
    let mut cdf = 0u32;
    for (i, &count) in hist.iter().enumerate() {
        cdf += count;
        lut[i] = (cdf as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

// ── Bilateral filter ──────────────────────────────────────────────────────────

/// Edge-preserving smoothing. Color distance is the sum of absolute channel
/// differences; the neighbourhood is the disc of radius `diameter / 2`, with
/// edge pixels replicated.
pub fn bilateral_filter(raster: &Raster, diameter: u32, sigma_color: f32, sigma_space: f32) -> Result<Raster> {
    let (w, h) = (raster.width() as usize, raster.height() as usize);
    if w == 0 || h == 0 {
        return Ok(raster.clone());
    }

    let radius = (diameter / 2) as isize;
    let space_coeff = -0.5 / (sigma_space * sigma_space);
    let color_coeff = -0.5 / (sigma_color * sigma_color);

    let mut offsets: Vec<(isize, isize, f32)> = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let r2 = (dx * dx + dy * dy) as f32;
            if r2 <= (radius * radius) as f32 {
                offsets.push((dx, dy, (r2 * space_coeff).exp()));
            }
        }
    }
    let color_weights: Vec<f32> = (0..=255 * 3)
        .map(|d| ((d * d) as f32 * color_coeff).exp())
        .collect();

    let filter_row = |y: usize, row: &mut [u8]| {
        for x in 0..w {
            let center = raster.get_pixel(x as u32, y as u32).0;
            let mut sum = [0f32; 3];
            let mut norm = 0f32;
            for &(dx, dy, ws) in &offsets {
                let nx = (x as isize + dx).clamp(0, w as isize - 1) as u32;
                let ny = (y as isize + dy).clamp(0, h as isize - 1) as u32;
                let Rgb(px) = *raster.get_pixel(nx, ny);
                let dist: usize = (0..3).map(|c| (px[c] as i32 - center[c] as i32).unsigned_abs() as usize).sum();
                let weight = ws * color_weights[dist];
                for c in 0..3 {
                    sum[c] += weight * px[c] as f32;
                }
                norm += weight;
            }
            for c in 0..3 {
                row[x * 3 + c] = (sum[c] / norm).round().clamp(0.0, 255.0) as u8;
            }
        }
    };

    let mut buf = vec![0u8; w * h * 3];
    #[cfg(feature = "threading")]
    {
        use rayon::prelude::*;
        buf.par_chunks_mut(w * 3).enumerate().for_each(|(y, row)| filter_row(y, row));
    }
    #[cfg(not(feature = "threading"))]
    buf.chunks_mut(w * 3).enumerate().for_each(|(y, row)| filter_row(y, row));

    Raster::from_raw(w as u32, h as u32, buf).ok_or(AnalysisError::DimensionMismatch {
        expected: (w, h),
        actual: (w, h),
    })
}
