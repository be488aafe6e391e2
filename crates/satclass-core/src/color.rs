//! Color-space conversions on 8-bit rasters.
//!
//! HSV follows the 8-bit convention used by most imaging toolkits:
//! hue is halved into [0, 180), saturation and value span [0, 255].
//! Grayscale is BT.601 luma. CIELAB goes through `palette` with its default
//! D65 white point.

use image::Rgb;
use palette::white_point::D65;
use palette::{FromColor, IntoColor, Lab, LinSrgb, Srgb};

use crate::error::Result;
use crate::field::ScalarField;
use crate::Raster;

/// One pixel in 8-bit HSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    /// Hue in [0, 180).
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

/// Convert one RGB pixel to 8-bit HSV.
pub fn rgb_to_hsv(px: Rgb<u8>) -> Hsv {
    let [r, g, b] = px.0;
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = (v - min) as f32;

    let s = if v == 0 {
        0.0
    } else {
        255.0 * diff / v as f32
    };

    let h_deg = if diff == 0.0 {
        0.0
    } else if v == r {
        60.0 * (gf - bf) / diff
    } else if v == g {
        120.0 + 60.0 * (bf - rf) / diff
    } else {
        240.0 + 60.0 * (rf - gf) / diff
    };
    let h_deg = if h_deg < 0.0 { h_deg + 360.0 } else { h_deg };

    let mut h = (h_deg / 2.0).round() as u16;
    if h >= 180 {
        h -= 180;
    }

    Hsv {
        h: h as u8,
        s: s.round().clamp(0.0, 255.0) as u8,
        v,
    }
}

/// BT.601 luma of one pixel, rounded to 8 bits.
#[inline]
pub fn luma(px: Rgb<u8>) -> u8 {
    let [r, g, b] = px.0;
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32)
        .round()
        .clamp(0.0, 255.0) as u8
}

/// The raster's HSV bytes laid out as a BGR image: V in red, S in green,
/// H in blue.
pub fn hsv_raster(raster: &Raster) -> Raster {
    let mut out = Raster::new(raster.width(), raster.height());
    for (dst, &src) in out.pixels_mut().zip(raster.pixels()) {
        let hsv = rgb_to_hsv(src);
        *dst = Rgb([hsv.v, hsv.s, hsv.h]);
    }
    out
}

/// Grayscale intensity field (0–255) of a raster.
pub fn gray_field(raster: &Raster) -> Result<ScalarField> {
    ScalarField::from_vec(
        raster.width() as usize,
        raster.height() as usize,
        raster.pixels().map(|&px| luma(px) as f32).collect(),
    )
}

// ── CIELAB ────────────────────────────────────────────────────────────────────

/// RGB → CIELAB (L in [0, 100], a/b roughly [-128, 127]).
pub fn rgb_to_lab(px: Rgb<u8>) -> [f32; 3] {
    let [r, g, b] = px.0;
    let srgb: Srgb<f32> = Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    let lin: LinSrgb<f32> = srgb.into_linear();
    let lab: Lab<D65, f32> = Lab::from_color(lin);
    [lab.l, lab.a, lab.b]
}

/// CIELAB → RGB, saturating out-of-gamut values.
pub fn lab_to_rgb(lab: [f32; 3]) -> Rgb<u8> {
    let [l, a, b] = lab;
    let lab: Lab<D65, f32> = Lab::new(l, a, b);
    let lin: LinSrgb<f32> = lab.into_color();
    let srgb: Srgb<f32> = Srgb::from_linear(lin);
    let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgb([q(srgb.red), q(srgb.green), q(srgb.blue)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsv_primaries_and_grays() {
        assert_eq!(rgb_to_hsv(Rgb([255, 0, 0])), Hsv { h: 0, s: 255, v: 255 });
        assert_eq!(rgb_to_hsv(Rgb([0, 255, 0])), Hsv { h: 60, s: 255, v: 255 });
        assert_eq!(rgb_to_hsv(Rgb([0, 0, 255])), Hsv { h: 120, s: 255, v: 255 });
        assert_eq!(rgb_to_hsv(Rgb([128, 128, 128])), Hsv { h: 0, s: 0, v: 128 });
        assert_eq!(rgb_to_hsv(Rgb([0, 0, 0])), Hsv { h: 0, s: 0, v: 0 });
    }

    #[test]
    fn hsv_of_saddle_brown_is_earth_toned() {
        let hsv = rgb_to_hsv(Rgb([139, 69, 19]));
        assert!((10..=25).contains(&hsv.h), "hue {}", hsv.h);
        assert_eq!(hsv.s, 220);
        assert_eq!(hsv.v, 139);
    }

    #[test]
    fn hue_near_full_circle_wraps_to_zero() {
        // 359.x° rounds to 180 → wraps to 0.
        let hsv = rgb_to_hsv(Rgb([255, 0, 1]));
        assert!(hsv.h < 180);
    }

    #[test]
    fn luma_weights() {
        assert_eq!(luma(Rgb([255, 255, 255])), 255);
        assert_eq!(luma(Rgb([0, 0, 0])), 0);
        assert_eq!(luma(Rgb([255, 0, 0])), 76);
        assert_eq!(luma(Rgb([0, 255, 0])), 150);
        assert_eq!(luma(Rgb([0, 0, 255])), 29);
    }

    #[test]
    fn hsv_raster_stores_value_saturation_hue() {
        let raster = Raster::from_pixel(2, 2, Rgb([0, 0, 255]));
        let out = hsv_raster(&raster);
        assert_eq!(out.get_pixel(1, 1), &Rgb([255, 255, 120]));
    }

    #[test]
    fn gray_field_matches_raster_shape() {
        let raster = Raster::from_fn(3, 2, |x, _| Rgb([x as u8 * 100, x as u8 * 100, x as u8 * 100]));
        let field = gray_field(&raster).unwrap();
        assert_eq!((field.width, field.height), (3, 2));
        assert_eq!(field.data, vec![0.0, 100.0, 200.0, 0.0, 100.0, 200.0]);
    }

    #[test]
    fn lab_round_trip_is_close() {
        for px in [Rgb([139u8, 69, 19]), Rgb([30, 60, 201]), Rgb([250, 250, 250]), Rgb([5, 5, 5])] {
            let back = lab_to_rgb(rgb_to_lab(px));
            for c in 0..3 {
                assert!((back.0[c] as i16 - px.0[c] as i16).abs() <= 1, "{px:?} -> {back:?}");
            }
        }
    }

    #[test]
    fn lab_white_has_full_lightness() {
        let [l, a, b] = rgb_to_lab(Rgb([255, 255, 255]));
        assert!((l - 100.0).abs() < 0.1);
        assert!(a.abs() < 0.5 && b.abs() < 0.5);
    }
}
