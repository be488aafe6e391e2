//! Moisture index (NDMI) renderings, read from brightness alone.
//!
//! Gray level g maps linearly to `ndmi = 2·(g/255) − 1` ∈ [-1, 1], then into
//! three exhaustive buckets: barren (< -0.2), water stress ([-0.2, 0.4)) and
//! healthy (≥ 0.4).

use image::Rgb;

use super::{ClassificationResult, Summary};
use crate::category::Category;
use crate::color::gray_field;
use crate::error::Result;
use crate::field::ScalarField;
use crate::stats::{bucket_index, bucket_percentages};
use crate::Raster;

pub const NDMI_BOUNDARIES: [f32; 2] = [-0.2, 0.4];

pub const LABEL_BARREN: &str = "barren";
pub const LABEL_STRESS: &str = "stress";
pub const LABEL_HEALTHY: &str = "healthy";

const BUCKET_LABELS: [&str; 3] = [LABEL_BARREN, LABEL_STRESS, LABEL_HEALTHY];

/// Brown, yellow, green.
pub const BUCKET_COLORS: [Rgb<u8>; 3] = [Rgb([139, 69, 19]), Rgb([255, 255, 0]), Rgb([0, 128, 0])];

pub const STRESS_ALERT: f64 = 30.0;
pub const HEALTHY_ALERT: f64 = 50.0;
pub const BARREN_ALERT: f64 = 25.0;

const GUIDE_STRESS: &str = ">30% estrés hídrico: Necesidad de riego";
const GUIDE_HEALTHY: &str = ">50% vegetación sana: Humedad óptima";
const GUIDE_BARREN: &str = ">25% suelo estéril: Áreas degradadas";

/// Linear remap of a gray field (0–255) to [-1, 1].
pub fn ndmi_field(gray: &ScalarField) -> ScalarField {
    gray.map(|g| (g / 255.0) * 2.0 - 1.0)
}

/// Every interpretation line whose threshold is exceeded, in guide order.
pub fn interpret(barren: f64, stress: f64, healthy: f64) -> Vec<&'static str> {
    let mut lines = Vec::new();
    if stress > STRESS_ALERT {
        lines.push(GUIDE_STRESS);
    }
    if healthy > HEALTHY_ALERT {
        lines.push(GUIDE_HEALTHY);
    }
    if barren > BARREN_ALERT {
        lines.push(GUIDE_BARREN);
    }
    lines
}

pub fn analyze(raster: &Raster) -> Result<ClassificationResult> {
    let ndmi = ndmi_field(&gray_field(raster)?);

    let mut result = ClassificationResult::new(Category::MoistureIndex, String::new());
    if let Some(buckets) = bucket_percentages(&ndmi.data, &NDMI_BOUNDARIES, &BUCKET_LABELS)? {
        result.breakdown = buckets;
    }

    let pct = |label: &str| result.breakdown.get(label);
    let (barren, stress, healthy) = (pct(LABEL_BARREN), pct(LABEL_STRESS), pct(LABEL_HEALTHY));
    let verdicts: Vec<String> = match (barren, stress, healthy) {
        (Some(b), Some(s), Some(h)) => interpret(b, s, h).into_iter().map(String::from).collect(),
        _ => Vec::new(),
    };

    result.summary = Summary::heading("Índice de Humedad (NDMI)")
        .percent("Suelo estéril", barren)
        .percent("Estrés hídrico", stress)
        .percent("Vegetación sana", healthy)
        .guide(&[GUIDE_STRESS, GUIDE_HEALTHY, GUIDE_BARREN])
        .verdicts(&verdicts)
        .finish();
    result.verdicts = verdicts;

    let mut overlay = Raster::new(raster.width(), raster.height());
    for (px, &v) in overlay.pixels_mut().zip(ndmi.data.iter()) {
        *px = BUCKET_COLORS[bucket_index(v, &NDMI_BOUNDARIES)];
    }
    result.overlay = Some(overlay);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DRY: Rgb<u8> = Rgb([50, 50, 50]);
    const MID: Rgb<u8> = Rgb([150, 150, 150]);
    const WET: Rgb<u8> = Rgb([220, 220, 220]);

    #[test]
    fn ndmi_spans_minus_one_to_one() {
        let gray = ScalarField::from_vec(3, 1, vec![0.0, 127.5, 255.0]).unwrap();
        let ndmi = ndmi_field(&gray);
        assert_relative_eq!(ndmi.data[0], -1.0);
        assert_relative_eq!(ndmi.data[1], 0.0);
        assert_relative_eq!(ndmi.data[2], 1.0);
    }

    #[test]
    fn buckets_and_overlay_colors() {
        let raster = Raster::from_fn(4, 1, |x, _| [DRY, MID, WET, WET][x as usize]);
        let result = analyze(&raster).unwrap();
        assert_relative_eq!(result.breakdown.get(LABEL_BARREN).unwrap(), 25.0);
        assert_relative_eq!(result.breakdown.get(LABEL_STRESS).unwrap(), 25.0);
        assert_relative_eq!(result.breakdown.get(LABEL_HEALTHY).unwrap(), 50.0);

        let overlay = result.overlay.unwrap();
        assert_eq!(overlay.get_pixel(0, 0), &BUCKET_COLORS[0]);
        assert_eq!(overlay.get_pixel(1, 0), &BUCKET_COLORS[1]);
        assert_eq!(overlay.get_pixel(3, 0), &BUCKET_COLORS[2]);
        assert!(result.verdicts.is_empty());
    }

    #[test]
    fn buckets_are_exhaustive_for_every_gray_level() {
        let raster = Raster::from_fn(256, 3, |x, y| {
            let g = x as u8;
            image::Rgb([g, g.wrapping_add(y as u8 * 7), g / 2])
        });
        let result = analyze(&raster).unwrap();
        assert_relative_eq!(result.breakdown.total(), 100.0, epsilon = 1e-3);
        for entry in &result.breakdown.entries {
            assert!((0.0..=100.0).contains(&entry.percent));
        }
    }

    #[test]
    fn gray_102_sits_on_the_stress_boundary() {
        let result = analyze(&Raster::from_pixel(1, 1, Rgb([102, 102, 102]))).unwrap();
        assert_relative_eq!(result.breakdown.get(LABEL_STRESS).unwrap(), 100.0);
    }

    #[test]
    fn alerts_fire_independently() {
        assert_eq!(interpret(10.0, 40.0, 50.0), vec![GUIDE_STRESS]);
        assert_eq!(interpret(0.0, 0.0, 100.0), vec![GUIDE_HEALTHY]);
        assert_eq!(interpret(60.0, 35.0, 5.0), vec![GUIDE_STRESS, GUIDE_BARREN]);
        assert!(interpret(25.0, 30.0, 45.0).is_empty());
    }

    #[test]
    fn wet_scene_reports_optimal_moisture() {
        let result = analyze(&Raster::from_pixel(4, 4, WET)).unwrap();
        assert_eq!(result.verdicts, vec![GUIDE_HEALTHY.to_string()]);
        assert!(result.summary.contains("- Vegetación sana: 100.0%"));
    }
}
