//! NDVI renderings: green-tone vegetation classes by brightness.
//!
//! Only pixels inside the green HSV range are considered; their grayscale
//! intensity selects one of four vegetation tones. Percentages are relative
//! to the green pixel count, so the four tones sum to the total vegetation
//! share, which is at most 100 (dim greens below the first tone are counted
//! in the denominator only).

use image::Rgb;

use super::{ClassificationResult, Summary};
use crate::category::Category;
use crate::color::luma;
use crate::error::Result;
use crate::mask::{HsvRange, Mask};
use crate::stats::{bucket_index, bucket_percentages};
use crate::Raster;

pub const GREEN_RANGE: HsvRange = HsvRange::new([35, 40, 40], [85, 255, 255]);

/// Gray-level boundaries: dark [100, 140], medium-dark [141, 180],
/// medium-light [181, 220], light [221, 255]; below 100 is unclassified.
pub const TONE_BOUNDARIES: [f32; 4] = [100.0, 141.0, 181.0, 221.0];

pub const LABEL_UNCLASSIFIED: &str = "unclassified";
pub const LABEL_DARK: &str = "dark";
pub const LABEL_MEDIUM_DARK: &str = "medium_dark";
pub const LABEL_MEDIUM_LIGHT: &str = "medium_light";
pub const LABEL_LIGHT: &str = "light";

const TONE_LABELS: [&str; 5] = [
    LABEL_UNCLASSIFIED,
    LABEL_DARK,
    LABEL_MEDIUM_DARK,
    LABEL_MEDIUM_LIGHT,
    LABEL_LIGHT,
];

/// Overlay color per tone, darkest first.
pub const TONE_COLORS: [Rgb<u8>; 4] = [
    Rgb([0, 50, 0]),
    Rgb([0, 150, 0]),
    Rgb([50, 200, 50]),
    Rgb([100, 255, 100]),
];

pub const HEALTHY_MIN: f64 = 60.0;
pub const MODERATE_MIN: f64 = 40.0;

pub const NO_VEGETATION_MESSAGE: &str = "**No se detectó vegetación verde**";

const GUIDE_HEALTHY: &str = ">60% vegetación: Ecosistema saludable";
const GUIDE_MODERATE: &str = "40-60%: Zonas de crecimiento moderado";
const GUIDE_STRESSED: &str = "<40%: Posible estrés vegetal o áreas no cultivadas";

pub fn interpret(total_vegetation: f64) -> &'static str {
    if total_vegetation > HEALTHY_MIN {
        GUIDE_HEALTHY
    } else if total_vegetation >= MODERATE_MIN {
        GUIDE_MODERATE
    } else {
        GUIDE_STRESSED
    }
}

pub fn analyze(raster: &Raster) -> Result<ClassificationResult> {
    let green_mask = Mask::from_hsv_range(raster, GREEN_RANGE);
    if green_mask.count() == 0 {
        log::debug!("no green pixels, skipping vegetation buckets");
        return Ok(ClassificationResult::new(Category::Ndvi, NO_VEGETATION_MESSAGE.to_string()));
    }

    let green_gray: Vec<f32> = raster
        .pixels()
        .zip(green_mask.data.iter())
        .filter(|(_, &hit)| hit)
        .map(|(&px, _)| luma(px) as f32)
        .collect();

    let mut result = ClassificationResult::new(Category::Ndvi, String::new());
    let Some(tones) = bucket_percentages(&green_gray, &TONE_BOUNDARIES, &TONE_LABELS)? else {
        result.summary = NO_VEGETATION_MESSAGE.to_string();
        return Ok(result);
    };
    for entry in tones.entries.iter().filter(|e| e.label != LABEL_UNCLASSIFIED) {
        result.breakdown.push(entry.label.clone(), entry.percent);
    }

    let pct = |label: &str| result.breakdown.get(label);
    let total = result.breakdown.total();
    let verdicts = vec![interpret(total).to_string()];

    let summary = Summary::heading("ANÁLISIS NDVI (Vegetación)")
        .percent("Verde oscuro (vegetación densa)", pct(LABEL_DARK))
        .percent("Verde medio oscuro", pct(LABEL_MEDIUM_DARK))
        .percent("Verde medio claro", pct(LABEL_MEDIUM_LIGHT))
        .percent("Verde claro (vegetación nueva)", pct(LABEL_LIGHT))
        .percent("**TOTAL VEGETACIÓN**", Some(total))
        .guide(&[GUIDE_HEALTHY, GUIDE_MODERATE, GUIDE_STRESSED])
        .verdicts(&verdicts)
        .finish();

    result.summary = summary;
    result.verdicts = verdicts;
    result.overlay = Some(tone_raster(raster, &green_mask));
    Ok(result)
}

/// Black raster with each green pixel painted in its tone color.
fn tone_raster(raster: &Raster, green_mask: &Mask) -> Raster {
    let mut out = Raster::new(raster.width(), raster.height());
    for ((dst, &src), &hit) in out.pixels_mut().zip(raster.pixels()).zip(green_mask.data.iter()) {
        if !hit {
            continue;
        }
        match bucket_index(luma(src) as f32, &TONE_BOUNDARIES) {
            0 => {}
            tone => *dst = TONE_COLORS[tone - 1],
        }
    }
    out
}
