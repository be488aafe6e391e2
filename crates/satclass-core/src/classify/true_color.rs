//! True-color imagery: bare earth detection by brown hue.

use image::Rgb;

use super::{ClassificationResult, Summary};
use crate::category::Category;
use crate::error::Result;
use crate::mask::{paint_mask, HsvRange, Mask};
use crate::stats::mask_percentage;
use crate::Raster;

/// Brown / earth tones.
pub const EARTH_RANGE: HsvRange = HsvRange::new([10, 50, 20], [25, 255, 200]);

/// Saddle brown; lies inside `EARTH_RANGE`, so re-classifying an overlay keeps its coverage.
pub const EARTH_OVERLAY: Rgb<u8> = Rgb([139, 69, 19]);

/// Upper bounds (percent earth) of the vegetation-dominant and mixed classes.
pub const VEGETATION_DOMINANT_MAX: f64 = 10.0;
pub const MIXED_MAX: f64 = 30.0;

pub const LABEL_EARTH: &str = "earth";

const GUIDE_VEGETATION: &str = "<10% tierra: Predomina vegetación";
const GUIDE_MIXED: &str = "10-30% tierra: Mezcla de vegetación y tierra";
const GUIDE_ARID: &str = ">30% tierra: Áreas áridas o urbanas";

/// Interpretation line for an earth percentage.
pub fn interpret(earth: f64) -> &'static str {
    if earth < VEGETATION_DOMINANT_MAX {
        GUIDE_VEGETATION
    } else if earth <= MIXED_MAX {
        GUIDE_MIXED
    } else {
        GUIDE_ARID
    }
}

pub fn analyze(raster: &Raster) -> Result<ClassificationResult> {
    let earth_mask = Mask::from_hsv_range(raster, EARTH_RANGE);
    let earth = mask_percentage(&earth_mask, None)?;

    let mut result = ClassificationResult::new(Category::TrueColor, String::new());
    if let Some(p) = earth {
        result.breakdown.push(LABEL_EARTH, p);
        result.verdicts.push(interpret(p).to_string());
    }

    result.summary = Summary::heading("Color Verdadero")
        .percent("Área de tierra detectada", earth)
        .raw("\n")
        .guide(&[GUIDE_VEGETATION, GUIDE_MIXED, GUIDE_ARID])
        .verdicts(&result.verdicts)
        .finish();
    result.overlay = Some(paint_mask(raster, &earth_mask, EARTH_OVERLAY)?);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::test_rasters::*;
    use approx::assert_relative_eq;

    #[test]
    fn solid_brown_is_all_earth_and_arid() {
        let result = analyze(&solid(BROWN)).unwrap();
        assert_relative_eq!(result.breakdown.get(LABEL_EARTH).unwrap(), 100.0);
        assert_eq!(result.verdicts, vec![GUIDE_ARID.to_string()]);
        assert!(result.summary.contains("Área de tierra detectada: 100.0%"));
        assert!(result.summary.contains(">30% tierra: Áreas áridas o urbanas"));
    }

    #[test]
    fn dispatch_by_identifier_reaches_this_rule() {
        let category = crate::category::classify("True_color_test.jpg");
        let result = crate::classify::classify_raster(&solid(BROWN), category).unwrap();
        assert_eq!(result.category, Category::TrueColor);
        assert_relative_eq!(result.breakdown.get(LABEL_EARTH).unwrap(), 100.0);
    }

    #[test]
    fn overlay_paints_only_earth_pixels() {
        let raster = halves(BROWN, FOREST);
        let result = analyze(&raster).unwrap();
        let overlay = result.overlay.unwrap();
        assert_eq!(overlay.get_pixel(0, 0), &EARTH_OVERLAY);
        assert_eq!(overlay.get_pixel(7, 5), &FOREST);
        assert_relative_eq!(result.breakdown.get(LABEL_EARTH).unwrap(), 50.0);
    }

    #[test]
    fn reclassifying_the_overlay_keeps_coverage() {
        let raster = halves(Rgb([160, 100, 40]), WATER_BLUE);
        let first = analyze(&raster).unwrap();
        let second = analyze(first.overlay.as_ref().unwrap()).unwrap();
        let expected = first.breakdown.get(LABEL_EARTH).unwrap();
        assert_relative_eq!(second.breakdown.get(LABEL_EARTH).unwrap(), expected);
        assert_relative_eq!(expected, 50.0);
    }

    #[test]
    fn interpretation_thresholds() {
        assert_eq!(interpret(0.0), GUIDE_VEGETATION);
        assert_eq!(interpret(9.99), GUIDE_VEGETATION);
        assert_eq!(interpret(10.0), GUIDE_MIXED);
        assert_eq!(interpret(30.0), GUIDE_MIXED);
        assert_eq!(interpret(30.01), GUIDE_ARID);
    }

    #[test]
    fn empty_raster_reports_no_data() {
        let result = analyze(&Raster::new(0, 0)).unwrap();
        assert!(result.breakdown.is_empty());
        assert!(result.summary.contains("sin datos"));
    }
}
