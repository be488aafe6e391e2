//! NDWI renderings: open water by blue hue.

use image::Rgb;

use super::{ClassificationResult, Summary};
use crate::category::Category;
use crate::error::Result;
use crate::mask::{blend_mask, HsvRange, Mask};
use crate::stats::mask_percentage;
use crate::Raster;

pub const WATER_RANGE: HsvRange = HsvRange::new([90, 50, 50], [130, 255, 255]);

pub const WATER_OVERLAY: Rgb<u8> = Rgb([0, 0, 255]);

/// Weight of the original raster in the overlay blend; the water layer gets the rest.
pub const BASE_WEIGHT: f32 = 0.7;

pub const ARID_MAX: f64 = 5.0;
pub const NORMAL_MAX: f64 = 20.0;

pub const LABEL_WATER: &str = "water";
pub const LABEL_NO_WATER: &str = "no_water";

const GUIDE_ARID: &str = "<5% agua: Zona árida (pocos cuerpos de agua)";
const GUIDE_NORMAL: &str = "5-20% agua: Nivel normal (Oasis)";
const GUIDE_HUMID: &str = ">20% agua: Zona húmeda/inundación (lago, mar, río)";

pub fn interpret(water: f64) -> &'static str {
    if water < ARID_MAX {
        GUIDE_ARID
    } else if water <= NORMAL_MAX {
        GUIDE_NORMAL
    } else {
        GUIDE_HUMID
    }
}

pub fn analyze(raster: &Raster) -> Result<ClassificationResult> {
    let water_mask = Mask::from_hsv_range(raster, WATER_RANGE);
    let water = mask_percentage(&water_mask, None)?;
    let no_water = water.map(|w| 100.0 - w);

    let mut result = ClassificationResult::new(Category::Ndwi, String::new());
    if let (Some(w), Some(n)) = (water, no_water) {
        result.breakdown.push(LABEL_WATER, w);
        result.breakdown.push(LABEL_NO_WATER, n);
        result.verdicts.push(interpret(w).to_string());
    }

    result.summary = Summary::heading("NDWI (Índice de Agua)")
        .percent("Agua", water)
        .percent("No agua", no_water)
        .guide(&[GUIDE_ARID, GUIDE_NORMAL, GUIDE_HUMID])
        .verdicts(&result.verdicts)
        .finish();
    result.overlay = Some(blend_mask(raster, &water_mask, WATER_OVERLAY, BASE_WEIGHT)?);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::test_rasters::*;
    use approx::assert_relative_eq;

    #[test]
    fn half_water_half_earth() {
        let category = crate::category::classify("NDWI_test.jpg");
        let raster = halves(WATER_BLUE, BROWN);
        let result = crate::classify::classify_raster(&raster, category).unwrap();

        assert_eq!(result.category, Category::Ndwi);
        assert_relative_eq!(result.breakdown.get(LABEL_WATER).unwrap(), 50.0, epsilon = 1e-9);
        assert_relative_eq!(result.breakdown.get(LABEL_NO_WATER).unwrap(), 50.0, epsilon = 1e-9);
        assert_eq!(result.verdicts, vec![GUIDE_HUMID.to_string()]);

        // 0.7·(30, 60, 201) + 0.3·(0, 0, 255) and 0.7·(139, 69, 19) + 0.3·0
        let overlay = result.overlay.unwrap();
        assert_eq!(overlay.get_pixel(0, 0), &Rgb([21, 42, 217]));
        assert_eq!(overlay.get_pixel(7, 5), &Rgb([97, 48, 13]));
    }

    #[test]
    fn water_and_no_water_sum_to_100() {
        let raster = Raster::from_fn(10, 10, |x, y| if x * y < 20 { WATER_BLUE } else { RED });
        let result = analyze(&raster).unwrap();
        assert_relative_eq!(result.breakdown.total(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn interpretation_thresholds() {
        assert_eq!(interpret(4.9), GUIDE_ARID);
        assert_eq!(interpret(5.0), GUIDE_NORMAL);
        assert_eq!(interpret(20.0), GUIDE_NORMAL);
        assert_eq!(interpret(20.1), GUIDE_HUMID);
    }
}
