//! Highlight renderings: the overlay is the raster's own HSV representation,
//! written in the blue-green-red byte order of the 8-bit HSV convention.

use super::ClassificationResult;
use crate::category::Category;
use crate::color::hsv_raster;
use crate::Raster;

pub const SUMMARY: &str = "**Colores resaltados de imagen original:**\n";

pub fn analyze(raster: &Raster) -> ClassificationResult {
    let mut result = ClassificationResult::new(Category::Highlight, SUMMARY.to_string());
    result.overlay = Some(hsv_raster(raster));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::test_rasters::*;
    use image::Rgb;

    #[test]
    fn overlay_replaces_every_pixel_with_hsv() {
        let result = analyze(&halves(Rgb([255, 0, 0]), Rgb([0, 0, 255])));
        let overlay = result.overlay.unwrap();
        assert_eq!(overlay.get_pixel(0, 0), &Rgb([255, 255, 0]));
        assert_eq!(overlay.get_pixel(7, 0), &Rgb([255, 255, 120]));
        assert!(result.breakdown.is_empty());
        assert_eq!(result.summary, SUMMARY);
    }
}
