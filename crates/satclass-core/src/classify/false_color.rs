//! Urban false-color composites: white and gray surfaces read as built-up area.

use image::Rgb;

use super::{format_percent, ClassificationResult, Summary};
use crate::category::Category;
use crate::error::Result;
use crate::mask::{paint_mask, HsvRange, Mask};
use crate::stats::mask_percentage;
use crate::Raster;

/// Low saturation, high value: white / light gray.
pub const URBAN_RANGE: HsvRange = HsvRange::new([0, 0, 180], [180, 30, 255]);

pub const URBAN_OVERLAY: Rgb<u8> = Rgb([200, 200, 200]);

pub const LABEL_URBAN: &str = "urban";

const LEGEND: &str = "- Vegetación: Verde\n- Urbano: Blanco/Gris/Púrpura\n\
- Suelos: Varios colores\n- Agua: Negro/Azul\n\
- Incendios/Volcanes: Rojo/Amarillo";

pub fn analyze(raster: &Raster) -> Result<ClassificationResult> {
    let urban_mask = Mask::from_hsv_range(raster, URBAN_RANGE);
    let urban = mask_percentage(&urban_mask, None)?;

    let mut result = ClassificationResult::new(Category::FalseColor, String::new());
    if let Some(p) = urban {
        result.breakdown.push(LABEL_URBAN, p);
    }

    result.summary = Summary::heading("Falso Color Urbano (Copernicus)")
        .raw(LEGEND)
        .raw(&format!("\n\n**Áreas urbanas detectadas:** {}", format_percent(urban)))
        .finish();
    result.overlay = Some(paint_mask(raster, &urban_mask, URBAN_OVERLAY)?);
    Ok(result)
}
