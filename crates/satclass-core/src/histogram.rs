//! Category-specific coloring of the 256-bin intensity histogram.

use image::Rgb;

use crate::category::Category;

// Named display colors.
pub const BROWN: Rgb<u8> = Rgb([165, 42, 42]);
pub const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);
pub const GREEN: Rgb<u8> = Rgb([0, 128, 0]);
pub const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
pub const PURPLE: Rgb<u8> = Rgb([128, 0, 128]);
pub const GRAY: Rgb<u8> = Rgb([128, 128, 128]);

/// darkblue → blue → cyan → yellow → limegreen → green → darkgreen.
pub const NDVI_GRADIENT: [Rgb<u8>; 7] = [
    Rgb([0, 0, 139]),
    Rgb([0, 0, 255]),
    Rgb([0, 255, 255]),
    Rgb([255, 255, 0]),
    Rgb([50, 205, 50]),
    Rgb([0, 128, 0]),
    Rgb([0, 100, 0]),
];

/// Intensities below `upper` (and above the previous band) get `color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub upper: u16,
    pub color: Rgb<u8>,
}

const fn band(upper: u16, color: Rgb<u8>) -> Band {
    Band { upper, color }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistogramColoring {
    /// Ascending bands; the last band's `upper` is 256.
    Banded(Vec<Band>),
    /// Evenly spaced stops, linearly interpolated over 0–255.
    Gradient(Vec<Rgb<u8>>),
    /// One curve per RGB channel instead of a colored gray histogram.
    PerChannel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistogramScheme {
    pub title: &'static str,
    pub x_label: &'static str,
    pub coloring: HistogramColoring,
}

impl HistogramScheme {
    /// The canonical scheme for `category`.
    pub fn for_category(category: Category) -> Self {
        use HistogramColoring::*;
        match category {
            Category::Ndvi => Self {
                title: "Distribución NDVI (Vegetación)",
                x_label: "Valor de Pixel (Mayor valor = más vegetación)",
                coloring: Gradient(NDVI_GRADIENT.to_vec()),
            },
            Category::MoistureIndex => Self {
                title: "Distribución NDMI (Humedad)",
                x_label: "Valor de Pixel (Bajo = seco, Alto = húmedo)",
                coloring: Banded(vec![band(100, BROWN), band(180, YELLOW), band(256, GREEN)]),
            },
            Category::Ndwi => Self {
                title: "Distribución NDWI (Agua)",
                x_label: "Valor de Pixel (Bajo = tierra, Alto = agua)",
                coloring: Banded(vec![band(170, GREEN), band(256, BLUE)]),
            },
            Category::Highlight => Self {
                title: "Distribución de Tierra (Color Verdadero)",
                x_label: "Valor de Pixel (Bajo = vegetación, Alto = tierra)",
                coloring: Banded(vec![band(100, BROWN), band(256, GREEN)]),
            },
            Category::FalseColor => Self {
                title: "Distribución Falso Color (Urbano)",
                x_label: "Valor de Pixel (Bajo = vegetación, Alto = urbano)",
                coloring: Banded(vec![band(100, PURPLE), band(200, GRAY), band(256, BLUE)]),
            },
            Category::TrueColor => Self {
                title: "Distribución Color Verdadero (Tierra y Vegetación)",
                x_label: "Valor de Pixel (Bajo = vegetación, Alto = tierra)",
                coloring: Banded(vec![band(100, GREEN), band(200, BLUE), band(256, BROWN)]),
            },
            Category::Generic => Self {
                title: "Histograma de Color",
                x_label: "Valor de Pixel",
                coloring: PerChannel,
            },
        }
    }

    /// Display color of histogram bin `value`; `None` for per-channel schemes.
    pub fn color_for(&self, value: u8) -> Option<Rgb<u8>> {
        match &self.coloring {
            HistogramColoring::Banded(bands) => bands
                .iter()
                .find(|b| (value as u16) < b.upper)
                .or(bands.last())
                .map(|b| b.color),
            HistogramColoring::Gradient(stops) => gradient_color(stops, value as f32 / 255.0),
            HistogramColoring::PerChannel => None,
        }
    }
}

/// Linear interpolation across evenly spaced `stops` at `t` ∈ [0, 1].
fn gradient_color(stops: &[Rgb<u8>], t: f32) -> Option<Rgb<u8>> {
    match stops {
        [] => None,
        [only] => Some(*only),
        _ => {
            let pos = t.clamp(0.0, 1.0) * (stops.len() - 1) as f32;
            let i = (pos.floor() as usize).min(stops.len() - 2);
            let frac = pos - i as f32;
            let (a, b) = (stops[i].0, stops[i + 1].0);
            let mut out = [0u8; 3];
            for c in 0..3 {
                out[c] = (a[c] as f32 + (b[c] as f32 - a[c] as f32) * frac).round() as u8;
            }
            Some(Rgb(out))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banded_boundaries_are_exclusive_above() {
        let s = HistogramScheme::for_category(Category::TrueColor);
        assert_eq!(s.color_for(0), Some(GREEN));
        assert_eq!(s.color_for(99), Some(GREEN));
        assert_eq!(s.color_for(100), Some(BLUE));
        assert_eq!(s.color_for(199), Some(BLUE));
        assert_eq!(s.color_for(200), Some(BROWN));
        assert_eq!(s.color_for(255), Some(BROWN));
    }

    #[test]
    fn ndwi_uses_two_band_scheme() {
        let s = HistogramScheme::for_category(Category::Ndwi);
        assert_eq!(s.color_for(169), Some(GREEN));
        assert_eq!(s.color_for(170), Some(BLUE));
    }

    #[test]
    fn moisture_scheme_matches_brown_yellow_green() {
        let s = HistogramScheme::for_category(Category::MoistureIndex);
        assert_eq!(s.color_for(99), Some(BROWN));
        assert_eq!(s.color_for(179), Some(YELLOW));
        assert_eq!(s.color_for(180), Some(GREEN));
    }

    #[test]
    fn ndvi_gradient_hits_end_stops() {
        let s = HistogramScheme::for_category(Category::Ndvi);
        assert_eq!(s.color_for(0), Some(NDVI_GRADIENT[0]));
        assert_eq!(s.color_for(255), Some(NDVI_GRADIENT[6]));
        // 127.5/255 is the midpoint, the yellow stop sits at 3/6.
        let mid = s.color_for(128).unwrap();
        assert!(mid.0[0] > 200 && mid.0[1] > 200, "{mid:?}");
    }

    #[test]
    fn generic_scheme_is_per_channel() {
        let s = HistogramScheme::for_category(Category::Generic);
        assert_eq!(s.coloring, HistogramColoring::PerChannel);
        assert_eq!(s.color_for(42), None);
    }

    #[test]
    fn every_category_colors_the_full_range() {
        for category in Category::ALL {
            let s = HistogramScheme::for_category(category);
            if s.coloring == HistogramColoring::PerChannel {
                continue;
            }
            assert!((0..=255u8).all(|v| s.color_for(v).is_some()), "{category}");
        }
    }
}
