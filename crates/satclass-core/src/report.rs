//! Composite report figure: a 2×2 grid of panels.
//!
//! ```text
//! +------------------+------------------+
//! | enhanced raster  | overlay (if any) |
//! +------------------+------------------+
//! | histogram        | summary text     |
//! +------------------+------------------+
//! ```
//!
//! Text needs a TrueType font. Without one the panels are still drawn, only
//! titles, axis labels and the summary are left out.

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::imageops::{self, FilterType};
use image::Rgb;
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut};
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};

use crate::classify::ClassificationResult;
use crate::error::Result;
use crate::histogram::HistogramColoring;
use crate::stats::{channel_histograms, gray_histogram};
use crate::Raster;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const GRID: Rgb<u8> = Rgb([220, 220, 220]);
/// Yellow at 80% opacity over white.
const TEXT_BOX: Rgb<u8> = Rgb([255, 255, 51]);
const CHANNEL_COLORS: [Rgb<u8>; 3] = [Rgb([220, 0, 0]), Rgb([0, 160, 0]), Rgb([0, 0, 220])];

const MARGIN: u32 = 16;

/// Fonts tried, in order, when no font path is configured.
const FALLBACK_FONTS: [&str; 5] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportParams {
    pub panel_width: u32,
    pub panel_height: u32,
    /// TrueType font for titles and summary text.
    pub font_path: Option<PathBuf>,
    pub title_size: f32,
    pub text_size: f32,
}

impl Default for ReportParams {
    fn default() -> Self {
        Self {
            panel_width: 900,
            panel_height: 600,
            font_path: None,
            title_size: 24.0,
            text_size: 20.0,
        }
    }
}

/// Load the configured font, or the first installed fallback.
///
/// A configured path that cannot be read or parsed is an error; finding no
/// fallback is not.
pub fn load_font(params: &ReportParams) -> Result<Option<FontVec>> {
    if let Some(path) = &params.font_path {
        let data = fs::read(path)?;
        return Ok(Some(FontVec::try_from_vec(data)?));
    }
    for candidate in FALLBACK_FONTS {
        let path = Path::new(candidate);
        if !path.is_file() {
            continue;
        }
        match fs::read(path).map(FontVec::try_from_vec) {
            Ok(Ok(font)) => {
                log::debug!("using font {}", path.display());
                return Ok(Some(font));
            }
            _ => log::debug!("skipping unusable font {}", path.display()),
        }
    }
    Ok(None)
}

/// Render the four-panel report for one image.
pub fn compose_report(
    name: &str,
    enhanced: &Raster,
    result: &ClassificationResult,
    params: &ReportParams,
    font: Option<&FontVec>,
) -> Raster {
    let (pw, ph) = (params.panel_width.max(64), params.panel_height.max(64));
    let mut canvas = Raster::from_pixel(pw * 2, ph * 2, WHITE);
    let panel = |col: u32, row: u32| (col * pw, row * ph);

    let (x, y) = panel(0, 0);
    draw_image_panel(&mut canvas, (x, y, pw, ph), enhanced, &format!("Imagen Mejorada: {name}"), params, font);

    if let Some(overlay) = &result.overlay {
        let (x, y) = panel(1, 0);
        draw_image_panel(&mut canvas, (x, y, pw, ph), overlay, "Análisis Visual", params, font);
    }

    let (x, y) = panel(0, 1);
    draw_histogram_panel(&mut canvas, (x, y, pw, ph), enhanced, result, params, font);

    let (x, y) = panel(1, 1);
    draw_text_panel(&mut canvas, (x, y, pw, ph), &result.summary, params, font);

    canvas
}

type PanelRect = (u32, u32, u32, u32);

fn title_height(params: &ReportParams) -> u32 {
    params.title_size.ceil() as u32 + MARGIN
}

fn draw_title(canvas: &mut Raster, x: u32, y: u32, text: &str, params: &ReportParams, font: Option<&FontVec>) {
    if let Some(font) = font {
        draw_text_mut(
            canvas,
            BLACK,
            (x + MARGIN) as i32,
            (y + MARGIN / 2) as i32,
            PxScale::from(params.title_size),
            font,
            text,
        );
    }
}

fn draw_image_panel(
    canvas: &mut Raster,
    (x, y, w, h): PanelRect,
    img: &Raster,
    title: &str,
    params: &ReportParams,
    font: Option<&FontVec>,
) {
    draw_title(canvas, x, y, title, params, font);
    if img.width() == 0 || img.height() == 0 {
        return;
    }

    let top = title_height(params);
    let max_w = w.saturating_sub(2 * MARGIN).max(1);
    let max_h = h.saturating_sub(top + MARGIN).max(1);
    let scale = (max_w as f32 / img.width() as f32).min(max_h as f32 / img.height() as f32);
    let fw = ((img.width() as f32 * scale) as u32).max(1);
    let fh = ((img.height() as f32 * scale) as u32).max(1);
    let fitted = imageops::resize(img, fw, fh, FilterType::Triangle);

    let ox = x + (w - fw) / 2;
    let oy = y + top + (max_h - fh) / 2;
    imageops::overlay(canvas, &fitted, ox as i64, oy as i64);
}

fn draw_histogram_panel(
    canvas: &mut Raster,
    (x, y, w, h): PanelRect,
    enhanced: &Raster,
    result: &ClassificationResult,
    params: &ReportParams,
    font: Option<&FontVec>,
) {
    let scheme = &result.histogram;
    draw_title(canvas, x, y, scheme.title, params, font);

    // The plot never leaves the panel, even when it is narrower than 256 bins.
    let left_pad = (4 * MARGIN).min(w / 4);
    let top_pad = title_height(params).min(h / 2);
    let left = x + left_pad;
    let top = y + top_pad;
    let plot_w = w.saturating_sub(left_pad + MARGIN).max(1);
    let plot_h = h.saturating_sub(top_pad + 4 * MARGIN).max(16);
    let bottom = top + plot_h;

    for i in 0..=4 {
        let gy = (top + plot_h * i / 4) as f32;
        draw_line_segment_mut(canvas, (left as f32, gy), ((left + plot_w) as f32, gy), GRID);
    }

    let bin_x = |bin: usize| left as f32 + bin as f32 * plot_w as f32 / 256.0;
    let bar_h = |count: u32, max: u32| {
        if max == 0 {
            0.0
        } else {
            count as f32 / max as f32 * plot_h as f32
        }
    };

    match &scheme.coloring {
        HistogramColoring::PerChannel => {
            let hists = channel_histograms(enhanced);
            let max = hists.iter().flat_map(|h| h.iter()).copied().max().unwrap_or(0);
            for (hist, &color) in hists.iter().zip(CHANNEL_COLORS.iter()) {
                for bin in 1..256 {
                    let p0 = (bin_x(bin - 1), bottom as f32 - bar_h(hist[bin - 1], max));
                    let p1 = (bin_x(bin), bottom as f32 - bar_h(hist[bin], max));
                    draw_line_segment_mut(canvas, p0, p1, color);
                }
            }
        }
        _ => {
            let hist = gray_histogram(enhanced);
            let max = hist.iter().copied().max().unwrap_or(0);
            for (bin, &count) in hist.iter().enumerate() {
                let bh = bar_h(count, max).round() as u32;
                let Some(color) = scheme.color_for(bin as u8) else {
                    continue;
                };
                if bh == 0 {
                    continue;
                }
                let (x0, x1) = (bin_x(bin).floor(), bin_x(bin + 1).floor());
                let bar_w = ((x1 - x0) as u32).max(1);
                let rect = Rect::at(x0 as i32, (bottom - bh) as i32).of_size(bar_w, bh);
                draw_filled_rect_mut(canvas, rect, color);
            }
        }
    }

    draw_hollow_rect_mut(canvas, Rect::at(left as i32, top as i32).of_size(plot_w, plot_h), BLACK);

    if let Some(font) = font {
        let scale = PxScale::from(params.text_size);
        draw_text_mut(canvas, BLACK, left as i32, (bottom + MARGIN / 2) as i32, scale, font, scheme.x_label);
        draw_text_mut(canvas, BLACK, (x + MARGIN / 2) as i32, (top - MARGIN) as i32, scale, font, "Frecuencia");
    }
}

fn draw_text_panel(
    canvas: &mut Raster,
    (x, y, w, h): PanelRect,
    summary: &str,
    params: &ReportParams,
    font: Option<&FontVec>,
) {
    let Some(font) = font else {
        return;
    };
    if summary.is_empty() {
        return;
    }

    let text = plain_summary(summary);
    let lines: Vec<&str> = text.lines().collect();
    let line_h = (params.text_size * 1.3).ceil() as u32;
    let box_h = (line_h * lines.len() as u32 + 2 * MARGIN).min(h.saturating_sub(2 * MARGIN)).max(1);
    let box_w = w.saturating_sub(2 * MARGIN).max(1);
    let box_x = x + MARGIN;
    let box_y = y + (h - box_h) / 2;

    draw_filled_rect_mut(canvas, Rect::at(box_x as i32, box_y as i32).of_size(box_w, box_h), TEXT_BOX);
    draw_hollow_rect_mut(canvas, Rect::at(box_x as i32, box_y as i32).of_size(box_w, box_h), BLACK);

    let scale = PxScale::from(params.text_size);
    for (i, line) in lines.iter().enumerate() {
        let ly = box_y + MARGIN + i as u32 * line_h;
        if ly + line_h > box_y + box_h {
            break;
        }
        draw_text_mut(canvas, BLACK, (box_x + MARGIN) as i32, ly as i32, scale, font, line);
    }
}

/// Summary text without markdown emphasis.
pub fn plain_summary(summary: &str) -> String {
    summary
        .lines()
        .map(|l| l.replace("**", ""))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::classify::classify_raster;

    fn brown_scene() -> Raster {
        Raster::from_fn(40, 30, |x, _| if x < 20 { Rgb([139, 69, 19]) } else { Rgb([30, 60, 201]) })
    }

    fn small_params() -> ReportParams {
        ReportParams {
            panel_width: 300,
            panel_height: 200,
            ..ReportParams::default()
        }
    }

    #[test]
    fn figure_is_two_by_two_panels() {
        let raster = brown_scene();
        let result = classify_raster(&raster, Category::TrueColor).unwrap();
        let fig = compose_report("x.jpg", &raster, &result, &small_params(), None);
        assert_eq!(fig.dimensions(), (600, 400));
    }

    #[test]
    fn overlay_panel_is_blank_without_overlay() {
        let raster = brown_scene();
        let result = classify_raster(&raster, Category::Generic).unwrap();
        let fig = compose_report("x.jpg", &raster, &result, &small_params(), None);
        assert!((300..600).all(|x| (0..200).all(|y| fig.get_pixel(x, y) == &WHITE)));
        // The enhanced panel is not blank.
        assert!((0..300).any(|x| (0..200).any(|y| fig.get_pixel(x, y) != &WHITE)));
    }

    #[test]
    fn histogram_bars_use_scheme_colors() {
        let raster = brown_scene();
        let result = classify_raster(&raster, Category::TrueColor).unwrap();
        let fig = compose_report("x.jpg", &raster, &result, &small_params(), None);
        // Both gray levels (brown ≈ 85, blue ≈ 67) fall in the first TrueColor band.
        let green = crate::histogram::GREEN;
        assert!((0..300).any(|x| (200..400).any(|y| fig.get_pixel(x, y) == &green)));
    }

    #[test]
    fn narrow_panels_keep_the_histogram_in_place() {
        let params = ReportParams {
            panel_width: 200,
            panel_height: 200,
            ..ReportParams::default()
        };
        let raster = brown_scene();
        for category in [Category::TrueColor, Category::Generic] {
            let result = classify_raster(&raster, category).unwrap();
            let fig = compose_report("x.jpg", &raster, &result, &params, None);
            // Without a font the summary panel stays blank.
            let stray = (200..400)
                .flat_map(|x| (200..400).map(move |y| (x, y)))
                .filter(|&(x, y)| fig.get_pixel(x, y) != &WHITE)
                .count();
            assert_eq!(stray, 0, "{category}");
            assert!((0..200).any(|x| (200..400).any(|y| fig.get_pixel(x, y) != &WHITE)));
        }
    }

    #[test]
    fn plain_summary_strips_emphasis() {
        assert_eq!(plain_summary("**A:**\n- b: 1.0%"), "A:\n- b: 1.0%");
    }

    #[test]
    fn missing_configured_font_is_an_error() {
        let params = ReportParams {
            font_path: Some(PathBuf::from("/nonexistent/font.ttf")),
            ..ReportParams::default()
        };
        assert!(load_font(&params).is_err());
    }
}
