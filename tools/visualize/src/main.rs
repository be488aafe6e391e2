//! Synthetic sample writer: one tagged PNG per category, useful as classifier
//! input and for eyeballing the overlays. With `--check` each sample is also
//! classified and its breakdown printed.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use image::{Rgb, RgbImage};
use satclass_core::{classify, classify_raster, Category};

#[derive(Parser, Debug)]
#[command(name = "visualize", about = "Write synthetic tagged satellite samples")]
struct Args {
    /// Output directory.
    #[arg(short, long, default_value = "data/samples")]
    output: PathBuf,

    /// Sample width in pixels.
    #[arg(long, default_value_t = 256)]
    width: u32,

    /// Sample height in pixels.
    #[arg(long, default_value_t = 192)]
    height: u32,

    /// Classify every sample and print its breakdown.
    #[arg(long)]
    check: bool,
}

// ── Scene painters ────────────────────────────────────────────────────────────

const SOIL: Rgb<u8> = Rgb([139, 69, 19]);
const CANOPY: Rgb<u8> = Rgb([34, 110, 40]);
const LAKE: Rgb<u8> = Rgb([30, 60, 201]);
const CONCRETE: Rgb<u8> = Rgb([235, 235, 235]);
const CROPS_FALSE: Rgb<u8> = Rgb([200, 30, 40]);

/// Soil strip on the left third, canopy elsewhere.
fn true_color_scene(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, _| if x < w / 3 { SOIL } else { CANOPY })
}

/// Red vegetation with a grid of bright blocks.
fn false_color_scene(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| {
        if (x / 16) % 3 == 0 && (y / 16) % 3 == 0 {
            CONCRETE
        } else {
            CROPS_FALSE
        }
    })
}

/// Horizontal bands of green from dark to light, over a brown bottom row.
fn ndvi_scene(w: u32, h: u32) -> RgbImage {
    let greens = [
        Rgb([20, 90, 20]),
        Rgb([40, 180, 40]),
        Rgb([100, 220, 100]),
        Rgb([150, 240, 150]),
        Rgb([200, 255, 200]),
    ];
    let band = (h / (greens.len() as u32 + 1)).max(1);
    RgbImage::from_fn(w, h, |_, y| greens.get((y / band) as usize).copied().unwrap_or(SOIL))
}

/// Gray ramp from dark (dry) to bright (wet).
fn moisture_scene(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, _| {
        let v = (x as f32 / (w.max(2) - 1) as f32 * 255.0).round() as u8;
        Rgb([v, v, v])
    })
}

/// A round lake in the middle of dry land.
fn ndwi_scene(w: u32, h: u32) -> RgbImage {
    let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
    let r = w.min(h) as f32 / 3.0;
    RgbImage::from_fn(w, h, |x, y| {
        let (dx, dy) = (x as f32 - cx, y as f32 - cy);
        if dx * dx + dy * dy <= r * r {
            LAKE
        } else {
            SOIL
        }
    })
}

/// Hue sweep across the width, brightness down the height.
fn highlight_scene(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| {
        let hue = x as f32 / w.max(1) as f32 * 6.0;
        let v = 1.0 - 0.6 * y as f32 / h.max(1) as f32;
        let f = hue.fract();
        let (r, g, b) = match hue as u32 {
            0 => (1.0, f, 0.0),
            1 => (1.0 - f, 1.0, 0.0),
            2 => (0.0, 1.0, f),
            3 => (0.0, 1.0 - f, 1.0),
            4 => (f, 0.0, 1.0),
            _ => (1.0, 0.0, 1.0 - f),
        };
        let q = |c: f32| (c * v * 255.0).round() as u8;
        Rgb([q(r), q(g), q(b)])
    })
}

fn sample_for(category: Category, w: u32, h: u32) -> RgbImage {
    match category {
        Category::TrueColor => true_color_scene(w, h),
        Category::FalseColor => false_color_scene(w, h),
        Category::Ndvi => ndvi_scene(w, h),
        Category::MoistureIndex => moisture_scene(w, h),
        Category::Ndwi => ndwi_scene(w, h),
        Category::Highlight => highlight_scene(w, h),
        Category::Generic => true_color_scene(w, h),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    for category in Category::ALL {
        let name = match category.tag() {
            Some(tag) => format!("{tag}_sample.png"),
            None => "untagged_sample.png".to_string(),
        };
        // The filename must dispatch back to the category it was drawn for.
        debug_assert_eq!(classify(&name), category);

        let img = sample_for(category, args.width, args.height);
        let path = args.output.join(&name);
        img.save(&path).with_context(|| format!("writing {}", path.display()))?;
        println!("wrote {}", path.display());

        if args.check {
            let result = classify_raster(&img, category)?;
            for entry in &result.breakdown.entries {
                println!("  {:<14} {:>6.1}%", entry.label, entry.percent);
            }
            for verdict in &result.verdicts {
                println!("  → {verdict}");
            }
        }
    }
    Ok(())
}
