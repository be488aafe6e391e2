//! Batch driver: discover images, run each through enhance → classify →
//! report, and write the artefacts next to each other in the output directory.
//!
//! For an input `scene.jpg` the outputs are:
//!   - `scene.jpg`           enhanced raster
//!   - `processed_scene.jpg` classified overlay (only if the rule produced one)
//!   - `analysis_scene.jpg`  four-panel report

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::FontVec;
#[cfg(feature = "threading")]
use rayon::prelude::*;
use serde::Serialize;

use crate::category::Category;
use crate::classify::classify_raster;
use crate::config::AnalyzerConfig;
use crate::enhance::enhance;
use crate::error::{AnalysisError, Result};
use crate::report::{compose_report, load_font};
use crate::stats::PercentageBreakdown;

/// Per-image outcome, serialized into the batch summary.
#[derive(Debug, Clone, Serialize)]
pub struct ImageReport {
    pub name: String,
    pub category: Category,
    pub breakdown: PercentageBreakdown,
    pub verdicts: Vec<String>,
    pub outputs: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedImage {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped: Vec<SkippedImage>,
    pub reports: Vec<ImageReport>,
}

/// True if the extension of `path` is in `extensions`, ignoring case.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

/// Files directly inside `dir` with an accepted extension, sorted by path.
pub fn discover_images(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(AnalysisError::MissingInputDir(dir.display().to_string()));
    }
    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, extensions) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

pub struct BatchProcessor {
    config: AnalyzerConfig,
    output_dir: PathBuf,
    font: Option<FontVec>,
}

impl BatchProcessor {
    /// Validate the input directory, create the output directory and load
    /// the report font.
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        if !config.input_dir.is_dir() {
            return Err(AnalysisError::MissingInputDir(
                config.input_dir.display().to_string(),
            ));
        }
        let output_dir = config.resolved_output_dir();
        fs::create_dir_all(&output_dir)?;

        let font = load_font(&config.report)?;
        if font.is_none() {
            log::warn!("no TrueType font found, reports will have no text");
        }

        Ok(Self { config, output_dir, font })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Process one image. Nothing is written if decoding fails.
    pub fn process_file(&self, path: &Path) -> Result<ImageReport> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let raster = image::open(path)?.to_rgb8();
        let category = Category::from_identifier(&name);
        log::info!("processing {name} ({category}, {}×{})", raster.width(), raster.height());

        let enhanced = enhance(&raster, &self.config.enhance)?;
        let mut outputs = Vec::with_capacity(3);

        let enhanced_path = self.output_dir.join(&name);
        enhanced.save(&enhanced_path)?;
        outputs.push(enhanced_path);

        let result = classify_raster(&enhanced, category)?;

        if let Some(overlay) = &result.overlay {
            let overlay_path = self.output_dir.join(format!("processed_{name}"));
            overlay.save(&overlay_path)?;
            outputs.push(overlay_path);
        }

        let figure = compose_report(&name, &enhanced, &result, &self.config.report, self.font.as_ref());
        let figure_path = self.output_dir.join(format!("analysis_{name}"));
        figure.save(&figure_path)?;
        outputs.push(figure_path);

        for verdict in &result.verdicts {
            log::info!("{name}: {verdict}");
        }

        Ok(ImageReport {
            name,
            category,
            breakdown: result.breakdown,
            verdicts: result.verdicts,
            outputs,
        })
    }

    /// Process every discovered image. Failures are logged and recorded as
    /// skipped; they never abort the batch.
    pub fn run(&self) -> Result<BatchSummary> {
        let images = discover_images(&self.config.input_dir, &self.config.extensions)?;
        log::info!(
            "{} image(s) in {}",
            images.len(),
            self.config.input_dir.display()
        );

        #[cfg(feature = "threading")]
        let outcomes: Vec<_> = images.par_iter().map(|p| (p, self.process_file(p))).collect();
        #[cfg(not(feature = "threading"))]
        let outcomes: Vec<_> = images.iter().map(|p| (p, self.process_file(p))).collect();

        let mut summary = BatchSummary::default();
        for (path, outcome) in outcomes {
            match outcome {
                Ok(report) => summary.reports.push(report),
                Err(e) => {
                    log::warn!("skipping {}: {e}", path.display());
                    summary.skipped.push(SkippedImage {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        summary.processed = summary.reports.len();
        log::info!(
            "done: {} processed, {} skipped",
            summary.processed,
            summary.skipped.len()
        );
        Ok(summary)
    }
}
