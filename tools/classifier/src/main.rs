//! Batch classifier: enhances every image in a directory, classifies it by the
//! category tag in its filename and writes overlays, report figures and a
//! JSON summary.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use satclass_core::{AnalyzerConfig, BatchProcessor};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "classifier", about = "Classify tagged satellite renderings in a directory")]
struct Args {
    /// Directory with input images (True_color, NDVI, NDWI, ... in the filename).
    input: PathBuf,

    /// Output directory (default: <input>/Imagenes_tratadas).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON config file; CLI flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the batch summary (default: <output>/summary.json).
    #[arg(short, long)]
    summary: Option<PathBuf>,

    /// Upscale factor applied before classification.
    #[arg(long)]
    scale: Option<u32>,

    /// TrueType font used for report text.
    #[arg(long)]
    font: Option<PathBuf>,
}

fn build_config(args: &Args) -> Result<AnalyzerConfig> {
    let config = match &args.config {
        Some(path) => AnalyzerConfig::load(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };
    let mut config = config.with_input_dir(&args.input);
    if let Some(output) = &args.output {
        config.output_dir = Some(output.clone());
    }
    if let Some(scale) = args.scale {
        config.enhance.scale = scale;
    }
    if let Some(font) = &args.font {
        config.report.font_path = Some(font.clone());
    }
    Ok(config)
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = build_config(&args)?;

    let processor = BatchProcessor::new(config)
        .with_context(|| format!("preparing batch for {}", args.input.display()))?;
    let summary = processor.run()?;

    let summary_path = args
        .summary
        .clone()
        .unwrap_or_else(|| processor.output_dir().join("summary.json"));
    let json = serde_json::to_string_pretty(&summary)?;
    fs::write(&summary_path, json)
        .with_context(|| format!("writing {}", summary_path.display()))?;

    log::info!(
        "{} processed, {} skipped, summary at {}",
        summary.processed,
        summary.skipped.len(),
        summary_path.display()
    );
    Ok(())
}
