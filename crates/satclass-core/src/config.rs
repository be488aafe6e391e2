//! Batch configuration: paths, accepted extensions, enhancement and report layout.
//!
//! Classification thresholds are fixed constants in `classify::*` and are not
//! part of the configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::enhance::EnhanceParams;
use crate::error::Result;
use crate::report::ReportParams;

/// Sub-directory of the input directory used when no output directory is set.
pub const DEFAULT_OUTPUT_SUBDIR: &str = "Imagenes_tratadas";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub input_dir: PathBuf,
    /// Defaults to `<input_dir>/Imagenes_tratadas`.
    pub output_dir: Option<PathBuf>,
    /// Lowercase file extensions (without dot) that are processed.
    pub extensions: Vec<String>,
    pub enhance: EnhanceParams,
    pub report: ReportParams,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: None,
            extensions: vec!["jpg".into(), "jpeg".into(), "png".into()],
            enhance: EnhanceParams::default(),
            report: ReportParams::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Read a JSON config; missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.input_dir.join(DEFAULT_OUTPUT_SUBDIR))
    }

    /// True if `path` has one of the accepted extensions (case-insensitive).
    pub fn accepts(&self, path: &Path) -> bool {
        crate::pipeline::has_extension(path, &self.extensions)
    }
}
