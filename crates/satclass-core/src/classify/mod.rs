//! Per-category classification rules.
//!
//! Each rule turns an enhanced raster into a textual summary, a percentage
//! breakdown, an optional classified overlay and a histogram scheme. All
//! thresholds live as named constants in the rule's own module.

pub mod false_color;
pub mod highlight;
pub mod moisture;
pub mod ndvi;
pub mod ndwi;
pub mod true_color;

use crate::category::Category;
use crate::error::Result;
use crate::histogram::HistogramScheme;
use crate::stats::PercentageBreakdown;
use crate::Raster;

/// Outcome of classifying one raster.
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    pub category: Category,
    /// Human-readable breakdown and interpretation guide.
    pub summary: String,
    pub breakdown: PercentageBreakdown,
    /// Interpretation lines whose thresholds the breakdown meets.
    pub verdicts: Vec<String>,
    /// Classified raster; `None` when the category defines none or nothing was detected.
    pub overlay: Option<Raster>,
    pub histogram: HistogramScheme,
}

impl ClassificationResult {
    fn new(category: Category, summary: String) -> Self {
        Self {
            category,
            summary,
            breakdown: PercentageBreakdown::new(),
            verdicts: Vec::new(),
            overlay: None,
            histogram: HistogramScheme::for_category(category),
        }
    }
}

/// Run the rule for `category` on `raster`.
pub fn classify_raster(raster: &Raster, category: Category) -> Result<ClassificationResult> {
    log::debug!(
        "classifying {}×{} raster as {category}",
        raster.width(),
        raster.height()
    );
    match category {
        Category::TrueColor => true_color::analyze(raster),
        Category::FalseColor => false_color::analyze(raster),
        Category::Ndvi => ndvi::analyze(raster),
        Category::MoistureIndex => moisture::analyze(raster),
        Category::Ndwi => ndwi::analyze(raster),
        Category::Highlight => Ok(highlight::analyze(raster)),
        Category::Generic => Ok(ClassificationResult::new(Category::Generic, String::new())),
    }
}

/// Builds the markdown-flavoured summary text shared by all rules.
#[derive(Default)]
pub(crate) struct Summary {
    text: String,
}

impl Summary {
    pub fn heading(title: &str) -> Self {
        Self { text: format!("**{title}:**\n") }
    }

    pub fn item(&mut self, label: &str, value: &str) -> &mut Self {
        self.text.push_str(&format!("- {label}: {value}\n"));
        self
    }

    pub fn percent(&mut self, label: &str, percent: Option<f64>) -> &mut Self {
        self.item(label, &format_percent(percent))
    }

    pub fn raw(&mut self, line: &str) -> &mut Self {
        self.text.push_str(line);
        self
    }

    pub fn guide(&mut self, lines: &[&str]) -> &mut Self {
        self.text.push_str("\n**Guia de Interpretación:**\n");
        let body: Vec<String> = lines.iter().map(|l| format!("- {l}")).collect();
        self.text.push_str(&body.join("\n"));
        self
    }

    pub fn verdicts(&mut self, verdicts: &[String]) -> &mut Self {
        if !verdicts.is_empty() {
            self.text.push_str(&format!("\n\n**Resultado:** {}", verdicts.join("; ")));
        }
        self
    }

    pub fn finish(&self) -> String {
        self.text.clone()
    }
}

/// `"12.3%"`, or `"sin datos"` for the no-data sentinel.
pub(crate) fn format_percent(percent: Option<f64>) -> String {
    match percent {
        Some(p) => format!("{p:.1}%"),
        None => "sin datos".to_string(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use test_rasters::*;

    #[test]
    fn generic_has_no_overlay_and_per_channel_histogram() {
        let result = classify_raster(&solid(RED), Category::Generic).unwrap();
        assert!(result.overlay.is_none());
        assert!(result.breakdown.is_empty());
        assert_eq!(result.histogram, HistogramScheme::for_category(Category::Generic));
    }

    #[test]
    fn every_category_runs_on_an_empty_raster() {
        let empty = Raster::new(0, 0);
        for category in Category::ALL {
            let result = classify_raster(&empty, category).unwrap();
            assert_eq!(result.category, category);
        }
    }

    #[test]
    fn summary_builder_formats_items_and_verdicts() {
        let text = Summary::heading("Prueba")
            .percent("Agua", Some(12.345))
            .percent("Tierra", None)
            .guide(&["a", "b"])
            .verdicts(&["ok".to_string()])
            .finish();
        assert_eq!(
            text,
            "**Prueba:**\n- Agua: 12.3%\n- Tierra: sin datos\n\n**Guia de Interpretación:**\n- a\n- b\n\n**Resultado:** ok"
        );
    }
}
