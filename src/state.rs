use std::path::PathBuf;

use crate::config::PlotOptions;
use crate::data::model::{LightCurve, LoadReport, Summary};

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// Everything the display window shows. Built once, never mutated.
pub struct ViewState {
    /// Input file the curve was read from.
    pub source: PathBuf,
    pub curve: LightCurve,
    pub report: LoadReport,
    pub plot: PlotOptions,
    /// Cached so the UI does not recompute it every frame.
    pub summary: Option<Summary>,
}

impl ViewState {
    pub fn new(source: PathBuf, curve: LightCurve, report: LoadReport, plot: PlotOptions) -> Self {
        let summary = curve.summary();
        Self {
            source,
            curve,
            report,
            plot,
            summary,
        }
    }

    /// Brightness as plotted: negated for magnitudes so egui's upward axis
    /// puts brighter (smaller) values on top.
    pub fn plot_y(&self, brightness: f64) -> f64 {
        if self.plot.scale.inverted() {
            -brightness
        } else {
            brightness
        }
    }

    /// One-line status for the top bar.
    pub fn status_line(&self) -> String {
        let name = self
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string());
        let mut line = format!(
            "{name}: {} observations, {} rows skipped",
            self.curve.len(),
            self.report.rows_skipped
        );
        if let Some(s) = &self.summary {
            line.push_str(&format!(
                " | span {:.2} d | amplitude {:.4}",
                s.time_span_days, s.amplitude
            ));
        }
        line
    }
}
