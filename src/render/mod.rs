/// Rendering layer: turn a [`LightCurve`] into an image file with `plotters`.
///
/// ```text
///   LightCurve + PlotOptions
///        │
///        ▼
///   ┌──────────┐
///   │  layout  │  padded ranges, magnitude inversion, size limits
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  chart   │  caption, mesh, error bars, markers, legend
///   └──────────┘
///        │
///    ┌───┴──────────┐
///    ▼              ▼
///   BitMapBackend  SVGBackend
/// ```
pub mod chart;
pub mod layout;

use std::path::Path;
use std::sync::OnceLock;

use log::{info, warn};
use plotters::prelude::{BitMapBackend, IntoDrawingArea, SVGBackend};
use plotters::style::{register_font, FontStyle};
use thiserror::Error;

use crate::config::PlotOptions;
use crate::data::model::LightCurve;

pub const EMPTY_MESSAGE: &str = "No valid observations";
pub const MARKER_RADIUS: f64 = 3.5;
/// Family name every text element asks for; backed by the font bundled
/// with egui so rendering needs no system fonts.
pub const FONT_FAMILY: &str = "sans-serif";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unsupported output format '{0}' (use .png or .svg)")]
    UnsupportedFormat(String),
    #[error("image size {width}x{height} exceeds the {max} px limit per side", max = layout::MAX_SIDE)]
    TooLarge { width: u32, height: u32 },
    #[error("loading plot font: {0}")]
    Font(String),
    #[error("drawing plot: {0}")]
    Backend(String),
}

/// Output file type, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "png" => Ok(OutputFormat::Png),
            "svg" => Ok(OutputFormat::Svg),
            other => Err(RenderError::UnsupportedFormat(other.to_string())),
        }
    }
}

fn register_fonts() -> Result<(), RenderError> {
    static REGISTERED: OnceLock<Result<(), String>> = OnceLock::new();
    REGISTERED
        .get_or_init(|| {
            register_font(FONT_FAMILY, FontStyle::Normal, epaint_default_fonts::UBUNTU_LIGHT)
                .map_err(|_| "InvalidFont".to_string())
        })
        .clone()
        .map_err(RenderError::Font)
}

/// Render `curve` to `path`. An empty curve still produces a file with a
/// placeholder message.
pub fn render_to_file(curve: &LightCurve, opts: &PlotOptions, path: &Path) -> Result<(), RenderError> {
    let format = OutputFormat::from_path(path)?;
    let size = layout::image_size(opts.width, opts.height)?;
    register_fonts()?;
    if curve.is_empty() {
        warn!("Rendering placeholder plot: no observations");
    }

    let drawn = match format {
        OutputFormat::Png => chart::draw(&BitMapBackend::new(path, size).into_drawing_area(), curve, opts)
            .map_err(|e| e.to_string()),
        OutputFormat::Svg => chart::draw(&SVGBackend::new(path, size).into_drawing_area(), curve, opts)
            .map_err(|e| e.to_string()),
    };
    drawn.map_err(RenderError::Backend)?;

    info!("Light curve saved to '{}'", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BrightnessScale;
    use crate::data::model::Observation;
    use image::GenericImageView;
    use std::fs;

    fn sample() -> LightCurve {
        LightCurve::from_observations(vec![
            Observation::new(2459000.5, 12.3),
            Observation::new(2459002.5, 12.1),
        ])
    }

    fn svg_text(curve: &LightCurve, opts: &PlotOptions) -> String {
        register_fonts().unwrap();
        let mut out = String::new();
        {
            let root = SVGBackend::with_string(&mut out, (opts.width, opts.height)).into_drawing_area();
            chart::draw(&root, curve, opts).unwrap();
        }
        out
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("a/b.PNG")).unwrap(), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("lc.svg")).unwrap(), OutputFormat::Svg);
        assert!(matches!(
            OutputFormat::from_path(Path::new("lc.gif")),
            Err(RenderError::UnsupportedFormat(ext)) if ext == "gif"
        ));
        assert!(OutputFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn writes_png_and_svg_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["lc.png", "lc.svg"] {
            let path = dir.path().join(name);
            render_to_file(&sample(), &PlotOptions::default(), &path).unwrap();
            assert!(fs::metadata(&path).unwrap().len() > 0);
        }
        let png = image::open(dir.path().join("lc.png")).unwrap();
        assert_eq!((png.width(), png.height()), (1400, 600));
    }

    #[test]
    fn empty_curve_still_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        render_to_file(&LightCurve::default(), &PlotOptions::default(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn empty_curve_draws_placeholder_text() {
        let svg = svg_text(&LightCurve::default(), &PlotOptions::default());
        assert!(svg.contains(EMPTY_MESSAGE));
        assert_eq!(svg.matches("<circle").count(), 0);
    }

    #[test]
    fn labels_are_written_verbatim() {
        let opts = PlotOptions {
            title: "V* RR Lyr (TESS s14)".to_string(),
            y_label: Some("Δ mag".to_string()),
            scale: BrightnessScale::Magnitude,
            ..PlotOptions::default()
        };
        let svg = svg_text(&sample(), &opts);
        assert!(svg.contains("V* RR Lyr (TESS s14)"));
        assert!(svg.contains("Δ mag"));
        assert!(svg.contains("Time (BJD)"));
    }

    #[test]
    fn markers_come_with_an_observations_legend() {
        let svg = svg_text(&sample(), &PlotOptions::default());
        assert!(svg.contains("Observations"));
        // one circle per observation plus the legend swatch
        assert_eq!(svg.matches("<circle").count(), 3);
    }

    #[test]
    fn error_bars_are_drawn_when_present() {
        let curve = LightCurve::from_observations(vec![
            Observation::new(1.0, 0.9).with_error(0.02),
            Observation::new(2.0, 1.1).with_error(0.03),
        ]);
        // ERROR_BAR is rgb(150, 150, 150)
        let plain = svg_text(&sample(), &PlotOptions::default());
        let with_errors = svg_text(&curve, &PlotOptions::default());
        assert!(with_errors.contains("#969696"));
        assert!(!plain.contains("#969696"));
    }

    #[test]
    fn oversized_image_is_rejected_before_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.png");
        let opts = PlotOptions {
            width: 100_000,
            height: 100_000,
            ..PlotOptions::default()
        };
        let err = render_to_file(&sample(), &opts, &path).unwrap_err();
        assert!(matches!(err, RenderError::TooLarge { width: 100_000, .. }));
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_path_reports_backend_error() {
        for name in ["/no/such/dir/lc.svg", "/no/such/dir/lc.png"] {
            let err = render_to_file(&sample(), &PlotOptions::default(), Path::new(name)).unwrap_err();
            assert!(matches!(err, RenderError::Backend(_)), "{name}: {err}");
        }
    }
}
