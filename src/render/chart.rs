use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::layout::{brightness_axis, padded_range};
use super::{EMPTY_MESSAGE, FONT_FAMILY, MARKER_RADIUS};
use crate::color;
use crate::config::PlotOptions;
use crate::data::model::LightCurve;

const ERROR_CAP_WIDTH: u32 = 6;

/// Draw the light curve onto `root` and flush it to the backend.
///
/// Works for any plotters backend; the caller picks bitmap or SVG. The y
/// range is handed over as `max..min` for magnitudes so brighter points
/// sit higher.
pub fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    curve: &LightCurve,
    opts: &PlotOptions,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let background: RGBColor = color::BACKGROUND.into();
    let foreground: RGBColor = color::FOREGROUND.into();
    let grid: RGBColor = color::GRID.into();
    let marker: RGBColor = color::MARKER.into();
    let error_bar: RGBColor = color::ERROR_BAR.into();

    root.fill(&background)?;

    let (x_min, x_max) = padded_range(curve.time_range());
    let y_range = brightness_axis(curve.brightness_range(), opts.scale.inverted());

    let mut chart = ChartBuilder::on(root)
        .caption(&opts.title, (FONT_FAMILY, 24).into_font().color(&foreground))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_min..x_max, y_range)?;

    chart
        .configure_mesh()
        .x_desc(opts.x_label.as_str())
        .y_desc(opts.y_label())
        .x_label_formatter(&|t| format!("{t:.2}"))
        .y_label_formatter(&|v| format!("{v:.3}"))
        .axis_desc_style((FONT_FAMILY, 16).into_font().color(&foreground))
        .label_style((FONT_FAMILY, 12).into_font().color(&foreground))
        .axis_style(foreground)
        .bold_line_style(grid)
        .light_line_style(grid.mix(0.4))
        .draw()?;

    if curve.is_empty() {
        let (xs, ys) = chart.plotting_area().get_pixel_range();
        let centre = ((xs.start + xs.end) / 2, (ys.start + ys.end) / 2);
        let style = (FONT_FAMILY, 22)
            .into_font()
            .color(&RGBColor::from(color::PLACEHOLDER))
            .pos(Pos::new(HPos::Center, VPos::Center));
        root.draw_text(EMPTY_MESSAGE, &style, centre)?;
        return root.present();
    }

    let observations = curve.observations();
    if curve.has_errors() {
        chart.draw_series(observations.iter().filter_map(|o| {
            o.error.map(|e| {
                ErrorBar::new_vertical(
                    o.time,
                    o.brightness - e,
                    o.brightness,
                    o.brightness + e,
                    error_bar.filled(),
                    ERROR_CAP_WIDTH,
                )
            })
        }))?;
    }

    let radius = MARKER_RADIUS.round() as i32;
    chart
        .draw_series(
            observations
                .iter()
                .map(|o| Circle::new((o.time, o.brightness), radius, marker.mix(0.8).filled())),
        )?
        .label("Observations")
        .legend(move |(x, y)| Circle::new((x, y), radius, marker.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font((FONT_FAMILY, 14).into_font().color(&foreground))
        .background_style(background.mix(0.85))
        .border_style(foreground)
        .draw()?;

    root.present()
}
