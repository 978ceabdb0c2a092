use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::color;
use crate::render::{EMPTY_MESSAGE, MARKER_RADIUS};
use crate::state::ViewState;

// ---------------------------------------------------------------------------
// Light curve plot (central panel)
// ---------------------------------------------------------------------------

/// Render the light curve in the central panel. Navigation is disabled:
/// the window is a static view of the same plot written to disk.
pub fn light_curve_plot(ui: &mut Ui, state: &ViewState) {
    if state.curve.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(EMPTY_MESSAGE);
        });
        return;
    }

    let inverted = state.plot.scale.inverted();
    let marker: Color32 = color::MARKER.into();
    let error_bar: Color32 = color::ERROR_BAR.into();

    Plot::new("light_curve_plot")
        .legend(Legend::default())
        .x_axis_label(state.plot.x_label.clone())
        .y_axis_label(state.plot.y_label().to_string())
        .y_axis_formatter(move |mark, _range| {
            let v = if inverted { -mark.value } else { mark.value };
            format!("{v}")
        })
        .label_formatter(move |_name, point| {
            let y = if inverted { -point.y } else { point.y };
            format!("t = {:.5}\ny = {:.4}", point.x, y)
        })
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show(ui, |plot_ui| {
            for o in state.curve.observations() {
                if o.error.is_none() {
                    continue;
                }
                let (lo, hi) = o.brightness_bounds();
                let bar: PlotPoints = vec![[o.time, state.plot_y(lo)], [o.time, state.plot_y(hi)]].into();
                plot_ui.line(Line::new(bar).color(error_bar).width(1.0));
            }

            let points: PlotPoints = state
                .curve
                .observations()
                .iter()
                .map(|o| [o.time, state.plot_y(o.brightness)])
                .collect();

            plot_ui.points(
                Points::new(points)
                    .name("Observations")
                    .color(marker)
                    .radius(MARKER_RADIUS as f32),
            );
        });
}
