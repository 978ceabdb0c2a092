use eframe::egui::{self, RichText, Ui};

use crate::color;
use crate::render::EMPTY_MESSAGE;
use crate::state::ViewState;

// ---------------------------------------------------------------------------
// Top bar – title and load status
// ---------------------------------------------------------------------------

pub fn top_bar(ui: &mut Ui, state: &ViewState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(&state.plot.title);
        ui.separator();
        ui.label(state.status_line());
    });
}

// ---------------------------------------------------------------------------
// Bottom panel – summary statistics
// ---------------------------------------------------------------------------

pub fn summary_panel(ui: &mut Ui, state: &ViewState) {
    let Some(summary) = &state.summary else {
        ui.label(RichText::new(EMPTY_MESSAGE).color(egui::Color32::from(color::PLACEHOLDER)));
        return;
    };

    egui::Grid::new("summary_grid")
        .num_columns(2)
        .spacing([24.0, 2.0])
        .show(ui, |ui: &mut Ui| {
            let mut row = |name: &str, value: String| {
                ui.label(name);
                ui.monospace(value);
                ui.end_row();
            };
            row("Mean", format!("{:.4}", summary.mean));
            row(
                "Std Dev",
                summary
                    .std_dev
                    .map(|sd| format!("{sd:.4}"))
                    .unwrap_or_else(|| "n/a".to_string()),
            );
            row("Min / Max", format!("{:.4} / {:.4}", summary.min, summary.max));
            row("Amplitude", format!("{:.4}", summary.amplitude));
            if let Some(err) = summary.mean_error {
                row("Mean error", format!("{err:.6}"));
            }
        });
}
