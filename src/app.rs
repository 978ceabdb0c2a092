use eframe::egui;

use crate::state::ViewState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LightCurveApp {
    pub state: ViewState,
}

impl LightCurveApp {
    pub fn new(state: ViewState) -> Self {
        Self { state }
    }
}

impl eframe::App for LightCurveApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        egui::TopBottomPanel::bottom("summary_panel")
            .resizable(false)
            .show(ctx, |ui| {
                panels::summary_panel(ui, &self.state);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            plot::light_curve_plot(ui, &self.state);
        });
    }
}

/// Open a window showing the curve and block until it is closed.
pub fn show(state: ViewState) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 600.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };
    let title = state.plot.title.clone();

    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(LightCurveApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("display window failed: {e}"))
}
