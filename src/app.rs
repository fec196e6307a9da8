use eframe::egui::{self, ScrollArea};

use crate::state::AppState;
use crate::ui::{charts, panels, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RustyLensApp {
    pub state: AppState,
}

impl eframe::App for RustyLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: column selectors ----
        egui::SidePanel::left("selection_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: overview, tables, charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(analysis) = &self.state.analysis else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a CSV or spreadsheet to profile it  (File → Open…)");
                });
                return;
            };

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    tables::overview(ui, analysis);
                    ui.separator();
                    tables::summary(ui, &analysis.summary);
                    ui.separator();
                    tables::missing(ui, &analysis.missing);
                    ui.separator();
                    charts::charts(ui, analysis, self.state.series_colors.as_ref());
                });
        });
    }
}
