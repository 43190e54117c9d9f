use eframe::egui::{self, ScrollArea};

use crate::color::RegionColors;
use crate::ui::{panels, plot};
use luas_tanaman::state::AppState;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
    colors: RegionColors,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        let regions = state
            .context
            .domain
            .as_ref()
            .map(|d| d.regions.clone())
            .unwrap_or_default();
        Self {
            colors: RegionColors::new(&regions),
            state,
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title ----
        egui::TopBottomPanel::top("title_bar").show(ctx, |ui| {
            panels::title_bar(ui);
        });

        // ---- Left side panel: dataset information ----
        egui::SidePanel::left("dataset_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state);
            });

        // ---- Central panel: inputs, prediction, charts, raw data ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    panels::prediction_panel(ui, &mut self.state);
                    ui.separator();
                    plot::charts(ui, &self.state.context.views, &self.colors);
                    ui.separator();
                    panels::data_preview(ui, &self.state.context.dataset);
                });
        });
    }
}
