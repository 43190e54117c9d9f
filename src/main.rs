mod app;
mod color;
mod ui;

use std::path::Path;

use app::DashboardApp;
use eframe::egui;
use luas_tanaman::config::{DashboardConfig, CONFIG_FILE};
use luas_tanaman::state::{AppState, DashboardContext};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE))?;

    // Without data and model there is nothing to render.
    let context = DashboardContext::initialize(&config).inspect_err(|e| {
        log::error!("Startup failed: {e:#}");
    })?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        ui::panels::TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(AppState::new(context))))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
