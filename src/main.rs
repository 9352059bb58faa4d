mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use app::RustyDashApp;
use eframe::egui;
use rusty_dash::config::DashboardConfig;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::discover().context("loading dashboard config")?;
    // A path on the command line wins over the configured source.
    let source = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.source.clone());
    let title = config.title.clone();

    let mut state = AppState::new(config);
    if let Some(path) = source {
        ui::panels::open_path(&mut state, &path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(RustyDashApp::new(state)))),
    )
    .map_err(|e| anyhow!("running dashboard: {e}"))
}
