mod app;
mod cli;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::WaveDashApp;
use clap::Parser;
use eframe::egui;

use crate::cli::Args;
use crate::config::Config;
use crate::state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(granularity) = args.granularity {
        config.chart.granularity = granularity;
    }
    log::info!("Chart buckets by {}", config.chart.granularity);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let mut state = AppState::new(config);
    if let Some(path) = &args.data {
        state.load_file(path);
    }

    eframe::run_native(
        "Wave Dash – Transaction Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(WaveDashApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard window: {e}"))
}
