mod app;
mod state;
mod ui;

use anyhow::Context;
use app::FastFoodApp;
use eframe::egui;
use fast_food_filter::Config;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::load().context("loading configuration")?;
    log::debug!("Using configuration {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Fast Food Nutrition Calculator",
        options,
        Box::new(|_cc| Ok(Box::new(FastFoodApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("running the UI: {e}"))
}
