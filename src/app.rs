use eframe::egui;
use fast_food_filter::Config;

use crate::state::AppState;
use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FastFoodApp {
    pub state: AppState,
}

impl FastFoodApp {
    /// Build the app and load the configured dataset once, if it exists.
    pub fn new(config: Config) -> Self {
        let mut state = AppState::new(config);
        let path = state.config.data_path.clone();
        if path.exists() {
            state.open(&path);
        } else {
            log::info!("{} not found, waiting for File → Open", path.display());
        }
        Self { state }
    }
}

impl eframe::App for FastFoodApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: preferences ----
        egui::SidePanel::left("preferences_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: results ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::results_table(ui, &self.state);
        });
    }
}
