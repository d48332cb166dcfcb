use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};
use fast_food_filter::{DietaryCategory, NumericRange};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – preference widgets
// ---------------------------------------------------------------------------

/// Render the left preferences panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Set Your Preferences");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // Clone so we can mutate state inside the loop.
    let companies = state.companies.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            company_checklist(ui, state, &companies);
            ui.separator();
            range_sliders(ui, state);
            ui.separator();
            dietary_checkboxes(ui, state);
        });
}

fn company_checklist(ui: &mut Ui, state: &mut AppState, companies: &[String]) {
    let n_selected = companies
        .iter()
        .filter(|c| state.is_company_selected(c))
        .count();
    let header_text = format!("Select Companies  ({n_selected}/{})", companies.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("companies")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_companies();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_companies();
                }
            });

            for company in companies {
                let mut checked = state.is_company_selected(company);
                if ui.checkbox(&mut checked, company.as_str()).changed() {
                    state.set_company(company, checked);
                }
            }
        });
}

fn range_sliders(ui: &mut Ui, state: &mut AppState) {
    let calorie_bounds = state.calorie_bounds;
    let protein_bounds = state.protein_bounds;
    let Some(params) = state.params.as_mut() else {
        return;
    };

    ui.strong("Calories");
    let calories_changed = range_slider(ui, &mut params.calories, calorie_bounds);
    ui.strong("Protein (g)");
    let protein_changed = range_slider(ui, &mut params.protein, protein_bounds);

    if calories_changed || protein_changed {
        state.refilter();
    }
}

/// Two sliders over the same span. Crossing them is allowed and selects nothing.
fn range_slider(ui: &mut Ui, range: &mut NumericRange, bounds: NumericRange) -> bool {
    let span = bounds.min..=bounds.max;
    let min = ui.add(
        Slider::new(&mut range.min, span.clone())
            .step_by(1.0)
            .text("min"),
    );
    let max = ui.add(Slider::new(&mut range.max, span).step_by(1.0).text("max"));
    min.changed() || max.changed()
}

fn dietary_checkboxes(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Dietary preferences");
    for category in DietaryCategory::ALL {
        let mut on = state
            .params
            .as_ref()
            .is_some_and(|p| p.dietary.is_enabled(category));
        if ui.checkbox(&mut on, category.label()).changed() {
            state.set_dietary(category, on);
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.dataset.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export CSV…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} items loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open nutrition data")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download your results")
        .set_file_name(state.config.export_file_name.as_str())
        .add_filter("CSV", &["csv"])
        .save_file();

    let Some(path) = file else {
        return;
    };
    match state.export_to(&path) {
        Ok(()) => state.status_message = None,
        Err(e) => {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
