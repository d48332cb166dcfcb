use eframe::egui::{self, Color32, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Results table (central panel)
// ---------------------------------------------------------------------------

/// Render the filtered menu items, or say that nothing matched.
pub fn results_table(ui: &mut Ui, state: &AppState) {
    let Some(selection) = state.visible_selection() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to browse menu items  (File → Open…)");
        });
        return;
    };

    ui.heading("Fast Food Nutrition Calculator");
    ui.label(format!(
        "Found {} items based on your preferences.",
        selection.len()
    ));
    ui.separator();

    if selection.is_empty() {
        ui.colored_label(
            Color32::from_rgb(230, 160, 0),
            "No items match your preferences. Try adjusting the filters.",
        );
        return;
    }

    let table = selection.table();
    let columns = table.columns();
    let rows = table.rows();
    let indices = selection.indices();
    let row_height = ui.text_style_height(&egui::TextStyle::Body);

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(60.0), columns.len())
        .header(row_height + 4.0, |mut header| {
            for name in columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(name.as_str());
                });
            }
        })
        .body(|body| {
            body.rows(row_height, indices.len(), |mut row| {
                let item = &rows[indices[row.index()]];
                for cell in &item.cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell.to_string());
                    });
                }
            });
        });
}
