use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::aggregate::Granularity;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – one single-choice control per filter column
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dashboard) = &state.dashboard else {
        ui.label("No dataset loaded.");
        return;
    };

    let catalog = dashboard.catalog();
    if catalog.is_empty() {
        ui.label("No categorical columns to filter by.");
        return;
    }

    // Applied after the loop so the catalog borrow ends first.
    let mut change: Option<(String, String)> = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for entry in catalog.entries() {
                let current = state.selection.get(&entry.column).unwrap_or_default();

                ui.label(RichText::new(format!("Filter by {}", entry.column)).strong());
                egui::ComboBox::from_id_salt(&entry.column)
                    .selected_text(current)
                    .width(ui.available_width())
                    .show_ui(ui, |ui: &mut Ui| {
                        for value in &entry.values {
                            if ui.selectable_label(value == current, value).clicked()
                                && value != current
                            {
                                change = Some((entry.column.clone(), value.clone()));
                            }
                        }
                    });
                ui.add_space(8.0);
            }
        });

    if let Some((column, value)) = change {
        state.select(&column, &value);
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
        });

        ui.separator();
        ui.strong("Dashboard");
        ui.separator();

        if let Some((total, visible)) = state.row_counts() {
            ui.label(format!("{total} transactions loaded, {visible} matching"));
            ui.separator();
        }

        let current = state.config.chart.granularity;
        let mut chosen = current;
        egui::ComboBox::from_id_salt("granularity")
            .selected_text(format!("Bucket: {current}"))
            .show_ui(ui, |ui: &mut Ui| {
                for g in Granularity::ALL {
                    ui.selectable_value(&mut chosen, g, g.to_string());
                }
            });
        if chosen != current {
            state.set_granularity(chosen);
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open transaction data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_file(&path);
    }
}
