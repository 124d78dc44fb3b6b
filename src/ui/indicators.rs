use eframe::egui::{self, RichText, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Indicator card
// ---------------------------------------------------------------------------

/// Render the four indicator lines of the current snapshot.
pub fn indicator_card(ui: &mut Ui, state: &AppState) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());

        let Some(snapshot) = &state.snapshot else {
            ui.label("No indicators yet.");
            return;
        };

        ui.horizontal_wrapped(|ui: &mut Ui| {
            for (i, line) in snapshot.indicators.display_lines().iter().enumerate() {
                ui.label(
                    RichText::new(line)
                        .heading()
                        .color(state.accents.indicator(i)),
                );
                ui.add_space(24.0);
            }
        });
    });
}
