use eframe::egui;

use crate::state::AppState;
use crate::ui::{indicators, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct WaveDashApp {
    pub state: AppState,
}

impl WaveDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for WaveDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: indicators and chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            indicators::indicator_card(ui, &self.state);
            ui.add_space(8.0);
            plot::volume_chart(ui, &self.state);
        });
    }
}
