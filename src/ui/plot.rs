use chrono::{Datelike, NaiveDate};
use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Plot};

use crate::data::aggregate::TimeSeries;
use crate::state::AppState;

/// Height reserved under the chart for the bucket table.
const TABLE_HEIGHT: f32 = 160.0;

// ---------------------------------------------------------------------------
// Transaction volume chart (central panel)
// ---------------------------------------------------------------------------

/// Render the volume bar chart and its bucket table.
pub fn volume_chart(ui: &mut Ui, state: &AppState) {
    let Some(snapshot) = &state.snapshot else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view transactions  (File → Open…)");
        });
        return;
    };

    ui.heading(&state.config.chart.title);

    let series = &snapshot.series;
    if series.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No transactions match the current filters");
        });
        return;
    }

    let granularity = series.granularity;
    let bars: Vec<Bar> = series
        .points
        .iter()
        .map(|p| {
            Bar::new(day_number(p.bucket), p.total)
                .width(granularity.approx_days() * 0.8)
                .name(format!("{}: {:.2}", granularity.label(p.bucket), p.total))
        })
        .collect();

    let chart = BarChart::new(bars)
        .color(state.accents.bars)
        .name("amount");

    Plot::new("volume_chart")
        .height((ui.available_height() - TABLE_HEIGHT).max(200.0))
        .x_axis_label("date")
        .y_axis_label("amount")
        .x_axis_formatter(move |mark, _range| {
            from_day_number(mark.value)
                .map(|d| granularity.label(d))
                .unwrap_or_default()
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });

    ui.separator();
    bucket_table(ui, series);
}

fn bucket_table(ui: &mut Ui, series: &TimeSeries) {
    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(TABLE_HEIGHT)
        .column(Column::auto().at_least(120.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong(format!("date ({})", series.granularity));
            });
            header.col(|ui| {
                ui.strong("amount");
            });
        })
        .body(|mut body| {
            for point in &series.points {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(series.granularity.label(point.bucket));
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.2}", point.total));
                    });
                });
            }
        });
}

/// Plot x coordinate of a date: days since 0001-01-01.
fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

fn from_day_number(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() || x.abs() > f64::from(i32::MAX) {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}
