use std::path::Path;
use std::sync::Arc;

use crate::color::Accents;
use crate::config::Config;
use crate::data::aggregate::{Dashboard, Granularity, Snapshot};
use crate::data::filter::Selection;
use crate::data::loader::load_file;
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state of one session, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// Loaded dataset with its catalog (None until a file is loaded).
    pub dashboard: Option<Dashboard>,

    /// Current one-value-per-column choice.
    pub selection: Selection,

    /// Result of the last successful recomputation.
    pub snapshot: Option<Snapshot>,

    /// Accent colours for indicators and chart.
    pub accents: Accents,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            dashboard: None,
            selection: Selection::default(),
            snapshot: None,
            accents: Accents::default(),
            status_message: None,
        }
    }

    /// Load a file, replacing the current dataset on success.
    ///
    /// Failures are logged and kept in `status_message`; the previous
    /// dataset stays on screen.
    pub fn load_file(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} transactions from {} with columns {:?}",
                    dataset.len(),
                    path.display(),
                    dataset.column_names
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset: build the catalog, reset the
    /// selection to its defaults and compute the first snapshot.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        let dashboard = Dashboard::new(
            Arc::new(dataset),
            &self.config.catalog,
            self.config.chart.granularity,
        );
        let selection = Selection::default_for(dashboard.catalog());

        self.dashboard = Some(dashboard);
        self.snapshot = None;
        self.status_message = None;
        self.apply(selection);
    }

    /// Choose `value` for `column`; the whole selection is replaced.
    pub fn select(&mut self, column: &str, value: &str) {
        let next = self.selection.with(column, value);
        self.apply(next);
    }

    /// Switch the chart bucket size and recompute.
    pub fn set_granularity(&mut self, granularity: Granularity) {
        let Some(dashboard) = &mut self.dashboard else {
            self.config.chart.granularity = granularity;
            return;
        };
        if dashboard.granularity() == granularity {
            return;
        }
        dashboard.set_granularity(granularity);
        self.config.chart.granularity = granularity;
        self.apply(self.selection.clone());
    }

    /// Recompute for `selection`. On failure the last good snapshot and
    /// selection stay in place and the error is reported.
    fn apply(&mut self, selection: Selection) {
        let Some(dashboard) = &self.dashboard else {
            return;
        };
        match dashboard.compute(&selection) {
            Ok(snapshot) => {
                self.selection = selection;
                self.snapshot = Some(snapshot);
                self.status_message = None;
            }
            Err(e) => {
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Rows in the dataset and rows passing the current selection.
    pub fn row_counts(&self) -> Option<(usize, usize)> {
        let total = self.dashboard.as_ref()?.dataset().len();
        let visible = self.snapshot.as_ref().map_or(0, |s| s.row_count);
        Some((total, visible))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, RawTable};

    fn scenario() -> Dataset {
        let rows: [[&str; 6]; 3] = [
            ["1", "A", "10", "2024-01-01", "east", "web"],
            ["2", "B", "20", "2024-01-01", "west", "web"],
            ["3", "A", "5", "2024-01-02", "east", "store"],
        ];
        Dataset::from_table(RawTable {
            columns: ["transaction_id", "user_id", "amount", "date", "region", "channel"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| CellValue::infer(c)).collect())
                .collect(),
        })
        .unwrap()
    }

    #[test]
    fn set_dataset_applies_default_selection() {
        let mut state = AppState::default();
        state.set_dataset(scenario());

        assert_eq!(state.selection.get("region"), Some("east"));
        assert_eq!(state.selection.get("channel"), Some("store"));
        let snap = state.snapshot.as_ref().unwrap();
        assert_eq!(snap.row_count, 1);
        assert_eq!(snap.indicators.total_revenue, 5.0);
        assert_eq!(state.row_counts(), Some((3, 1)));
    }

    #[test]
    fn selecting_a_value_recomputes() {
        let mut state = AppState::default();
        state.set_dataset(scenario());
        state.select("channel", "web");

        assert_eq!(state.selection.get("channel"), Some("web"));
        let snap = state.snapshot.as_ref().unwrap();
        assert_eq!(snap.indicators.total_transactions, 1);
        assert_eq!(snap.indicators.total_revenue, 10.0);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn invalid_selection_keeps_last_good_snapshot() {
        let mut state = AppState::default();
        state.set_dataset(scenario());
        let before = state.snapshot.clone();

        state.select("region", "north");

        assert_eq!(state.snapshot, before);
        assert_eq!(state.selection.get("region"), Some("east"));
        assert!(state.status_message.as_deref().unwrap().contains("north"));
    }

    #[test]
    fn granularity_change_rebuckets_the_series() {
        let mut state = AppState::default();
        state.set_dataset(scenario());
        state.select("channel", "web");
        state.select("region", "west");
        state.set_granularity(Granularity::Month);

        let series = &state.snapshot.as_ref().unwrap().series;
        assert_eq!(series.granularity, Granularity::Month);
        assert_eq!(series.points.len(), 1);
        assert_eq!(state.config.chart.granularity, Granularity::Month);
    }

    #[test]
    fn load_failure_is_reported_not_fatal() {
        let mut state = AppState::default();
        state.load_file(Path::new("/definitely/not/here.csv"));
        assert!(state.dashboard.is_none());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error:"));
    }
}
