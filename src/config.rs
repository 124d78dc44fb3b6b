//! Configuration file handling.
//!
//! Settings are read from `wave-dash.toml` in the working directory, or from
//! the file given with `--config`. Every field has a default.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::aggregate::Granularity;

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "wave-dash.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Filter catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Time-series chart settings.
    #[serde(default)]
    pub chart: ChartConfig,

    /// Initial window size.
    #[serde(default)]
    pub window: WindowConfig,
}

/// How catalog values are ordered inside each filter control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueOrder {
    /// Lexical order, reproducible across loads.
    #[default]
    Sorted,
    /// Order of first appearance in the data.
    FirstSeen,
}

/// Filter catalog settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub value_order: ValueOrder,

    /// Text columns that are never offered as filters.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Time-series chart settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Calendar unit the chart buckets dates by.
    #[serde(default)]
    pub granularity: Granularity,

    #[serde(default = "default_chart_title")]
    pub title: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            granularity: Granularity::default(),
            title: default_chart_title(),
        }
    }
}

fn default_chart_title() -> String {
    "Transaction Volume Over Time".to_string()
}

/// Initial window size in logical points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: f32,

    #[serde(default = "default_height")]
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_width() -> f32 {
    1200.0
}

fn default_height() -> f32 {
    800.0
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Resolve the configuration for this run.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            log::info!("Using config file {}", path.display());
            return Self::from_file(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            log::info!("Using config file {}", default_path.display());
            Self::from_file(default_path)
        } else {
            log::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.catalog.value_order, ValueOrder::Sorted);
        assert!(config.catalog.exclude.is_empty());
        assert_eq!(config.chart.granularity, Granularity::Day);
        assert_eq!(config.chart.title, "Transaction Volume Over Time");
        assert_eq!(config.window.width, 1200.0);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
[catalog]
value_order = "first_seen"
exclude = ["store_id"]

[chart]
granularity = "month"
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.catalog.value_order, ValueOrder::FirstSeen);
        assert_eq!(config.catalog.exclude, vec!["store_id"]);
        assert_eq!(config.chart.granularity, Granularity::Month);
        assert_eq!(config.chart.title, "Transaction Volume Over Time");
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn test_example_file_matches_defaults() {
        let config: Config = toml::from_str(include_str!("../wave-dash.example.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unknown_granularity_is_rejected() {
        let result: std::result::Result<Config, _> =
            toml::from_str("[chart]\ngranularity = \"hour\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[window]\nwidth = 900.0").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.window.width, 900.0);
        assert_eq!(config.window.height, 800.0);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());
    }
}
