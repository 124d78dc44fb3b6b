//! Command-line interface argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::data::aggregate::Granularity;

/// Wave Dash - transaction analytics dashboard
///
/// Loads a transaction table (CSV, JSON records or Parquet) with
/// `transaction_id`, `user_id`, `amount` and `date` columns and shows
/// indicators and a volume chart filtered by every text column.
///
/// Examples:
///   wave-dash wave_data.csv
///   wave-dash sample_transactions.parquet --granularity week
///   wave-dash --config ./dash.toml
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Dataset to open at startup (otherwise use File → Open…)
    #[arg(value_name = "DATA")]
    pub data: Option<PathBuf>,

    /// Configuration file (defaults to ./wave-dash.toml when present)
    #[arg(short, long, value_name = "FILE", env = "WAVE_DASH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Chart bucket size: day, week, month or year
    ///
    /// Overrides `chart.granularity` from the configuration file.
    #[arg(short, long, value_name = "UNIT")]
    pub granularity: Option<Granularity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positional_data_path() {
        let args = Args::try_parse_from(["wave-dash", "wave_data.csv"]).unwrap();
        assert_eq!(args.data, Some(PathBuf::from("wave_data.csv")));
        assert!(args.granularity.is_none());
    }

    #[test]
    fn test_parse_granularity() {
        let args = Args::try_parse_from(["wave-dash", "--granularity", "week"]).unwrap();
        assert_eq!(args.granularity, Some(Granularity::Week));
        assert!(args.data.is_none());
    }

    #[test]
    fn test_reject_unknown_granularity() {
        assert!(Args::try_parse_from(["wave-dash", "-g", "hour"]).is_err());
    }
}
