use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::CatalogConfig;

use super::catalog::{build_catalog, FilterCatalog};
use super::error::SelectionError;
use super::filter::{filtered_indices, Selection};
use super::model::{Dataset, Transaction};

// ---------------------------------------------------------------------------
// Bucket granularity for the time series
// ---------------------------------------------------------------------------

/// Calendar unit the time series groups transactions by.
/// Time of day is always truncated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    /// ISO week, keyed by its Monday.
    Week,
    /// Keyed by the first of the month.
    Month,
    /// Keyed by 1 January.
    Year,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::Day,
        Granularity::Week,
        Granularity::Month,
        Granularity::Year,
    ];

    /// First day of the bucket containing `at`.
    pub fn bucket(self, at: NaiveDateTime) -> NaiveDate {
        let date = at.date();
        match self {
            Granularity::Day => date,
            Granularity::Week => {
                date - chrono::Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            Granularity::Month => date.with_day(1).unwrap_or(date),
            Granularity::Year => date.with_ordinal(1).unwrap_or(date),
        }
    }

    /// Nominal bucket width in days, used for bar widths.
    pub fn approx_days(self) -> f64 {
        match self {
            Granularity::Day => 1.0,
            Granularity::Week => 7.0,
            Granularity::Month => 30.0,
            Granularity::Year => 365.0,
        }
    }

    /// How a bucket key is printed for this granularity.
    pub fn label(self, bucket: NaiveDate) -> String {
        match self {
            Granularity::Day | Granularity::Week => bucket.format("%Y-%m-%d").to_string(),
            Granularity::Month => bucket.format("%Y-%m").to_string(),
            Granularity::Year => bucket.format("%Y").to_string(),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Day => write!(f, "day"),
            Granularity::Week => write!(f, "week"),
            Granularity::Month => write!(f, "month"),
            Granularity::Year => write!(f, "year"),
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            "year" => Ok(Granularity::Year),
            other => Err(format!("unknown granularity '{other}' (day, week, month, year)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// The four headline figures of the filtered subset.
#[derive(Debug, Clone, PartialEq)]
pub struct Indicators {
    /// Distinct `transaction_id` values.
    pub total_transactions: usize,
    /// Sum of `amount` over every row.
    pub total_revenue: f64,
    /// Distinct `user_id` values.
    pub unique_users: usize,
    /// Mean `amount`; `None` when no row matched.
    pub average_transaction_value: Option<f64>,
}

impl Indicators {
    /// `"<Label>: <value>"` strings in display order.
    pub fn display_lines(&self) -> [String; 4] {
        let average = match self.average_transaction_value {
            Some(avg) => format!("{avg:.2}"),
            None => "no data".to_string(),
        };
        [
            format!("Total Transactions: {}", self.total_transactions),
            format!("Total Revenue: {:.2}", self.total_revenue),
            format!("Unique Users: {}", self.unique_users),
            format!("Average Transaction Value: {average}"),
        ]
    }
}

/// Compute the indicators over the given rows.
pub fn indicators<'a, I>(rows: I) -> Indicators
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut transactions = HashSet::new();
    let mut users = HashSet::new();
    let mut revenue = 0.0;
    let mut count = 0usize;

    for tx in rows {
        transactions.insert(tx.transaction_id.as_str());
        users.insert(tx.user_id.as_str());
        revenue += tx.amount;
        count += 1;
    }

    Indicators {
        total_transactions: transactions.len(),
        total_revenue: revenue,
        unique_users: users.len(),
        average_transaction_value: (count > 0).then(|| revenue / count as f64),
    }
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// Summed amount of one date bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub bucket: NaiveDate,
    pub total: f64,
}

/// Sparse, ascending series of bucket totals.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub granularity: Granularity,
    pub points: Vec<SeriesPoint>,
}

impl TimeSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Group rows by date bucket and sum their amounts.
pub fn time_series<'a, I>(rows: I, granularity: Granularity) -> TimeSeries
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for tx in rows {
        *buckets.entry(granularity.bucket(tx.date)).or_default() += tx.amount;
    }
    TimeSeries {
        granularity,
        points: buckets
            .into_iter()
            .map(|(bucket, total)| SeriesPoint { bucket, total })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Recomputation
// ---------------------------------------------------------------------------

/// Everything the display needs after one selection change.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub row_count: usize,
    pub indicators: Indicators,
    pub series: TimeSeries,
}

/// Filter `dataset` by `selection` and aggregate the result.
///
/// The selection is not checked against any catalog: a value nobody
/// recorded simply matches no row.
pub fn compute(dataset: &Dataset, selection: &Selection, granularity: Granularity) -> Snapshot {
    let rows: Vec<&Transaction> = filtered_indices(dataset, selection)
        .into_iter()
        .map(|i| &dataset.transactions[i])
        .collect();
    Snapshot {
        row_count: rows.len(),
        indicators: indicators(rows.iter().copied()),
        series: time_series(rows.iter().copied(), granularity),
    }
}

/// A loaded dataset with its filter catalog, ready to answer selections.
///
/// Cloning is cheap: the dataset is shared.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Arc<Dataset>,
    catalog: FilterCatalog,
    granularity: Granularity,
}

impl Dashboard {
    pub fn new(
        dataset: Arc<Dataset>,
        catalog_config: &CatalogConfig,
        granularity: Granularity,
    ) -> Self {
        let catalog = build_catalog(&dataset, catalog_config);
        Self {
            dataset,
            catalog,
            granularity,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn catalog(&self) -> &FilterCatalog {
        &self.catalog
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
    }

    /// Validate `selection` against the catalog, then recompute.
    pub fn compute(&self, selection: &Selection) -> Result<Snapshot, SelectionError> {
        if let Err(e) = selection.validate(&self.catalog) {
            log::warn!("Rejected selection {selection:?}: {e}");
            return Err(e);
        }
        let snapshot = compute(&self.dataset, selection, self.granularity);
        log::debug!(
            "Recomputed {} of {} rows for {selection:?}",
            snapshot.row_count,
            self.dataset.len()
        );
        Ok(snapshot)
    }
}
