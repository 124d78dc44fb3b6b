use std::collections::HashSet;

use crate::config::{CatalogConfig, ValueOrder};

use super::model::{ColumnKind, Dataset};

// ---------------------------------------------------------------------------
// Filter catalog: the options offered by each filter control
// ---------------------------------------------------------------------------

/// Distinct values observed in one categorical column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub column: String,
    pub values: Vec<String>,
}

/// One entry per categorical column, in dataset column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCatalog {
    entries: Vec<CatalogEntry>,
}

impl FilterCatalog {
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Recorded values of `column`, if it is a filter column.
    pub fn values(&self, column: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.column == column)
            .map(|e| e.values.as_slice())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.column.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scan the dataset for categorical columns and record their distinct values.
///
/// Only columns whose every non-null cell is text qualify; required columns
/// never reach this point since the dataset keeps them out of its attributes.
/// Null cells are not offered as options.
pub fn build_catalog(dataset: &Dataset, config: &CatalogConfig) -> FilterCatalog {
    let entries: Vec<CatalogEntry> = dataset
        .column_names
        .iter()
        .filter(|col| dataset.kind_of(col) == Some(ColumnKind::Categorical))
        .filter(|col| !config.exclude.iter().any(|ex| ex == *col))
        .map(|col| {
            let mut seen = HashSet::new();
            let mut values: Vec<String> = dataset
                .transactions
                .iter()
                .filter_map(|tx| tx.attributes.get(col).and_then(|v| v.as_text()))
                .filter(|v| seen.insert(*v))
                .map(str::to_string)
                .collect();
            if config.value_order == ValueOrder::Sorted {
                values.sort();
            }
            CatalogEntry {
                column: col.clone(),
                values,
            }
        })
        .collect();

    log::debug!(
        "Filter catalog: {:?}",
        entries
            .iter()
            .map(|e| (e.column.as_str(), e.values.len()))
            .collect::<Vec<_>>()
    );

    FilterCatalog { entries }
}
