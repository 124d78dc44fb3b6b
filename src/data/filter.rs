use std::collections::BTreeMap;

use super::catalog::FilterCatalog;
use super::error::SelectionError;
use super::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Selection: which single value is chosen per filter column
// ---------------------------------------------------------------------------

/// Per-column choice: column_name → selected value.
/// An empty selection filters nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(BTreeMap<String, String>);

impl Selection {
    /// The initial selection: first recorded value of every catalog entry.
    pub fn default_for(catalog: &FilterCatalog) -> Self {
        Selection(
            catalog
                .entries()
                .iter()
                .filter_map(|e| e.values.first().map(|v| (e.column.clone(), v.clone())))
                .collect(),
        )
    }

    /// Copy of this selection with `column` set to `value`.
    pub fn with(&self, column: &str, value: &str) -> Self {
        let mut next = self.clone();
        next.0.insert(column.to_string(), value.to_string());
        next
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check every pair against the catalog.
    pub fn validate(&self, catalog: &FilterCatalog) -> Result<(), SelectionError> {
        for (column, value) in self.iter() {
            let values = catalog
                .values(column)
                .ok_or_else(|| SelectionError::UnknownColumn(column.to_string()))?;
            if !values.iter().any(|v| v == value) {
                return Err(SelectionError::UnknownValue {
                    column: column.to_string(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Selection {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Selection(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Return indices of transactions matching every selected value.
///
/// Matching is exact text equality. A null or non-text cell never matches.
/// Indices come back in dataset order.
pub fn filtered_indices(dataset: &Dataset, selection: &Selection) -> Vec<usize> {
    dataset
        .transactions
        .iter()
        .enumerate()
        .filter(|(_, tx)| {
            selection.iter().all(|(col, selected)| {
                matches!(tx.attributes.get(col), Some(CellValue::Text(v)) if v == selected)
            })
        })
        .map(|(i, _)| i)
        .collect()
}
