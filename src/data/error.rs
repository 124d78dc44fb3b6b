use thiserror::Error;

// ---------------------------------------------------------------------------
// Typed failures raised by the data core
// ---------------------------------------------------------------------------

/// Raised while turning a [`RawTable`](super::model::RawTable) into a
/// [`Dataset`](super::model::Dataset). Always surfaces before the first
/// recomputation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatasetError {
    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}, column '{column}': {reason}")]
    InvalidValue {
        row: usize,
        column: String,
        reason: String,
    },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
}

/// Raised by [`Dashboard::compute`](super::aggregate::Dashboard::compute)
/// when a selection does not match the filter catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("'{0}' is not a filterable column")]
    UnknownColumn(String),

    #[error("'{value}' is not a recorded value of column '{column}'")]
    UnknownValue { column: String, value: String },
}
