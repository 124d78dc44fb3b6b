use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use super::error::DatasetError;

/// Columns every dataset must carry.
pub const TRANSACTION_ID: &str = "transaction_id";
pub const USER_ID: &str = "user_id";
pub const AMOUNT: &str = "amount";
pub const DATE: &str = "date";

pub const REQUIRED_COLUMNS: [&str; 4] = [TRANSACTION_ID, USER_ID, AMOUNT, DATE];

// ---------------------------------------------------------------------------
// CellValue – a single cell of a loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the common DataFrame dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDateTime),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) if d.time() == NaiveTime::MIN => write!(f, "{}", d.date()),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the cell as an `f64`; numeric text is accepted.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Interpret the cell as a timestamp; date text is accepted.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::Date(d) => Some(*d),
            CellValue::Text(s) => parse_datetime(s),
            _ => None,
        }
    }

    /// The text of a `Text` cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Infer a typed cell from raw text (CSV fields, JSON strings).
    pub fn infer(s: &str) -> CellValue {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        if let Some(d) = parse_datetime(s) {
            return CellValue::Date(d);
        }
        CellValue::Text(s.to_string())
    }
}

/// Parse the date/datetime spellings found in exported transaction tables.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.and_time(NaiveTime::MIN));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc())
}

// ---------------------------------------------------------------------------
// RawTable – what a loader hands over before validation
// ---------------------------------------------------------------------------

/// Untyped table: column names plus rows of cells in the same order.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

// ---------------------------------------------------------------------------
// Transaction – one row of the dataset
// ---------------------------------------------------------------------------

/// A single transaction (one row of the source table).
#[derive(Debug, Clone)]
pub struct Transaction {
    pub transaction_id: String,
    pub user_id: String,
    pub amount: f64,
    pub date: NaiveDateTime,
    /// Every non-required column: column_name → value.
    pub attributes: BTreeMap<String, CellValue>,
}

/// Semantic type of a non-required column, inferred from its non-null cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Only text labels: eligible as a filter.
    Categorical,
    Numeric,
    Temporal,
    Boolean,
    /// Mixed cell types.
    Mixed,
    /// No non-null cells.
    Empty,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The validated, immutable dataset.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub transactions: Vec<Transaction>,
    /// Non-required column names, in source order.
    pub column_names: Vec<String>,
    pub column_kinds: BTreeMap<String, ColumnKind>,
}

impl Dataset {
    /// Validate a raw table: required columns must exist and their cells
    /// must carry the expected types.
    pub fn from_table(table: RawTable) -> Result<Self, DatasetError> {
        let mut seen = HashSet::new();
        for col in &table.columns {
            if !seen.insert(col.as_str()) {
                return Err(DatasetError::DuplicateColumn(col.clone()));
            }
        }

        let position = |name: &str| {
            table
                .columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
        };
        let tx_idx = position(TRANSACTION_ID)?;
        let user_idx = position(USER_ID)?;
        let amount_idx = position(AMOUNT)?;
        let date_idx = position(DATE)?;

        let attribute_cols: Vec<(usize, String)> = table
            .columns
            .iter()
            .enumerate()
            .filter(|(_, name)| !REQUIRED_COLUMNS.contains(&name.as_str()))
            .map(|(i, name)| (i, name.clone()))
            .collect();

        let mut transactions = Vec::with_capacity(table.rows.len());
        for (row_no, row) in table.rows.into_iter().enumerate() {
            let cell = |idx: usize| row.get(idx).unwrap_or(&CellValue::Null);
            let invalid = |column: &str, reason: String| DatasetError::InvalidValue {
                row: row_no,
                column: column.to_string(),
                reason,
            };

            let transaction_id = identifier(cell(tx_idx))
                .ok_or_else(|| invalid(TRANSACTION_ID, "missing identifier".into()))?;
            let user_id = identifier(cell(user_idx))
                .ok_or_else(|| invalid(USER_ID, "missing identifier".into()))?;
            let amount = cell(amount_idx)
                .as_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| invalid(AMOUNT, format!("'{}' is not a number", cell(amount_idx))))?;
            let date = cell(date_idx)
                .as_datetime()
                .ok_or_else(|| invalid(DATE, format!("'{}' is not a date", cell(date_idx))))?;

            let attributes = attribute_cols
                .iter()
                .map(|(idx, name)| (name.clone(), cell(*idx).clone()))
                .collect();

            transactions.push(Transaction {
                transaction_id,
                user_id,
                amount,
                date,
                attributes,
            });
        }

        let column_names: Vec<String> = attribute_cols.into_iter().map(|(_, n)| n).collect();
        let column_kinds = column_names
            .iter()
            .map(|name| (name.clone(), infer_kind(&transactions, name)))
            .collect();

        Ok(Dataset {
            transactions,
            column_names,
            column_kinds,
        })
    }

    /// Number of transactions.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn kind_of(&self, column: &str) -> Option<ColumnKind> {
        self.column_kinds.get(column).copied()
    }
}

/// Identifiers arrive as text or integers; both become text.
fn identifier(value: &CellValue) -> Option<String> {
    match value {
        CellValue::Text(s) if !s.is_empty() => Some(s.clone()),
        CellValue::Integer(i) => Some(i.to_string()),
        CellValue::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(format!("{f:.0}")),
        _ => None,
    }
}

fn infer_kind(transactions: &[Transaction], column: &str) -> ColumnKind {
    let mut kind: Option<ColumnKind> = None;
    for tx in transactions {
        let cell_kind = match tx.attributes.get(column) {
            None | Some(CellValue::Null) => continue,
            Some(CellValue::Text(_)) => ColumnKind::Categorical,
            Some(CellValue::Integer(_)) | Some(CellValue::Float(_)) => ColumnKind::Numeric,
            Some(CellValue::Bool(_)) => ColumnKind::Boolean,
            Some(CellValue::Date(_)) => ColumnKind::Temporal,
        };
        match kind {
            None => kind = Some(cell_kind),
            Some(k) if k != cell_kind => return ColumnKind::Mixed,
            Some(_) => {}
        }
    }
    kind.unwrap_or(ColumnKind::Empty)
}
