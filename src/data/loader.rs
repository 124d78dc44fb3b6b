use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Float32Type, Float64Type, Int32Type, Int64Type, TimeUnit,
    TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType,
};
use arrow::util::display::array_value_to_string;
use chrono::NaiveTime;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{parse_datetime, CellValue, Dataset, RawTable};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a transaction dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – one column per field, any row-group layout
/// * `.json`    – `[{ "transaction_id": ..., "amount": ..., ... }, ...]`
/// * `.csv`     – header row, one transaction per line
///
/// Every format must provide `transaction_id`, `user_id`, `amount` and
/// `date`; other columns become filterable attributes.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "parquet" | "pq" => read_parquet(path)?,
        "json" => read_json(path)?,
        "csv" => read_csv(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    Dataset::from_table(table).with_context(|| format!("validating {}", path.display()))
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "transaction_id": 1, "user_id": "A", "amount": 10.0,
///     "date": "2024-01-01", "region": "east" },
///   ...
/// ]
/// ```
///
/// Columns are ordered by first appearance; absent keys read as null.
fn read_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok(RawTable { columns, rows })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => match parse_datetime(s) {
            Some(d) => CellValue::Date(d),
            None => CellValue::Text(s.clone()),
        },
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names.
///
/// Types are inferred per column: when any non-empty cell of a column is
/// plain text, every cell of that column stays text, so labels such as
/// `042` keep their spelling.
fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        records.push(result.with_context(|| format!("CSV row {row_no}"))?);
    }

    let text_columns: Vec<bool> = (0..columns.len())
        .map(|col| {
            records.iter().any(|r| {
                matches!(CellValue::infer(r.get(col).unwrap_or("")), CellValue::Text(_))
            })
        })
        .collect();

    let rows = records
        .iter()
        .map(|record| {
            record
                .iter()
                .enumerate()
                .map(|(col, raw)| match text_columns.get(col) {
                    Some(true) if raw.is_empty() => CellValue::Null,
                    Some(true) => CellValue::Text(raw.to_string()),
                    _ => CellValue::infer(raw),
                })
                .collect()
        })
        .collect();

    Ok(RawTable { columns, rows })
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Read every record batch of a Parquet file into one table.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn read_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| arrow_cell(col, row))
                    .collect(),
            );
        }
    }

    Ok(RawTable { columns, rows })
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let date_or_null =
        |d: Option<chrono::NaiveDateTime>| d.map(CellValue::Date).unwrap_or(CellValue::Null);

    match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => {
            CellValue::Integer(i64::from(col.as_primitive::<Int32Type>().value(row)))
        }
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => {
            CellValue::Float(f64::from(col.as_primitive::<Float32Type>().value(row)))
        }
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::Date32 => date_or_null(
            col.as_primitive::<Date32Type>()
                .value_as_date(row)
                .map(|d| d.and_time(NaiveTime::MIN)),
        ),
        DataType::Date64 => date_or_null(col.as_primitive::<Date64Type>().value_as_datetime(row)),
        DataType::Timestamp(unit, _) => date_or_null(match unit {
            TimeUnit::Second => col.as_primitive::<TimestampSecondType>().value_as_datetime(row),
            TimeUnit::Millisecond => col
                .as_primitive::<TimestampMillisecondType>()
                .value_as_datetime(row),
            TimeUnit::Microsecond => col
                .as_primitive::<TimestampMicrosecondType>()
                .value_as_datetime(row),
            TimeUnit::Nanosecond => col
                .as_primitive::<TimestampNanosecondType>()
                .value_as_datetime(row),
        }),
        _ => array_value_to_string(col.as_ref(), row)
            .map(CellValue::Text)
            .unwrap_or(CellValue::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use arrow::array::{Date32Array, Float64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use crate::config::CatalogConfig;
    use crate::data::catalog::build_catalog;
    use crate::data::error::DatasetError;
    use crate::data::model::ColumnKind;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "wave.csv",
            "transaction_id,user_id,amount,date,region\n\
             1,A,10,2024-01-01,east\n\
             2,B,20.5,2024-01-01,west\n",
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.transactions[1].amount, 20.5);
        assert_eq!(ds.transactions[0].transaction_id, "1");
        assert_eq!(ds.column_names, vec!["region"]);
        assert_eq!(ds.kind_of("region"), Some(ColumnKind::Categorical));
    }

    #[test]
    fn numeric_looking_labels_stay_text_in_a_text_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "stores.csv",
            "transaction_id,user_id,amount,date,store,city\n\
             1,A,10,2024-01-01,S01,Nan\n\
             2,B,5,2024-01-02,042,Dakar\n\
             3,B,7,2024-01-02,,Thies\n",
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.kind_of("store"), Some(ColumnKind::Categorical));
        assert_eq!(ds.kind_of("city"), Some(ColumnKind::Categorical));
        assert_eq!(ds.transactions[1].attributes["store"], CellValue::Text("042".into()));
        assert_eq!(ds.transactions[2].attributes["store"], CellValue::Null);
        assert_eq!(ds.transactions[0].amount, 10.0);

        let catalog = build_catalog(&ds, &CatalogConfig::default());
        assert_eq!(catalog.values("store").unwrap(), ["042", "S01"]);
        assert_eq!(catalog.values("city").unwrap(), ["Dakar", "Nan", "Thies"]);
    }

    #[test]
    fn loads_json_records_with_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "wave.json",
            r#"[
                {"transaction_id": "t1", "user_id": 7, "amount": 3.5,
                 "date": "2024-05-01", "region": "east"},
                {"transaction_id": "t2", "user_id": 8, "amount": 1, "date": "2024-05-02T09:15:00"}
            ]"#,
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.transactions[0].user_id, "7");
        assert_eq!(ds.transactions[1].attributes["region"], CellValue::Null);
        assert_eq!(ds.transactions[1].date.format("%H:%M").to_string(), "09:15");
    }

    #[test]
    fn loads_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wave.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("transaction_id", DataType::Utf8, false),
            Field::new("user_id", DataType::Utf8, false),
            Field::new("amount", DataType::Float64, false),
            Field::new("date", DataType::Date32, false),
            Field::new("region", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["1", "2"])),
                Arc::new(StringArray::from(vec!["A", "B"])),
                Arc::new(Float64Array::from(vec![10.0, 20.0])),
                // 2024-01-01 and 2024-01-02 as days since the epoch
                Arc::new(Date32Array::from(vec![19723, 19724])),
                Arc::new(StringArray::from(vec![Some("east"), None])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.transactions[1].date.date().to_string(), "2024-01-02");
        assert_eq!(ds.transactions[1].attributes["region"], CellValue::Null);
        assert_eq!(ds.kind_of("region"), Some(ColumnKind::Categorical));
    }

    #[test]
    fn missing_required_column_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "wave.csv", "transaction_id,amount,date\n1,10,2024-01-01\n");

        let err = load_file(&path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DatasetError>(),
            Some(&DatasetError::MissingColumn("user_id".into()))
        );
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "wave.xlsx", "");
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }
}
