use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use clap::Parser;
use parquet::arrow::ArrowWriter;

/// Write a synthetic transaction dataset for the dashboard
///
/// Produces `sample_transactions.parquet` and `sample_transactions.csv`
/// with `transaction_id`, `user_id`, `amount`, `date`, `region`,
/// `channel` and `item_count` columns.
#[derive(Parser, Debug, Clone)]
#[command(about, long_about = None)]
struct GenArgs {
    /// Directory the sample files are written to
    #[arg(value_name = "OUTPUT_DIR", default_value = ".")]
    out_dir: PathBuf,
}

const TRANSACTIONS: usize = 2_000;
const USERS: u64 = 250;
const DAYS: u64 = 120;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }

    /// Box-Muller transform, exponentiated: positive, right-skewed amounts.
    fn log_normal(&mut self, mu: f64, sigma: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        (mu + sigma * z).exp()
    }
}

struct Row {
    transaction_id: String,
    user_id: String,
    amount: f64,
    date: NaiveDate,
    region: &'static str,
    channel: &'static str,
    item_count: i64,
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    let regions = ["Dakar", "Thies", "Saint-Louis", "Ziguinchor"];
    let channels = ["app", "agent", "ussd"];
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();

    (0..TRANSACTIONS)
        .map(|i| {
            let channel = rng.pick(&channels);
            // Agent cash-ins run larger than app transfers.
            let mu = if channel == "agent" { 3.6 } else { 2.9 };
            Row {
                transaction_id: format!("T{i:06}"),
                user_id: format!("U{:04}", rng.below(USERS)),
                amount: (rng.log_normal(mu, 0.6) * 100.0).round() / 100.0,
                date: start + Duration::days(rng.below(DAYS) as i64),
                region: rng.pick(&regions),
                channel,
                item_count: 1 + rng.below(4) as i64,
            }
        })
        .collect()
}

fn write_parquet(rows: &[Row], path: &PathBuf) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();

    let schema = Arc::new(Schema::new(vec![
        Field::new("transaction_id", DataType::Utf8, false),
        Field::new("user_id", DataType::Utf8, false),
        Field::new("amount", DataType::Float64, false),
        Field::new("date", DataType::Date32, false),
        Field::new("region", DataType::Utf8, false),
        Field::new("channel", DataType::Utf8, false),
        Field::new("item_count", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.transaction_id.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.user_id.as_str()))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.amount))),
            Arc::new(Date32Array::from_iter_values(
                rows.iter().map(|r| (r.date - epoch).num_days() as i32),
            )),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.region))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.channel))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.item_count))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn write_csv(rows: &[Row], path: &PathBuf) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record([
        "transaction_id",
        "user_id",
        "amount",
        "date",
        "region",
        "channel",
        "item_count",
    ])?;
    for r in rows {
        writer.write_record([
            r.transaction_id.clone(),
            r.user_id.clone(),
            format!("{:.2}", r.amount),
            r.date.format("%Y-%m-%d").to_string(),
            r.region.to_string(),
            r.channel.to_string(),
            r.item_count.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = GenArgs::parse().out_dir;
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    let parquet_path = out_dir.join("sample_transactions.parquet");
    let csv_path = out_dir.join("sample_transactions.csv");
    write_parquet(&rows, &parquet_path)?;
    write_csv(&rows, &csv_path)?;

    println!(
        "Wrote {} transactions ({} users over {DAYS} days) to {} and {}",
        rows.len(),
        USERS,
        parquet_path.display(),
        csv_path.display()
    );
    Ok(())
}
