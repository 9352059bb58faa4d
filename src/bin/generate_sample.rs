//! Writes a synthetic sales dataset as `sample_sales.csv` and
//! `sample_sales.parquet` (or under the directory given as first argument).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use chrono::{NaiveDate, NaiveDateTime};
use parquet::arrow::ArrowWriter;

use rusty_dash::data::export::to_csv_bytes;
use rusty_dash::data::model::{CellValue, Column, Table};

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

struct SaleRow {
    at: NaiveDateTime,
    division: &'static str,
    region: &'static str,
    product: &'static str,
    units: i64,
    sales: Option<f64>,
}

const DIVISIONS: &[&str] = &["Cardio", "Derma", "Ortho", "Neuro", "Gastro"];
const REGIONS: &[&str] = &["North", "South", "East", "West", "Central"];
const PRODUCTS: &[(&str, f64)] = &[
    ("Tablet A", 12.5),
    ("Tablet B", 8.0),
    ("Syrup C", 4.75),
    ("Cream D", 6.2),
    ("Capsule E", 15.0),
    ("Drops F", 3.4),
];

fn generate_rows(n: usize, rng: &mut SimpleRng) -> Result<Vec<SaleRow>> {
    let first_day = NaiveDate::from_ymd_opt(2025, 9, 1).context("invalid start date")?;
    (0..n)
        .map(|i| {
            let day = first_day + chrono::Duration::days(rng.below(24) as i64);
            let at = day
                .and_hms_opt(8 + rng.below(10) as u32, rng.below(60) as u32, 0)
                .context("invalid time of day")?;
            let (product, price) = PRODUCTS[rng.below(PRODUCTS.len())];
            let units = 1 + rng.below(40) as i64;
            // Every 37th sale has no recorded value.
            let sales = (i % 37 != 36)
                .then(|| (units as f64 * price * (0.85 + 0.3 * rng.next_f64()) * 100.0).round() / 100.0);
            Ok(SaleRow {
                at,
                division: rng.pick(DIVISIONS),
                region: rng.pick(REGIONS),
                product,
                units,
                sales,
            })
        })
        .collect()
}

fn to_table(rows: &[SaleRow]) -> Result<Table> {
    let table = Table::from_columns(vec![
        Column::new("Date", rows.iter().map(|r| CellValue::DateTime(r.at)).collect()),
        Column::new("Division", rows.iter().map(|r| r.division.into()).collect()),
        Column::new("Region", rows.iter().map(|r| r.region.into()).collect()),
        Column::new("Product", rows.iter().map(|r| r.product.into()).collect()),
        Column::new("Units", rows.iter().map(|r| CellValue::Integer(r.units)).collect()),
        Column::new(
            "Sales",
            rows.iter()
                .map(|r| r.sales.map_or(CellValue::Null, CellValue::Float))
                .collect(),
        ),
    ])?;
    Ok(table)
}

fn to_batch(rows: &[SaleRow]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Date", DataType::Timestamp(TimeUnit::Millisecond, None), false),
        Field::new("Division", DataType::Utf8, false),
        Field::new("Region", DataType::Utf8, false),
        Field::new("Product", DataType::Utf8, false),
        Field::new("Units", DataType::Int64, false),
        Field::new("Sales", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(TimestampMillisecondArray::from(
                rows.iter()
                    .map(|r| r.at.and_utc().timestamp_millis())
                    .collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.division).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(rows.iter().map(|r| r.region).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.product).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.units).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.sales).collect::<Vec<_>>())),
        ],
    )
    .context("building record batch")?;
    Ok(batch)
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir).context("creating output directory")?;

    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(1_000, &mut rng)?;

    // CSV through the engine's own export.
    let csv_path = out_dir.join("sample_sales.csv");
    let bytes = to_csv_bytes(&to_table(&rows)?)?;
    std::fs::write(&csv_path, bytes).context("writing CSV")?;

    // Parquet
    let parquet_path = out_dir.join("sample_sales.parquet");
    let batch = to_batch(&rows)?;
    let file = std::fs::File::create(&parquet_path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    println!("{}", pretty_format_batches(&[batch.slice(0, 5)])?);
    println!(
        "Wrote {} sales rows to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
