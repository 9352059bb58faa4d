use super::model::{ColumnKind, Table};
use crate::error::Result;

/// Headline numbers for the filtered rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryMetrics {
    /// Every row of the table, missing measure or not.
    pub rows: usize,
    /// Mean over non-missing cells; `None` when there are none.
    pub mean: Option<f64>,
    pub sum: f64,
}

/// Row count, mean and sum of a numeric column, rounded to 2 decimals.
pub fn summarize(table: &Table, column: &str) -> Result<SummaryMetrics> {
    let column = table.require(column, ColumnKind::Numeric)?;

    let (count, sum) = column
        .values
        .iter()
        .filter_map(|v| v.as_f64())
        .fold((0usize, 0.0f64), |(n, s), v| (n + 1, s + v));

    Ok(SummaryMetrics {
        rows: table.n_rows(),
        mean: (count > 0).then(|| round2(sum / count as f64)),
        sum: round2(sum),
    })
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
