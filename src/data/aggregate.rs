use std::collections::{BTreeMap, HashMap};

use super::model::{CellValue, ColumnKind, Table};
use crate::error::Result;

/// Number of groups kept by [`top_groups`] in the dashboard.
pub const TOP_N: usize = 10;

/// One group and the summed measure over its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub group: CellValue,
    pub total: f64,
}

/// One point of a trend line: a timestamp and the measure summed over it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub at: CellValue,
    pub total: f64,
}

/// Sum `measure` per distinct value of `group`, in first-encountered order.
///
/// Rows whose group value is missing are dropped; missing measure cells add
/// nothing to their group.
pub fn group_sums(table: &Table, group: &str, measure: &str) -> Result<Vec<AggregateRow>> {
    let keys = table.require(group, ColumnKind::Categorical)?;
    let amounts = table.require(measure, ColumnKind::Numeric)?;

    let mut slots: HashMap<&CellValue, usize> = HashMap::new();
    let mut rows: Vec<AggregateRow> = Vec::new();
    for (key, amount) in keys.values.iter().zip(&amounts.values) {
        if key.is_null() {
            continue;
        }
        let slot = *slots.entry(key).or_insert_with(|| {
            rows.push(AggregateRow {
                group: key.clone(),
                total: 0.0,
            });
            rows.len() - 1
        });
        rows[slot].total += amount.as_f64().unwrap_or(0.0);
    }
    Ok(rows)
}

/// The `n` largest groups by summed measure, largest first.
/// Ties keep first-encountered order.
pub fn top_groups(table: &Table, group: &str, measure: &str, n: usize) -> Result<Vec<AggregateRow>> {
    let mut rows = group_sums(table, group, measure)?;
    rows.sort_by(|a, b| b.total.total_cmp(&a.total));
    rows.truncate(n);
    Ok(rows)
}

/// Measure summed per exact timestamp, in chronological order.
pub fn trend(table: &Table, date: &str, measure: &str) -> Result<Vec<TrendPoint>> {
    let stamps = table.require(date, ColumnKind::Temporal)?;
    let amounts = table.require(measure, ColumnKind::Numeric)?;

    let mut totals: BTreeMap<&CellValue, f64> = BTreeMap::new();
    for (at, amount) in stamps.values.iter().zip(&amounts.values) {
        if at.is_null() {
            continue;
        }
        *totals.entry(at).or_insert(0.0) += amount.as_f64().unwrap_or(0.0);
    }
    Ok(totals
        .into_iter()
        .map(|(at, total)| TrendPoint {
            at: at.clone(),
            total,
        })
        .collect())
}

/// Each row's share of the summed totals; all zeros when they sum to zero.
pub fn proportions(rows: &[AggregateRow]) -> Vec<f64> {
    let sum: f64 = rows.iter().map(|r| r.total).sum();
    if sum == 0.0 {
        return vec![0.0; rows.len()];
    }
    rows.iter().map(|r| r.total / sum).collect()
}
