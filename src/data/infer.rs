use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::model::{CellValue, ColumnKind};

// ---------------------------------------------------------------------------
// Column-kind classification
// ---------------------------------------------------------------------------

/// Classify a column from the scalar types of its non-missing cells.
pub fn classify(values: &[CellValue]) -> ColumnKind {
    let (mut numeric, mut temporal, mut other) = (false, false, false);
    for v in values.iter().filter(|v| !v.is_null()) {
        if v.is_numeric() {
            numeric = true;
        } else if v.is_temporal() {
            temporal = true;
        } else {
            other = true;
        }
    }
    match (numeric, temporal, other) {
        (false, false, false) => ColumnKind::Unknown,
        (true, false, false) => ColumnKind::Numeric,
        (false, true, false) => ColumnKind::Temporal,
        _ => ColumnKind::Categorical,
    }
}

/// Settle the final kind and cell representation of a freshly loaded column.
///
/// Categorical columns get one shot at temporal promotion; if that fails
/// and the column mixes text with other scalars, every cell becomes text.
pub fn settle(mut values: Vec<CellValue>) -> (ColumnKind, Vec<CellValue>) {
    let kind = classify(&values);
    if kind != ColumnKind::Categorical {
        return (kind, values);
    }
    if let Some(promoted) = promote_temporal(&values) {
        return (ColumnKind::Temporal, promoted);
    }
    normalize_text(&mut values);
    (ColumnKind::Categorical, values)
}

/// All-or-nothing reinterpretation of a column as temporal.
///
/// Returns `None` as soon as one non-missing cell is neither temporal nor
/// parseable text, or when there is no text at all.
pub fn promote_temporal(values: &[CellValue]) -> Option<Vec<CellValue>> {
    if !values.iter().any(|v| matches!(v, CellValue::Text(_))) {
        return None;
    }
    values
        .iter()
        .map(|v| match v {
            CellValue::Null => Some(CellValue::Null),
            CellValue::Text(s) => parse_temporal(s),
            v if v.is_temporal() => Some(v.clone()),
            _ => None,
        })
        .collect()
}

fn normalize_text(values: &mut [CellValue]) {
    let has_text = values.iter().any(|v| matches!(v, CellValue::Text(_)));
    if !has_text {
        return;
    }
    for v in values.iter_mut() {
        if !v.is_null() && !matches!(v, CellValue::Text(_)) {
            *v = CellValue::Text(v.to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Best-effort date parsing
// ---------------------------------------------------------------------------

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

// Month-first before day-first for ambiguous slashes, as dataframe parsers do.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Parse a text cell as a calendar date or timestamp.
///
/// Never panics; unknown shapes yield `None`. Date-only text becomes
/// [`CellValue::Date`], anything carrying a time of day becomes
/// [`CellValue::DateTime`].
pub fn parse_temporal(raw: &str) -> Option<CellValue> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(CellValue::DateTime(dt.naive_local()));
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(CellValue::DateTime(dt));
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .map(CellValue::Date)
}
