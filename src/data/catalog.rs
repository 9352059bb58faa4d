use std::collections::BTreeSet;
use std::fmt;

use super::model::{CellValue, Column, ColumnKind, Table};

/// Maximum number of distinct values offered per column.
pub const MAX_UNIQUE: usize = 100;

/// Label of the "no restriction" entry.
pub const WILDCARD_LABEL: &str = "ALL";

// ---------------------------------------------------------------------------
// CatalogEntry – one selectable option
// ---------------------------------------------------------------------------

/// A selectable filter option: the wildcard, or one concrete value.
/// `All` sorts before every value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CatalogEntry {
    All,
    Value(CellValue),
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogEntry::All => f.write_str(WILDCARD_LABEL),
            CatalogEntry::Value(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// ValueCatalog – the options for one column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ValueCatalog {
    pub column: String,
    pub kind: ColumnKind,
    /// Wildcard first, then values in ascending order.
    pub entries: Vec<CatalogEntry>,
    /// Distinct values left out by the cap.
    pub dropped: usize,
}

impl ValueCatalog {
    /// The concrete values, without the wildcard.
    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.entries.iter().filter_map(|e| match e {
            CatalogEntry::Value(v) => Some(v),
            CatalogEntry::All => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the option list for one column.
///
/// Missing cells are skipped; temporal cells are listed by calendar date.
/// Values past the `max_unique`th are silently dropped.
pub fn build_catalog(column: &Column, max_unique: usize) -> ValueCatalog {
    let distinct: BTreeSet<CellValue> = column
        .values
        .iter()
        .filter(|v| !v.is_null())
        .map(CellValue::date_key)
        .collect();

    let dropped = distinct.len().saturating_sub(max_unique);
    if dropped > 0 {
        log::debug!(
            "Catalog for '{}' capped at {max_unique}, {dropped} values left out",
            column.name
        );
    }

    let entries = std::iter::once(CatalogEntry::All)
        .chain(distinct.into_iter().take(max_unique).map(CatalogEntry::Value))
        .collect();

    ValueCatalog {
        column: column.name.clone(),
        kind: column.kind,
        entries,
        dropped,
    }
}

/// Catalogs for every column, in table order.
pub fn build_catalogs(table: &Table, max_unique: usize) -> Vec<ValueCatalog> {
    table
        .columns()
        .iter()
        .map(|c| build_catalog(c, max_unique))
        .collect()
}
