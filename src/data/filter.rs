use std::collections::{BTreeMap, BTreeSet};

use super::catalog::CatalogEntry;
use super::model::{CellValue, ColumnKind, Table};

// ---------------------------------------------------------------------------
// Filter predicate: which values are allowed per column
// ---------------------------------------------------------------------------

/// What a single column lets through.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// The wildcard: no constraint on this column.
    #[default]
    Unrestricted,
    /// Only rows whose value is in the set. An empty set matches nothing.
    Only(BTreeSet<CellValue>),
}

impl Selection {
    /// Turn a multi-choice pick from the catalog into a selection.
    /// Picking the wildcard wins over any concrete values picked alongside it.
    pub fn from_choices<'a>(choices: impl IntoIterator<Item = &'a CatalogEntry>) -> Self {
        let mut values = BTreeSet::new();
        for choice in choices {
            match choice {
                CatalogEntry::All => return Selection::Unrestricted,
                CatalogEntry::Value(v) => {
                    values.insert(v.clone());
                }
            }
        }
        Selection::Only(values)
    }

    pub fn only<I: IntoIterator<Item = CellValue>>(values: I) -> Self {
        Selection::Only(values.into_iter().collect())
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Selection::Unrestricted)
    }
}

/// Per-column selection state: maps column_name → selection.
/// A column absent from the map is unconstrained.
pub type FilterState = BTreeMap<String, Selection>;

/// Initialise a [`FilterState`] with every column unrestricted (show everything).
pub fn init_filter_state(table: &Table) -> FilterState {
    table
        .column_names()
        .map(|name| (name.to_string(), Selection::Unrestricted))
        .collect()
}

/// An explicit selection resolved against one column of the table.
struct ActiveFilter<'a> {
    values: &'a [CellValue],
    allowed: BTreeSet<CellValue>,
    by_date: bool,
}

impl ActiveFilter<'_> {
    fn passes(&self, row: usize) -> bool {
        let value = &self.values[row];
        if value.is_null() {
            return false;
        }
        if self.by_date {
            self.allowed.contains(&value.date_key())
        } else {
            self.allowed.contains(value)
        }
    }
}

/// Return indices of rows that pass all active filters.
///
/// A row passes a column filter when:
/// * The selection is [`Selection::Unrestricted`] → passes (no constraint)
/// * The selection set is empty → nothing selected → fails
/// * The row's value is missing → fails
/// * The row's value (its calendar date, for temporal columns) is in the set → passes
pub fn filtered_indices(table: &Table, filters: &FilterState) -> Vec<usize> {
    let mut active = Vec::new();
    for (col, selection) in filters {
        let Selection::Only(selected) = selection else {
            continue;
        };
        let Some(column) = table.column(col) else {
            log::warn!("Ignoring selection for unknown column '{col}'");
            continue;
        };
        let by_date = column.kind == ColumnKind::Temporal;
        let allowed = if by_date {
            selected.iter().map(CellValue::date_key).collect()
        } else {
            selected.clone()
        };
        active.push(ActiveFilter {
            values: &column.values,
            allowed,
            by_date,
        });
    }

    (0..table.n_rows())
        .filter(|&row| active.iter().all(|f| f.passes(row)))
        .collect()
}

/// Derived table holding only the rows that pass all active filters.
/// The input table is left untouched.
pub fn apply_filters(table: &Table, filters: &FilterState) -> Table {
    table.take_rows(&filtered_indices(table, filters))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::model::Column;

    fn sales_table() -> Table {
        Table::from_columns(vec![
            Column::new("Region", vec!["North".into(), "South".into(), "North".into()]),
            Column::new(
                "Sales",
                vec![
                    CellValue::Integer(10),
                    CellValue::Integer(20),
                    CellValue::Integer(30),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn unrestricted_passes_everything() {
        let table = sales_table();
        let filters = init_filter_state(&table);
        assert_eq!(filtered_indices(&table, &filters), vec![0, 1, 2]);
    }

    #[test]
    fn explicit_selection_keeps_matching_rows() {
        let table = sales_table();
        let mut filters = init_filter_state(&table);
        filters.insert("Region".into(), Selection::only([CellValue::from("South")]));

        let out = apply_filters(&table, &filters);
        assert_eq!(out.n_rows(), 1);
        assert_eq!(out.row(0), vec![&CellValue::from("South"), &CellValue::Integer(20)]);
        // The source table is not touched.
        assert_eq!(table.n_rows(), 3);
    }

    #[test]
    fn selections_and_across_columns() {
        let table = sales_table();
        let mut filters = FilterState::new();
        filters.insert("Region".into(), Selection::only([CellValue::from("North")]));
        filters.insert(
            "Sales".into(),
            Selection::only([CellValue::Integer(30), CellValue::Integer(20)]),
        );
        assert_eq!(filtered_indices(&table, &filters), vec![2]);
    }

    #[test]
    fn empty_selection_matches_nothing() {
        let table = sales_table();
        let mut filters = FilterState::new();
        filters.insert("Region".into(), Selection::Only(BTreeSet::new()));
        assert!(apply_filters(&table, &filters).is_empty());
    }

    #[test]
    fn missing_cells_never_match() {
        let table = Table::from_columns(vec![Column::new(
            "Region",
            vec!["North".into(), CellValue::Null],
        )])
        .unwrap();
        let mut filters = FilterState::new();
        filters.insert(
            "Region".into(),
            Selection::only([CellValue::from("North"), CellValue::Null]),
        );
        assert_eq!(filtered_indices(&table, &filters), vec![0]);
    }

    #[test]
    fn temporal_selection_matches_whole_days() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let table = Table::from_columns(vec![Column::new(
            "At",
            vec![
                CellValue::DateTime(day(1).and_hms_opt(8, 0, 0).unwrap()),
                CellValue::DateTime(day(1).and_hms_opt(20, 0, 0).unwrap()),
                CellValue::DateTime(day(2).and_hms_opt(9, 0, 0).unwrap()),
            ],
        )])
        .unwrap();
        let mut filters = FilterState::new();
        filters.insert("At".into(), Selection::only([CellValue::Date(day(1))]));
        assert_eq!(filtered_indices(&table, &filters), vec![0, 1]);
    }

    #[test]
    fn wildcard_choice_wins() {
        let picks = [CatalogEntry::Value("North".into()), CatalogEntry::All];
        assert!(Selection::from_choices(&picks).is_unrestricted());

        let picks = [CatalogEntry::Value("North".into())];
        assert_eq!(
            Selection::from_choices(&picks),
            Selection::only([CellValue::from("North")])
        );
    }

    #[test]
    fn unknown_columns_are_ignored() {
        let table = sales_table();
        let mut filters = FilterState::new();
        filters.insert("Division".into(), Selection::Only(BTreeSet::new()));
        assert_eq!(filtered_indices(&table, &filters).len(), 3);
    }
}
