use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusty_dash::EngineError;
use rusty_dash::config::DashboardConfig;
use rusty_dash::data::aggregate::{AggregateRow, TrendPoint, top_groups, trend};
use rusty_dash::data::cache::shared_cache;
use rusty_dash::data::catalog::{CatalogEntry, ValueCatalog, build_catalogs};
use rusty_dash::data::export::to_delimited_bytes;
use rusty_dash::data::filter::{FilterState, Selection, apply_filters};
use rusty_dash::data::metrics::{SummaryMetrics, summarize};
use rusty_dash::data::model::{ColumnKind, Table};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Path of the loaded dataset.
    pub source: Option<PathBuf>,

    /// Loaded table (None until a file is opened). Never mutated.
    pub table: Option<Arc<Table>>,

    /// Selectable options per column, built once per table.
    pub catalogs: Vec<ValueCatalog>,

    /// Per-column picks from the catalogs; `{ALL}` by default.
    pub picks: BTreeMap<String, BTreeSet<CatalogEntry>>,

    /// Numeric column summed and averaged.
    pub value_column: Option<String>,

    /// Categorical column the charts group by.
    pub group_column: Option<String>,

    /// Temporal column of the trend chart.
    pub date_column: Option<String>,

    // -- Derived on every refilter --
    pub filtered: Option<Table>,
    pub top_groups: Vec<AggregateRow>,
    pub trend: Vec<TrendPoint>,
    pub metrics: Option<SummaryMetrics>,
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            source: None,
            table: None,
            catalogs: Vec::new(),
            picks: BTreeMap::new(),
            value_column: None,
            group_column: None,
            date_column: None,
            filtered: None,
            top_groups: Vec::new(),
            trend: Vec::new(),
            metrics: None,
            color_map: None,
            status_message: None,
        }
    }

    /// Load (or fetch from the cache) a dataset and make it current.
    pub fn open(&mut self, path: &Path) -> Result<(), EngineError> {
        let table = shared_cache().load(path, &self.config.load_options())?;
        log::info!(
            "Opened {} with columns {:?}",
            path.display(),
            table.column_names().collect::<Vec<_>>()
        );
        self.source = Some(path.to_path_buf());
        self.set_table(table);
        Ok(())
    }

    /// Ingest a newly loaded table: build catalogs, reset picks and choose
    /// default value / group / date columns.
    pub fn set_table(&mut self, table: Arc<Table>) {
        self.catalogs = build_catalogs(&table, self.config.max_unique);
        self.picks = table
            .column_names()
            .map(|name| (name.to_string(), BTreeSet::from([CatalogEntry::All])))
            .collect();

        let first_of = |kind| {
            table
                .columns_of_kind(kind)
                .first()
                .map(|name| name.to_string())
        };
        self.value_column = first_of(ColumnKind::Numeric);
        self.group_column = first_of(ColumnKind::Categorical);
        self.date_column = first_of(ColumnKind::Temporal);

        self.table = Some(table);
        self.status_message = None;
        self.refilter();
    }

    /// Columns offered for each role.
    pub fn columns_of_kind(&self, kind: ColumnKind) -> Vec<String> {
        self.table
            .as_ref()
            .map(|t| t.columns_of_kind(kind).into_iter().map(String::from).collect())
            .unwrap_or_default()
    }

    /// Current picks as engine selections.
    pub fn filter_state(&self) -> FilterState {
        self.picks
            .iter()
            .map(|(col, picked)| (col.clone(), Selection::from_choices(picked)))
            .collect()
    }

    /// Re-run filter → aggregate / metrics after any change.
    pub fn refilter(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        let filtered = apply_filters(table, &self.filter_state());

        self.top_groups = match (&self.group_column, &self.value_column) {
            (Some(group), Some(value)) => top_groups(&filtered, group, value, self.config.top_n)
                .unwrap_or_else(|e| {
                    log::warn!("Top groups unavailable: {e}");
                    Vec::new()
                }),
            _ => Vec::new(),
        };
        self.trend = match (&self.date_column, &self.value_column) {
            (Some(date), Some(value)) => trend(&filtered, date, value).unwrap_or_else(|e| {
                log::warn!("Trend unavailable: {e}");
                Vec::new()
            }),
            _ => Vec::new(),
        };
        self.metrics = self
            .value_column
            .as_ref()
            .and_then(|value| summarize(&filtered, value).ok());
        self.color_map = self
            .group_column
            .as_ref()
            .map(|group| ColorMap::new(group, self.top_groups.iter().map(|r| &r.group)));

        self.filtered = Some(filtered);
    }

    /// Toggle a single catalog entry in a column's picks.
    pub fn toggle_pick(&mut self, column: &str, entry: &CatalogEntry) {
        let picked = self.picks.entry(column.to_string()).or_default();
        if !picked.remove(entry) {
            picked.insert(entry.clone());
        }
        self.refilter();
    }

    /// Back to the wildcard for a column.
    pub fn select_all(&mut self, column: &str) {
        self.picks
            .insert(column.to_string(), BTreeSet::from([CatalogEntry::All]));
        self.refilter();
    }

    /// Deselect everything in a column (matches no rows).
    pub fn select_none(&mut self, column: &str) {
        self.picks.insert(column.to_string(), BTreeSet::new());
        self.refilter();
    }

    pub fn set_value_column(&mut self, col: String) {
        self.value_column = Some(col);
        self.refilter();
    }

    pub fn set_group_column(&mut self, col: String) {
        self.group_column = Some(col);
        self.refilter();
    }

    pub fn set_date_column(&mut self, col: String) {
        self.date_column = Some(col);
        self.refilter();
    }

    /// Filtered rows as delimited bytes, ready to save.
    pub fn export_bytes(&self) -> Result<Vec<u8>, EngineError> {
        let empty = Table::default();
        let table = self.filtered.as_ref().unwrap_or(&empty);
        to_delimited_bytes(table, &self.config.export_options())
    }
}
