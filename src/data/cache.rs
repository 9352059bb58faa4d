use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use super::loader::{LoadOptions, load_table};
use super::model::Table;
use crate::error::Result;

type CacheKey = (PathBuf, LoadOptions);

/// Memoized loads keyed by source path and load options.
///
/// Sources are assumed static for the life of the process; an entry only
/// goes away through [`TableCache::evict`] or [`TableCache::clear`].
/// Failed loads are not remembered.
#[derive(Debug, Default)]
pub struct TableCache {
    tables: Mutex<HashMap<CacheKey, Arc<Table>>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, reading the file on first use.
    pub fn load(&self, path: &Path, options: &LoadOptions) -> Result<Arc<Table>> {
        let key = (cache_path(path), *options);
        if let Some(table) = self.lock().get(&key) {
            log::debug!("Cache hit for {}", path.display());
            return Ok(Arc::clone(table));
        }

        // Read outside the lock; a racing loader of the same path just
        // loses to whichever insert lands first.
        let table = Arc::new(load_table(path, options)?);
        let mut tables = self.lock();
        let entry = tables.entry(key).or_insert(table);
        Ok(Arc::clone(entry))
    }

    /// Drop every cached variant of one source.
    pub fn evict(&self, path: &Path) {
        let target = cache_path(path);
        self.lock().retain(|(p, _), _| *p != target);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, Arc<Table>>> {
        // Entries are immutable Arcs, so a poisoned map is still consistent.
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn cache_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

static SHARED: LazyLock<TableCache> = LazyLock::new(TableCache::new);

/// Process-wide cache used by the dashboard.
pub fn shared_cache() -> &'static TableCache {
    &SHARED
}
