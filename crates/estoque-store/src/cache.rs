//! # Read-Through Cache
//!
//! Wraps any [`TableStore`] and serves repeated reads from memory for a
//! short freshness window.
//!
//! ```text
//! read_table(name)
//!      │
//!      ├── cached and age < ttl ──► cached copy
//!      │
//!      └── otherwise ──► inner.read_table ──► cache (now) ──► copy
//!
//! write_table(table) ──► inner.write_table ──► cache (now) = table
//! ```
//!
//! The window bounds how stale a read can be when someone else edits the
//! backing sheet. Our own writes are never stale: they refresh the cache.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::trace;

use crate::error::StoreResult;
use crate::table::{Table, TableName, TableStore};

/// Default freshness window.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug)]
struct CachedTable {
    fetched_at: Instant,
    table: Table,
}

/// A [`TableStore`] with a per-table read cache.
#[derive(Debug)]
pub struct CachedStore<S> {
    inner: S,
    ttl: Duration,
    entries: Mutex<HashMap<TableName, CachedTable>>,
}

impl<S: TableStore> CachedStore<S> {
    pub fn new(inner: S) -> Self {
        Self::with_ttl(inner, DEFAULT_CACHE_TTL)
    }

    /// A zero `ttl` disables caching of reads.
    pub fn with_ttl(inner: S, ttl: Duration) -> Self {
        CachedStore {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drops every cached table.
    pub fn invalidate(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn store(&self, table: Table) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            table.name,
            CachedTable {
                fetched_at: Instant::now(),
                table,
            },
        );
    }
}

impl<S: TableStore> TableStore for CachedStore<S> {
    fn read_table(&self, name: TableName) -> StoreResult<Table> {
        {
            let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = entries.get(&name) {
                if cached.fetched_at.elapsed() < self.ttl {
                    trace!(table = %name, "Cache hit");
                    return Ok(cached.table.clone());
                }
            }
        }

        trace!(table = %name, "Cache miss");
        let table = self.inner.read_table(name)?;
        self.store(table.clone());
        Ok(table)
    }

    fn write_table(&self, table: &Table) -> StoreResult<()> {
        self.inner.write_table(table)?;
        self.store(table.clone());
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts reads that reach the backing store.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        reads: AtomicUsize,
    }

    impl TableStore for CountingStore {
        fn read_table(&self, name: TableName) -> StoreResult<Table> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.read_table(name)
        }

        fn write_table(&self, table: &Table) -> StoreResult<()> {
            self.inner.write_table(table)
        }
    }

    fn sales_with(cell: &str) -> Table {
        let mut table = Table::empty(TableName::Sales);
        table.rows.push(vec![cell.to_string()]);
        table
    }

    #[test]
    fn test_fresh_reads_are_served_from_cache() {
        let cache = CachedStore::with_ttl(CountingStore::default(), Duration::from_secs(60));

        cache.read_table(TableName::Sales).unwrap();
        cache.read_table(TableName::Sales).unwrap();
        assert_eq!(cache.inner().reads.load(Ordering::SeqCst), 1);

        // tables are cached independently
        cache.read_table(TableName::StockEntries).unwrap();
        assert_eq!(cache.inner().reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_zero_ttl_always_reads_through() {
        let cache = CachedStore::with_ttl(CountingStore::default(), Duration::ZERO);

        cache.read_table(TableName::Sales).unwrap();
        cache.read_table(TableName::Sales).unwrap();
        assert_eq!(cache.inner().reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_write_refreshes_cached_copy() {
        let cache = CachedStore::with_ttl(CountingStore::default(), Duration::from_secs(60));
        cache.read_table(TableName::Sales).unwrap();

        cache.write_table(&sales_with("new")).unwrap();
        assert_eq!(cache.read_table(TableName::Sales).unwrap(), sales_with("new"));
        assert_eq!(cache.inner().reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let cache = CachedStore::with_ttl(CountingStore::default(), Duration::from_secs(60));
        cache.read_table(TableName::Sales).unwrap();

        // an edit behind the cache's back
        cache.inner().inner.write_table(&sales_with("edited")).unwrap();
        assert_eq!(cache.read_table(TableName::Sales).unwrap(), Table::empty(TableName::Sales));

        cache.invalidate();
        assert_eq!(cache.read_table(TableName::Sales).unwrap(), sales_with("edited"));
    }

    #[test]
    fn test_default_ttl() {
        assert_eq!(CachedStore::new(MemoryStore::new()).ttl(), Duration::from_secs(3));
    }
}
