//! # Ledger
//!
//! The persistence side of each interaction cycle: load both tables, apply
//! one intake or one confirmed checkout, write the table back.
//!
//! ## Commit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         commit_sale(batch)                              │
//! │                                                                         │
//! │  None / no accepted lines ──────────────────► NothingToCommit          │
//! │                                                                         │
//! │  load() ──► check_batch (stale? oversold?) ──► Err(Core) on failure     │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  sales ++ batch.records ──► write_table(sales)  (full overwrite)        │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  load() again ──► reconcile ──► Committed { balances, ... }            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use estoque_core::{
    build_stock_entry, LedgerState, Money, ReconciledBalance, SaleBatch, SaleId, StockEntry,
    StockIntake,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::cache::{CachedStore, DEFAULT_CACHE_TTL};
use crate::codec::{decode_sales, decode_stock_entries, sales_table, stock_entries_table};
use crate::csv_store::CsvStore;
use crate::error::StoreResult;
use crate::table::{TableName, TableStore};

// =============================================================================
// Configuration
// =============================================================================

/// Store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("./data").cache_ttl(Duration::from_secs(1));
/// let ledger = Ledger::open(config);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding `stock_entries.csv` and `sales.csv`.
    pub data_dir: PathBuf,

    /// Read cache freshness window.
    /// Default: 3 seconds
    pub cache_ttl: Duration,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        StoreConfig {
            data_dir: data_dir.into(),
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Sets the cache freshness window.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

// =============================================================================
// Commit Outcome
// =============================================================================

/// What `commit_sale` did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommitOutcome {
    /// No batch, or a batch with no accepted lines. Nothing was written.
    NothingToCommit,

    /// Records appended and the sales table rewritten.
    Committed {
        sale_id: SaleId,
        lines: usize,
        total_value: Money,
        /// Reconciliation after the write.
        balances: Vec<ReconciledBalance>,
    },
}

impl CommitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed { .. })
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// Typed access to both tables over any [`TableStore`].
#[derive(Debug)]
pub struct Ledger<S> {
    store: S,
}

impl Ledger<CachedStore<CsvStore>> {
    /// Opens the CSV-backed ledger with a read cache in front.
    pub fn open(config: StoreConfig) -> Self {
        info!(
            data_dir = %config.data_dir.display(),
            cache_ttl_ms = config.cache_ttl.as_millis() as u64,
            "Opening ledger"
        );
        Ledger::new(CachedStore::with_ttl(CsvStore::new(config.data_dir), config.cache_ttl))
    }
}

impl<S: TableStore> Ledger<S> {
    pub fn new(store: S) -> Self {
        Ledger { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads and decodes both tables.
    pub fn load(&self) -> StoreResult<LedgerState> {
        let stock_entries = decode_stock_entries(&self.store.read_table(TableName::StockEntries)?)?;
        let sales = decode_sales(&self.store.read_table(TableName::Sales)?)?;

        debug!(
            stock_entries = stock_entries.len(),
            sales = sales.len(),
            "Ledger loaded"
        );
        Ok(LedgerState::new(stock_entries, sales))
    }

    /// Validates an intake, assigns its lot and appends it.
    ///
    /// ## Returns
    /// The stored entry, with its lot and entry date filled in.
    pub fn record_intake(&self, intake: StockIntake, today: NaiveDate) -> StoreResult<StockEntry> {
        let state = self.load()?;
        let entry = build_stock_entry(intake, &state.stock_entries, today)?;

        let next = state.with_stock_entry(entry.clone());
        self.store.write_table(&stock_entries_table(&next.stock_entries))?;

        info!(
            product = %entry.product,
            lot = %entry.lot,
            sector = %entry.sector,
            quantity = entry.quantity,
            "Stock intake recorded"
        );
        Ok(entry)
    }

    /// Confirms a pending checkout.
    ///
    /// `None` and batches without accepted lines are a no-op. Otherwise
    /// the batch is re-checked against freshly loaded tables, appended to
    /// the sales history, and the ledger re-reconciled.
    pub fn commit_sale(&self, batch: Option<&SaleBatch>) -> StoreResult<CommitOutcome> {
        let batch = match batch {
            Some(batch) if batch.is_committable() => batch,
            _ => {
                debug!("Nothing to commit");
                return Ok(CommitOutcome::NothingToCommit);
            }
        };

        let state = self.load()?;
        state.check_batch(batch)?;

        let next = state.with_sales(batch);
        self.store.write_table(&sales_table(&next.sales))?;

        info!(
            sale_id = %batch.sale_id,
            lines = batch.records.len(),
            total = %batch.total_value(),
            "Sale committed"
        );

        let balances = self.load()?.reconcile();
        Ok(CommitOutcome::Committed {
            sale_id: batch.sale_id.clone(),
            lines: batch.records.len(),
            total_value: batch.total_value(),
            balances,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
