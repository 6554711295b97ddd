//! # estoque-store: Table Store Adapter
//!
//! Reads and writes the two persisted tables and turns their rows into
//! estoque-core types.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Estoque Data Flow                                │
//! │                                                                         │
//! │  CLI command (sell --confirm)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  estoque-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Ledger     │    │    codec      │    │ CachedStore  │  │   │
//! │  │   │  (ledger.rs)  │───►│ row <-> type  │    │  (cache.rs)  │  │   │
//! │  │   │               │    │               │    │   3 s TTL    │  │   │
//! │  │   │ load          │    └───────────────┘    └──────┬───────┘  │   │
//! │  │   │ record_intake │                               │          │   │
//! │  │   │ commit_sale   │───── TableStore ─────────────►│          │   │
//! │  │   └───────────────┘                               ▼          │   │
//! │  │                              CsvStore / MemoryStore           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  <data_dir>/stock_entries.csv, <data_dir>/sales.csv                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`table`] - Table names, canonical headers, the `TableStore` trait
//! - [`csv_store`] - One CSV file per table
//! - [`memory`] - In-memory store
//! - [`cache`] - Read-through cache with a freshness window
//! - [`codec`] - Row encoding and decoding
//! - [`ledger`] - Load, intake and checkout commits
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use estoque_store::{Ledger, StoreConfig};
//!
//! let ledger = Ledger::open(StoreConfig::new("./data"));
//! let state = ledger.load()?;
//! let balances = state.reconcile();
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod codec;
pub mod csv_store;
pub mod error;
pub mod ledger;
pub mod memory;
pub mod table;

// =============================================================================
// Re-exports
// =============================================================================

pub use cache::{CachedStore, DEFAULT_CACHE_TTL};
pub use csv_store::CsvStore;
pub use error::{StoreError, StoreResult};
pub use ledger::{CommitOutcome, Ledger, StoreConfig};
pub use memory::MemoryStore;
pub use table::{Table, TableName, TableStore};
