//! # estoque-core: Pure Business Logic for the Stock & Sales Ledger
//!
//! This crate is the **heart** of the ledger. It turns the raw history of
//! stock intakes and sales into balances, sale batches and reports, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Estoque Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Operator CLI (apps/estoque-cli)              │   │
//! │  │    intake ──► stock ──► candidates ──► sell --confirm ──► report│   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ estoque-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  intake   │  │ reconcile │  │   sale    │  │  report   │  │   │
//! │  │   │ lot numbers│ │ balances  │  │  batches  │  │  profit   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO SHEETS • NO CLOCK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               estoque-store (Table Store Adapter)               │   │
//! │  │          sales / stock_entries tables, cache, codec             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer cents (no floating point!)
//! - [`types`] - Stock entries, sale records, reconciled balances
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level rules
//! - [`intake`] - Stock intake and lot numbering
//! - [`reconcile`] - Balance derivation from entry and sale history
//! - [`candidates`] - Which lots are offered for sale
//! - [`sale`] - Sale batch construction
//! - [`report`] - Revenue, profit, best seller, inventory valuation
//! - [`ledger`] - Explicit per-cycle state
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use estoque_core::{reconcile, Money, StockEntry};
//!
//! let entry = StockEntry {
//!     product: "A".to_string(),
//!     sector: "S1".to_string(),
//!     lot: "LOT 1".to_string(),
//!     quantity: 10,
//!     entry_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
//!     expiry_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!     unit_cost: Money::from_cents(200),
//!     unit_sale_price: Money::from_cents(500),
//! };
//!
//! let balances = reconcile(&[entry], &[]);
//! assert_eq!(balances[0].balance, 10);
//! assert_eq!(balances[0].total_cost, Some(Money::from_cents(2000)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod candidates;
pub mod error;
pub mod intake;
pub mod ledger;
pub mod money;
pub mod reconcile;
pub mod report;
pub mod sale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use candidates::{sale_candidates, SaleCandidate};
pub use error::{CoreError, CoreResult, ValidationError};
pub use intake::{build_stock_entry, next_lot, StockIntake};
pub use ledger::LedgerState;
pub use money::Money;
pub use reconcile::reconcile;
pub use report::{best_selling_product, BestSeller, BusinessReport};
pub use sale::{build_sale_batch, RejectedLine, SaleBatch, SaleLineRequest};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix of every lot label (`LOT 1`, `LOT 2`, ...).
pub const LOT_PREFIX: &str = "LOT";

/// Format of the sale identifier shared by one checkout batch.
pub const SALE_ID_FORMAT: &str = "%Y%m%d%H%M%S";

/// Format of the sale timestamp column.
pub const SALE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format of entry and expiry dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Maximum length of a product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Maximum length of a sector name.
pub const MAX_SECTOR_NAME_LEN: usize = 100;

/// Largest quantity accepted on one intake or read from a table row.
pub const MAX_QUANTITY: i64 = i32::MAX as i64;
