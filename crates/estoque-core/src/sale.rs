//! # Sale Builder
//!
//! Builds a pending checkout batch from the operator's selections.
//!
//! ## Checkout Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Checkout Lifecycle                                │
//! │                                                                         │
//! │  1. OPEN BATCH                                                         │
//! │     └── now captured once → SaleId shared by every line                │
//! │                                                                         │
//! │  2. VALIDATE EACH LINE (independently)                                 │
//! │     ├── lot offered?            no → LotNotOffered                     │
//! │     ├── selected twice?         yes → Duplicate                        │
//! │     ├── 1 ≤ qty ≤ balance?      no → QuantityExceedsBalance            │
//! │     └── price ≥ sale price?     no → PriceBelowFloor                   │
//! │         rejected lines are reported, the rest stay in the batch        │
//! │                                                                         │
//! │  3. PENDING                                                            │
//! │     └── SaleBatch held in memory; abandoning it has no side effects    │
//! │                                                                         │
//! │  4. CONFIRM (estoque-store Ledger::commit_sale)                        │
//! │     └── append records, write table, re-reconcile                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::candidates::sale_candidates;
use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::reconcile::balance_for;
use crate::types::{LotKey, PaymentMethod, ReconciledBalance, SaleId, SaleRecord, StockEntry};
use crate::validation::{validate_price_floor, validate_sale_quantity};

/// One selected (product, lot) with the values typed for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLineRequest {
    pub product: String,
    pub lot: String,
    pub quantity: i64,
    pub payment_method: PaymentMethod,
    pub unit_price: Money,
}

impl SaleLineRequest {
    pub fn lot_key(&self) -> LotKey {
        LotKey::new(self.product.clone(), self.lot.clone())
    }
}

/// A line the builder refused, with the reason shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedLine {
    pub request: SaleLineRequest,
    pub reason: ValidationError,
}

/// A pending (not yet persisted) checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleBatch {
    pub sale_id: SaleId,
    pub opened_at: NaiveDateTime,
    /// Lines that passed validation, in selection order.
    pub records: Vec<SaleRecord>,
    pub rejected: Vec<RejectedLine>,
}

impl SaleBatch {
    /// Whether confirming would append anything.
    pub fn is_committable(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn total_value(&self) -> Money {
        self.records.iter().map(|r| r.total_value).sum()
    }

    pub fn total_quantity(&self) -> i64 {
        self.records.iter().map(|r| r.quantity).sum()
    }
}

/// Builds a pending sale batch.
///
/// ## Arguments
/// * `requests` - selected lots with quantity, payment method and price
/// * `balances` - current reconciliation
/// * `entries` - stock entries, for the price floor (first match wins)
/// * `now` - batch-open time; becomes the sale id and every line's timestamp
///
/// ## Returns
/// * `Err(EmptySelection)` when nothing was selected
/// * `Ok(batch)` otherwise; invalid lines are in `batch.rejected` and
///   produce no `SaleRecord`
pub fn build_sale_batch(
    requests: &[SaleLineRequest],
    balances: &[ReconciledBalance],
    entries: &[StockEntry],
    now: NaiveDateTime,
) -> CoreResult<SaleBatch> {
    if requests.is_empty() {
        return Err(ValidationError::EmptySelection.into());
    }

    let offered: HashSet<LotKey> = sale_candidates(balances)
        .into_iter()
        .map(|c| c.lot_key())
        .collect();

    let mut batch = SaleBatch {
        sale_id: SaleId::from_timestamp(now),
        opened_at: now,
        records: Vec::with_capacity(requests.len()),
        rejected: Vec::new(),
    };
    let mut selected: HashSet<LotKey> = HashSet::with_capacity(requests.len());

    for request in requests {
        match build_line(request, &offered, &mut selected, balances, entries, &batch.sale_id, now) {
            Ok(record) => batch.records.push(record),
            Err(reason) => {
                debug!(product = %request.product, lot = %request.lot, %reason, "Sale line rejected");
                batch.rejected.push(RejectedLine {
                    request: request.clone(),
                    reason,
                });
            }
        }
    }

    debug!(
        sale_id = %batch.sale_id,
        accepted = batch.records.len(),
        rejected = batch.rejected.len(),
        "Sale batch built"
    );

    Ok(batch)
}

fn build_line(
    request: &SaleLineRequest,
    offered: &HashSet<LotKey>,
    selected: &mut HashSet<LotKey>,
    balances: &[ReconciledBalance],
    entries: &[StockEntry],
    sale_id: &SaleId,
    now: NaiveDateTime,
) -> Result<SaleRecord, ValidationError> {
    let product = request.product.as_str();
    let lot = request.lot.as_str();
    let not_offered = || ValidationError::LotNotOffered {
        product: product.to_string(),
        lot: lot.to_string(),
    };

    let key = request.lot_key();
    if !offered.contains(&key) {
        return Err(not_offered());
    }
    if selected.contains(&key) {
        return Err(ValidationError::Duplicate {
            field: "selection".to_string(),
            value: key.to_string(),
        });
    }

    let available = balance_for(balances, product, lot)
        .map(|b| b.balance)
        .filter(|balance| *balance > 0)
        .ok_or_else(not_offered)?;
    validate_sale_quantity(product, lot, request.quantity, available)?;

    let floor = entries
        .iter()
        .find(|e| e.is_lot(product, lot))
        .map(|e| e.unit_sale_price)
        .ok_or_else(not_offered)?;
    validate_price_floor(product, lot, request.unit_price, floor)?;

    selected.insert(key);

    Ok(SaleRecord {
        sale_id: sale_id.clone(),
        product: request.product.clone(),
        lot: request.lot.clone(),
        quantity: request.quantity,
        payment_method: request.payment_method,
        unit_price: request.unit_price,
        total_value: request.unit_price.multiply_quantity(request.quantity),
        sale_timestamp: now,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
