//! # Ledger State
//!
//! The explicit state of one interaction cycle: the two persisted tables as
//! typed rows. Every view is derived from it on demand and nothing is kept
//! between cycles.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        One Interaction Cycle                            │
//! │                                                                         │
//! │  store.load() ──► LedgerState { stock_entries, sales }                 │
//! │                         │                                               │
//! │         ┌───────────────┼──────────────────┐                            │
//! │         ▼               ▼                  ▼                            │
//! │    reconcile()     candidates()        report()                         │
//! │                                                                         │
//! │  with_stock_entry(e) / with_sales(batch) ──► next LedgerState          │
//! │  (the store writes it back, then reloads)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::candidates::{sale_candidates, SaleCandidate};
use crate::error::{CoreError, CoreResult};
use crate::reconcile::{balance_for, reconcile};
use crate::report::BusinessReport;
use crate::sale::SaleBatch;
use crate::types::{ReconciledBalance, SaleRecord, StockEntry};

/// Both tables, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    pub stock_entries: Vec<StockEntry>,
    pub sales: Vec<SaleRecord>,
}

impl LedgerState {
    pub fn new(stock_entries: Vec<StockEntry>, sales: Vec<SaleRecord>) -> Self {
        LedgerState { stock_entries, sales }
    }

    pub fn reconcile(&self) -> Vec<ReconciledBalance> {
        reconcile(&self.stock_entries, &self.sales)
    }

    pub fn candidates(&self) -> Vec<SaleCandidate> {
        sale_candidates(&self.reconcile())
    }

    pub fn report(&self) -> BusinessReport {
        BusinessReport::build(&self.reconcile(), &self.sales, &self.stock_entries)
    }

    /// Next state with one more intake row appended.
    pub fn with_stock_entry(&self, entry: StockEntry) -> LedgerState {
        let mut next = self.clone();
        next.stock_entries.push(entry);
        next
    }

    /// Next state with the batch's records appended to the sales history.
    pub fn with_sales(&self, batch: &SaleBatch) -> LedgerState {
        let mut next = self.clone();
        next.sales.extend(batch.records.iter().cloned());
        next
    }

    /// Re-checks a pending batch against this state.
    ///
    /// A batch is built from one reconciliation and confirmed later; if the
    /// tables changed in between (another operator sold from the same lot)
    /// this catches the oversell before anything is written.
    ///
    /// ## Errors
    /// * `ProductNotFound` - product has no stock entry any more
    /// * `LotNotAvailable` - lot has no positive balance
    /// * `InsufficientStock` - lot balance dropped below the line quantity
    /// * `PriceBelowFloor` - registered sale price is now above the line price
    pub fn check_batch(&self, batch: &SaleBatch) -> CoreResult<()> {
        let balances = self.reconcile();

        for record in &batch.records {
            let product = record.product.as_str();
            let lot = record.lot.as_str();

            if !self.stock_entries.iter().any(|e| e.product == product) {
                return Err(CoreError::ProductNotFound(product.to_string()));
            }

            let available = balance_for(&balances, product, lot)
                .map(|b| b.balance)
                .filter(|balance| *balance > 0)
                .ok_or_else(|| CoreError::LotNotAvailable {
                    product: product.to_string(),
                    lot: lot.to_string(),
                })?;

            if record.quantity > available {
                warn!(product, lot, available, requested = record.quantity, "Stale sale batch");
                return Err(CoreError::InsufficientStock {
                    product: product.to_string(),
                    lot: lot.to_string(),
                    available,
                    requested: record.quantity,
                });
            }

            if let Some(entry) = self.stock_entries.iter().find(|e| e.is_lot(product, lot)) {
                if record.unit_price < entry.unit_sale_price {
                    return Err(CoreError::PriceBelowFloor {
                        product: product.to_string(),
                        lot: lot.to_string(),
                        offered: record.unit_price,
                        minimum: entry.unit_sale_price,
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::sale::{build_sale_batch, SaleLineRequest};
    use crate::types::PaymentMethod;
    use chrono::{NaiveDate, NaiveDateTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn now() -> NaiveDateTime {
        date(2024, 6, 2).and_hms_opt(9, 0, 0).unwrap()
    }

    fn entry(qty: i64) -> StockEntry {
        StockEntry {
            product: "A".to_string(),
            sector: "S1".to_string(),
            lot: "LOT 1".to_string(),
            quantity: qty,
            entry_date: date(2024, 6, 1),
            expiry_date: date(2025, 1, 1),
            unit_cost: Money::from_cents(200),
            unit_sale_price: Money::from_cents(500),
        }
    }

    fn sell(state: &LedgerState, qty: i64) -> SaleBatch {
        let request = SaleLineRequest {
            product: "A".to_string(),
            lot: "LOT 1".to_string(),
            quantity: qty,
            payment_method: PaymentMethod::DebitCard,
            unit_price: Money::from_cents(500),
        };
        build_sale_batch(&[request], &state.reconcile(), &state.stock_entries, now()).unwrap()
    }

    #[test]
    fn test_with_sales_reduces_balance_by_sold_quantity() {
        let state = LedgerState::default().with_stock_entry(entry(10));
        let batch = sell(&state, 4);

        let next = state.with_sales(&batch);
        assert_eq!(state.reconcile()[0].balance - next.reconcile()[0].balance, 4);
        assert_eq!(next.report().total_profit, Money::from_cents(1200));
    }

    #[test]
    fn test_candidates_follow_state() {
        let state = LedgerState::default().with_stock_entry(entry(2));
        assert_eq!(state.candidates().len(), 1);

        let next = state.with_sales(&sell(&state, 2));
        assert!(next.candidates().is_empty());
    }

    #[test]
    fn test_check_batch_catches_stale_batch() {
        let state = LedgerState::default().with_stock_entry(entry(5));
        let first = sell(&state, 4);
        let second = sell(&state, 3);

        let after_first = state.with_sales(&first);
        assert!(state.check_batch(&second).is_ok());
        assert!(matches!(
            after_first.check_batch(&second),
            Err(CoreError::InsufficientStock { available: 1, requested: 3, .. })
        ));
    }

    #[test]
    fn test_check_batch_on_depleted_lot() {
        let state = LedgerState::default().with_stock_entry(entry(3));
        let batch = sell(&state, 3);
        let after = state.with_sales(&batch);

        assert!(matches!(after.check_batch(&batch), Err(CoreError::LotNotAvailable { .. })));
        assert!(matches!(
            LedgerState::default().check_batch(&batch),
            Err(CoreError::ProductNotFound(_))
        ));
    }
}
