//! # Stock Reconciliation
//!
//! Derives the current position of every (product, lot, sector) from the full
//! intake history and the full sales history. Nothing is stored: the view is
//! recomputed from scratch on every cycle.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  stock_entries ──► group by (product, lot, sector) ──► quantity_in      │
//! │                                                                         │
//! │  sales ──────────► group by (product, lot) ──────────► -quantity_sold   │
//! │                                                                         │
//! │           full outer join on (product, lot), missing side = 0           │
//! │                              │                                          │
//! │                              ▼                                          │
//! │               balance = quantity_in + (-quantity_sold)                  │
//! │                              │                                          │
//! │     left join entries on (product, lot, sector), LAST matching row      │
//! │                              │        wins: expiry, unit_cost           │
//! │                              ▼                                          │
//! │               total_cost = balance × unit_cost                          │
//! │               balance == 0  →  expiry blanked                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Output is ordered by (product, lot, sector). A lot stored in two sectors
//! gets one row per sector, and each of them carries the lot's whole sold
//! quantity. Non-negativity is not enforced here; preventing oversell is the
//! sale builder's job.

use std::collections::{BTreeMap, HashMap};

use crate::types::{CohortKey, LotKey, ReconciledBalance, SaleRecord, StockEntry};

/// Reconciles intake and sales history into balances.
///
/// Pure and idempotent: same inputs, same output, bit for bit.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use estoque_core::{reconcile, Money, StockEntry};
///
/// let d = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let entry = StockEntry {
///     product: "A".into(), sector: "S1".into(), lot: "LOT 1".into(),
///     quantity: 10, entry_date: d, expiry_date: d,
///     unit_cost: Money::from_cents(200), unit_sale_price: Money::from_cents(500),
/// };
/// let rows = reconcile(&[entry], &[]);
/// assert_eq!(rows[0].balance, 10);
/// assert_eq!(rows[0].expiry_date, Some(d));
/// ```
pub fn reconcile(entries: &[StockEntry], sales: &[SaleRecord]) -> Vec<ReconciledBalance> {
    // 1. Intake per cohort
    let mut quantity_in: BTreeMap<CohortKey, i64> = BTreeMap::new();
    for entry in entries {
        *quantity_in.entry(entry.cohort_key()).or_insert(0) += entry.quantity;
    }

    // 2. Sales per lot, negated so they compose additively with intake
    let mut sold_delta: BTreeMap<LotKey, i64> = BTreeMap::new();
    for sale in sales {
        *sold_delta.entry(sale.lot_key()).or_insert(0) -= sale.quantity;
    }

    // 5. Cohort → last entry seen in source order
    let mut last_entry: HashMap<CohortKey, &StockEntry> = HashMap::with_capacity(entries.len());
    for entry in entries {
        last_entry.insert(entry.cohort_key(), entry);
    }

    // 3. Full outer join on (product, lot)
    let mut joined: BTreeMap<LotKey, Vec<(Option<String>, i64)>> = BTreeMap::new();
    for (cohort, qty) in &quantity_in {
        joined
            .entry(cohort.lot_key())
            .or_default()
            .push((Some(cohort.sector.clone()), *qty));
    }
    for lot in sold_delta.keys() {
        joined.entry(lot.clone()).or_insert_with(|| vec![(None, 0)]);
    }

    let mut rows = Vec::with_capacity(quantity_in.len());
    for (lot_key, cohorts) in joined {
        let delta = sold_delta.get(&lot_key).copied().unwrap_or(0);

        for (sector, qty_in) in cohorts {
            // 4. Balance
            let balance = qty_in + delta;

            let matched = sector.as_ref().and_then(|sector| {
                last_entry
                    .get(&CohortKey {
                        product: lot_key.product.clone(),
                        lot: lot_key.lot.clone(),
                        sector: sector.clone(),
                    })
                    .copied()
            });

            let unit_cost = matched.map(|e| e.unit_cost);

            // 7. Depleted lots show no expiry
            let expiry_date = if balance == 0 {
                None
            } else {
                matched.map(|e| e.expiry_date)
            };

            rows.push(ReconciledBalance {
                product: lot_key.product.clone(),
                lot: lot_key.lot.clone(),
                sector,
                quantity_in: qty_in,
                quantity_sold: -delta,
                balance,
                entry_date: matched.map(|e| e.entry_date),
                expiry_date,
                unit_cost,
                // 6. Cost basis of what is left
                total_cost: unit_cost.map(|cost| cost * balance),
            });
        }
    }

    rows
}

/// First balance row for (product, lot), in reconciled order.
pub fn balance_for<'a>(
    balances: &'a [ReconciledBalance],
    product: &str,
    lot: &str,
) -> Option<&'a ReconciledBalance> {
    balances.iter().find(|b| b.is_lot(product, lot))
}

// =============================================================================
// Unit Tests
// =============================================================================
