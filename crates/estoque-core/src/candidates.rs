//! # Sale Candidates
//!
//! The list of lots offered to the operator at checkout.
//!
//! ## Selection Rule
//! ```text
//! reconciled balances
//!        │
//!        ▼
//! keep balance > 0
//!        │
//!        ▼
//! stable sort by (product, expiry) ascending, missing expiry last
//!        │
//!        ▼
//! drop duplicate (product, lot), keeping the LAST one
//! ```
//!
//! Duplicates only occur when one lot is stored in more than one sector.
//! Keeping the last row after an ascending sort means the surviving row is
//! the one with the *latest* expiry among that lot's sectors, not the
//! earliest. This is the established behavior of the ledger and is kept
//! as-is; see DESIGN.md.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::{LotKey, ReconciledBalance};

/// One (product, lot) the operator may sell from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleCandidate {
    pub product: String,
    pub lot: String,
    pub sector: Option<String>,
    /// Balance of the surviving row.
    pub balance: i64,
    pub expiry_date: Option<NaiveDate>,
}

impl SaleCandidate {
    /// `"{product} - {lot}"`, as shown in the selection list.
    pub fn label(&self) -> String {
        format!("{} - {}", self.product, self.lot)
    }

    pub fn lot_key(&self) -> LotKey {
        LotKey::new(self.product.clone(), self.lot.clone())
    }
}

/// Splits a `"{product} - {lot}"` label back into its key.
pub fn parse_label(label: &str) -> Result<LotKey, ValidationError> {
    match label.rsplit_once(" - ") {
        Some((product, lot)) if !product.trim().is_empty() && !lot.trim().is_empty() => {
            Ok(LotKey::new(product.trim(), lot.trim()))
        }
        _ => Err(ValidationError::invalid_format(
            "selection",
            format!("expected 'PRODUCT - LOT', got '{}'", label),
        )),
    }
}

fn expiry_order(a: &Option<NaiveDate>, b: &Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Builds the offered list from reconciled balances.
pub fn sale_candidates(balances: &[ReconciledBalance]) -> Vec<SaleCandidate> {
    let mut available: Vec<&ReconciledBalance> = balances.iter().filter(|b| b.balance > 0).collect();

    // sort_by is stable: equal keys keep their reconciled order
    available.sort_by(|a, b| {
        a.product
            .cmp(&b.product)
            .then_with(|| expiry_order(&a.expiry_date, &b.expiry_date))
    });

    // keep="last": walk backwards, first sighting wins, then restore order
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut kept: Vec<&ReconciledBalance> = available
        .into_iter()
        .rev()
        .filter(|b| seen.insert((b.product.as_str(), b.lot.as_str())))
        .collect();
    kept.reverse();

    kept.into_iter()
        .map(|b| SaleCandidate {
            product: b.product.clone(),
            lot: b.lot.clone(),
            sector: b.sector.clone(),
            balance: b.balance,
            expiry_date: b.expiry_date,
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
