//! # Domain Types
//!
//! Core domain types of the stock & sales ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │   StockEntry    │   │   SaleRecord    │   │ ReconciledBalance   │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  product        │   │  sale_id        │   │  (derived only)     │   │
//! │  │  sector         │   │  product, lot   │   │  quantity_in        │   │
//! │  │  lot "LOT n"    │   │  quantity       │   │  quantity_sold      │   │
//! │  │  quantity       │   │  payment_method │   │  balance            │   │
//! │  │  entry/expiry   │   │  unit_price     │   │  expiry (or blank)  │   │
//! │  │  cost, price    │   │  total_value    │   │  unit/total cost    │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────────┘   │
//! │    persisted,             persisted,            recomputed from         │
//! │    append-only            append-only           scratch every cycle     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! - (product, lot, sector) identifies a stock-entry cohort
//! - (product, lot) is the unit sales draw against, whatever the sector

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;
use crate::SALE_ID_FORMAT;

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale line was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash.
    Cash,
    /// Instant bank transfer.
    Pix,
    /// Credit card on an external terminal.
    CreditCard,
    /// Debit card on an external terminal.
    DebitCard,
}

impl PaymentMethod {
    /// Every method, in the order they are offered to the operator.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Pix,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
    ];

    /// The label stored in the `Método de Pagamento` column.
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Dinheiro",
            PaymentMethod::Pix => "Pix",
            PaymentMethod::CreditCard => "Cartão de Crédito",
            PaymentMethod::DebitCard => "Cartão de Débito",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the stored label, the snake_case name, or a short alias.
impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        let method = match key.as_str() {
            "dinheiro" | "cash" => PaymentMethod::Cash,
            "pix" => PaymentMethod::Pix,
            "cartão de crédito" | "cartao de credito" | "credit_card" | "credit" | "credito" => {
                PaymentMethod::CreditCard
            }
            "cartão de débito" | "cartao de debito" | "debit_card" | "debit" | "debito" => {
                PaymentMethod::DebitCard
            }
            _ => {
                return Err(ValidationError::NotAllowed {
                    field: "payment method".to_string(),
                    allowed: PaymentMethod::ALL.iter().map(|m| m.label().to_string()).collect(),
                })
            }
        };
        Ok(method)
    }
}

// =============================================================================
// Keys
// =============================================================================

/// (product, lot): what a sale draws against.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LotKey {
    pub product: String,
    pub lot: String,
}

impl LotKey {
    pub fn new(product: impl Into<String>, lot: impl Into<String>) -> Self {
        LotKey {
            product: product.into(),
            lot: lot.into(),
        }
    }
}

impl fmt::Display for LotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.product, self.lot)
    }
}

/// (product, lot, sector): one stock-entry cohort.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CohortKey {
    pub product: String,
    pub lot: String,
    pub sector: String,
}

impl CohortKey {
    /// The sector-independent part of the key.
    pub fn lot_key(&self) -> LotKey {
        LotKey::new(self.product.clone(), self.lot.clone())
    }
}

// =============================================================================
// Sale Id
// =============================================================================

/// Identifier shared by every record of one checkout batch.
///
/// Formatted as `%Y%m%d%H%M%S` from the moment the batch was opened.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(String);

impl SaleId {
    /// Derives the id from the batch-open timestamp.
    pub fn from_timestamp(at: NaiveDateTime) -> Self {
        SaleId(at.format(SALE_ID_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SaleId {
    fn from(value: String) -> Self {
        SaleId(value)
    }
}

impl fmt::Display for SaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Stock Entry
// =============================================================================

/// One stock intake. Never mutated after creation; balances are derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    /// Product name, upper-cased.
    pub product: String,

    /// Sector the lot is stored in, upper-cased.
    pub sector: String,

    /// Lot label, `LOT {n}` numbered per product.
    pub lot: String,

    /// Units received (≥ 0 at creation).
    pub quantity: i64,

    pub entry_date: NaiveDate,

    pub expiry_date: NaiveDate,

    /// Cost per unit.
    pub unit_cost: Money,

    /// Minimum sale price per unit.
    pub unit_sale_price: Money,
}

impl StockEntry {
    pub fn cohort_key(&self) -> CohortKey {
        CohortKey {
            product: self.product.clone(),
            lot: self.lot.clone(),
            sector: self.sector.clone(),
        }
    }

    pub fn lot_key(&self) -> LotKey {
        LotKey::new(self.product.clone(), self.lot.clone())
    }

    /// Whether this entry belongs to the given (product, lot).
    pub fn is_lot(&self, product: &str, lot: &str) -> bool {
        self.product == product && self.lot == lot
    }
}

// =============================================================================
// Sale Record
// =============================================================================

/// One sold line. Created only when a batch is confirmed; append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub sale_id: SaleId,
    pub product: String,
    pub lot: String,
    /// Units sold (> 0).
    pub quantity: i64,
    pub payment_method: PaymentMethod,
    /// Price per unit, never below the lot's sale price.
    pub unit_price: Money,
    /// `unit_price × quantity`.
    pub total_value: Money,
    pub sale_timestamp: NaiveDateTime,
}

impl SaleRecord {
    pub fn lot_key(&self) -> LotKey {
        LotKey::new(self.product.clone(), self.lot.clone())
    }
}

// =============================================================================
// Reconciled Balance
// =============================================================================

/// Current position of one (product, lot, sector), derived and never stored.
///
/// ## Orphan Rows
/// A (product, lot) that has sales but no intake still gets a row, with
/// `sector: None`, `quantity_in: 0`, a negative balance and no cost basis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledBalance {
    pub product: String,
    pub lot: String,
    pub sector: Option<String>,
    /// Sum of intake quantities for (product, lot, sector).
    pub quantity_in: i64,
    /// Sum of sold quantities for (product, lot), regardless of sector.
    pub quantity_sold: i64,
    /// `quantity_in - quantity_sold`. Negative only in an erroneous history.
    pub balance: i64,
    /// Entry date of the matching entry (last one for the cohort).
    pub entry_date: Option<NaiveDate>,
    /// Expiry of the matching entry; blank when the balance is zero.
    pub expiry_date: Option<NaiveDate>,
    pub unit_cost: Option<Money>,
    /// `balance × unit_cost`.
    pub total_cost: Option<Money>,
}

impl ReconciledBalance {
    pub fn lot_key(&self) -> LotKey {
        LotKey::new(self.product.clone(), self.lot.clone())
    }

    pub fn is_lot(&self, product: &str, lot: &str) -> bool {
        self.product == product && self.lot == lot
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_labels_round_trip() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.label().parse::<PaymentMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_payment_method_aliases() {
        assert_eq!("CASH".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("credit_card".parse::<PaymentMethod>().unwrap(), PaymentMethod::CreditCard);
        assert_eq!(" debito ".parse::<PaymentMethod>().unwrap(), PaymentMethod::DebitCard);
        assert!("boleto".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_sale_id_format() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap();
        assert_eq!(SaleId::from_timestamp(at).as_str(), "20240309140507");
    }

    #[test]
    fn test_lot_key_display() {
        assert_eq!(LotKey::new("CAFE", "LOT 2").to_string(), "CAFE - LOT 2");
    }

    #[test]
    fn test_cohort_key_orders_by_product_lot_sector() {
        let a = CohortKey {
            product: "A".into(),
            lot: "LOT 1".into(),
            sector: "S2".into(),
        };
        let b = CohortKey {
            product: "A".into(),
            lot: "LOT 2".into(),
            sector: "S1".into(),
        };
        assert!(a < b);
        assert_eq!(a.lot_key(), LotKey::new("A", "LOT 1"));
    }
}
