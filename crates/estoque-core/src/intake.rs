//! # Stock Intake
//!
//! Turns an operator's intake form into a new [`StockEntry`], assigning the
//! next lot number for the product.
//!
//! ## Lot Numbering
//! ```text
//! existing lots of "CAFE":  LOT 1, LOT 2, LOT 7
//!                                         │
//!          max numeric suffix = 7 ────────┘
//!                                         ▼
//! next lot for "CAFE":      LOT 8
//!
//! product never seen:       LOT 1
//! ```
//! Numbering is per product. The sector plays no part.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::StockEntry;
use crate::validation::{
    validate_amount_non_negative, validate_intake_quantity, validate_product_name, validate_sector,
};
use crate::LOT_PREFIX;

/// What the operator types into the intake form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockIntake {
    pub product: String,
    pub sector: String,
    pub quantity: i64,
    pub expiry_date: NaiveDate,
    pub unit_cost: Money,
    pub unit_sale_price: Money,
}

impl StockIntake {
    /// Trims and upper-cases product and sector.
    pub fn normalize(mut self) -> Self {
        self.product = self.product.trim().to_uppercase();
        self.sector = self.sector.trim().to_uppercase();
        self
    }

    /// Checks every field. Call after [`normalize`](Self::normalize).
    pub fn validate(&self) -> CoreResult<()> {
        validate_product_name(&self.product)?;
        validate_sector(&self.sector)?;
        validate_intake_quantity(self.quantity)?;
        validate_amount_non_negative("cost", self.unit_cost)?;
        validate_amount_non_negative("sale price", self.unit_sale_price)?;
        Ok(())
    }
}

/// Numeric suffix of a lot label: the first run of ASCII digits.
///
/// `"LOT 12"` → 12, `"LOTE 3"` → 3, `"A"` → None.
pub fn lot_number(lot: &str) -> Option<u64> {
    let start = lot.find(|c: char| c.is_ascii_digit())?;
    let digits: String = lot[start..].chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Label of the next lot for `product`.
///
/// ## Example
/// ```rust
/// use estoque_core::intake::next_lot;
///
/// assert_eq!(next_lot(&[], "CAFE").unwrap(), "LOT 1");
/// ```
///
/// ## Errors
/// `InvalidFormat` when the highest existing lot number has no successor
/// (a hand-edited `LOT 18446744073709551615`).
pub fn next_lot(entries: &[StockEntry], product: &str) -> Result<String, ValidationError> {
    let highest = entries
        .iter()
        .filter(|e| e.product == product)
        .filter_map(|e| lot_number(&e.lot))
        .max();

    let next = match highest {
        None => 1,
        Some(n) => n.checked_add(1).ok_or_else(|| {
            ValidationError::invalid_format("lot", format!("lot number {} of {} cannot be incremented", n, product))
        })?,
    };
    Ok(format!("{} {}", LOT_PREFIX, next))
}

/// Builds the stock entry for an intake.
///
/// ## Steps
/// 1. Normalize product and sector (upper-case)
/// 2. Validate every field
/// 3. Assign the next lot of the product
/// 4. Stamp `today` as the entry date
pub fn build_stock_entry(
    intake: StockIntake,
    existing: &[StockEntry],
    today: NaiveDate,
) -> CoreResult<StockEntry> {
    let intake = intake.normalize();
    intake.validate()?;

    let lot = next_lot(existing, &intake.product)?;
    debug!(product = %intake.product, lot = %lot, quantity = intake.quantity, "Assigned lot");

    Ok(StockEntry {
        product: intake.product,
        sector: intake.sector,
        lot,
        quantity: intake.quantity,
        entry_date: today,
        expiry_date: intake.expiry_date,
        unit_cost: intake.unit_cost,
        unit_sale_price: intake.unit_sale_price,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
