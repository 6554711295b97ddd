//! # Validation Module
//!
//! Field-level rules for operator input.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI argument parsing (clap)                                  │
//! │  ├── Types: integers, dates, payment method names                      │
//! │  └── Immediate usage errors                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Names present and bounded                                         │
//! │  ├── Quantities within balance                                         │
//! │  └── Prices at or above the lot's floor                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Codec (estoque-store)                                        │
//! │  └── Every stored cell parses back into a typed value                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_PRODUCT_NAME_LEN, MAX_QUANTITY, MAX_SECTOR_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name (already normalized).
///
/// ## Example
/// ```rust
/// use estoque_core::validation::validate_product_name;
///
/// assert!(validate_product_name("CAFE TORRADO").is_ok());
/// assert!(validate_product_name("  ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("product"));
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "product".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    // " - " separates product from lot in candidate labels
    if name.contains(" - ") {
        return Err(ValidationError::invalid_format(
            "product",
            "must not contain ' - '",
        ));
    }

    Ok(())
}

/// Validates a sector name. An empty sector is allowed.
pub fn validate_sector(sector: &str) -> ValidationResult<()> {
    if sector.chars().count() > MAX_SECTOR_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "sector".to_string(),
            max: MAX_SECTOR_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the quantity of a stock intake (zero allowed, at most
/// [`MAX_QUANTITY`]).
pub fn validate_intake_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        });
    }
    if qty > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a sale quantity against the lot's current balance.
///
/// ## Rule
/// `1 ≤ requested ≤ available`
///
/// ```text
/// requested: 5, available: 3
///      │
///      ▼
/// validate_sale_quantity ← THIS FUNCTION
///      │
///      └── QuantityExceedsBalance → line rejected, batch goes on
/// ```
pub fn validate_sale_quantity(
    product: &str,
    lot: &str,
    requested: i64,
    available: i64,
) -> ValidationResult<()> {
    if requested < 1 || requested > available {
        return Err(ValidationError::QuantityExceedsBalance {
            product: product.to_string(),
            lot: lot.to_string(),
            available,
            requested,
        });
    }

    Ok(())
}

/// Validates a monetary amount entered at intake.
pub fn validate_amount_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price against the lot's minimum sale price.
///
/// ## Example
/// ```rust
/// use estoque_core::money::Money;
/// use estoque_core::validation::validate_price_floor;
///
/// let floor = Money::from_cents(500);
/// assert!(validate_price_floor("A", "LOT 1", Money::from_cents(500), floor).is_ok());
/// assert!(validate_price_floor("A", "LOT 1", Money::from_cents(499), floor).is_err());
/// ```
pub fn validate_price_floor(
    product: &str,
    lot: &str,
    offered: Money,
    minimum: Money,
) -> ValidationResult<()> {
    if offered < minimum {
        return Err(ValidationError::PriceBelowFloor {
            product: product.to_string(),
            lot: lot.to_string(),
            offered,
            minimum,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
