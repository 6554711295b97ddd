//! # Error Types
//!
//! Domain-specific error types for estoque-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  estoque-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule / aggregate failures             │
//! │  └── ValidationError  - Operator input rejected                        │
//! │                                                                         │
//! │  estoque-store errors (separate crate)                                 │
//! │  └── StoreError       - Table read/write failures                      │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - What the operator sees (+ exit code)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → CliError → Operator  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Recovery Rules
//! - `ValidationError`: recovered locally, shown as a warning, session goes on
//! - `CoreError::EmptyData`: caught by the report builder, never propagated
//!   as a fault
//! - Everything persistence-related lives in the store crate

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// The stock/price variants are raised when a pending batch is re-checked
/// against a fresh reconciliation at confirm time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Product has no stock entry at all.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The (product, lot) pair has no positive balance.
    #[error("Lot {lot} of {product} is not available for sale")]
    LotNotAvailable { product: String, lot: String },

    /// Insufficient stock to complete sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Select "A - LOT 1" (balance: 3)
    ///      │
    ///      ▼
    /// Request qty: 5
    ///      │
    ///      ▼
    /// InsufficientStock { product: "A", lot: "LOT 1", available: 3, requested: 5 }
    /// ```
    #[error("Insufficient stock for {product} ({lot}): available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        lot: String,
        available: i64,
        requested: i64,
    },

    /// Unit price is below the lot's registered sale price.
    #[error("Price {offered} for {product} ({lot}) is below the minimum {minimum}")]
    PriceBelowFloor {
        product: String,
        lot: String,
        offered: Money,
        minimum: Money,
    },

    /// An aggregate was requested over zero rows.
    ///
    /// ## When This Occurs
    /// - Best-selling product with an empty sales history
    #[error("No data to compute {what}")]
    EmptyData { what: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are per-field or per-line rejections. A rejected sale line is
/// reported to the operator and left out of the batch; the session goes on.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., unparseable money, date, label).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., the same lot selected twice in one batch).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Checkout attempted with nothing selected.
    #[error("Select at least one product")]
    EmptySelection,

    /// The (product, lot) pair is not on the offered list.
    #[error("{product} - {lot} is not available for sale")]
    LotNotOffered { product: String, lot: String },

    /// Requested quantity outside `1..=balance`.
    #[error("Quantity for {product} ({lot}) must be between 1 and {available}, got {requested}")]
    QuantityExceedsBalance {
        product: String,
        lot: String,
        available: i64,
        requested: i64,
    },

    /// Unit price below the registered sale price.
    #[error("Unit price for {product} ({lot}) must be at least {minimum}, got {offered}")]
    PriceBelowFloor {
        product: String,
        lot: String,
        offered: Money,
        minimum: Money,
    },
}

impl ValidationError {
    /// Creates a `Required` error for a field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates an `InvalidFormat` error for a field.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product: "CAFE".to_string(),
            lot: "LOT 1".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for CAFE (LOT 1): available 3, requested 5"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("product").to_string(), "product is required");

        let err = ValidationError::PriceBelowFloor {
            product: "A".to_string(),
            lot: "LOT 1".to_string(),
            offered: Money::from_cents(450),
            minimum: Money::from_cents(500),
        };
        assert_eq!(
            err.to_string(),
            "Unit price for A (LOT 1) must be at least 5.00, got 4.50"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::EmptySelection.into();
        assert!(matches!(core_err, CoreError::Validation(ValidationError::EmptySelection)));
    }

    #[test]
    fn test_empty_data_message() {
        let err = CoreError::EmptyData {
            what: "best-selling product".to_string(),
        };
        assert_eq!(err.to_string(), "No data to compute best-selling product");
    }
}
