//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing unit cost × quantity in floats drifts:                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  The sheet stores every amount as a two-decimal string ("2.00"),        │
//! │  so integer cents represent every stored value exactly.                │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    "2.00" → 200 cents,  200 × 4 = 800 cents → "8.00"                    │
//! │    Reconciling twice gives bit-for-bit the same totals                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Text Form
//! `Display` is the persisted form: fixed two decimals, literal dot, no
//! currency symbol (`12.50`, `-0.40`). `FromStr` is lenient about the input
//! locale and accepts `12,50` as well.
//!
//! ## Usage
//! ```rust
//! use estoque_core::money::Money;
//!
//! let cost: Money = "2.00".parse().unwrap();
//! let total = cost.multiply_quantity(4);
//! assert_eq!(total.to_string(), "8.00");
//! assert_eq!(total.format_brl(), "R$ 8.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: a balance can go negative transiently, and so can
///   its total cost
/// - **Single field tuple struct**: zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  StockEntry.unit_cost ──────► ReconciledBalance.total_cost ──► valuation│
/// │                                                                         │
/// │  StockEntry.unit_sale_price ─► price floor check in the sale builder   │
/// │                                                                         │
/// │  SaleRecord.unit_price × qty ► SaleRecord.total_value ──► revenue      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use estoque_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (reais and centavos).
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use estoque_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(500);
    /// assert_eq!(unit_price.multiply_quantity(4).cents(), 2000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Renders the value for the operator, e.g. `R$ 12.50`.
    pub fn format_brl(&self) -> String {
        format!("R$ {}", self)
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a decimal amount into cents.
///
/// ## Accepted Forms
/// ```text
/// "12"       → 1200        "12,5"     → 1250
/// "12.5"     → 1250        "-0.40"    → -40
/// "1.234,56" → 123456      "2.005"    → 201 (half away from zero)
/// "R$ 5"     → 500
/// ```
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::invalid_format("amount", format!("'{}' {}", s, reason));

        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix("R$").map(str::trim_start).unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(ValidationError::required("amount"));
        }

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        // The right-most separator is the decimal point; any other
        // separator before it is a thousands separator.
        let normalized: String = match unsigned.rfind(|c: char| c == '.' || c == ',') {
            Some(idx) => {
                let (int_part, frac_part) = unsigned.split_at(idx);
                let int_digits: String = int_part.chars().filter(|c| *c != '.' && *c != ',').collect();
                format!("{}.{}", int_digits, &frac_part[1..])
            }
            None => unsigned.to_string(),
        };

        let (int_str, frac_str) = normalized.split_once('.').unwrap_or((normalized.as_str(), ""));
        if int_str.is_empty() && frac_str.is_empty() {
            return Err(invalid("has no digits"));
        }
        if !int_str.chars().all(|c| c.is_ascii_digit()) || !frac_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("is not a number"));
        }

        let major: i64 = if int_str.is_empty() {
            0
        } else {
            int_str.parse().map_err(|_| invalid("is too large"))?
        };

        let frac_bytes = frac_str.as_bytes();
        let digit = |i: usize| frac_bytes.get(i).map(|b| i64::from(b - b'0')).unwrap_or(0);
        let mut minor = digit(0) * 10 + digit(1);
        if digit(2) >= 5 {
            minor += 1;
        }

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// Arithmetic saturates instead of overflowing: totals over hand-edited
// tables must never abort a read cycle.

/// Two decimals, literal dot, no symbol. This is the persisted form.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
