//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The lookup service reports prices as JSON numbers:                    │
//! │    { "price": 0.1 }, { "price": 0.2 }                                   │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: convert once at the boundary, then integer cents        │
//! │    Money::from_decimal(0.1) = 10 cents                                 │
//! │    Money::from_decimal(0.2) = 20 cents                                 │
//! │    10 + 20 = 30 cents → "$0.30"                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use scanlist_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let total = price + Money::from_cents(500);
//! assert_eq!(total.to_string(), "$15.99");
//!
//! // Lookup prices enter through from_decimal exactly once
//! assert_eq!(Money::from_decimal(12.5), Some(Money::from_cents(1250)));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  offers[].price ──► from_decimal ──► Money::average ──┐                 │
/// │                                                       ├──► "$15.00"     │
/// │  lowest/highest ──► from_decimal ──► Money::midpoint ─┘                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use scanlist_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount (as reported by the lookup service) to cents.
    ///
    /// Rounds half away from zero. Returns `None` for NaN, infinities and
    /// amounts that do not fit in `i64` cents.
    ///
    /// ## Example
    /// ```rust
    /// use scanlist_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(19.99), Some(Money::from_cents(1999)));
    /// assert_eq!(Money::from_decimal(f64::NAN), None);
    /// ```
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }

        let cents = (amount * 100.0).round();
        if cents > i64::MAX as f64 || cents < i64::MIN as f64 {
            return None;
        }

        Some(Money(cents as i64))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
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

    /// Arithmetic mean of a set of amounts, rounded half away from zero to
    /// the cent.
    ///
    /// Returns `None` for an empty slice.
    ///
    /// ## Example
    /// ```rust
    /// use scanlist_core::money::Money;
    ///
    /// let prices = [Money::from_cents(1000), Money::from_cents(2000)];
    /// assert_eq!(Money::average(&prices), Some(Money::from_cents(1500)));
    ///
    /// // $0.01 + $0.02 → $0.015 → $0.02
    /// let odd = [Money::from_cents(1), Money::from_cents(2)];
    /// assert_eq!(Money::average(&odd), Some(Money::from_cents(2)));
    /// ```
    pub fn average(amounts: &[Money]) -> Option<Money> {
        if amounts.is_empty() {
            return None;
        }

        // i128 so that summing many large amounts cannot overflow
        let sum: i128 = amounts.iter().map(|m| m.0 as i128).sum();
        let count = amounts.len() as i128;

        Some(Money(div_round_half_away(sum, count) as i64))
    }

    /// Midpoint between two amounts, rounded like [`Money::average`].
    pub fn midpoint(low: Money, high: Money) -> Money {
        let sum = low.0 as i128 + high.0 as i128;
        Money(div_round_half_away(sum, 2) as i64)
    }
}

/// Integer division rounding half away from zero. `divisor` must be positive.
fn div_round_half_away(value: i128, divisor: i128) -> i128 {
    if value >= 0 {
        (2 * value + divisor) / (2 * divisor)
    } else {
        -((-2 * value + divisor) / (2 * divisor))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Displays as `$D.CC`, the format shown in the product list and CSV.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
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
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
