//! # Price Normalization
//!
//! Derives the single price shown for a product from whatever the lookup
//! service reported.
//!
//! ## Rule Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. offers[].price    any positive?  ──► average of the positive ones   │
//! │           │ no                                                          │
//! │           ▼                                                             │
//! │  2. lowest & highest  both positive? ──► midpoint                       │
//! │           │ no                                                          │
//! │           ▼                                                             │
//! │  3. "N/A"                                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Offers that are present but all zero or negative fall through to rule 2.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

/// Text shown when no price could be derived.
pub const PRICE_UNAVAILABLE: &str = "N/A";

/// The price shown for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum DisplayPrice {
    Amount(Money),
    Unavailable,
}

impl DisplayPrice {
    /// The amount, if one was derived.
    pub fn amount(&self) -> Option<Money> {
        match self {
            DisplayPrice::Amount(money) => Some(*money),
            DisplayPrice::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, DisplayPrice::Amount(_))
    }
}

impl fmt::Display for DisplayPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayPrice::Amount(money) => write!(f, "{}", money),
            DisplayPrice::Unavailable => f.write_str(PRICE_UNAVAILABLE),
        }
    }
}

/// Converts a reported price, keeping only finite positive amounts.
///
/// The sign check runs on the reported value, so a sub-cent offer still
/// counts as an offer.
fn positive_amount(value: f64) -> Option<Money> {
    if value.is_finite() && value > 0.0 {
        Money::from_decimal(value)
    } else {
        None
    }
}

/// Applies the price rules to one lookup result.
///
/// ## Example
/// ```rust
/// use scanlist_core::pricing::{normalize_price, DisplayPrice};
///
/// assert_eq!(normalize_price(&[10.0, 20.0], None, None).to_string(), "$15.00");
/// assert_eq!(normalize_price(&[], Some(5.0), Some(15.0)).to_string(), "$10.00");
/// assert_eq!(normalize_price(&[], Some(5.0), None), DisplayPrice::Unavailable);
/// ```
pub fn normalize_price(
    offer_prices: &[f64],
    lowest: Option<f64>,
    highest: Option<f64>,
) -> DisplayPrice {
    let offers: Vec<Money> = offer_prices
        .iter()
        .copied()
        .filter_map(positive_amount)
        .collect();

    if let Some(average) = Money::average(&offers) {
        return DisplayPrice::Amount(average);
    }

    match (lowest.and_then(positive_amount), highest.and_then(positive_amount)) {
        (Some(low), Some(high)) => DisplayPrice::Amount(Money::midpoint(low, high)),
        _ => DisplayPrice::Unavailable,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
