//! # Lookup Response Models
//!
//! The JSON document returned by the lookup service.
//!
//! ```json
//! {
//!   "code": "OK",
//!   "total": 1,
//!   "offset": 0,
//!   "items": [{
//!     "ean": "0885909950805",
//!     "title": "Apple iPhone 6",
//!     "brand": "Apple",
//!     "category": "Electronics > Phones",
//!     "lowest_recorded_price": 3.99,
//!     "highest_recorded_price": 1999.99,
//!     "offers": [{ "merchant": "Newegg.com", "price": 399.99 }]
//!   }]
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use scanlist_core::pricing::{normalize_price, DisplayPrice};
use scanlist_core::{NO_DESCRIPTION, UNCATEGORIZED, UNKNOWN_PRODUCT_NAME};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
    /// Required, but `null` reads as no items.
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<LookupItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupItem {
    #[serde(default)]
    pub ean: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub upc: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub dimension: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub lowest_recorded_price: Option<f64>,
    #[serde(default)]
    pub highest_recorded_price: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub offers: Vec<Offer>,
}

/// One merchant listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    #[serde(default)]
    pub merchant: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    /// Reported as a string or a number depending on the merchant.
    #[serde(default)]
    pub list_price: serde_json::Value,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub shipping: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub updated_t: Option<i64>,
}

/// Reads an explicit `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// First non-blank candidate.
fn first_present<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .filter_map(Option::as_deref)
        .find(|s| !s.trim().is_empty())
}

impl LookupItem {
    pub fn display_name(&self) -> &str {
        first_present(&[&self.title]).unwrap_or(UNKNOWN_PRODUCT_NAME)
    }

    /// description → brand → model → sentinel
    pub fn display_description(&self) -> &str {
        first_present(&[&self.description, &self.brand, &self.model]).unwrap_or(NO_DESCRIPTION)
    }

    pub fn display_category(&self) -> &str {
        first_present(&[&self.category]).unwrap_or(UNCATEGORIZED)
    }

    pub fn offer_prices(&self) -> Vec<f64> {
        self.offers.iter().filter_map(|o| o.price).collect()
    }

    pub fn display_price(&self) -> DisplayPrice {
        normalize_price(
            &self.offer_prices(),
            self.lowest_recorded_price,
            self.highest_recorded_price,
        )
    }
}
