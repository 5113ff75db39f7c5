//! # Product Resolver
//!
//! Validates the barcode, asks the lookup collaborator and builds the
//! product with its display fallbacks.

use chrono::{DateTime, Utc};
use tracing::debug;

use scanlist_core::validation::validate_barcode;
use scanlist_core::Product;

use crate::client::ProductLookup;
use crate::error::LookupResult;
use crate::models::LookupItem;

/// Outcome of a successful lookup round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(Product),
    /// The service answered but knows nothing about the code.
    NotFound,
}

/// Builds the product for `barcode` from a lookup item.
pub fn product_from_item(item: &LookupItem, barcode: &str, discovered_at: DateTime<Utc>) -> Product {
    Product::new_discovered(
        barcode,
        discovered_at,
        item.display_name(),
        item.display_description(),
        item.display_price(),
        item.display_category(),
    )
}

pub struct ProductResolver<L> {
    lookup: L,
}

impl<L: ProductLookup> ProductResolver<L> {
    pub fn new(lookup: L) -> Self {
        ProductResolver { lookup }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub async fn resolve(&self, barcode: &str) -> LookupResult<Resolution> {
        self.resolve_at(barcode, Utc::now()).await
    }

    /// Like [`resolve`](Self::resolve) with an explicit discovery time.
    pub async fn resolve_at(
        &self,
        barcode: &str,
        discovered_at: DateTime<Utc>,
    ) -> LookupResult<Resolution> {
        validate_barcode(barcode)?;

        match self.lookup.lookup(barcode).await? {
            Some(item) => {
                let product = product_from_item(&item, barcode, discovered_at);
                debug!(barcode, name = %product.name, price = %product.average_price, "Resolved product");
                Ok(Resolution::Found(product))
            }
            None => {
                debug!(barcode, "No product data");
                Ok(Resolution::NotFound)
            }
        }
    }
}
