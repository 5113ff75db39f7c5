//! # Product Collection
//!
//! The in-memory list of discovered products, newest first.
//!
//! ```text
//!   prepend(C) ──► [C, B, A]
//!                   ▲
//!                   └── index 0 is always the most recent discovery
//! ```

use crate::error::{CoreError, CoreResult};
use crate::types::Product;

/// Ordered, newest-first list of products. Ids are unique.
#[derive(Debug, Clone, Default)]
pub struct ProductCollection {
    products: Vec<Product>,
}

impl ProductCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a product at the front.
    ///
    /// Fails with [`CoreError::DuplicateProduct`] when the id is already present.
    pub fn prepend(&mut self, product: Product) -> CoreResult<()> {
        if self.get(&product.id).is_some() {
            return Err(CoreError::DuplicateProduct(product.id));
        }
        self.products.insert(0, product);
        Ok(())
    }

    /// Removes the product with `id`, if present.
    pub fn remove(&mut self, id: &str) -> Option<Product> {
        let index = self.products.iter().position(|p| p.id == id)?;
        Some(self.products.remove(index))
    }

    /// Removes the product at row `index`, if in range.
    pub fn remove_at(&mut self, index: usize) -> Option<Product> {
        if index < self.products.len() {
            Some(self.products.remove(index))
        } else {
            None
        }
    }

    /// Empties the collection, returning how many products were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.products.len();
        self.products.clear();
        removed
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    pub fn as_slice(&self) -> &[Product] {
        &self.products
    }
}

impl<'a> IntoIterator for &'a ProductCollection {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
