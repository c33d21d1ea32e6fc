//! Result aggregation across tool outputs
//!
//! Several tools in one conversation run may surface the same product. The
//! [`ProductAccumulator`] keeps one entry per identity key: the first
//! occurrence fixes the position, later occurrences overwrite the contents
//! (last write wins).

use std::collections::HashMap;

use super::entities::Product;

/// Running, deduplicated product set for one conversation run.
#[derive(Debug, Clone, Default)]
pub struct ProductAccumulator {
    products: Vec<Product>,
    index: HashMap<i64, usize>,
}

impl ProductAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from an existing list (duplicates collapse as usual)
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut acc = Self::new();
        acc.extend(products);
        acc
    }

    /// Insert or replace by identity. Returns `true` if the identity was new.
    pub fn insert(&mut self, product: Product) -> bool {
        match self.index.get(&product.identity()) {
            Some(&pos) => {
                self.products[pos] = product;
                false
            }
            None => {
                self.index.insert(product.identity(), self.products.len());
                self.products.push(product);
                true
            }
        }
    }

    pub fn extend(&mut self, products: impl IntoIterator<Item = Product>) {
        for product in products {
            self.insert(product);
        }
    }

    /// Parse the entries of a tool payload's `products` array and absorb them.
    ///
    /// Entries that do not deserialize into a [`Product`] are skipped.
    /// Returns `(parsed, skipped)`.
    pub fn absorb_entries(&mut self, entries: &[serde_json::Value]) -> (usize, usize) {
        let mut parsed = 0;
        let mut skipped = 0;
        for entry in entries {
            match serde_json::from_value::<Product>(entry.clone()) {
                Ok(product) => {
                    self.insert(product);
                    parsed += 1;
                }
                Err(_) => skipped += 1,
            }
        }
        (parsed, skipped)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn into_products(self) -> Vec<Product> {
        self.products
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overlapping_results_keep_one_entry_per_identity() {
        let mut acc = ProductAccumulator::new();
        acc.absorb_entries(&[
            json!({"id": 1, "title": "iPhone 15", "price": 799.0}),
            json!({"id": 2, "title": "iPhone 15 Plus", "price": 899.0}),
        ]);
        acc.absorb_entries(&[
            json!({"id": 2, "title": "iPhone 15 Plus", "price": 849.0}),
            json!({"id": 3, "title": "iPhone 15 Pro", "price": 999.0}),
        ]);

        let ids: Vec<i64> = acc.products().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        // Last write wins, first position kept
        assert_eq!(acc.products()[1].price, 849.0);
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let mut acc = ProductAccumulator::new();
        let (parsed, skipped) = acc.absorb_entries(&[
            json!({"id": 1, "title": "Kettle", "price": 20.0}),
            json!({"title": "no id"}),
            json!("garbage"),
        ]);
        assert_eq!((parsed, skipped), (1, 2));
        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn insert_reports_new_identities() {
        let mut acc = ProductAccumulator::from_products(vec![Product::new(5, "Lamp", 10.0)]);
        assert!(!acc.insert(Product::new(5, "Lamp v2", 12.0)));
        assert!(acc.insert(Product::new(6, "Desk", 120.0)));
        assert_eq!(acc.into_products().len(), 2);
    }
}
