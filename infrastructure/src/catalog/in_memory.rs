//! In-memory product catalog.
//!
//! Backs the product tools in the binary and in tests. Seeded either from a
//! JSON file or from the built-in sample catalog.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Deserialize;
use shopwise_application::ports::product_catalog::{CatalogError, ProductCatalog};
use shopwise_domain::{PricePoint, Product};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogSeedError {
    #[error("Failed to read catalog seed {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog seed {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Seed file layout: either a bare product array or an object with history
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogSeed {
    Products(Vec<Product>),
    Full {
        products: Vec<Product>,
        #[serde(default)]
        price_history: Vec<PricePoint>,
    },
}

#[derive(Default)]
pub struct InMemoryProductCatalog {
    products: RwLock<Vec<Product>>,
    history: RwLock<HashMap<i64, Vec<PricePoint>>>,
}

impl InMemoryProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_products(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
            history: RwLock::default(),
        }
    }

    pub fn with_history(self, points: impl IntoIterator<Item = PricePoint>) -> Self {
        for point in points {
            self.record_price(point);
        }
        self
    }

    /// Load a catalog from a JSON seed file
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, CatalogSeedError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogSeedError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let seed: CatalogSeed =
            serde_json::from_str(&content).map_err(|source| CatalogSeedError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        let catalog = match seed {
            CatalogSeed::Products(products) => Self::from_products(products),
            CatalogSeed::Full {
                products,
                price_history,
            } => Self::from_products(products).with_history(price_history),
        };
        tracing::info!(
            path = %path.display(),
            products = catalog.len(),
            "Loaded product catalog"
        );
        Ok(catalog)
    }

    /// Small built-in catalog for demos
    pub fn sample() -> Self {
        let products = vec![
            Product::new(1, "Apple iPhone 15 128GB", 799.0)
                .with_brand("Apple")
                .with_rating(4.7)
                .with_store("TechMart"),
            Product::new(2, "Apple iPhone 15 Pro 256GB", 1099.0)
                .with_brand("Apple")
                .with_rating(4.8)
                .with_store("TechMart"),
            Product::new(3, "Samsung Galaxy S24 128GB", 749.0)
                .with_brand("Samsung")
                .with_rating(4.6)
                .with_store("PhoneHub"),
            Product::new(4, "Google Pixel 8 128GB", 599.0)
                .with_brand("Google")
                .with_rating(4.5)
                .with_store("PhoneHub"),
            Product::new(5, "Sony WH-1000XM5 Wireless Headphones", 349.0)
                .with_brand("Sony")
                .with_rating(4.7)
                .with_store("AudioWorld"),
            Product::new(6, "Bose QuietComfort Ultra Headphones", 379.0)
                .with_brand("Bose")
                .with_rating(4.6)
                .with_store("AudioWorld"),
            Product::new(7, "Apple MacBook Air 13 M3 Laptop", 1099.0)
                .with_brand("Apple")
                .with_rating(4.8)
                .with_store("TechMart"),
            Product::new(8, "Dell XPS 13 Laptop", 999.0)
                .with_brand("Dell")
                .with_rating(4.4)
                .with_store("CompuStore"),
            Product::new(9, "Lenovo ThinkPad X1 Carbon Laptop", 1349.0)
                .with_brand("Lenovo")
                .with_rating(4.5)
                .with_store("CompuStore")
                .owned_by("demo"),
            Product::new(10, "Apple AirPods Pro 2", 249.0)
                .with_brand("Apple")
                .with_rating(4.7)
                .with_store("AudioWorld")
                .owned_by("demo"),
        ];

        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single();
        let history = base
            .map(|base| sample_history(base, &products))
            .unwrap_or_default();

        Self::from_products(products).with_history(history)
    }

    pub fn add_product(&self, product: Product) {
        let mut products = self.products.write().unwrap_or_else(|e| e.into_inner());
        match products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => products.push(product),
        }
    }

    pub fn record_price(&self, point: PricePoint) {
        self.history
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(point.product_id)
            .or_default()
            .push(point);
    }

    pub fn len(&self) -> usize {
        self.products
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Three monthly observations per product, drifting toward the current price
fn sample_history(base: DateTime<Utc>, products: &[Product]) -> Vec<PricePoint> {
    products
        .iter()
        .flat_map(|p| {
            let drift = if p.id % 2 == 0 { 1.08 } else { 0.97 };
            (0..3).map(move |month| {
                let factor = drift + (1.0 - drift) * month as f64 / 3.0;
                PricePoint::new(
                    p.id,
                    (p.price * factor * 100.0).round() / 100.0,
                    base + Duration::days(30 * month),
                )
            })
        })
        .collect()
}

#[async_trait]
impl ProductCatalog for InMemoryProductCatalog {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Product>, CatalogError> {
        if query.trim().is_empty() {
            return Err(CatalogError::InvalidQuery(
                "search query must not be empty".to_string(),
            ));
        }
        let products = self.products.read().unwrap_or_else(|e| e.into_inner());
        Ok(products
            .iter()
            .filter(|p| p.matches_terms(query))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get(&self, product_id: i64) -> Result<Option<Product>, CatalogError> {
        let products = self.products.read().unwrap_or_else(|e| e.into_inner());
        Ok(products.iter().find(|p| p.id == product_id).cloned())
    }

    async fn user_products(&self, user_id: &str) -> Result<Vec<Product>, CatalogError> {
        let products = self.products.read().unwrap_or_else(|e| e.into_inner());
        Ok(products
            .iter()
            .filter(|p| p.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }

    async fn price_history(&self, product_id: i64) -> Result<Vec<PricePoint>, CatalogError> {
        let history = self.history.read().unwrap_or_else(|e| e.into_inner());
        let mut points = history.get(&product_id).cloned().unwrap_or_default();
        points.sort_by_key(|p| p.recorded_at);
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_search_matches_all_terms() {
        let catalog = InMemoryProductCatalog::sample();

        let iphones = catalog.search("iphone 15", 10).await.unwrap();
        assert_eq!(iphones.len(), 2);

        let laptops = catalog.search("laptop", 2).await.unwrap();
        assert_eq!(laptops.len(), 2);

        assert!(catalog.search("  ", 10).await.is_err());
    }

    #[tokio::test]
    async fn test_user_products_and_history() {
        let catalog = InMemoryProductCatalog::sample();

        let owned = catalog.user_products("demo").await.unwrap();
        assert_eq!(owned.iter().map(|p| p.id).collect::<Vec<_>>(), vec![9, 10]);

        let history = catalog.price_history(1).await.unwrap();
        assert_eq!(history.len(), 3);
        assert!(history.windows(2).all(|w| w[0].recorded_at <= w[1].recorded_at));
        assert!(catalog.price_history(999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_product_replaces_by_id() {
        let catalog = InMemoryProductCatalog::new();
        catalog.add_product(Product::new(1, "Old", 1.0));
        catalog.add_product(Product::new(1, "New", 2.0));

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(1).await.unwrap().unwrap().title, "New");
    }

    #[tokio::test]
    async fn test_seed_file_formats() {
        let dir = tempfile::tempdir().unwrap();

        let bare = dir.path().join("bare.json");
        std::fs::File::create(&bare)
            .unwrap()
            .write_all(br#"[{"id": 1, "title": "Kettle", "price": 30.0}]"#)
            .unwrap();
        let catalog = InMemoryProductCatalog::from_seed_file(&bare).unwrap();
        assert_eq!(catalog.len(), 1);

        let full = dir.path().join("full.json");
        std::fs::File::create(&full)
            .unwrap()
            .write_all(
                br#"{"products": [{"id": 2, "title": "Toaster", "price": 45.0}],
                     "price_history": [{"product_id": 2, "price": 50.0, "recorded_at": "2024-01-01T00:00:00Z"}]}"#,
            )
            .unwrap();
        let catalog = InMemoryProductCatalog::from_seed_file(&full).unwrap();
        assert_eq!(catalog.price_history(2).await.unwrap().len(), 1);

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{not json").unwrap();
        assert!(matches!(
            InMemoryProductCatalog::from_seed_file(&broken),
            Err(CatalogSeedError::Parse { .. })
        ));
        assert!(matches!(
            InMemoryProductCatalog::from_seed_file(dir.path().join("missing.json")),
            Err(CatalogSeedError::Io { .. })
        ));
    }
}
