//! Product domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product surfaced by a tool (Entity)
///
/// Identity is `id`; two products with the same id are the same product,
/// whatever their other fields say.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Owner, for products tracked by a user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Product {
    pub fn new(id: i64, title: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            currency: default_currency(),
            brand: None,
            rating: None,
            store: None,
            url: None,
            image_url: None,
            user_id: None,
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_store(mut self, store: impl Into<String>) -> Self {
        self.store = Some(store.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn owned_by(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Identity key used for deduplication
    pub fn identity(&self) -> i64 {
        self.id
    }

    /// Case-insensitive match of every whitespace-separated term against
    /// title, brand and store.
    pub fn matches_terms(&self, query: &str) -> bool {
        let haystack = format!(
            "{} {} {}",
            self.title,
            self.brand.as_deref().unwrap_or(""),
            self.store.as_deref().unwrap_or("")
        )
        .to_lowercase();
        let mut terms = query.split_whitespace().peekable();
        if terms.peek().is_none() {
            return false;
        }
        terms.all(|term| haystack.contains(&term.to_lowercase()))
    }

    /// One-line summary used in prompts
    pub fn summary_line(&self) -> String {
        let mut line = format!("#{} {}, {:.2} {}", self.id, self.title, self.price, self.currency);
        if let Some(brand) = &self.brand {
            line.push_str(&format!(" (brand: {})", brand));
        }
        if let Some(rating) = self.rating {
            line.push_str(&format!(" [rating {:.1}]", rating));
        }
        line
    }
}

/// A historical price observation for a product (Value Object)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub product_id: i64,
    pub price: f64,
    pub recorded_at: DateTime<Utc>,
}

impl PricePoint {
    pub fn new(product_id: i64, price: f64, recorded_at: DateTime<Utc>) -> Self {
        Self {
            product_id,
            price,
            recorded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_terms() {
        let product = Product::new(1, "iPhone 15 Pro", 999.0)
            .with_brand("Apple")
            .with_store("Best Store");

        assert!(product.matches_terms("iphone"));
        assert!(product.matches_terms("apple PRO"));
        assert!(product.matches_terms("best store"));
        assert!(!product.matches_terms("samsung"));
        assert!(!product.matches_terms("   "));
    }

    #[test]
    fn test_deserialize_minimal_product() {
        let product: Product =
            serde_json::from_value(serde_json::json!({"id": 7, "title": "Kettle", "price": 25.5}))
                .unwrap();
        assert_eq!(product.identity(), 7);
        assert_eq!(product.currency, "USD");
        assert!(product.brand.is_none());
    }

    #[test]
    fn test_summary_line() {
        let product = Product::new(3, "Pixel 8", 599.0).with_brand("Google").with_rating(4.5);
        let line = product.summary_line();
        assert!(line.starts_with("#3 Pixel 8"));
        assert!(line.contains("599.00 USD"));
        assert!(line.contains("brand: Google"));
        assert!(line.contains("rating 4.5"));
    }
}
