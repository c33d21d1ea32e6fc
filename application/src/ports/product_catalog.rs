//! Product catalog port
//!
//! Narrow read interface over the product store that backs the product tools.

use async_trait::async_trait;
use shopwise_domain::{PricePoint, Product};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Data source unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Products matching every term of `query`, best matches first
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Product>, CatalogError>;

    async fn get(&self, product_id: i64) -> Result<Option<Product>, CatalogError>;

    /// Products tracked by a user
    async fn user_products(&self, user_id: &str) -> Result<Vec<Product>, CatalogError>;

    /// Price observations for a product, oldest first
    async fn price_history(&self, product_id: i64) -> Result<Vec<PricePoint>, CatalogError>;
}
