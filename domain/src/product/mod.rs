//! Product domain.
//!
//! - [`entities::Product`]: a product surfaced by tools, identified by `id`
//! - [`entities::PricePoint`]: one historical price observation
//! - [`aggregate::ProductAccumulator`]: deduplicating result set for a run
//! - [`analytics::PriceAnalytics`]: min/max/average/trend over price history

pub mod aggregate;
pub mod analytics;
pub mod entities;

pub use aggregate::ProductAccumulator;
pub use analytics::{PriceAnalytics, PriceTrend};
pub use entities::{PricePoint, Product};
