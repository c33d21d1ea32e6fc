//! compare_products: side-by-side view of two or more products

use std::sync::Arc;

use async_trait::async_trait;
use shopwise_application::ports::product_catalog::ProductCatalog;
use shopwise_domain::Product;
use shopwise_domain::tool::{
    capability::{ToolCapability, ToolFault, ToolKind},
    entities::{ToolCall, ToolDefinition, ToolParameter},
    value_objects::ToolExecutionResult,
};

use super::{catalog_failure, products_json};

const MAX_COMPARED: usize = 10;

pub fn compare_products_definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolKind::CompareProducts.name(),
        "Compare two or more products by price and rating. Reports the cheapest, the most expensive and the highest rated.",
    )
    .with_parameter(
        ToolParameter::new("product_ids", "Ids of the products to compare (2 to 10)", true)
            .with_type("array"),
    )
}

pub struct CompareProductsTool {
    catalog: Arc<dyn ProductCatalog>,
    definition: ToolDefinition,
}

impl CompareProductsTool {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self {
            catalog,
            definition: compare_products_definition(),
        }
    }
}

fn comparison(products: &[Product]) -> serde_json::Value {
    let cheapest = products.iter().min_by(|a, b| a.price.total_cmp(&b.price));
    let priciest = products.iter().max_by(|a, b| a.price.total_cmp(&b.price));
    let highest_rated = products
        .iter()
        .filter(|p| p.rating.is_some())
        .max_by(|a, b| a.rating.unwrap_or(0.0).total_cmp(&b.rating.unwrap_or(0.0)));
    let spread = match (cheapest, priciest) {
        (Some(low), Some(high)) => ((high.price - low.price) * 100.0).round() / 100.0,
        _ => 0.0,
    };

    serde_json::json!({
        "cheapest": cheapest.map(|p| p.id),
        "most_expensive": priciest.map(|p| p.id),
        "highest_rated": highest_rated.map(|p| p.id),
        "price_spread": spread,
    })
}

#[async_trait]
impl ToolCapability for CompareProductsTool {
    fn kind(&self) -> ToolKind {
        ToolKind::CompareProducts
    }

    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolExecutionResult, ToolFault> {
        let mut ids = call.get_i64_list("product_ids");
        ids.dedup();
        if ids.len() < 2 {
            return Ok(ToolExecutionResult::invalid_request(
                "compare_products needs at least two product_ids",
            ));
        }
        if ids.len() > MAX_COMPARED {
            return Ok(ToolExecutionResult::invalid_request(format!(
                "compare_products accepts at most {} product_ids",
                MAX_COMPARED
            )));
        }

        let mut products = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();
        for id in ids {
            match self.catalog.get(id).await {
                Ok(Some(product)) => products.push(product),
                Ok(None) => missing.push(id),
                Err(e) => return Ok(catalog_failure(e)),
            }
        }

        if products.len() < 2 {
            return Ok(ToolExecutionResult::not_found(format!(
                "Not enough products to compare; missing ids: {:?}",
                missing
            )));
        }

        Ok(ToolExecutionResult::success(serde_json::json!({
            "comparison": comparison(&products),
            "missing_ids": missing,
            "products": products_json(&products),
        })))
    }
}
