//! get_price_analytics: price statistics over a product's history

use std::sync::Arc;

use async_trait::async_trait;
use shopwise_application::ports::product_catalog::ProductCatalog;
use shopwise_domain::PriceAnalytics;
use shopwise_domain::tool::{
    capability::{ToolCapability, ToolFault, ToolKind},
    entities::{ToolCall, ToolDefinition, ToolParameter},
    value_objects::ToolExecutionResult,
};

use super::{catalog_failure, products_json};

pub fn get_price_analytics_definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolKind::GetPriceAnalytics.name(),
        "Get price history statistics for a product: lowest, highest and average price and the recent trend.",
    )
    .with_parameter(
        ToolParameter::new("product_id", "Id of the product", true).with_type("integer"),
    )
}

pub struct GetPriceAnalyticsTool {
    catalog: Arc<dyn ProductCatalog>,
    definition: ToolDefinition,
}

impl GetPriceAnalyticsTool {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self {
            catalog,
            definition: get_price_analytics_definition(),
        }
    }
}

#[async_trait]
impl ToolCapability for GetPriceAnalyticsTool {
    fn kind(&self) -> ToolKind {
        ToolKind::GetPriceAnalytics
    }

    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolExecutionResult, ToolFault> {
        let Some(product_id) = call.get_i64("product_id") else {
            return Ok(ToolExecutionResult::invalid_request(
                "Missing or non-numeric argument: product_id",
            ));
        };

        let product = match self.catalog.get(product_id).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                return Ok(ToolExecutionResult::not_found(format!(
                    "Product {} not found",
                    product_id
                )));
            }
            Err(e) => return Ok(catalog_failure(e)),
        };
        let history = match self.catalog.price_history(product_id).await {
            Ok(history) => history,
            Err(e) => return Ok(catalog_failure(e)),
        };

        let analytics = PriceAnalytics::from_history(&product, &history);
        let all_time_low = analytics.is_all_time_low();

        Ok(ToolExecutionResult::success(serde_json::json!({
            "product_id": product_id,
            "analytics": analytics,
            "all_time_low": all_time_low,
            "products": products_json(std::slice::from_ref(&product)),
        })))
    }
}
