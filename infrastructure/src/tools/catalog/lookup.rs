//! Lookup tools: get_product_details, get_user_products
//!
//! Both are side-effect free and served from the result cache.

use std::sync::Arc;

use async_trait::async_trait;
use shopwise_application::ports::product_catalog::ProductCatalog;
use shopwise_domain::tool::{
    capability::{ToolCapability, ToolFault, ToolKind},
    entities::{ToolCall, ToolDefinition, ToolParameter},
    value_objects::ToolExecutionResult,
};

use super::{catalog_failure, products_json};

pub fn get_product_details_definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolKind::GetProductDetails.name(),
        "Get full details for a single product by id.",
    )
    .with_parameter(
        ToolParameter::new("product_id", "Id of the product", true).with_type("integer"),
    )
}

pub fn get_user_products_definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolKind::GetUserProducts.name(),
        "List the products a user is tracking.",
    )
    .with_parameter(ToolParameter::new("user_id", "Id of the user", true))
}

pub struct GetProductDetailsTool {
    catalog: Arc<dyn ProductCatalog>,
    definition: ToolDefinition,
}

impl GetProductDetailsTool {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self {
            catalog,
            definition: get_product_details_definition(),
        }
    }
}

#[async_trait]
impl ToolCapability for GetProductDetailsTool {
    fn kind(&self) -> ToolKind {
        ToolKind::GetProductDetails
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

        match self.catalog.get(product_id).await {
            Ok(Some(product)) => Ok(ToolExecutionResult::success(serde_json::json!({
                "products": products_json(std::slice::from_ref(&product)),
            }))),
            Ok(None) => Ok(ToolExecutionResult::not_found(format!(
                "Product {} not found",
                product_id
            ))),
            Err(e) => Ok(catalog_failure(e)),
        }
    }
}

pub struct GetUserProductsTool {
    catalog: Arc<dyn ProductCatalog>,
    definition: ToolDefinition,
}

impl GetUserProductsTool {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self {
            catalog,
            definition: get_user_products_definition(),
        }
    }
}

#[async_trait]
impl ToolCapability for GetUserProductsTool {
    fn kind(&self) -> ToolKind {
        ToolKind::GetUserProducts
    }

    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolExecutionResult, ToolFault> {
        let user_id = match call.require_string("user_id") {
            Ok(id) => id.trim(),
            Err(e) => return Ok(ToolExecutionResult::invalid_request(e)),
        };

        let products = match self.catalog.user_products(user_id).await {
            Ok(products) => products,
            Err(e) => return Ok(catalog_failure(e)),
        };

        Ok(ToolExecutionResult::success(serde_json::json!({
            "user_id": user_id,
            "count": products.len(),
            "products": products_json(&products),
        })))
    }
}
