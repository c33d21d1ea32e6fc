//! Search tools: search_products, filter_products

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

const DEFAULT_MAX_RESULTS: usize = 10;
const MAX_RESULTS_CAP: usize = 50;

/// Candidates pulled from the catalog before filtering by query
const FILTER_CANDIDATES: usize = 200;

pub fn search_products_definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolKind::SearchProducts.name(),
        "Search the product catalog by keywords. Returns matching products with prices, brands and ratings.",
    )
    .with_parameter(ToolParameter::new(
        "query",
        "Keywords to search for, e.g. 'iPhone 15' or 'noise cancelling headphones'",
        true,
    ))
    .with_parameter(
        ToolParameter::new(
            "max_results",
            "Maximum number of products to return (default 10, max 50)",
            false,
        )
        .with_type("integer"),
    )
}

pub fn filter_products_definition() -> ToolDefinition {
    ToolDefinition::new(
        ToolKind::FilterProducts.name(),
        "Narrow down products by price range, brand or minimum rating. Filters either the given product ids or the results of a keyword query.",
    )
    .with_parameter(
        ToolParameter::new("product_ids", "Products to filter", false).with_type("array"),
    )
    .with_parameter(ToolParameter::new(
        "query",
        "Keywords selecting the products to filter when no ids are given",
        false,
    ))
    .with_parameter(ToolParameter::new("min_price", "Minimum price", false).with_type("number"))
    .with_parameter(ToolParameter::new("max_price", "Maximum price", false).with_type("number"))
    .with_parameter(ToolParameter::new("brand", "Brand name (case-insensitive)", false))
    .with_parameter(
        ToolParameter::new("min_rating", "Minimum rating from 0 to 5", false).with_type("number"),
    )
    .with_parameter(
        ToolParameter::new("sort_by", "Result ordering", false)
            .with_enum(["price_asc", "price_desc", "rating"]),
    )
}

pub struct SearchProductsTool {
    catalog: Arc<dyn ProductCatalog>,
    definition: ToolDefinition,
}

impl SearchProductsTool {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self {
            catalog,
            definition: search_products_definition(),
        }
    }
}

#[async_trait]
impl ToolCapability for SearchProductsTool {
    fn kind(&self) -> ToolKind {
        ToolKind::SearchProducts
    }

    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolExecutionResult, ToolFault> {
        let query = match call.require_string("query") {
            Ok(q) => q.trim(),
            Err(e) => return Ok(ToolExecutionResult::invalid_request(e)),
        };
        let limit = call
            .get_i64("max_results")
            .map(|n| n.clamp(1, MAX_RESULTS_CAP as i64) as usize)
            .unwrap_or(DEFAULT_MAX_RESULTS);

        let products = match self.catalog.search(query, limit).await {
            Ok(products) => products,
            Err(e) => return Ok(catalog_failure(e)),
        };

        Ok(ToolExecutionResult::success(serde_json::json!({
            "query": query,
            "count": products.len(),
            "products": products_json(&products),
        })))
    }
}

/// Criteria parsed from a filter_products call
#[derive(Debug, Default, PartialEq)]
struct ProductFilter {
    min_price: Option<f64>,
    max_price: Option<f64>,
    brand: Option<String>,
    min_rating: Option<f64>,
}

impl ProductFilter {
    fn from_call(call: &ToolCall) -> Result<Self, String> {
        let filter = Self {
            min_price: call.get_f64("min_price"),
            max_price: call.get_f64("max_price"),
            brand: call
                .get_string("brand")
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(str::to_lowercase),
            min_rating: call.get_f64("min_rating"),
        };
        if let (Some(min), Some(max)) = (filter.min_price, filter.max_price)
            && min > max
        {
            return Err(format!("min_price ({}) exceeds max_price ({})", min, max));
        }
        Ok(filter)
    }

    fn matches(&self, product: &Product) -> bool {
        self.min_price.is_none_or(|min| product.price >= min)
            && self.max_price.is_none_or(|max| product.price <= max)
            && self.brand.as_ref().is_none_or(|brand| {
                product
                    .brand
                    .as_deref()
                    .is_some_and(|b| b.to_lowercase() == *brand)
            })
            && self
                .min_rating
                .is_none_or(|min| product.rating.is_some_and(|r| r >= min))
    }

    fn describe(&self) -> serde_json::Value {
        serde_json::json!({
            "min_price": self.min_price,
            "max_price": self.max_price,
            "brand": self.brand,
            "min_rating": self.min_rating,
        })
    }
}

pub struct FilterProductsTool {
    catalog: Arc<dyn ProductCatalog>,
    definition: ToolDefinition,
}

impl FilterProductsTool {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self {
            catalog,
            definition: filter_products_definition(),
        }
    }

    async fn candidates(&self, call: &ToolCall) -> Result<Vec<Product>, ToolExecutionResult> {
        let ids = call.get_i64_list("product_ids");
        if !ids.is_empty() {
            let mut products = Vec::with_capacity(ids.len());
            for id in ids {
                match self.catalog.get(id).await {
                    Ok(Some(product)) => products.push(product),
                    Ok(None) => {}
                    Err(e) => return Err(catalog_failure(e)),
                }
            }
            return Ok(products);
        }

        match call.get_string("query").map(str::trim).filter(|q| !q.is_empty()) {
            Some(query) => self
                .catalog
                .search(query, FILTER_CANDIDATES)
                .await
                .map_err(catalog_failure),
            None => Err(ToolExecutionResult::invalid_request(
                "filter_products needs either product_ids or query",
            )),
        }
    }
}

#[async_trait]
impl ToolCapability for FilterProductsTool {
    fn kind(&self) -> ToolKind {
        ToolKind::FilterProducts
    }

    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolExecutionResult, ToolFault> {
        let filter = match ProductFilter::from_call(call) {
            Ok(filter) => filter,
            Err(e) => return Ok(ToolExecutionResult::invalid_request(e)),
        };
        let candidates = match self.candidates(call).await {
            Ok(products) => products,
            Err(failure) => return Ok(failure),
        };

        let total = candidates.len();
        let mut products: Vec<Product> =
            candidates.into_iter().filter(|p| filter.matches(p)).collect();

        match call.get_string("sort_by") {
            Some("price_asc") => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
            Some("price_desc") => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
            Some("rating") => products.sort_by(|a, b| {
                b.rating
                    .unwrap_or(0.0)
                    .total_cmp(&a.rating.unwrap_or(0.0))
            }),
            _ => {}
        }

        Ok(ToolExecutionResult::success(serde_json::json!({
            "filters": filter.describe(),
            "candidates": total,
            "count": products.len(),
            "products": products_json(&products),
        })))
    }
}
