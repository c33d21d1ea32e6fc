//! Product tools backed by a [`ProductCatalog`].
//!
//! | Tool | Kind | Cached |
//! |------|------|--------|
//! | `search_products` | search | no |
//! | `filter_products` | search | no |
//! | `compare_products` | comparison | no |
//! | `get_product_details` | lookup | yes |
//! | `get_user_products` | lookup | yes |
//! | `get_price_analytics` | lookup | yes |
//!
//! Every payload that surfaces products carries them in a top-level
//! `products` array so the chat loop can collect them.

pub mod analytics;
pub mod compare;
pub mod lookup;
pub mod search;

use std::sync::Arc;

use shopwise_application::ports::product_catalog::{CatalogError, ProductCatalog};
use shopwise_domain::{Product, ToolExecutionResult, tool::value_objects::ToolErrorKind};

use super::registry::{RegistryError, ToolRegistry};

pub use analytics::GetPriceAnalyticsTool;
pub use compare::CompareProductsTool;
pub use lookup::{GetProductDetailsTool, GetUserProductsTool};
pub use search::{FilterProductsTool, SearchProductsTool};

/// Build a registry holding all six product tools
pub fn product_tools(catalog: Arc<dyn ProductCatalog>) -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();
    registry.register(SearchProductsTool::new(catalog.clone()))?;
    registry.register(FilterProductsTool::new(catalog.clone()))?;
    registry.register(CompareProductsTool::new(catalog.clone()))?;
    registry.register(GetProductDetailsTool::new(catalog.clone()))?;
    registry.register(GetUserProductsTool::new(catalog.clone()))?;
    registry.register(GetPriceAnalyticsTool::new(catalog))?;
    Ok(registry)
}

/// Map a catalog error to a reported tool failure
pub(crate) fn catalog_failure(error: CatalogError) -> ToolExecutionResult {
    match error {
        CatalogError::InvalidQuery(msg) => ToolExecutionResult::invalid_request(msg),
        CatalogError::Unavailable(msg) => {
            ToolExecutionResult::failure(ToolErrorKind::UpstreamUnavailable, msg)
        }
    }
}

pub(crate) fn products_json(products: &[Product]) -> serde_json::Value {
    serde_json::to_value(products).unwrap_or_else(|_| serde_json::json!([]))
}


#[cfg(test)]
mod tests {
    use super::*;
    use shopwise_domain::ToolKind;

    #[test]
    fn test_product_tools_registers_all_kinds() {
        let registry = product_tools(test_support::sample_catalog()).unwrap();
        assert_eq!(registry.len(), ToolKind::ALL.len());
        for kind in ToolKind::ALL {
            assert_eq!(registry.resolve(kind.name()).unwrap().kind(), kind);
        }
        assert_eq!(registry.stats().cacheable_tools, 3);
    }

    #[test]
    fn test_catalog_failure_mapping() {
        let invalid = catalog_failure(CatalogError::InvalidQuery("bad".to_string()));
        assert_eq!(invalid.error_code, Some(ToolErrorKind::InvalidRequest));

        let down = catalog_failure(CatalogError::Unavailable("down".to_string()));
        assert_eq!(down.error_code, Some(ToolErrorKind::UpstreamUnavailable));
    }
}
