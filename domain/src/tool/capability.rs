//! Tool capabilities: the executable half of a tool
//!
//! A capability pairs a [`ToolDefinition`] with an execution function and a
//! [`ToolKind`] tag. The tag is the closed set of tools the assistant knows
//! about; it carries per-tool policy (currently: whether results may be
//! cached) so the executor never has to match on name strings.
//!
//! ```text
//! ToolRegistry (name → Arc<dyn ToolCapability>)
//!   ├─ search_products      ToolKind::SearchProducts     always fresh
//!   ├─ filter_products      ToolKind::FilterProducts     always fresh
//!   ├─ compare_products     ToolKind::CompareProducts    always fresh
//!   ├─ get_product_details  ToolKind::GetProductDetails  cacheable
//!   ├─ get_user_products    ToolKind::GetUserProducts    cacheable
//!   └─ get_price_analytics  ToolKind::GetPriceAnalytics  cacheable
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::{ToolCall, ToolDefinition};
use super::value_objects::ToolExecutionResult;

/// Discriminator for the registered capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    SearchProducts,
    FilterProducts,
    CompareProducts,
    GetProductDetails,
    GetUserProducts,
    GetPriceAnalytics,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::SearchProducts,
        ToolKind::FilterProducts,
        ToolKind::CompareProducts,
        ToolKind::GetProductDetails,
        ToolKind::GetUserProducts,
        ToolKind::GetPriceAnalytics,
    ];

    /// Canonical tool name exposed to the model
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::SearchProducts => "search_products",
            ToolKind::FilterProducts => "filter_products",
            ToolKind::CompareProducts => "compare_products",
            ToolKind::GetProductDetails => "get_product_details",
            ToolKind::GetUserProducts => "get_user_products",
            ToolKind::GetPriceAnalytics => "get_price_analytics",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Side-effect-free lookups whose results may be served from cache.
    ///
    /// Search, filtering and comparison always run fresh.
    pub fn is_cacheable(&self) -> bool {
        matches!(
            self,
            ToolKind::GetProductDetails | ToolKind::GetUserProducts | ToolKind::GetPriceAnalytics
        )
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An unexpected fault raised while running a tool.
///
/// Distinct from a reported failure (`Ok` with `success == false`): a fault
/// means the tool could not produce a result at all. The executor converts
/// faults into `EXECUTION_ERROR` results, preserving the message.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ToolFault {
    pub message: String,
}

impl ToolFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A callable capability registered with the tool registry.
#[async_trait]
pub trait ToolCapability: Send + Sync {
    /// Tag identifying which capability this is
    fn kind(&self) -> ToolKind;

    /// Declarative schema shown to the model
    fn definition(&self) -> &ToolDefinition;

    /// Registry key; defaults to the definition's name
    fn name(&self) -> &str {
        &self.definition().name
    }

    /// Run the tool once.
    async fn execute(&self, call: &ToolCall) -> Result<ToolExecutionResult, ToolFault>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("delete_everything"), None);
    }

    #[test]
    fn test_cacheable_allow_list() {
        assert!(ToolKind::GetProductDetails.is_cacheable());
        assert!(ToolKind::GetUserProducts.is_cacheable());
        assert!(ToolKind::GetPriceAnalytics.is_cacheable());
        assert!(!ToolKind::SearchProducts.is_cacheable());
        assert!(!ToolKind::FilterProducts.is_cacheable());
        assert!(!ToolKind::CompareProducts.is_cacheable());
    }

    struct Echo {
        definition: ToolDefinition,
    }

    #[async_trait]
    impl ToolCapability for Echo {
        fn kind(&self) -> ToolKind {
            ToolKind::SearchProducts
        }

        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolExecutionResult, ToolFault> {
            Ok(ToolExecutionResult::success(call.arguments_json()))
        }
    }

    #[tokio::test]
    async fn test_capability_name_defaults_to_definition() {
        let echo = Echo {
            definition: ToolDefinition::new("search_products", "Echo"),
        };
        assert_eq!(echo.name(), "search_products");

        let call = ToolCall::new("search_products").with_arg("query", "tv");
        let result = echo.execute(&call).await.unwrap();
        assert_eq!(result.result.unwrap()["query"], "tv");
    }
}
