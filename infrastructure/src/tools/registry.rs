//! Tool Registry
//!
//! The [`ToolRegistry`] maps tool names to [`ToolCapability`] implementations.
//! It is built once at startup and then shared read-only (behind an `Arc`)
//! by the executor, so lookups need no locking.
//!
//! # Usage
//!
//! ```ignore
//! use shopwise_infrastructure::tools::{ToolRegistry, catalog::SearchProductsTool};
//!
//! let mut registry = ToolRegistry::new();
//! registry.register(SearchProductsTool::new(catalog.clone()))?;
//!
//! assert!(registry.resolve("search_products").is_ok());
//! let schemas = converter.all_tools_schema(registry.describe());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use shopwise_domain::tool::{capability::ToolCapability, entities::ToolDefinition};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Tool '{0}' is already registered")]
    Duplicate(String),

    #[error("Tool not found: {0}")]
    NotFound(String),
}

/// Immutable-after-startup name → capability map
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolCapability>>,
    /// Definitions in registration order
    definitions: Vec<ToolDefinition>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability; fails on a name collision
    pub fn register<C: ToolCapability + 'static>(&mut self, tool: C) -> Result<(), RegistryError> {
        self.register_arc(Arc::new(tool))
    }

    /// Register a capability (Arc version)
    pub fn register_arc(&mut self, tool: Arc<dyn ToolCapability>) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        tracing::debug!(tool = %name, kind = %tool.kind(), "Registered tool");
        self.definitions.push(tool.definition().clone());
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Definitions of every registered tool, used to build the model-facing schema
    pub fn describe(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    pub fn resolve(&self, name: &str) -> Result<&Arc<dyn ToolCapability>, RegistryError> {
        self.tools
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get statistics about registered tools
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            total_tools: self.tools.len(),
            cacheable_tools: self
                .tools
                .values()
                .filter(|t| t.kind().is_cacheable())
                .count(),
        }
    }
}

/// Statistics about the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    pub total_tools: usize,
    pub cacheable_tools: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shopwise_domain::tool::{
        capability::{ToolFault, ToolKind},
        entities::ToolCall,
        value_objects::ToolExecutionResult,
    };

    struct StubTool {
        kind: ToolKind,
        definition: ToolDefinition,
    }

    impl StubTool {
        fn new(kind: ToolKind) -> Self {
            Self {
                kind,
                definition: ToolDefinition::new(kind.name(), "stub"),
            }
        }
    }

    #[async_trait]
    impl ToolCapability for StubTool {
        fn kind(&self) -> ToolKind {
            self.kind
        }

        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(&self, _call: &ToolCall) -> Result<ToolExecutionResult, ToolFault> {
            Ok(ToolExecutionResult::success(serde_json::json!({})))
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = ToolRegistry::new();
        registry.register(StubTool::new(ToolKind::SearchProducts)).unwrap();
        registry.register(StubTool::new(ToolKind::GetPriceAnalytics)).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("search_products"));
        assert_eq!(
            registry.resolve("get_price_analytics").unwrap().kind(),
            ToolKind::GetPriceAnalytics
        );
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["search_products", "get_price_analytics"]
        );
    }

    #[test]
    fn test_register_duplicate_fails() {
        let mut registry = ToolRegistry::new();
        registry.register(StubTool::new(ToolKind::SearchProducts)).unwrap();
        let err = registry
            .register(StubTool::new(ToolKind::SearchProducts))
            .unwrap_err();

        assert_eq!(err, RegistryError::Duplicate("search_products".to_string()));
        assert_eq!(registry.describe().len(), 1);
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = ToolRegistry::new();
        assert!(matches!(
            registry.resolve("nope"),
            Err(RegistryError::NotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_registry_stats() {
        let mut registry = ToolRegistry::new();
        for kind in ToolKind::ALL {
            registry.register(StubTool::new(kind)).unwrap();
        }
        let stats = registry.stats();
        assert_eq!(stats.total_tools, 6);
        assert_eq!(stats.cacheable_tools, 3);
    }
}
