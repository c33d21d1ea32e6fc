//! Infrastructure layer for shopwise
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod catalog;
pub mod config;
pub mod gemini;
pub mod logging;
pub mod memory;
pub mod tools;

// Re-export commonly used types
pub use catalog::{CatalogSeedError, InMemoryProductCatalog};
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use gemini::{GeminiError, GeminiLlmGateway, GeminiSettings};
pub use logging::JsonlConversationLogger;
pub use memory::InMemoryConversationMemory;
pub use tools::{
    CachingToolExecutor, FunctionDeclarationConverter, RetryPolicy, ToolMetricsRegistry,
    ToolRegistry, ToolResultCache, product_tools,
};
