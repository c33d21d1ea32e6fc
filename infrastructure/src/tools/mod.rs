//! Tool implementations and the executor that runs them
//!
//! - `registry`: name → capability map, the single source of tool definitions
//! - `catalog`: the six product tools backed by a product catalog
//! - `executor`: cached, retried, metered execution
//! - `schema`: function declarations for the model

pub mod cache;
pub mod catalog;
pub mod executor;
pub mod metrics;
pub mod registry;
pub mod retry;
pub mod schema;

pub use cache::{DEFAULT_CAPACITY, DEFAULT_TTL, ToolResultCache};
pub use catalog::product_tools;
pub use executor::CachingToolExecutor;
pub use metrics::{ToolMetrics, ToolMetricsRegistry};
pub use registry::{RegistryError, RegistryStats, ToolRegistry};
pub use retry::RetryPolicy;
pub use schema::FunctionDeclarationConverter;
