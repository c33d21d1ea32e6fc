//! Application layer for shopwise
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ChatParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    conversation_memory::{ConversationMemory, MemoryError},
    llm_gateway::{GatewayError, GenerateRequest, LlmGateway},
    product_catalog::{CatalogError, ProductCatalog},
    tool_executor::ToolExecutorPort,
    tool_schema::ToolSchemaPort,
};
pub use use_cases::conversation_lock::ConversationLocks;
pub use use_cases::run_chat::{ChatError, ChatExit, ChatOutcome, ConversationOrchestrator};
