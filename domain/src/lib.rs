//! Domain layer for shopwise
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tools
//!
//! A tool is a named, side-effecting capability (search the catalog, compare
//! products, analyze price history) that the language model can ask the host
//! to run. Every outcome, good or bad, is a [`ToolExecutionResult`] fed back
//! into the conversation.
//!
//! ## Conversation
//!
//! A conversation is an ordered list of [`ChatTurn`]s. One user message may
//! drive several model calls, each possibly requesting tools, before the
//! assistant produces a [`ConversationalResponse`].

pub mod conversation;
pub mod core;
pub mod product;
pub mod prompt;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use conversation::{
    ChatRequest, ChatRole, ChatTurn, ConversationalResponse, LlmResponse, ToolResultPart,
};
pub use core::error::DomainError;
pub use product::{PriceAnalytics, PricePoint, PriceTrend, Product, ProductAccumulator};
pub use prompt::PromptTemplate;
pub use tool::{
    DefaultToolValidator, ToolCall, ToolCapability, ToolDefinition, ToolErrorKind,
    ToolExecutionResult, ToolFault, ToolKind, ToolMetricsSnapshot, ToolParameter, ToolValidator,
};
