//! Tool domain module
//!
//! This module defines the core abstractions for the assistant's **Tool System**:
//! the side-effecting capabilities (product search, filtering, comparison,
//! analytics) the model may ask the host to run mid-conversation.
//!
//! # Overview
//!
//! ```text
//! ┌────────────────┐    ┌──────────────┐    ┌─────────────────────┐
//! │ ToolDefinition │───▶│ ToolCall     │───▶│ ToolExecutionResult │
//! │ (schema)       │    │ (invocation) │    │ (payload or error)  │
//! └────────────────┘    └──────────────┘    └─────────────────────┘
//!         ▲
//!         │ definition()
//! ┌───────┴────────┐
//! │ ToolCapability │  kind() → ToolKind (cache policy)
//! └────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolDefinition`]: Schema for a single tool (name, description, params)
//! - [`ToolCall`]: An invocation request with arguments and a local call id
//! - [`ToolExecutionResult`]: Outcome with an opaque JSON payload or a classified error
//! - [`ToolCapability`]: Executable tool, tagged with a [`ToolKind`]
//! - [`ToolValidator`]: Pure domain trait for argument validation
//! - [`ToolMetricsSnapshot`]: Read-only view of per-tool counters
//!
//! # Architecture
//!
//! - **Domain** (this module): Pure definitions, no I/O
//! - **Application** (`ToolExecutorPort`): Port trait for tool execution
//! - **Infrastructure** (`CachingToolExecutor`, `ToolRegistry`): cache, retry,
//!   metrics and the concrete product tools

pub mod capability;
pub mod entities;
pub mod metrics;
pub mod traits;
pub mod value_objects;

pub use capability::{ToolCapability, ToolFault, ToolKind};
pub use entities::{ToolCall, ToolDefinition, ToolParameter};
pub use metrics::ToolMetricsSnapshot;
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ToolErrorKind, ToolExecutionResult};
