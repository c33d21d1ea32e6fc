//! Tool Executor port
//!
//! Defines the interface for executing tools (catalog search, comparison, analytics).

use async_trait::async_trait;
use shopwise_domain::tool::{
    entities::{ToolCall, ToolDefinition},
    metrics::ToolMetricsSnapshot,
    value_objects::ToolExecutionResult,
};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Port for tool execution
///
/// This port defines how the application layer executes tools.
/// Implementations (adapters) live in the infrastructure layer.
///
/// `execute` never fails: every outcome, including unknown tools, faults
/// and cancellation, is folded into a [`ToolExecutionResult`].
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Definitions of all available tools
    fn tool_definitions(&self) -> &[ToolDefinition];

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_definitions().iter().any(|d| d.name == name)
    }

    /// Get names of all available tools
    fn available_tools(&self) -> Vec<&str> {
        self.tool_definitions()
            .iter()
            .map(|d| d.name.as_str())
            .collect()
    }

    /// Execute a tool call
    ///
    /// `budget` bounds each attempt; `cancel` aborts in-flight attempts and
    /// backoff sleeps.
    async fn execute(
        &self,
        call: &ToolCall,
        budget: Option<Duration>,
        cancel: &CancellationToken,
    ) -> ToolExecutionResult;

    /// Execute several calls concurrently, returning results in input order
    async fn execute_batch(
        &self,
        calls: &[ToolCall],
        budget: Option<Duration>,
        cancel: &CancellationToken,
    ) -> Vec<ToolExecutionResult> {
        let futures = calls.iter().map(|call| self.execute(call, budget, cancel));
        futures::future::join_all(futures).await
    }

    /// Per-tool execution metrics, sorted by tool name
    fn metrics(&self) -> Vec<ToolMetricsSnapshot> {
        Vec::new()
    }
}
