//! LLM Gateway port
//!
//! Defines the interface for communicating with the language model provider.

use async_trait::async_trait;
use shopwise_domain::{ChatTurn, LlmResponse, ToolErrorKind};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
///
/// Every variant except [`GatewayError::Cancelled`] is an upstream failure
/// the orchestrator may recover from.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// Classify into the shared error taxonomy
    pub fn kind(&self) -> ToolErrorKind {
        match self {
            GatewayError::Cancelled => ToolErrorKind::Cancelled,
            _ => ToolErrorKind::UpstreamUnavailable,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, GatewayError::Cancelled)
    }
}

/// One model call: the current prompt on top of the accumulated history.
#[derive(Debug, Clone, Copy)]
pub struct GenerateRequest<'a> {
    /// Prompt for this call, sent as the final user turn
    pub prompt: &'a str,
    pub system_prompt: &'a str,
    /// Prior turns, oldest first
    pub history: &'a [ChatTurn],
    /// Provider-neutral tool schemas from [`ToolSchemaPort`](super::tool_schema::ToolSchemaPort)
    pub tools: &'a [serde_json::Value],
    /// API credentials; `None` short-circuits without a network call
    pub credentials: Option<&'a str>,
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send one request and parse the reply into text plus tool calls.
    ///
    /// Network and provider failures are returned as errors, never swallowed.
    async fn generate(&self, request: GenerateRequest<'_>) -> Result<LlmResponse, GatewayError>;
}
