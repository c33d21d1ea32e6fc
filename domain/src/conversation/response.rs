//! Structured model replies.
//!
//! The gateway parses every provider response into an [`LlmResponse`]:
//! concatenated text plus zero or more tool-call requests. An empty
//! `tool_calls` list is the normal termination signal for the chat loop.

use serde::{Deserialize, Serialize};

use crate::tool::entities::ToolCall;

/// A parsed response from the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Concatenated text parts (may be empty)
    pub text: String,
    /// Tool invocations requested by the model, in the order received
    pub tool_calls: Vec<ToolCall>,
    /// Provider finish reason, if reported (e.g. "STOP", "MAX_TOKENS")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl LlmResponse {
    /// Create a text-only response
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
            finish_reason: None,
        }
    }

    pub fn with_tool_call(mut self, call: ToolCall) -> Self {
        self.tool_calls.push(call);
        self
    }

    /// Returns `true` if the response contains any tool use requests.
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}
