//! Chat parameters for the use case loop.
//!
//! [`ChatParams`] groups the static parameters that control the
//! orchestration loop in [`ConversationOrchestrator`](crate::use_cases::run_chat::ConversationOrchestrator).
//! These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use shopwise_domain::PromptTemplate;
use std::time::Duration;

/// Chat loop control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatParams {
    /// Maximum model calls per run (tool rounds included).
    pub max_iterations: usize,
    /// Turns of stored history loaded before a run.
    pub history_limit: usize,
    /// Time budget for each tool attempt.
    pub tool_time_budget: Option<Duration>,
    /// Fan tool calls of one model reply out concurrently instead of in order.
    pub parallel_tools: bool,
    /// Products requested by the fallback search after a failed run.
    pub fallback_search_limit: usize,
    /// Replaces the built-in system prompt when set.
    pub system_prompt: Option<String>,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            history_limit: 20,
            tool_time_budget: None,
            parallel_tools: false,
            fallback_search_limit: 10,
            system_prompt: None,
        }
    }
}

impl ChatParams {
    // ==================== Builder Methods ====================

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_tool_time_budget(mut self, budget: Option<Duration>) -> Self {
        self.tool_time_budget = budget;
        self
    }

    pub fn with_parallel_tools(mut self, parallel: bool) -> Self {
        self.parallel_tools = parallel;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// The system prompt in effect
    pub fn system_prompt(&self) -> &str {
        self.system_prompt
            .as_deref()
            .unwrap_or_else(|| PromptTemplate::system())
    }
}
