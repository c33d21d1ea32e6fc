//! Chat loop configuration from TOML (`[chat]` section)

use serde::{Deserialize, Serialize};
use shopwise_application::ChatParams;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Model calls allowed per user message
    pub max_iterations: usize,
    /// Prior turns loaded from memory
    pub history_limit: usize,
    /// Run all tool calls of one model turn concurrently
    pub parallel_tools: bool,
    /// Overrides the built-in system prompt
    pub system_prompt: Option<String>,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        let defaults = ChatParams::default();
        Self {
            max_iterations: defaults.max_iterations,
            history_limit: defaults.history_limit,
            parallel_tools: defaults.parallel_tools,
            system_prompt: None,
        }
    }
}

impl FileChatConfig {
    /// Chat parameters; the tool time budget is filled in from `[tools]`.
    pub fn to_chat_params(&self) -> ChatParams {
        let params = ChatParams::default()
            .with_max_iterations(self.max_iterations)
            .with_history_limit(self.history_limit)
            .with_parallel_tools(self.parallel_tools);
        match self.system_prompt.as_deref().map(str::trim) {
            Some(prompt) if !prompt.is_empty() => params.with_system_prompt(prompt),
            _ => params,
        }
    }
}
