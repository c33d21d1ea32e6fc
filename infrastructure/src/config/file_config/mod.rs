//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Each section knows how to turn itself into the runtime type it configures.

mod catalog;
mod chat;
mod llm;
mod memory;
mod tools;

pub use catalog::{FileCatalogConfig, FileLoggingConfig};
pub use chat::FileChatConfig;
pub use llm::FileLlmConfig;
pub use memory::FileMemoryConfig;
pub use tools::FileToolsConfig;

use serde::{Deserialize, Serialize};
use shopwise_application::ChatParams;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("llm.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("llm.model cannot be empty")]
    EmptyModelName,

    #[error("chat.max_iterations cannot be 0")]
    ZeroIterations,

    #[error("tools.max_attempts cannot be 0")]
    ZeroAttempts,

    #[error("tools.time_budget_seconds cannot be 0")]
    ZeroTimeBudget,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model endpoint settings
    pub llm: FileLlmConfig,
    /// Chat loop settings
    pub chat: FileChatConfig,
    /// Tool cache, retry and time budget
    pub tools: FileToolsConfig,
    pub memory: FileMemoryConfig,
    pub catalog: FileCatalogConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.llm.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        if self.chat.max_iterations == 0 {
            return Err(ConfigValidationError::ZeroIterations);
        }
        if self.tools.max_attempts == 0 {
            return Err(ConfigValidationError::ZeroAttempts);
        }
        if self.tools.time_budget_seconds == Some(0) {
            return Err(ConfigValidationError::ZeroTimeBudget);
        }
        Ok(())
    }

    /// Chat parameters combining `[chat]` and the tool time budget
    pub fn chat_params(&self) -> ChatParams {
        self.chat
            .to_chat_params()
            .with_tool_time_budget(self.tools.time_budget())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[llm]
model = "gemini-1.5-pro"
timeout_seconds = 60
temperature = 0.2

[chat]
max_iterations = 3
history_limit = 10
system_prompt = "Only recommend refurbished products."

[tools]
cache_ttl_seconds = 60
max_attempts = 2
time_budget_seconds = 8

[memory]
max_turns_per_conversation = 50

[catalog]
seed_file = "catalog.json"

[logging]
conversation_log = "transcript.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.llm.model, "gemini-1.5-pro");
        assert_eq!(config.llm.timeout_seconds, 60);
        assert_eq!(config.chat.max_iterations, 3);
        assert_eq!(config.tools.max_attempts, 2);
        assert_eq!(config.memory.max_turns_per_conversation, 50);
        assert_eq!(config.catalog.seed_file.as_deref(), Some("catalog.json"));
        assert_eq!(
            config.logging.conversation_log.as_deref(),
            Some("transcript.jsonl")
        );

        let params = config.chat_params();
        assert_eq!(params.max_iterations, 3);
        assert_eq!(params.tool_time_budget, Some(Duration::from_secs(8)));
        assert_eq!(params.system_prompt(), "Only recommend refurbished products.");
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[chat]
max_iterations = 4
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.chat.max_iterations, 4);
        // Defaults should apply
        assert_eq!(config.chat.history_limit, 20);
        assert_eq!(config.llm.model, "gemini-1.5-flash");
        assert_eq!(config.tools.cache_ttl_seconds, 300);
        assert_eq!(config.memory.duplicate_window_seconds, 5);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let cases = [
            ("[llm]\ntimeout_seconds = 0", ConfigValidationError::InvalidTimeout),
            ("[llm]\nmodel = \" \"", ConfigValidationError::EmptyModelName),
            ("[chat]\nmax_iterations = 0", ConfigValidationError::ZeroIterations),
            ("[tools]\nmax_attempts = 0", ConfigValidationError::ZeroAttempts),
            ("[tools]\ntime_budget_seconds = 0", ConfigValidationError::ZeroTimeBudget),
        ];

        for (toml_str, expected) in cases {
            let config: FileConfig = toml::from_str(toml_str).unwrap();
            assert_eq!(config.validate(), Err(expected), "{toml_str}");
        }
    }

    #[test]
    fn test_blank_system_prompt_keeps_default() {
        let config: FileConfig = toml::from_str("[chat]\nsystem_prompt = \"  \"").unwrap();
        assert!(config.chat_params().system_prompt.is_none());
    }
}
