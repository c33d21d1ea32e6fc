//! Model endpoint configuration from TOML (`[llm]` section)

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiSettings};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    /// Base URL of the generateContent API
    pub base_url: String,
    /// Model name, e.g. "gemini-1.5-flash"
    pub model: String,
    /// Environment variable holding the API key (default: "GEMINI_API_KEY")
    pub api_key_env: String,
    /// Direct API key (prefer the environment variable)
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            timeout_seconds: 30,
            temperature: 0.7,
            max_output_tokens: 2048,
        }
    }
}

impl FileLlmConfig {
    /// API key from the config file, else from `api_key_env`.
    ///
    /// Blank values count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                std::env::var(&self.api_key_env)
                    .ok()
                    .filter(|k| !k.trim().is_empty())
            })
    }

    pub fn to_settings(&self) -> GeminiSettings {
        GeminiSettings {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            timeout: Duration::from_secs(self.timeout_seconds),
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_api_key_wins() {
        let config = FileLlmConfig {
            api_key: Some("from-file".to_string()),
            api_key_env: "SHOPWISE_TEST_UNSET_KEY_VAR".to_string(),
            ..FileLlmConfig::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("from-file"));

        let blank = FileLlmConfig {
            api_key: Some("  ".to_string()),
            api_key_env: "SHOPWISE_TEST_UNSET_KEY_VAR".to_string(),
            ..FileLlmConfig::default()
        };
        assert!(blank.resolve_api_key().is_none());
    }

    #[test]
    fn test_to_settings() {
        let settings = FileLlmConfig::default().to_settings();
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.timeout, Duration::from_secs(30));
    }
}
