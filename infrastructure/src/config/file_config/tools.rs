//! Tool execution configuration from TOML (`[tools]` section)
//!
//! ```toml
//! [tools]
//! cache_ttl_seconds = 300
//! cache_capacity = 1000
//! max_attempts = 3
//! initial_backoff_ms = 500
//! time_budget_seconds = 10
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::tools::{DEFAULT_CAPACITY, DEFAULT_TTL, RetryPolicy, ToolResultCache};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    pub cache_ttl_seconds: u64,
    pub cache_capacity: usize,
    /// Attempts per tool call, including the first
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after each failure
    pub initial_backoff_ms: u64,
    /// Per-attempt time limit (unset means no limit)
    pub time_budget_seconds: Option<u64>,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            cache_ttl_seconds: DEFAULT_TTL.as_secs(),
            cache_capacity: DEFAULT_CAPACITY,
            max_attempts: retry.max_attempts,
            initial_backoff_ms: retry.initial_backoff.as_millis() as u64,
            time_budget_seconds: None,
        }
    }
}

impl FileToolsConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.initial_backoff_ms),
        )
    }

    pub fn build_cache(&self) -> ToolResultCache {
        ToolResultCache::new(
            Duration::from_secs(self.cache_ttl_seconds),
            self.cache_capacity,
        )
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_seconds.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_executor_defaults() {
        let config = FileToolsConfig::default();
        assert_eq!(config.cache_ttl_seconds, 300);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.initial_backoff_ms, 500);
        assert!(config.time_budget().is_none());
        assert_eq!(config.retry_policy(), RetryPolicy::default());
    }
}
