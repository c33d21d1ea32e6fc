//! Result cache for read-only tools.
//!
//! Entries expire after a fixed TTL and the cache holds at most `capacity`
//! entries; inserting past capacity evicts the least recently used entry.
//! Expired entries are dropped when read and swept on insert.
//!
//! Time comes from [`tokio::time::Instant`] so paused-clock tests can move
//! past the TTL deterministically.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use sha2::{Digest, Sha256};
use shopwise_domain::tool::{entities::ToolCall, value_objects::ToolExecutionResult};
use shopwise_domain::util::canonical_json;
use tokio::time::Instant;

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_CAPACITY: usize = 1000;

/// Cache key: tool name plus a stable hash of the arguments
///
/// Argument maps that differ only in key order share a key.
pub fn cache_key(call: &ToolCall) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_json(&call.arguments_json()).as_bytes());
    format!("{}:{:x}", call.name, hasher.finalize())
}

struct CacheEntry {
    result: ToolExecutionResult,
    expires_at: Instant,
    last_used: u64,
}

struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// Monotonic use counter for LRU ordering
    clock: u64,
}

pub struct ToolResultCache {
    state: Mutex<CacheState>,
    ttl: Duration,
    capacity: usize,
}

impl ToolResultCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                clock: 0,
            }),
            ttl,
            capacity: capacity.max(1),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fetch a live entry, refreshing its recency
    pub fn get(&self, key: &str) -> Option<ToolExecutionResult> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();

        let expired = match state.entries.get(key) {
            None => return None,
            Some(entry) => entry.expires_at <= now,
        };
        if expired {
            state.entries.remove(key);
            return None;
        }

        state.clock += 1;
        let tick = state.clock;
        state.entries.get_mut(key).map(|entry| {
            entry.last_used = tick;
            entry.result.clone()
        })
    }

    pub fn insert(&self, key: String, result: ToolExecutionResult) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();

        state.entries.retain(|_, entry| entry.expires_at > now);

        if !state.entries.contains_key(&key) && state.entries.len() >= self.capacity {
            let oldest = state
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                tracing::trace!(key = %oldest, "Evicting least recently used cache entry");
                state.entries.remove(&oldest);
            }
        }

        state.clock += 1;
        let tick = state.clock;
        state.entries.insert(
            key,
            CacheEntry {
                result,
                expires_at: now + self.ttl,
                last_used: tick,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .clear();
    }
}

impl Default for ToolResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok(n: i64) -> ToolExecutionResult {
        ToolExecutionResult::success(json!({ "n": n }))
    }

    #[test]
    fn test_cache_key_ignores_argument_order() {
        let a = ToolCall::new("get_product_details")
            .with_arg("product_id", 1)
            .with_arg("currency", "USD");
        let b = ToolCall::new("get_product_details")
            .with_arg("currency", "USD")
            .with_arg("product_id", 1);
        assert_eq!(cache_key(&a), cache_key(&b));
        assert!(cache_key(&a).starts_with("get_product_details:"));
    }

    #[test]
    fn test_cache_key_differs_by_tool_and_args() {
        let a = ToolCall::new("get_product_details").with_arg("product_id", 1);
        let b = ToolCall::new("get_product_details").with_arg("product_id", 2);
        let c = ToolCall::new("get_price_analytics").with_arg("product_id", 1);
        assert_ne!(cache_key(&a), cache_key(&b));
        assert_ne!(cache_key(&a), cache_key(&c));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let cache = ToolResultCache::new(Duration::from_secs(300), 10);
        cache.insert("k".to_string(), ok(1));

        tokio::time::advance(Duration::from_secs(299)).await;
        assert_eq!(cache.get("k"), Some(ok(1)));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_evicts_least_recently_used() {
        let cache = ToolResultCache::new(Duration::from_secs(300), 2);
        cache.insert("a".to_string(), ok(1));
        cache.insert("b".to_string(), ok(2));

        // Touch "a" so "b" becomes the eviction candidate
        assert!(cache.get("a").is_some());
        cache.insert("c".to_string(), ok(3));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_does_not_evict() {
        let cache = ToolResultCache::new(Duration::from_secs(300), 2);
        cache.insert("a".to_string(), ok(1));
        cache.insert("b".to_string(), ok(2));
        cache.insert("a".to_string(), ok(10));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(ok(10)));
    }
}
