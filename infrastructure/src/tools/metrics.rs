//! Per-tool execution metrics.
//!
//! Counters are lock-free atomics; only the bounded latency window takes a
//! short lock. The table is owned by the executor and keyed by registered
//! tool names, so it never grows past the registry.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use shopwise_domain::tool::metrics::ToolMetricsSnapshot;

/// Latency samples kept per tool
pub const LATENCY_WINDOW: usize = 100;

#[derive(Debug, Default)]
pub struct ToolMetrics {
    execution_count: AtomicU64,
    success_count: AtomicU64,
    failure_count: AtomicU64,
    cache_hits: AtomicU64,
    latencies_ms: Mutex<VecDeque<u64>>,
}

impl ToolMetrics {
    /// Record a completed execution (all attempts included)
    pub fn record_execution(&self, success: bool, latency: Duration) {
        self.execution_count.fetch_add(1, Ordering::Relaxed);
        if success {
            self.success_count.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failure_count.fetch_add(1, Ordering::Relaxed);
        }

        let mut window = self.latencies_ms.lock().unwrap_or_else(|e| e.into_inner());
        if window.len() == LATENCY_WINDOW {
            window.pop_front();
        }
        window.push_back(latency.as_millis() as u64);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, tool_name: &str) -> ToolMetricsSnapshot {
        let window = self.latencies_ms.lock().unwrap_or_else(|e| e.into_inner());
        let average_latency_ms = if window.is_empty() {
            0.0
        } else {
            window.iter().sum::<u64>() as f64 / window.len() as f64
        };

        ToolMetricsSnapshot {
            tool_name: tool_name.to_string(),
            execution_count: self.execution_count.load(Ordering::Relaxed),
            success_count: self.success_count.load(Ordering::Relaxed),
            failure_count: self.failure_count.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            average_latency_ms,
            latency_samples: window.len(),
        }
    }
}

/// Metrics table keyed by tool name
#[derive(Debug, Default)]
pub struct ToolMetricsRegistry {
    tools: RwLock<HashMap<String, Arc<ToolMetrics>>>,
}

impl ToolMetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-create rows so every registered tool shows up in snapshots
    pub fn with_tools<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let registry = Self::new();
        for name in names {
            registry.for_tool(name);
        }
        registry
    }

    /// Counters for `name`, created on first use
    pub fn for_tool(&self, name: &str) -> Arc<ToolMetrics> {
        if let Some(metrics) = self
            .tools
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
        {
            return metrics.clone();
        }
        self.tools
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(name.to_string())
            .or_default()
            .clone()
    }

    /// Snapshot of every tool, sorted by name
    pub fn snapshot(&self) -> Vec<ToolMetricsSnapshot> {
        let tools = self.tools.read().unwrap_or_else(|e| e.into_inner());
        let mut snapshots: Vec<_> = tools
            .iter()
            .map(|(name, metrics)| metrics.snapshot(name))
            .collect();
        snapshots.sort_by(|a, b| a.tool_name.cmp(&b.tool_name));
        snapshots
    }

    pub fn get(&self, name: &str) -> Option<ToolMetricsSnapshot> {
        self.tools
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .map(|m| m.snapshot(name))
    }
}
