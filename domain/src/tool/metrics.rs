//! Per-tool execution metrics snapshot

use serde::{Deserialize, Serialize};

/// Point-in-time view of one tool's counters.
///
/// When no execution of the tool is in flight,
/// `execution_count == success_count + failure_count`. Cache hits are
/// counted separately and never bump `execution_count`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolMetricsSnapshot {
    pub tool_name: String,
    pub execution_count: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub cache_hits: u64,
    /// Mean over the retained latency window, in milliseconds
    pub average_latency_ms: f64,
    /// Number of samples in the latency window
    pub latency_samples: usize,
}

impl ToolMetricsSnapshot {
    /// Fraction of executions that succeeded (0.0 when nothing ran)
    pub fn success_rate(&self) -> f64 {
        if self.execution_count == 0 {
            0.0
        } else {
            self.success_count as f64 / self.execution_count as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate() {
        let snapshot = ToolMetricsSnapshot {
            tool_name: "search_products".into(),
            execution_count: 4,
            success_count: 3,
            failure_count: 1,
            ..Default::default()
        };
        assert!((snapshot.success_rate() - 0.75).abs() < f64::EPSILON);
        assert_eq!(ToolMetricsSnapshot::default().success_rate(), 0.0);
    }
}
