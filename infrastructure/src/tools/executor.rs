//! Caching, retrying tool executor, the concrete implementation of [`ToolExecutorPort`].
//!
//! [`CachingToolExecutor`] resolves calls against an immutable
//! [`ToolRegistry`] and wraps every capability with the same policy:
//!
//! ```text
//! execute(call)
//!   ├─ empty name          → INVALID_REQUEST
//!   ├─ unknown tool        → NOT_FOUND
//!   ├─ bad arguments       → INVALID_REQUEST (no retry)
//!   ├─ cacheable + hit     → cached result   (cache_hits += 1)
//!   └─ attempts 1..=N      → success short-circuits
//!        ├─ reported failure / timeout → backoff, retry → EXECUTION_FAILED
//!        └─ fault / panic              → backoff, retry → EXECUTION_ERROR
//! ```
//!
//! Cancellation is observed while an attempt runs and while a backoff
//! sleep is pending.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use shopwise_application::ports::tool_executor::ToolExecutorPort;
use shopwise_domain::tool::{
    capability::{ToolCapability, ToolFault},
    entities::{ToolCall, ToolDefinition},
    metrics::ToolMetricsSnapshot,
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolErrorKind, ToolExecutionResult},
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::cache::{ToolResultCache, cache_key};
use super::metrics::ToolMetricsRegistry;
use super::registry::ToolRegistry;
use super::retry::RetryPolicy;

/// Executor shared by every conversation.
///
/// Cache and metrics are owned by the executor and injected at construction;
/// both tolerate concurrent access.
pub struct CachingToolExecutor {
    registry: Arc<ToolRegistry>,
    cache: Arc<ToolResultCache>,
    metrics: Arc<ToolMetricsRegistry>,
    retry: RetryPolicy,
    validator: DefaultToolValidator,
}

impl CachingToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        let metrics = Arc::new(ToolMetricsRegistry::with_tools(registry.names()));
        Self {
            registry,
            cache: Arc::new(ToolResultCache::default()),
            metrics,
            retry: RetryPolicy::default(),
            validator: DefaultToolValidator,
        }
    }

    pub fn with_cache(mut self, cache: Arc<ToolResultCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<ToolMetricsRegistry>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &ToolResultCache {
        &self.cache
    }

    pub fn metrics_registry(&self) -> &Arc<ToolMetricsRegistry> {
        &self.metrics
    }

    /// Run up to `max_attempts` attempts with backoff between failures
    async fn run_with_retry(
        &self,
        tool: &dyn ToolCapability,
        call: &ToolCall,
        budget: Option<Duration>,
        cancel: &CancellationToken,
    ) -> ToolExecutionResult {
        let max_attempts = self.retry.max_attempts;
        let mut attempt = 0;

        loop {
            attempt += 1;

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return ToolExecutionResult::cancelled(),
                outcome = Self::attempt(tool, call, budget) => outcome,
            };

            match outcome {
                Ok(result) if result.is_success() => {
                    if attempt > 1 {
                        debug!(tool = %call.name, attempt, "Tool succeeded after retry");
                    }
                    return result;
                }
                Ok(result) => {
                    let message = result.error_message.as_deref().unwrap_or("unknown error");
                    let retryable = result.error_code.is_some_and(|kind| kind.is_retryable());
                    warn!(
                        tool = %call.name,
                        call_id = %call.call_id,
                        attempt,
                        code = ?result.error_code,
                        "Tool attempt failed: {}",
                        message
                    );
                    if !retryable {
                        return result;
                    }
                    if attempt >= max_attempts {
                        return ToolExecutionResult::failure(
                            ToolErrorKind::ExecutionFailed,
                            format!(
                                "Tool '{}' failed after {} attempts: {}",
                                call.name, attempt, message
                            ),
                        );
                    }
                }
                Err(fault) => {
                    warn!(
                        tool = %call.name,
                        call_id = %call.call_id,
                        attempt,
                        "Tool attempt faulted: {}",
                        fault
                    );
                    if attempt >= max_attempts {
                        return ToolExecutionResult::failure(
                            ToolErrorKind::ExecutionError,
                            fault.message,
                        );
                    }
                }
            }

            if let Some(delay) = self.retry.backoff_after(attempt) {
                debug!(tool = %call.name, attempt, delay_ms = delay.as_millis() as u64, "Backing off");
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return ToolExecutionResult::cancelled(),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }
    }

    /// One attempt: budget enforced, panics converted into faults
    async fn attempt(
        tool: &dyn ToolCapability,
        call: &ToolCall,
        budget: Option<Duration>,
    ) -> Result<ToolExecutionResult, ToolFault> {
        let run = AssertUnwindSafe(tool.execute(call)).catch_unwind();

        let outcome = match budget {
            Some(budget) => match tokio::time::timeout(budget, run).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    return Ok(ToolExecutionResult::failure(
                        ToolErrorKind::UpstreamUnavailable,
                        format!("Tool '{}' timed out after {}ms", call.name, budget.as_millis()),
                    ));
                }
            },
            None => run.await,
        };

        outcome.unwrap_or_else(|panic| Err(ToolFault::new(panic_message(panic.as_ref()))))
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("tool panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("tool panicked: {}", s)
    } else {
        "tool panicked".to_string()
    }
}

#[async_trait]
impl ToolExecutorPort for CachingToolExecutor {
    fn tool_definitions(&self) -> &[ToolDefinition] {
        self.registry.describe()
    }

    fn has_tool(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    async fn execute(
        &self,
        call: &ToolCall,
        budget: Option<Duration>,
        cancel: &CancellationToken,
    ) -> ToolExecutionResult {
        if call.name.trim().is_empty() {
            return ToolExecutionResult::invalid_request("Tool name must not be empty");
        }
        if cancel.is_cancelled() {
            return ToolExecutionResult::cancelled();
        }

        let tool = match self.registry.resolve(&call.name) {
            Ok(tool) => tool.clone(),
            Err(e) => {
                warn!(tool = %call.name, "Model requested an unknown tool");
                return ToolExecutionResult::not_found(e.to_string());
            }
        };

        let started = Instant::now();
        let metrics = self.metrics.for_tool(&call.name);

        if let Err(message) = self.validator.validate(call, tool.definition()) {
            metrics.record_execution(false, started.elapsed());
            return ToolExecutionResult::invalid_request(message);
        }

        let key = tool.kind().is_cacheable().then(|| cache_key(call));
        if let Some(key) = &key
            && let Some(hit) = self.cache.get(key)
        {
            debug!(tool = %call.name, call_id = %call.call_id, "Cache hit");
            metrics.record_cache_hit();
            return hit;
        }

        let result = self.run_with_retry(tool.as_ref(), call, budget, cancel).await;

        if result.is_success()
            && let Some(key) = key
        {
            self.cache.insert(key, result.clone());
        }

        let latency = started.elapsed();
        metrics.record_execution(result.is_success(), latency);
        debug!(
            tool = %call.name,
            call_id = %call.call_id,
            success = result.is_success(),
            latency_ms = latency.as_millis() as u64,
            "Tool execution finished"
        );

        result
    }

    fn metrics(&self) -> Vec<ToolMetricsSnapshot> {
        self.metrics.snapshot()
    }
}
