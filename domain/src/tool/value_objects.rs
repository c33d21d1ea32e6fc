//! Tool domain value objects: execution results and the error taxonomy
//!
//! Every tool invocation, and every pass through the executor, produces a
//! [`ToolExecutionResult`]. Failures never escape as Rust errors at this
//! boundary: they are carried in the result so the conversation loop can feed
//! them back to the model as context.
//!
//! | Kind | Code | Raised when |
//! |------|------|-------------|
//! | `InvalidRequest` | `INVALID_REQUEST` | empty tool name, missing/unknown arguments |
//! | `NotFound` | `NOT_FOUND` | unknown tool, missing entity |
//! | `ExecutionError` | `EXECUTION_ERROR` | the tool faulted; message preserved |
//! | `ExecutionFailed` | `EXECUTION_FAILED` | retries exhausted without success |
//! | `UpstreamUnavailable` | `UPSTREAM_UNAVAILABLE` | LLM/data source unreachable or timed out |
//! | `Cancelled` | `CANCELLED` | the caller's cancellation token fired |

use serde::{Deserialize, Serialize};

/// Error taxonomy shared by tools, the executor and the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolErrorKind {
    InvalidRequest,
    NotFound,
    ExecutionError,
    ExecutionFailed,
    UpstreamUnavailable,
    Cancelled,
}

impl ToolErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolErrorKind::InvalidRequest => "INVALID_REQUEST",
            ToolErrorKind::NotFound => "NOT_FOUND",
            ToolErrorKind::ExecutionError => "EXECUTION_ERROR",
            ToolErrorKind::ExecutionFailed => "EXECUTION_FAILED",
            ToolErrorKind::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            ToolErrorKind::Cancelled => "CANCELLED",
        }
    }

    /// Whether a failure reported by a tool earns another attempt.
    ///
    /// Only cancellation stops the retry loop; every other reported failure
    /// is retried with backoff. Arguments are validated before the first
    /// attempt, so rejected calls never reach this check.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ToolErrorKind::Cancelled)
    }
}

impl std::fmt::Display for ToolErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a tool execution.
///
/// `result` is an opaque structured payload; downstream code inspects it by
/// key (most commonly `products`), never by type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolExecutionResult {
    /// Whether the execution was successful
    pub success: bool,
    /// Structured payload (for successful execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Human-readable error message (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Error classification (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ToolErrorKind>,
}

impl ToolExecutionResult {
    /// Create a successful result
    pub fn success(result: serde_json::Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error_message: None,
            error_code: None,
        }
    }

    /// Create a failed result
    pub fn failure(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error_message: Some(message.into()),
            error_code: Some(kind),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::failure(ToolErrorKind::InvalidRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::failure(ToolErrorKind::NotFound, message)
    }

    pub fn cancelled() -> Self {
        Self::failure(ToolErrorKind::Cancelled, "Operation cancelled")
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_cancelled(&self) -> bool {
        self.error_code == Some(ToolErrorKind::Cancelled)
    }

    /// The `products` array of the payload, if present.
    pub fn products(&self) -> Option<&Vec<serde_json::Value>> {
        self.result
            .as_ref()
            .and_then(|r| r.get("products"))
            .and_then(|p| p.as_array())
    }

    /// Payload handed back to the model as a tool response.
    ///
    /// Successful results pass through unchanged (non-object payloads are
    /// wrapped); failures become `{"error": ..., "code": ...}`.
    pub fn to_payload(&self) -> serde_json::Value {
        if self.success {
            match &self.result {
                Some(value @ serde_json::Value::Object(_)) => value.clone(),
                Some(other) => serde_json::json!({ "result": other }),
                None => serde_json::json!({}),
            }
        } else {
            serde_json::json!({
                "error": self.error_message.as_deref().unwrap_or("Unknown error"),
                "code": self.error_code.map(|c| c.as_str()).unwrap_or("EXECUTION_FAILED"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_payload_passthrough() {
        let result = ToolExecutionResult::success(serde_json::json!({
            "products": [{"id": 1, "title": "iPhone 15", "price": 799.0}],
            "count": 1,
        }));

        assert!(result.is_success());
        assert_eq!(result.products().map(Vec::len), Some(1));
        assert_eq!(result.to_payload()["count"], 1);
    }

    #[test]
    fn test_scalar_payload_is_wrapped() {
        let result = ToolExecutionResult::success(serde_json::json!("plain"));
        assert_eq!(result.to_payload(), serde_json::json!({"result": "plain"}));
        assert!(result.products().is_none());
    }

    #[test]
    fn test_failure_payload() {
        let result = ToolExecutionResult::not_found("Product 42 not found");

        assert!(!result.is_success());
        assert!(result.result.is_none());
        let payload = result.to_payload();
        assert_eq!(payload["error"], "Product 42 not found");
        assert_eq!(payload["code"], "NOT_FOUND");
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(!ToolErrorKind::Cancelled.is_retryable());
        assert!(ToolErrorKind::NotFound.is_retryable());
        assert!(ToolErrorKind::InvalidRequest.is_retryable());
        assert!(ToolErrorKind::UpstreamUnavailable.is_retryable());
    }

    #[test]
    fn test_error_code_serialization() {
        let result = ToolExecutionResult::failure(ToolErrorKind::ExecutionFailed, "boom");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error_code"], "EXECUTION_FAILED");
        assert_eq!(result.error_code.unwrap().to_string(), "EXECUTION_FAILED");
    }
}
