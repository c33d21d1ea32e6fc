//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording chat events
//! (model requests and replies, tool calls and their results, final
//! responses) to a structured transcript.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! conversation transcript in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured conversation event for logging.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. The adapter stamps the time when writing.
#[derive(Debug, Clone)]
pub struct ConversationEvent {
    /// Event type identifier (`llm_request`, `llm_response`, `tool_call`,
    /// `tool_result`, `chat_response`).
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging conversation events to a structured log.
///
/// `log` is synchronous and infallible so a broken transcript never disrupts
/// a chat run; write failures are dropped by the adapter.
pub trait ConversationLogger: Send + Sync {
    /// Record a conversation event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
