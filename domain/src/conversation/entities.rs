//! Conversation domain entities

use serde::{Deserialize, Serialize};

use crate::tool::entities::ToolCall;

/// Role of a turn in a conversation
///
/// Tool results are injected with the `User` role: from the model's point of
/// view they are context supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

/// Output of one tool call, carried inside a turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResultPart {
    /// Name of the tool that produced the payload
    pub name: String,
    /// Result payload, or `{"error": ..., "code": ...}` on failure
    pub payload: serde_json::Value,
}

/// One atomic unit of conversation history (Entity)
///
/// A conversation is an ordered sequence of turns; no turn may be reordered
/// relative to its causal predecessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<ToolResultPart>,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: Some(text.into()),
            tool_calls: Vec::new(),
            tool_result: None,
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::model_with_calls(text, Vec::new())
    }

    /// A model turn that may request tools; empty text is stored as `None`
    pub fn model_with_calls(text: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        let text = text.into();
        Self {
            role: ChatRole::Model,
            text: (!text.is_empty()).then_some(text),
            tool_calls,
            tool_result: None,
        }
    }

    pub fn tool_result(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            role: ChatRole::User,
            text: None,
            tool_calls: Vec::new(),
            tool_result: Some(ToolResultPart {
                name: name.into(),
                payload,
            }),
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn is_tool_result(&self) -> bool {
        self.tool_result.is_some()
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Plain user message (no tool payload)
    pub fn is_user_message(&self) -> bool {
        self.role == ChatRole::User && self.tool_result.is_none() && self.text.is_some()
    }
}
