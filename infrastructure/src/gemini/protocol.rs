//! Wire types for the generateContent API.
//!
//! # Turn mapping
//!
//! - user text → `{"role": "user", "parts": [{"text": ...}]}`
//! - model text and tool requests → `{"role": "model", "parts": [{"text"}, {"functionCall"}]}`
//! - tool results → `{"role": "user", "parts": [{"functionResponse": {"name", "response"}}]}`
//!
//! Consecutive turns with the same role are merged into one content entry,
//! since the endpoint expects roles to alternate.

use serde::{Deserialize, Serialize};
use shopwise_domain::{ChatRole, ChatTurn, LlmResponse, ToolCall};

/// One part of a content entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            function_call: None,
            function_response: None,
        }
    }

    pub fn function_call(call: &ToolCall) -> Self {
        Self {
            text: None,
            function_call: Some(FunctionCall {
                name: call.name.clone(),
                args: call.arguments_json(),
            }),
            function_response: None,
        }
    }

    pub fn function_response(name: impl Into<String>, response: serde_json::Value) -> Self {
        Self {
            text: None,
            function_call: None,
            function_response: Some(FunctionResponse {
                name: name.into(),
                response,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<serde_json::Value>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

fn turn_parts(turn: &ChatTurn) -> Vec<Part> {
    let mut parts = Vec::new();
    if let Some(text) = turn.text().filter(|t| !t.is_empty()) {
        parts.push(Part::text(text));
    }
    parts.extend(turn.tool_calls.iter().map(Part::function_call));
    if let Some(result) = &turn.tool_result {
        parts.push(Part::function_response(&result.name, result.payload.clone()));
    }
    parts
}

/// Convert history plus the current prompt into `contents`.
pub fn build_contents(history: &[ChatTurn], prompt: &str) -> Vec<Content> {
    let mut contents: Vec<Content> = Vec::with_capacity(history.len() + 1);

    let turns = history
        .iter()
        .map(|turn| (turn.role, turn_parts(turn)))
        .chain((!prompt.trim().is_empty()).then(|| (ChatRole::User, vec![Part::text(prompt)])));

    for (role, parts) in turns {
        if parts.is_empty() {
            continue;
        }
        let role = role.as_str();
        match contents.last_mut() {
            Some(last) if last.role.as_deref() == Some(role) => last.parts.extend(parts),
            _ => contents.push(Content {
                role: Some(role.to_string()),
                parts,
            }),
        }
    }
    contents
}

/// Wrap function declarations the way the endpoint expects
pub fn tool_declarations(schemas: &[serde_json::Value]) -> Vec<serde_json::Value> {
    if schemas.is_empty() {
        return Vec::new();
    }
    vec![serde_json::json!({ "functionDeclarations": schemas })]
}

impl GenerateContentResponse {
    /// Parse the first candidate into text plus tool calls.
    ///
    /// Returns `None` when there is no candidate at all.
    pub fn into_llm_response(self) -> Option<LlmResponse> {
        let candidate = self.candidates.into_iter().next()?;
        let mut response = LlmResponse {
            finish_reason: candidate.finish_reason,
            ..LlmResponse::default()
        };

        let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
        let mut texts = Vec::new();
        for part in parts {
            if let Some(text) = part.text {
                texts.push(text);
            }
            if let Some(call) = part.function_call {
                response
                    .tool_calls
                    .push(ToolCall::from_arguments(call.name, call.args));
            }
        }
        response.text = texts.concat();
        Some(response)
    }

    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_contents_merges_roles() {
        let call = ToolCall::new("search_products").with_arg("query", "phone");
        let history = vec![
            ChatTurn::user("find a phone"),
            ChatTurn::model_with_calls("", vec![call]),
            ChatTurn::tool_result("search_products", serde_json::json!({"products": []})),
        ];

        let contents = build_contents(&history, "Summarise the results");

        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0].role.as_deref(), Some("user"));
        assert_eq!(contents[1].role.as_deref(), Some("model"));
        let call_part = contents[1].parts[0].function_call.as_ref().unwrap();
        assert_eq!(call_part.name, "search_products");
        assert_eq!(call_part.args["query"], "phone");

        // Tool result and the follow-up prompt share one user entry
        assert_eq!(contents[2].role.as_deref(), Some("user"));
        assert_eq!(contents[2].parts.len(), 2);
        assert!(contents[2].parts[0].function_response.is_some());
        assert_eq!(
            contents[2].parts[1].text.as_deref(),
            Some("Summarise the results")
        );
    }

    #[test]
    fn test_build_contents_skips_empty_prompt() {
        let contents = build_contents(&[ChatTurn::user("hi")], "  ");
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].parts.len(), 1);
    }

    #[test]
    fn test_request_serialization_uses_camel_case() {
        let request = GenerateContentRequest {
            contents: build_contents(&[], "hello"),
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::text("be brief")],
            }),
            tools: tool_declarations(&[serde_json::json!({"name": "search_products"})]),
            generation_config: GenerationConfig {
                temperature: 0.5,
                max_output_tokens: 256,
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be brief");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(
            json["tools"][0]["functionDeclarations"][0]["name"],
            "search_products"
        );
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 256);
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_parse_text_and_function_calls() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "Let me look. "},
                        {"functionCall": {"name": "get_product_details", "args": {"product_id": 3}}},
                        {"text": "One moment."}
                    ]
                },
                "finishReason": "STOP"
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();

        let parsed = response.into_llm_response().unwrap();
        assert_eq!(parsed.text, "Let me look. One moment.");
        assert_eq!(parsed.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(parsed.tool_calls.len(), 1);
        assert_eq!(parsed.tool_calls[0].get_i64("product_id"), Some(3));
        assert!(parsed.tool_calls[0].call_id.starts_with("call_"));
    }

    #[test]
    fn test_parse_without_candidates() {
        let raw = serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();

        assert_eq!(response.block_reason(), Some("SAFETY"));
        assert!(response.into_llm_response().is_none());
    }
}
