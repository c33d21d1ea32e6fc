//! Gemini LLM Gateway implementation

use std::time::Duration;

use async_trait::async_trait;
use shopwise_application::ports::llm_gateway::{GatewayError, GenerateRequest, LlmGateway};
use shopwise_domain::{LlmResponse, PromptTemplate};
use tracing::{debug, info, warn};

use super::error::{GeminiError, Result};
use super::protocol::{
    ApiErrorBody, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Part, build_contents, tool_declarations,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Connection and sampling settings for [`GeminiLlmGateway`]
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(30),
            temperature: 0.7,
            max_output_tokens: 2048,
        }
    }
}

/// LLM Gateway speaking the generateContent function-calling API
pub struct GeminiLlmGateway {
    http: reqwest::Client,
    settings: GeminiSettings,
}

impl GeminiLlmGateway {
    pub fn new(settings: GeminiSettings) -> std::result::Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| GeminiError::Client(e.to_string()))?;

        info!(model = %settings.model, base_url = %settings.base_url, "GeminiLlmGateway initialized");
        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &GeminiSettings {
        &self.settings
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }

    fn build_body(&self, request: &GenerateRequest<'_>) -> GenerateContentRequest {
        let system_instruction = (!request.system_prompt.trim().is_empty()).then(|| Content {
            role: None,
            parts: vec![Part::text(request.system_prompt)],
        });

        GenerateContentRequest {
            contents: build_contents(request.history, request.prompt),
            system_instruction,
            tools: tool_declarations(request.tools),
            generation_config: GenerationConfig {
                temperature: self.settings.temperature,
                max_output_tokens: self.settings.max_output_tokens,
            },
        }
    }

    async fn send(&self, api_key: &str, body: &GenerateContentRequest) -> Result<LlmResponse> {
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&raw)
                .map(|b| match b.error.status {
                    Some(code) => format!("{} ({})", b.error.message, code),
                    None => b.error.message,
                })
                .unwrap_or(raw);
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&raw)?;
        if let Some(reason) = parsed.block_reason() {
            return Err(GeminiError::Blocked(reason.to_string()));
        }
        parsed.into_llm_response().ok_or(GeminiError::EmptyResponse)
    }
}

#[async_trait]
impl LlmGateway for GeminiLlmGateway {
    async fn generate(
        &self,
        request: GenerateRequest<'_>,
    ) -> std::result::Result<LlmResponse, GatewayError> {
        let Some(api_key) = request.credentials.map(str::trim).filter(|k| !k.is_empty()) else {
            warn!("No API credentials configured; skipping model call");
            return Ok(LlmResponse::from_text(PromptTemplate::missing_credentials()));
        };

        let body = self.build_body(&request);
        debug!(
            model = %self.settings.model,
            contents = body.contents.len(),
            tools = request.tools.len(),
            "Sending generateContent request"
        );

        let response = self.send(api_key, &body).await.map_err(|e| {
            warn!(error = %e, "generateContent failed");
            GatewayError::from(e)
        })?;

        debug!(
            text_len = response.text.len(),
            tool_calls = response.tool_calls.len(),
            finish_reason = ?response.finish_reason,
            "Received generateContent response"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopwise_domain::ChatTurn;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one HTTP response and hand back the raw request.
    async fn serve_once(status: &'static str, body: String) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .and_then(|v| v.trim().parse::<usize>().ok())
                        })
                        .unwrap_or(0);
                    if buf.len() >= end + 4 + length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&buf).to_string()
        });

        (base_url, handle)
    }

    fn gateway(base_url: String) -> GeminiLlmGateway {
        GeminiLlmGateway::new(GeminiSettings {
            base_url,
            model: "test-model".to_string(),
            timeout: Duration::from_secs(5),
            ..GeminiSettings::default()
        })
        .unwrap()
    }

    fn request<'a>(
        history: &'a [ChatTurn],
        tools: &'a [serde_json::Value],
        credentials: Option<&'a str>,
    ) -> GenerateRequest<'a> {
        GenerateRequest {
            prompt: "find headphones",
            system_prompt: "You are a shopping assistant.",
            history,
            tools,
            credentials,
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_short_circuits() {
        // Unroutable address: any network attempt would fail the test
        let gateway = gateway("http://127.0.0.1:1".to_string());

        for credentials in [None, Some(""), Some("   ")] {
            let response = gateway.generate(request(&[], &[], credentials)).await.unwrap();
            assert_eq!(response.text, PromptTemplate::missing_credentials());
            assert!(!response.has_tool_calls());
        }
    }

    #[tokio::test]
    async fn test_generate_parses_function_call() {
        let body = serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"functionCall": {"name": "search_products", "args": {"query": "headphones"}}}
                ]},
                "finishReason": "STOP"
            }]
        })
        .to_string();
        let (base_url, server) = serve_once("200 OK", body).await;
        let gateway = gateway(base_url);
        let tools = vec![serde_json::json!({"name": "search_products"})];

        let response = gateway
            .generate(request(&[], &tools, Some("secret")))
            .await
            .unwrap();

        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].get_string("query"), Some("headphones"));

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /v1beta/models/test-model:generateContent"));
        assert!(raw.to_lowercase().contains("x-goog-api-key: secret"));
        assert!(raw.contains("functionDeclarations"));
        assert!(raw.contains("You are a shopping assistant."));
    }

    #[tokio::test]
    async fn test_http_error_propagates() {
        let body = serde_json::json!({
            "error": {"code": 503, "message": "The model is overloaded", "status": "UNAVAILABLE"}
        })
        .to_string();
        let (base_url, _server) = serve_once("503 Service Unavailable", body).await;
        let gateway = gateway(base_url);

        let err = gateway
            .generate(request(&[], &[], Some("secret")))
            .await
            .unwrap_err();

        match err {
            GatewayError::RequestFailed(msg) => {
                assert!(msg.contains("503"));
                assert!(msg.contains("overloaded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_candidates_is_invalid_response() {
        let (base_url, _server) = serve_once("200 OK", "{}".to_string()).await;
        let gateway = gateway(base_url);

        let err = gateway
            .generate(request(&[], &[], Some("secret")))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[test]
    fn test_body_includes_history_and_prompt() {
        let gateway = gateway(DEFAULT_BASE_URL.to_string());
        let history = vec![ChatTurn::user("hello"), ChatTurn::model("Hi! What are you shopping for?")];

        let body = gateway.build_body(&request(&history, &[], Some("k")));

        assert_eq!(body.contents.len(), 3);
        assert_eq!(body.contents[2].parts[0].text.as_deref(), Some("find headphones"));
        assert!(body.tools.is_empty());
        assert!(body.system_instruction.is_some());
    }
}
