//! Error types for the Gemini adapter

use shopwise_application::ports::llm_gateway::GatewayError;
use thiserror::Error;

/// Result type alias for Gemini operations
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Errors that can occur when calling a generateContent endpoint
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response blocked: {0}")]
    Blocked(String),

    #[error("Response had no candidates")]
    EmptyResponse,

    #[error("Failed to build client: {0}")]
    Client(String),
}

impl From<GeminiError> for GatewayError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::Transport(e) if e.is_timeout() => GatewayError::Timeout,
            GeminiError::Transport(e) => GatewayError::ConnectionError(e.to_string()),
            GeminiError::Api { .. } => GatewayError::RequestFailed(err.to_string()),
            GeminiError::Serialization(_) | GeminiError::Blocked(_) | GeminiError::EmptyResponse => {
                GatewayError::InvalidResponse(err.to_string())
            }
            GeminiError::Client(msg) => GatewayError::Other(msg),
        }
    }
}
