//! Gemini-style generateContent adapter
//!
//! Implements the [`LlmGateway`](shopwise_application::ports::llm_gateway::LlmGateway)
//! port over HTTP with reqwest.

pub mod error;
pub mod gateway;
pub mod protocol;

pub use error::GeminiError;
pub use gateway::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiLlmGateway, GeminiSettings};
