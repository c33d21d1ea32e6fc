//! Conversation domain.
//!
//! - [`entities::ChatTurn`]: one turn (user text, model reply, or tool result)
//! - [`request::ChatRequest`] / [`request::ConversationalResponse`]: the
//!   inbound utterance and the outbound text + deduplicated products
//! - [`response::LlmResponse`]: a parsed model reply (text + tool calls)

pub mod entities;
pub mod request;
pub mod response;

pub use entities::{ChatRole, ChatTurn, ToolResultPart};
pub use request::{ChatRequest, ConversationalResponse};
pub use response::LlmResponse;
