//! Inbound chat requests and outbound conversational responses.

use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;
use crate::product::entities::Product;

/// A user utterance submitted for orchestration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message (required, non-blank)
    pub message: String,
    pub user_id: String,
    /// Provider credentials; absent or blank means "not configured"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,
    /// Products the user is currently looking at
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context_products: Vec<Product>,
    /// Conversation to load history from and persist into; `None` runs stateless
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<i64>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            user_id: user_id.into(),
            credentials: None,
            context_products: Vec::new(),
            conversation_id: None,
        }
    }

    pub fn with_credentials(mut self, credentials: impl Into<String>) -> Self {
        self.credentials = Some(credentials.into());
        self
    }

    pub fn with_conversation(mut self, conversation_id: i64) -> Self {
        self.conversation_id = Some(conversation_id);
        self
    }

    pub fn with_context_products(mut self, products: Vec<Product>) -> Self {
        self.context_products = products;
        self
    }

    /// Credentials, if present and non-blank
    pub fn credentials(&self) -> Option<&str> {
        self.credentials
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.message.trim().is_empty() {
            return Err(DomainError::InvalidRequest(
                "message must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

/// The externally visible result of one orchestration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationalResponse {
    /// Always non-empty
    pub text: String,
    /// Deduplicated by product identity
    pub products: Vec<Product>,
}

impl ConversationalResponse {
    pub fn new(text: impl Into<String>, products: Vec<Product>) -> Self {
        Self {
            text: text.into(),
            products,
        }
    }

    pub fn text_only(text: impl Into<String>) -> Self {
        Self::new(text, Vec::new())
    }
}
