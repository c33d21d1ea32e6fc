//! Conversation memory port
//!
//! Durable per-conversation turn history. The orchestrator reads recent turns
//! before a run and persists the user message and final reply after it.

use async_trait::async_trait;
use shopwise_domain::ChatTurn;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Conversation {0} not found")]
    NotFound(i64),
}

#[async_trait]
pub trait ConversationMemory: Send + Sync {
    /// Most recent `limit` turns of a conversation, oldest first.
    ///
    /// An unknown conversation yields an empty history.
    async fn get_history(&self, conversation_id: i64, limit: usize)
    -> Result<Vec<ChatTurn>, MemoryError>;

    /// Append a turn to a conversation.
    async fn save_turn(&self, conversation_id: i64, turn: ChatTurn) -> Result<(), MemoryError>;
}
