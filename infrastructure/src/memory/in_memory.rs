//! In-process conversation memory.
//!
//! Keeps at most `max_turns` per conversation, dropping the oldest turns
//! first. An identical user message saved again within the duplicate window
//! is ignored, so a double-submitted message is stored once.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use shopwise_application::ports::conversation_memory::{ConversationMemory, MemoryError};
use shopwise_domain::ChatTurn;
use tokio::time::Instant;
use tracing::debug;

pub const DEFAULT_MAX_TURNS: usize = 100;
pub const DEFAULT_DUPLICATE_WINDOW: Duration = Duration::from_secs(5);

#[derive(Default)]
struct Conversation {
    turns: VecDeque<ChatTurn>,
    last_user_message: Option<(String, Instant)>,
}

pub struct InMemoryConversationMemory {
    conversations: Mutex<HashMap<i64, Conversation>>,
    max_turns: usize,
    duplicate_window: Duration,
}

impl Default for InMemoryConversationMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TURNS, DEFAULT_DUPLICATE_WINDOW)
    }
}

impl InMemoryConversationMemory {
    pub fn new(max_turns: usize, duplicate_window: Duration) -> Self {
        Self {
            conversations: Mutex::new(HashMap::new()),
            max_turns: max_turns.max(1),
            duplicate_window,
        }
    }

    /// Number of stored turns for a conversation
    pub fn turn_count(&self, conversation_id: i64) -> usize {
        self.conversations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&conversation_id)
            .map_or(0, |c| c.turns.len())
    }

    pub fn clear(&self, conversation_id: i64) {
        self.conversations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&conversation_id);
    }
}

#[async_trait]
impl ConversationMemory for InMemoryConversationMemory {
    async fn get_history(
        &self,
        conversation_id: i64,
        limit: usize,
    ) -> Result<Vec<ChatTurn>, MemoryError> {
        let conversations = self.conversations.lock().unwrap_or_else(|e| e.into_inner());
        let Some(conversation) = conversations.get(&conversation_id) else {
            return Ok(Vec::new());
        };
        let skip = conversation.turns.len().saturating_sub(limit);
        Ok(conversation.turns.iter().skip(skip).cloned().collect())
    }

    async fn save_turn(&self, conversation_id: i64, turn: ChatTurn) -> Result<(), MemoryError> {
        let now = Instant::now();
        let mut conversations = self.conversations.lock().unwrap_or_else(|e| e.into_inner());
        let conversation = conversations.entry(conversation_id).or_default();

        if turn.is_user_message() {
            let text = turn.text().unwrap_or_default().to_string();
            if let Some((last, saved_at)) = &conversation.last_user_message
                && *last == text
                && now.duration_since(*saved_at) < self.duplicate_window
            {
                debug!(conversation_id, "Skipping duplicate user message");
                return Ok(());
            }
            conversation.last_user_message = Some((text, now));
        }

        conversation.turns.push_back(turn);
        while conversation.turns.len() > self.max_turns {
            conversation.turns.pop_front();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_history_returns_most_recent_turns_in_order() {
        let memory = InMemoryConversationMemory::default();
        for i in 0..5 {
            memory.save_turn(1, ChatTurn::model(format!("reply {i}"))).await.unwrap();
        }

        let history = memory.get_history(1, 2).await.unwrap();
        let texts: Vec<_> = history.iter().filter_map(|t| t.text()).collect();
        assert_eq!(texts, vec!["reply 3", "reply 4"]);

        assert!(memory.get_history(99, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_turn_cap_drops_oldest() {
        let memory = InMemoryConversationMemory::new(3, DEFAULT_DUPLICATE_WINDOW);
        for i in 0..5 {
            memory.save_turn(7, ChatTurn::model(format!("reply {i}"))).await.unwrap();
        }

        assert_eq!(memory.turn_count(7), 3);
        let history = memory.get_history(7, 10).await.unwrap();
        assert_eq!(history[0].text(), Some("reply 2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_user_message_suppressed_within_window() {
        let memory = InMemoryConversationMemory::default();

        memory.save_turn(1, ChatTurn::user("find a kettle")).await.unwrap();
        memory.save_turn(1, ChatTurn::user("find a kettle")).await.unwrap();
        assert_eq!(memory.turn_count(1), 1);

        // Same text in another conversation is independent
        memory.save_turn(2, ChatTurn::user("find a kettle")).await.unwrap();
        assert_eq!(memory.turn_count(2), 1);

        tokio::time::advance(Duration::from_secs(6)).await;
        memory.save_turn(1, ChatTurn::user("find a kettle")).await.unwrap();
        assert_eq!(memory.turn_count(1), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_model_turns_are_never_deduplicated() {
        let memory = InMemoryConversationMemory::default();

        memory.save_turn(1, ChatTurn::model("Here you go")).await.unwrap();
        memory.save_turn(1, ChatTurn::model("Here you go")).await.unwrap();
        assert_eq!(memory.turn_count(1), 2);

        memory.clear(1);
        assert_eq!(memory.turn_count(1), 0);
    }
}
