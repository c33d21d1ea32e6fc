//! Per-conversation serialization.
//!
//! Two runs against the same conversation id must not interleave their
//! history reads and writes. [`ConversationLocks`] hands out one async mutex
//! per conversation id; runs on different conversations never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Keyed async mutex over conversation ids
#[derive(Default)]
pub struct ConversationLocks {
    locks: Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a conversation.
    ///
    /// The guard releases the conversation when dropped.
    pub async fn acquire(&self, conversation_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            // Entries only the map still references are idle.
            locks.retain(|id, lock| *id == conversation_id || Arc::strong_count(lock) > 1);
            locks.entry(conversation_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of conversations currently tracked
    pub fn tracked(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
