//! Conversation memory configuration from TOML (`[memory]` section)

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::memory::{DEFAULT_DUPLICATE_WINDOW, DEFAULT_MAX_TURNS, InMemoryConversationMemory};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMemoryConfig {
    /// Oldest turns are dropped past this count
    pub max_turns_per_conversation: usize,
    /// Identical user messages inside this window are stored once
    pub duplicate_window_seconds: u64,
}

impl Default for FileMemoryConfig {
    fn default() -> Self {
        Self {
            max_turns_per_conversation: DEFAULT_MAX_TURNS,
            duplicate_window_seconds: DEFAULT_DUPLICATE_WINDOW.as_secs(),
        }
    }
}

impl FileMemoryConfig {
    pub fn build(&self) -> InMemoryConversationMemory {
        InMemoryConversationMemory::new(
            self.max_turns_per_conversation,
            Duration::from_secs(self.duplicate_window_seconds),
        )
    }
}
