//! Conversation memory adapters

pub mod in_memory;

pub use in_memory::{DEFAULT_DUPLICATE_WINDOW, DEFAULT_MAX_TURNS, InMemoryConversationMemory};
