//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod conversation_lock;
pub mod run_chat;
