//! Prompt domain
//!
//! System prompt, per-iteration prompts and the canned replies the chat loop
//! falls back to.

mod template;

pub use template::PromptTemplate;
