//! Application-level configuration.
//!
//! - [`ChatParams`]: chat loop control (iterations, history, tool budget)

pub mod chat_params;

pub use chat_params::ChatParams;
