//! Configuration file loading for shopwise
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SHOPWISE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./shopwise.toml` or `./.shopwise.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/shopwise/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileCatalogConfig, FileChatConfig, FileConfig, FileLlmConfig,
    FileLoggingConfig, FileMemoryConfig, FileToolsConfig,
};
pub use loader::ConfigLoader;
