//! Catalog and logging configuration from TOML (`[catalog]`, `[logging]`)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCatalogConfig {
    /// JSON seed file; the built-in sample catalog is used when unset
    pub seed_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of model and tool events
    pub conversation_log: Option<String>,
    /// Directory for daily-rotated diagnostic logs
    pub log_dir: Option<String>,
}
