//! JSONL transcript writer for chat events.
//!
//! Each [`ConversationEvent`] becomes one JSON line carrying its payload
//! fields plus `type` and `timestamp`. The file is opened in append mode so
//! one transcript can span several CLI sessions.

use shopwise_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    written: AtomicU64,
}

impl JsonlConversationLogger {
    /// Open (or create) the transcript at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            written: AtomicU64::new(0),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Events written by this instance
    pub fn events_written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    fn record(event: ConversationEvent) -> serde_json::Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        match event.payload {
            serde_json::Value::Object(mut map) => {
                map.insert("type".to_string(), event.event_type.into());
                map.insert("timestamp".to_string(), timestamp.into());
                serde_json::Value::Object(map)
            }
            other => serde_json::json!({
                "type": event.event_type,
                "timestamp": timestamp,
                "data": other,
            }),
        }
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let event_type = event.event_type;
        let line = match serde_json::to_string(&Self::record(event)) {
            Ok(line) => line,
            Err(e) => {
                warn!(event_type, error = %e, "Dropping unserializable transcript event");
                return;
            }
        };

        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        // Flushed per line so a crash loses at most the event in flight
        let result = writeln!(writer, "{}", line).and_then(|_| writer.flush());
        match result {
            Ok(()) => {
                self.written.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => warn!(path = %self.path.display(), error = %e, "Transcript write failed"),
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        let writer = self.writer.get_mut().unwrap_or_else(|e| e.into_inner());
        let _ = writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_events_become_flat_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.jsonl");
        let logger = JsonlConversationLogger::open(&path).unwrap();

        logger.log(ConversationEvent::new(
            "tool_call",
            serde_json::json!({
                "conversation_id": 7,
                "tool": "search_products",
                "args": {"query": "kettle"}
            }),
        ));
        logger.log(ConversationEvent::new(
            "chat_response",
            serde_json::json!({"conversation_id": 7, "products": 2}),
        ));
        assert_eq!(logger.events_written(), 2);
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.get("timestamp").is_some()));
        assert_eq!(lines[0]["type"], "tool_call");
        assert_eq!(lines[0]["tool"], "search_products");
        assert_eq!(lines[0]["args"]["query"], "kettle");
        assert_eq!(lines[1]["type"], "chat_response");
    }

    #[test]
    fn test_scalar_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scalar.jsonl");
        let logger = JsonlConversationLogger::open(&path).unwrap();

        logger.log(ConversationEvent::new("llm_response", serde_json::json!("plain text")));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["type"], "llm_response");
        assert_eq!(lines[0]["data"], "plain text");
    }

    #[test]
    fn test_reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("chat.jsonl");

        for _ in 0..2 {
            let logger = JsonlConversationLogger::open(&path).unwrap();
            logger.log(ConversationEvent::new("llm_request", serde_json::json!({})));
        }

        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_open_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        assert!(JsonlConversationLogger::open(blocker.join("chat.jsonl")).is_err());
    }
}
