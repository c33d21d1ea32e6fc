//! Shared utility functions.

use serde_json::{Map, Value};

/// Truncate a string to approximately `max_bytes` without splitting a UTF-8
/// character boundary.
///
/// Returns a sub-slice of the original string. If the string is shorter than
/// `max_bytes`, the entire string is returned unchanged.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Render a JSON value with object keys sorted at every depth.
///
/// Two argument maps that differ only in key order produce the same string,
/// which makes the output usable as a cache key component.
pub fn canonical_json(value: &Value) -> String {
    canonical_value(value).to_string()
}

/// Copy of `value` with object keys sorted at every nesting level
pub fn canonical_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonical_value(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical_value).collect()),
        other => other.clone(),
    }
}

const FILLER_WORDS: &[&str] = &[
    "a", "an", "the", "i", "im", "i'm", "me", "my", "we", "you", "can", "could", "would",
    "please", "find", "show", "search", "look", "looking", "for", "want", "need", "get", "give",
    "some", "any", "buy", "to", "is", "are", "there", "what", "which", "best", "good", "cheap",
    "recommend", "suggest", "help", "with", "about", "on", "of", "and", "or", "hi", "hello",
];

/// Reduce a free-form message to a catalog search term.
///
/// Drops punctuation and common conversational filler; falls back to the
/// trimmed message when nothing meaningful is left.
pub fn extract_search_term(message: &str) -> String {
    let terms: Vec<String> = message
        .split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-')
                .to_lowercase()
        })
        .filter(|word| !word.is_empty() && !FILLER_WORDS.contains(&word.as_str()))
        .collect();

    if terms.is_empty() {
        message.trim().to_string()
    } else {
        terms.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truncate_ascii() {
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn truncate_no_op_when_short() {
        assert_eq!(truncate_str("hi", 10), "hi");
    }

    #[test]
    fn truncate_multibyte_boundary() {
        // 'の' is 3 bytes (U+306E): bytes 0xe3 0x81 0xae
        let s = "あのね"; // 9 bytes: 3+3+3
        // Cutting at byte 4 would land inside 'の', should back up to 3
        assert_eq!(truncate_str(s, 4), "あ");
        assert_eq!(truncate_str(s, 6), "あの");
    }

    #[test]
    fn truncate_empty() {
        assert_eq!(truncate_str("", 10), "");
    }

    #[test]
    fn canonical_json_ignores_key_order() {
        let a = json!({"b": 1, "a": {"z": true, "y": [ {"d": 1, "c": 2} ]}});
        let b = json!({"a": {"y": [ {"c": 2, "d": 1} ], "z": true}, "b": 1});
        assert_eq!(canonical_json(&a), canonical_json(&b));
        assert_eq!(canonical_json(&json!({"b": 1, "a": 2})), r#"{"a":2,"b":1}"#);
    }

    #[test]
    fn canonical_json_keeps_array_order() {
        assert_ne!(canonical_json(&json!([1, 2])), canonical_json(&json!([2, 1])));
    }

    #[test]
    fn search_term_strips_filler_and_punctuation() {
        assert_eq!(extract_search_term("Can you find me a laptop?"), "laptop");
        assert_eq!(
            extract_search_term("I'm looking for noise-cancelling headphones!"),
            "noise-cancelling headphones"
        );
    }

    #[test]
    fn search_term_falls_back_to_message() {
        assert_eq!(extract_search_term("  hello!  "), "hello!");
        assert_eq!(extract_search_term("iPhone"), "iphone");
    }
}
