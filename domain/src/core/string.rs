//! String helpers for prompt building.

/// Shorten `s` to at most `max_len` bytes, ending with "..." when cut.
///
/// The cut lands on a UTF-8 character boundary, so the result may be a few
/// bytes shorter than `max_len`.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3).min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
