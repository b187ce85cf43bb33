//! Titles for conversations created without one.
//!
//! Derived from the first human message rather than a second model call,
//! so a chat turn costs exactly one provider request.

/// Longest title accepted from clients or derived from a message.
pub const MAX_TITLE_CHARS: usize = 200;

const DERIVED_TITLE_WORDS: usize = 8;
const DERIVED_TITLE_CHARS: usize = 60;

/// First few words of `message`, collapsed to single spaces and capped in
/// length. Returns `None` for blank input.
pub fn derive_title(message: &str) -> Option<String> {
    let words: Vec<&str> = message.split_whitespace().take(DERIVED_TITLE_WORDS).collect();
    if words.is_empty() {
        return None;
    }

    let joined = words.join(" ");
    if joined.chars().count() <= DERIVED_TITLE_CHARS {
        return Some(joined);
    }

    let cut: String = joined.chars().take(DERIVED_TITLE_CHARS - 1).collect();
    Some(format!("{}…", cut.trim_end()))
}
