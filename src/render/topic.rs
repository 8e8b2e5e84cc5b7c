use std::sync::LazyLock;

use regex::Regex;

use crate::transcript::parser::Message;

pub const FALLBACK_TOPIC: &str = "untitled";
const MAX_TOPIC_WORDS: usize = 5;
const MAX_TOPIC_LEN: usize = 50;

/// ASCII words only; anything else (punctuation, Hangul, emoji) is dropped.
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-zA-Z][a-zA-Z0-9]*").unwrap());

/// Derive a filename-safe slug from the first user message.
pub fn extract_topic(messages: &[Message]) -> String {
    let first_user = messages
        .iter()
        .find(|m| m.is_user())
        .map(|m| m.text.trim())
        .unwrap_or_default();
    slugify(first_user)
}

/// First five ASCII words, lowercased and hyphen-joined, capped at 50 bytes.
pub fn slugify(text: &str) -> String {
    let slug = WORD_RE
        .find_iter(text)
        .take(MAX_TOPIC_WORDS)
        .map(|m| m.as_str().to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        return FALLBACK_TOPIC.to_string();
    }
    // Slug is pure ASCII, so byte truncation is safe.
    slug[..slug.len().min(MAX_TOPIC_LEN)].to_string()
}
