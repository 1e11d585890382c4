//! HTML text helper functions

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Strip anything that looks like a markup tag
///
/// This is a pattern match, not a parser: an unmatched `<` or `>` survives.
///
/// # Examples
/// ```ignore
/// strip_tags("<p>Hello <b>World</b></p>") // -> "Hello World"
/// ```
pub fn strip_tags(s: &str) -> String {
    TAG_RE.replace_all(s, "").into_owned()
}

/// Collapse every whitespace run into a single space
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_RE.replace_all(s, " ").into_owned()
}

/// Keep the first `limit` characters of a string
///
/// Counts Unicode scalar values, so multi-byte text is never split
/// inside a code point (it may still split a grapheme cluster).
pub fn truncate_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
