// src/text.rs
// Text normalization shared by the prompt builder and the collector.

use once_cell::sync::OnceCell;
use regex::Regex;

/// Clean feed text for prompting: decode HTML entities, strip tags,
/// collapse whitespace runs, trim.
pub fn clean_text(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }

    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

/// Truncate to at most `max_len` chars, preferring a sentence boundary and
/// falling back to a word boundary with a trailing ellipsis.
pub fn truncate_text(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }

    let head: String = s.chars().take(max_len).collect();

    // Last complete sentence within the limit.
    if let Some(idx) = head.rfind('.') {
        if idx > 0 {
            return head[..=idx].to_string();
        }
    }

    // No sentence boundary: cut at the last word boundary.
    let words: Vec<&str> = head.split_whitespace().collect();
    if words.len() > 1 {
        let mut out = words[..words.len() - 1].join(" ");
        out.push_str("...");
        return out;
    }
    head
}
