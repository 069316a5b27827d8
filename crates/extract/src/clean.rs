//! Cleaning Stage
//!
//! Strips markdown code fences from raw model output and cuts it down to the
//! outermost JSON array or object.

use regex::Regex;
use std::sync::OnceLock;

fn json_fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)```json").expect("valid fence regex"))
}

/// Remove ```` ```json ```` markers, any remaining backticks and blank lines.
pub fn strip_code_fences(raw: &str) -> String {
    let without_lang = json_fence_regex().replace_all(raw, "");
    let without_ticks = without_lang.replace('`', "");

    without_ticks
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Substring from the first `[` to the last `]`, inclusive.
pub fn delimit_array(text: &str) -> Option<&str> {
    delimit(text, '[', ']')
}

/// Substring from the first `{` to the last `}`, inclusive.
pub fn delimit_object(text: &str) -> Option<&str> {
    delimit(text, '{', '}')
}

fn delimit(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end <= start {
        return None;
    }
    Some(&text[start..end + close.len_utf8()])
}
