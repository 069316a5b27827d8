//! Repair Pipeline
//!
//! An ordered list of pure text transformations applied to the delimited JSON
//! span before parsing. Each step is independent and can be tested, reordered
//! or dropped without touching the control flow in the extractor.

use regex::Regex;
use std::sync::OnceLock;

/// One named `text -> text` transformation.
#[derive(Clone, Copy)]
pub struct RepairStep {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

impl std::fmt::Debug for RepairStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepairStep").field("name", &self.name).finish()
    }
}

/// Steps in the order they run.
pub const REPAIR_PIPELINE: &[RepairStep] = &[
    RepairStep {
        name: "normalize_quotes",
        apply: normalize_quotes,
    },
    RepairStep {
        name: "strip_emphasis",
        apply: strip_emphasis,
    },
    RepairStep {
        name: "quote_bare_keys",
        apply: quote_bare_keys,
    },
    RepairStep {
        name: "remove_trailing_commas",
        apply: remove_trailing_commas,
    },
    RepairStep {
        name: "collapse_whitespace",
        apply: collapse_whitespace,
    },
];

/// Run every step of [`REPAIR_PIPELINE`] in order.
pub fn repair_json(input: &str) -> String {
    REPAIR_PIPELINE
        .iter()
        .fold(input.to_string(), |text, step| (step.apply)(&text))
}

/// Replace single quotes and typographic quotes with `"`.
pub fn normalize_quotes(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\'' | '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' => '"',
            other => other,
        })
        .collect()
}

/// Remove markdown bold/italic markers (`**`, `*`, `__`).
pub fn strip_emphasis(input: &str) -> String {
    input.replace('*', "").replace("__", "")
}

/// Wrap unquoted object keys in double quotes.
///
/// Only identifiers that follow `{` or `,` outside a string literal and are
/// followed by `:` are touched.
pub fn quote_bare_keys(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 16);
    let mut in_string = false;
    let mut last_significant: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(&escaped) = chars.get(i + 1) {
                    out.push(escaped);
                    i += 2;
                    continue;
                }
            } else if c == '"' && closes_string(&chars, i) {
                in_string = false;
                last_significant = Some('"');
            }
            i += 1;
            continue;
        }

        if c == '"' {
            in_string = true;
            out.push(c);
            i += 1;
            continue;
        }

        if is_ident_start(c) && matches!(last_significant, Some('{') | Some(',')) {
            let start = i;
            while i < chars.len() && is_ident_continue(chars[i]) {
                i += 1;
            }
            let ident: String = chars[start..i].iter().collect();

            if next_significant(&chars, i) == Some(':') {
                out.push('"');
                out.push_str(&ident);
                out.push('"');
            } else {
                out.push_str(&ident);
            }
            last_significant = chars.get(i - 1).copied();
            continue;
        }

        out.push(c);
        if !c.is_whitespace() {
            last_significant = Some(c);
        }
        i += 1;
    }

    out
}

fn trailing_comma_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",(\s*[}\]])").expect("valid trailing comma regex"))
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

/// Drop commas directly before `}` or `]`.
pub fn remove_trailing_commas(input: &str) -> String {
    trailing_comma_regex().replace_all(input, "$1").into_owned()
}

/// Collapse runs of whitespace, newlines included, to one space.
pub fn collapse_whitespace(input: &str) -> String {
    whitespace_regex().replace_all(input, " ").trim().to_string()
}

/// Whether the `"` at `index` ends a string literal.
///
/// A quote closes a string only when the next non-whitespace character is a
/// JSON structural character (`:`, `,`, `}`, `]`) or the end of input; any
/// other quote is treated as part of the string's content.
pub(crate) fn closes_string(chars: &[char], index: usize) -> bool {
    match next_significant(chars, index + 1) {
        None => true,
        Some(c) => matches!(c, ':' | ',' | '}' | ']'),
    }
}

fn next_significant(chars: &[char], from: usize) -> Option<char> {
    chars
        .iter()
        .skip(from)
        .copied()
        .find(|c| !c.is_whitespace())
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}
