//! Parse Cascade
//!
//! Ordered parse strategies tried against the repaired text. The first
//! strategy that parses wins, even when it yields no items; an empty list is
//! left for validation to reject.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

use crate::repair::closes_string;

/// Why a single strategy could not produce items.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no questions found in response")]
    NoQuestions,
}

/// One named `text -> items` strategy.
#[derive(Clone, Copy)]
pub struct ParseStrategy {
    pub name: &'static str,
    pub parse: fn(&str) -> Result<Vec<Value>, ParseError>,
}

impl std::fmt::Debug for ParseStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseStrategy").field("name", &self.name).finish()
    }
}

/// Strategies in the order they are tried.
pub const PARSE_CASCADE: &[ParseStrategy] = &[
    ParseStrategy {
        name: "strict",
        parse: parse_strict,
    },
    ParseStrategy {
        name: "re_escape",
        parse: parse_re_escaped,
    },
    ParseStrategy {
        name: "regex_pairs",
        parse: parse_regex_pairs,
    },
];

/// Items produced by the winning strategy.
#[derive(Debug, Clone)]
pub struct CascadeMatch {
    pub strategy: &'static str,
    pub items: Vec<Value>,
}

/// Try each strategy of [`PARSE_CASCADE`] in order.
///
/// Returns `None` when every strategy failed; the caller then falls back to
/// its template list.
pub fn run_cascade(text: &str) -> Option<CascadeMatch> {
    for strategy in PARSE_CASCADE {
        match (strategy.parse)(text) {
            Ok(items) => {
                debug!(strategy = strategy.name, items = items.len(), "Parse strategy succeeded");
                return Some(CascadeMatch {
                    strategy: strategy.name,
                    items,
                });
            }
            Err(e) => {
                debug!(strategy = strategy.name, error = %e, "Parse strategy failed");
            }
        }
    }
    None
}

/// Strict JSON parse. A non-array value becomes a one-item list.
pub fn parse_strict(text: &str) -> Result<Vec<Value>, ParseError> {
    let value: Value = serde_json::from_str(text)?;
    Ok(match value {
        Value::Array(items) => items,
        other => vec![other],
    })
}

/// Escape quotes nested inside string values, then parse strictly.
pub fn parse_re_escaped(text: &str) -> Result<Vec<Value>, ParseError> {
    parse_strict(&escape_inner_quotes(text))
}

/// Escape every `"` inside a string literal that does not end it.
pub fn escape_inner_quotes(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 8);
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            match c {
                '\\' => {
                    out.push(c);
                    if let Some(&escaped) = chars.get(i + 1) {
                        out.push(escaped);
                        i += 1;
                    }
                }
                '"' if closes_string(&chars, i) => {
                    in_string = false;
                    out.push(c);
                }
                '"' => out.push_str("\\\""),
                _ => out.push(c),
            }
        } else {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
        }
        i += 1;
    }

    out
}

fn question_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)"question"\s*:\s*"([^"]*)""#).expect("valid question regex")
    })
}

fn answer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)"answer"\s*:\s*"([^"]*)""#).expect("valid answer regex"))
}

/// Match `"question": "..."` and `"answer": "..."` independently and zip them
/// by position. Missing answers are left empty for validation to fill.
pub fn parse_regex_pairs(text: &str) -> Result<Vec<Value>, ParseError> {
    let questions: Vec<&str> = question_regex()
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    if questions.is_empty() {
        return Err(ParseError::NoQuestions);
    }

    let answers: Vec<&str> = answer_regex()
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    Ok(questions
        .iter()
        .enumerate()
        .map(|(i, question)| {
            serde_json::json!({
                "question": question,
                "answer": answers.get(i).copied().unwrap_or_default(),
            })
        })
        .collect())
}
