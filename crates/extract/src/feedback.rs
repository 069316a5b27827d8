//! Rating/Feedback Parsing
//!
//! Single-attempt parse of a `{"rating", "feedback"}` object out of raw model
//! text, with the rating normalised to `N/10`.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::clean::{delimit_object, strip_code_fences};
use crate::error::{ExtractError, ExtractResult};
use crate::model::RatingFeedback;
use crate::validate::{field_ci, field_text};

fn rating_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d+(?:\.\d+)?)\s*(?:/\s*10)?$").expect("valid rating regex")
    })
}

/// Normalise a rating value to `N/10` with `N` in 0..=10.
///
/// Accepts `"8/10"`, `"8 / 10"`, `"8"`, `8` and `7.5` (rounded).
pub fn normalize_rating(value: &Value) -> ExtractResult<String> {
    let score = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => rating_regex()
            .captures(s.trim())
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok()),
        _ => None,
    };

    match score {
        Some(score) if (0.0..=10.0).contains(&score) => Ok(format!("{}/10", score.round() as u32)),
        _ => Err(ExtractError::InvalidRating(value.to_string())),
    }
}

/// Clean, delimit and strictly parse a rating/feedback object.
pub fn parse_rating_feedback(raw: &str) -> ExtractResult<RatingFeedback> {
    let cleaned = strip_code_fences(raw);
    let delimited = delimit_object(&cleaned).ok_or(ExtractError::NoObjectFound)?;

    let value: Value = serde_json::from_str(delimited)?;
    let object = value.as_object().ok_or(ExtractError::NoObjectFound)?;

    let rating = field_ci(object, "rating").ok_or(ExtractError::MissingField("rating"))?;
    let rating = normalize_rating(rating)?;

    let feedback = field_text(field_ci(object, "feedback"));
    if feedback.is_empty() {
        return Err(ExtractError::MissingField("feedback"));
    }

    Ok(RatingFeedback { rating, feedback })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_rating_forms() {
        assert_eq!(normalize_rating(&json!("8/10")).unwrap(), "8/10");
        assert_eq!(normalize_rating(&json!("8 / 10")).unwrap(), "8/10");
        assert_eq!(normalize_rating(&json!("8")).unwrap(), "8/10");
        assert_eq!(normalize_rating(&json!(8)).unwrap(), "8/10");
        assert_eq!(normalize_rating(&json!(7.5)).unwrap(), "8/10");
        assert_eq!(normalize_rating(&json!("0/10")).unwrap(), "0/10");
    }

    #[test]
    fn test_normalize_rating_rejects() {
        assert!(normalize_rating(&json!("eleven")).is_err());
        assert!(normalize_rating(&json!("11/10")).is_err());
        assert!(normalize_rating(&json!("8/5")).is_err());
        assert!(normalize_rating(&json!(-1)).is_err());
        assert!(normalize_rating(&json!(null)).is_err());
    }

    #[test]
    fn test_parse_fenced_object() {
        let raw = "```json\n{\"rating\":\"8/10\",\"feedback\":\"Good answer\"}\n```";
        let parsed = parse_rating_feedback(raw).unwrap();
        assert_eq!(parsed, RatingFeedback::new("8/10", "Good answer"));
    }

    #[test]
    fn test_parse_with_surrounding_prose() {
        let raw = "Here you go: {\"Rating\": 6, \"Feedback\": \"Mention trade-offs\"} Hope it helps";
        let parsed = parse_rating_feedback(raw).unwrap();
        assert_eq!(parsed.rating, "6/10");
        assert_eq!(parsed.feedback, "Mention trade-offs");
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(
            parse_rating_feedback("not json at all"),
            Err(ExtractError::NoObjectFound)
        ));
        assert!(matches!(
            parse_rating_feedback("{rating: 8/10}"),
            Err(ExtractError::Serialization(_))
        ));
        assert!(matches!(
            parse_rating_feedback(r#"{"feedback": "no rating"}"#),
            Err(ExtractError::MissingField("rating"))
        ));
        assert!(matches!(
            parse_rating_feedback(r#"{"rating": "7/10", "feedback": "  "}"#),
            Err(ExtractError::MissingField("feedback"))
        ));
    }
}
