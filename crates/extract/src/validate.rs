//! Post-Validation
//!
//! Turns parsed items into schema-valid question/answer pairs. Runs on the
//! output of every strategy, template fallback included.

use serde_json::{Map, Value};

use crate::model::{
    GenerationRequest, InterviewKind, QuestionAnswerPair, MIN_ANSWER_CHARS, MIN_QUESTION_CHARS,
};

/// Look up a key ignoring ASCII case, preferring an exact match.
pub fn field_ci<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).or_else(|| {
        object
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

/// Render a scalar field as trimmed text; objects, arrays and null are empty.
pub fn field_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Question used when an item's question is missing or too short.
pub fn default_question(request: &GenerationRequest) -> String {
    match request.kind {
        InterviewKind::Technical => format!("What is your experience with {}?", request.context),
        InterviewKind::Behavioral => format!(
            "Tell me about a challenging situation you faced as a {}",
            request.role
        ),
    }
}

/// Answer used when an item's answer is missing or too short.
pub fn default_answer(request: &GenerationRequest) -> String {
    match request.kind {
        InterviewKind::Technical => format!(
            "Based on my {} years of experience with {}, I have worked on various projects and gained expertise in relevant technologies.",
            request.experience_years, request.context
        ),
        InterviewKind::Behavioral => format!(
            "In my {} years as a {}, I faced a challenging situation where I had to use problem-solving skills to achieve successful results.",
            request.experience_years, request.role
        ),
    }
}

/// Validate parsed items against the pair schema.
///
/// Non-object items are dropped, short or missing fields are replaced with
/// templated defaults, and the list is truncated to the requested count. Fewer
/// items than requested are accepted as they are.
pub fn validate_pairs(items: &[Value], request: &GenerationRequest) -> Vec<QuestionAnswerPair> {
    items
        .iter()
        .filter_map(Value::as_object)
        .map(|object| {
            let mut question = field_text(field_ci(object, "question"));
            let mut answer = field_text(field_ci(object, "answer"));

            if question.chars().count() < MIN_QUESTION_CHARS {
                question = default_question(request);
            }
            if answer.chars().count() < MIN_ANSWER_CHARS {
                answer = default_answer(request);
            }

            QuestionAnswerPair { question, answer }
        })
        .take(request.effective_question_count())
        .collect()
}
