//! Question Extraction Integration Tests
//!
//! Drives `StructuredExtractor::extract_questions` with scripted responses:
//! - Every accepted response yields only schema-valid pairs
//! - The requested count is honoured
//! - Exhausted retries produce the terminal error message
//! - Single-quoted JSON survives the repair stage
//! - Backoff waits grow linearly with the attempt number

use std::time::Duration;

use mockprep_core::RetryPolicy;
use mockprep_extract::clean::{delimit_array, strip_code_fences};
use mockprep_extract::{
    repair_json, run_cascade, ExtractError, GenerationRequest, InterviewKind, StructuredExtractor,
};

use crate::common::{network_error, valid_pairs_json, ScriptedProvider};

fn request(count: u32) -> GenerationRequest {
    GenerationRequest::new("Frontend Developer", "React, TypeScript")
        .with_experience(3)
        .with_question_count(count)
}

// ============================================================================
// Schema Validity
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_any_input_yields_valid_pairs_or_retry_error() {
    let inputs = [
        String::new(),
        "Sorry, I cannot help with that request.".to_string(),
        valid_pairs_json(5),
        r#"[{'question': 'What is the virtual DOM?', 'answer': 'An in-memory tree React diffs against'}]"#
            .to_string(),
        r#"[{"question": "What is JSX syntax?", "answer": "A syntax extension for JavaScript",},]"#
            .to_string(),
        r#"[{"question": "What does "use strict" do?", "answer": "It enables strict parsing and errors"}]"#
            .to_string(),
        "[1, 2, 3]".to_string(),
        "[]".to_string(),
    ];

    for input in inputs {
        let provider = ScriptedProvider::replying(&[input.as_str(), input.as_str()]);
        let extractor =
            StructuredExtractor::new(provider.clone()).with_question_retry(RetryPolicy::new(1, 10));

        match extractor.extract_questions(&request(5)).await {
            Ok(pairs) => {
                assert!(!pairs.is_empty(), "empty result for {:?}", input);
                assert!(pairs.len() <= 5);
                for pair in &pairs {
                    assert!(pair.is_schema_valid(), "invalid pair {:?} for {:?}", pair, input);
                }
            }
            Err(e) => {
                assert!(
                    matches!(e, ExtractError::Exhausted { attempts: 2, .. }),
                    "unexpected error {:?} for {:?}",
                    e,
                    input
                );
                assert_eq!(provider.calls(), 2);
            }
        }
    }
}

#[tokio::test]
async fn test_trailing_commas_and_fences_are_repaired() {
    let raw = "```json\n[\n  {\"question\": \"What is a React hook?\", \"answer\": \"A function that lets components use state\",},\n]\n```";
    let provider = ScriptedProvider::replying(&[raw]);
    let extractor = StructuredExtractor::new(provider.clone());

    let pairs = extractor.extract_questions(&request(1)).await.unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].question, "What is a React hook?");
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_short_fields_are_replaced_with_defaults() {
    let raw = r#"[{"Question": "Why?", "ANSWER": "Because"}]"#;
    let provider = ScriptedProvider::replying(&[raw]);
    let extractor = StructuredExtractor::new(provider);

    let pairs = extractor.extract_questions(&request(1)).await.unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].question, "What is your experience with React, TypeScript?");
    assert!(pairs[0].is_schema_valid());
}

#[tokio::test(start_paused = true)]
async fn test_empty_array_is_retried() {
    let second = valid_pairs_json(1);
    let provider = ScriptedProvider::replying(&["[]", second.as_str()]);
    let extractor = StructuredExtractor::new(provider.clone());

    let pairs = extractor.extract_questions(&request(1)).await.unwrap();
    assert_eq!(provider.calls(), 2);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].question, "Question number 1 about React?");
}

#[tokio::test]
async fn test_unparseable_array_uses_fallback_templates() {
    let provider = ScriptedProvider::replying(&["[ no pairs in here ]"]);
    let extractor = StructuredExtractor::new(provider.clone());

    let pairs = extractor.extract_questions(&request(3)).await.unwrap();
    assert_eq!(pairs.len(), 3);
    assert!(pairs.iter().all(|p| p.is_schema_valid()));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_prompt_names_count_and_kind() {
    let provider = ScriptedProvider::new(vec![Ok(valid_pairs_json(4))]);
    let extractor = StructuredExtractor::new(provider.clone());

    extractor
        .extract_questions(&request(4).with_kind(InterviewKind::Behavioral))
        .await
        .unwrap();

    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("exactly 4 behavioral interview questions"));
    assert!(prompts[0].contains("Frontend Developer"));
}

// ============================================================================
// Count Conformance
// ============================================================================

#[tokio::test]
async fn test_count_conformance() {
    let provider = ScriptedProvider::new(vec![Ok(valid_pairs_json(7))]);
    let extractor = StructuredExtractor::new(provider);

    let pairs = extractor.extract_questions(&request(5)).await.unwrap();
    assert_eq!(pairs.len(), 5);
    assert_eq!(pairs[0].question, "Question number 1 about React?");
    assert_eq!(pairs[4].question, "Question number 5 about React?");
}

#[tokio::test]
async fn test_zero_count_means_default() {
    let provider = ScriptedProvider::new(vec![Ok(valid_pairs_json(9))]);
    let extractor = StructuredExtractor::new(provider);

    let pairs = extractor.extract_questions(&request(0)).await.unwrap();
    assert_eq!(pairs.len(), 5);
}

#[tokio::test]
async fn test_json_output_round_trips() {
    let provider = ScriptedProvider::new(vec![Ok(valid_pairs_json(2))]);
    let extractor = StructuredExtractor::new(provider);

    let json = extractor.extract_questions_json(&request(2)).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
    assert!(value[0]["answer"].as_str().unwrap().starts_with("Model answer"));
}

// ============================================================================
// Terminal Failure
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_no_brackets_exhausts_retries() {
    let provider = ScriptedProvider::new(Vec::new());
    let extractor = StructuredExtractor::new(provider.clone());

    let err = extractor.extract_questions(&request(5)).await.unwrap_err();
    assert!(err.to_string().contains("Failed to generate AI questions"));
    assert!(err.to_string().contains("No valid JSON array found in AI response"));
    assert_eq!(provider.calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_service_errors_are_retried() {
    let provider = ScriptedProvider::new(vec![
        Err(network_error()),
        Err(network_error()),
        Err(network_error()),
        Err(network_error()),
    ]);
    let extractor = StructuredExtractor::new(provider.clone());

    let err = extractor.extract_questions(&request(5)).await.unwrap_err();
    match err {
        ExtractError::Exhausted {
            attempts,
            last_error,
        } => {
            assert_eq!(attempts, 4);
            assert!(last_error.contains("connection reset"));
        }
        other => panic!("expected exhaustion, got {:?}", other),
    }
    assert_eq!(provider.calls(), 4);
}

// ============================================================================
// Quote Repair
// ============================================================================

#[test]
fn test_single_quoted_response_is_repaired() {
    let raw = r#"[{'question': "What's React?", 'answer': 'A library'}]"#;

    let cleaned = strip_code_fences(raw);
    let delimited = delimit_array(&cleaned).unwrap();
    let repaired = repair_json(delimited);
    let found = run_cascade(&repaired).unwrap();

    assert_eq!(found.items.len(), 1);
    assert!(found.items[0]["question"].as_str().unwrap().contains("React"));
    assert_eq!(found.items[0]["answer"], "A library");
}

// ============================================================================
// Backoff Timing
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_linear_backoff_before_third_attempt() {
    let provider = ScriptedProvider::new(vec![
        Err(network_error()),
        Ok("no array here".to_string()),
        Ok(valid_pairs_json(5)),
    ]);
    let extractor = StructuredExtractor::new(provider.clone());

    let started = tokio::time::Instant::now();
    let pairs = extractor.extract_questions(&request(5)).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(pairs.len(), 5);
    assert_eq!(provider.calls(), 3);
    assert!(
        elapsed >= Duration::from_millis(2000 + 4000),
        "waited only {:?}",
        elapsed
    );
}

#[tokio::test(start_paused = true)]
async fn test_custom_policy_delays() {
    let provider = ScriptedProvider::new(vec![Err(network_error()), Ok(valid_pairs_json(1))]);
    let extractor =
        StructuredExtractor::new(provider.clone()).with_question_retry(RetryPolicy::new(1, 500));

    let started = tokio::time::Instant::now();
    extractor.extract_questions(&request(1)).await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(500));
    assert!(started.elapsed() < Duration::from_millis(2000));
    assert_eq!(provider.calls(), 2);
}
