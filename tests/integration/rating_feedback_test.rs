//! Rating/Feedback Integration Tests
//!
//! Verifies that content problems degrade to the fallback value while service
//! failures surface as errors once the feedback retry policy is spent.

use mockprep_core::RetryPolicy;
use mockprep_extract::{
    ExtractError, FeedbackOutcome, RatingFeedback, StructuredExtractor, FALLBACK_FEEDBACK,
    FALLBACK_RATING,
};

use crate::common::{network_error, ScriptedProvider};

const QUESTION: &str = "What is the virtual DOM?";
const ANSWER: &str = "A lightweight copy of the DOM that React diffs";

#[tokio::test]
async fn test_unparseable_content_degrades_without_error() {
    let provider = ScriptedProvider::replying(&["not json at all"]);
    let extractor = StructuredExtractor::new(provider.clone());

    let outcome = extractor
        .extract_rating_feedback(QUESTION, ANSWER)
        .await
        .unwrap();

    assert!(outcome.is_degraded());
    let feedback = outcome.into_feedback();
    assert_eq!(feedback.rating, "5/10");
    assert_eq!(
        feedback.feedback,
        "Unable to generate feedback due to response format issue."
    );
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_blank_content_degrades() {
    let provider = ScriptedProvider::replying(&["  \n\t "]);
    let extractor = StructuredExtractor::new(provider.clone());

    let outcome = extractor
        .extract_rating_feedback(QUESTION, ANSWER)
        .await
        .unwrap();
    assert!(outcome.is_degraded());
    assert_eq!(outcome.feedback().rating, FALLBACK_RATING);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_fenced_rating_happy_path() {
    let provider =
        ScriptedProvider::replying(&["```json\n{\"rating\":\"8/10\",\"feedback\":\"Good answer\"}\n```"]);
    let extractor = StructuredExtractor::new(provider);

    let outcome = extractor
        .extract_rating_feedback(QUESTION, ANSWER)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        FeedbackOutcome::Rated(RatingFeedback::new("8/10", "Good answer"))
    );
}

#[tokio::test]
async fn test_numeric_rating_is_normalized() {
    let provider = ScriptedProvider::replying(&[r#"{"rating": 7, "feedback": "Mention reconciliation"}"#]);
    let extractor = StructuredExtractor::new(provider);

    let outcome = extractor
        .extract_rating_feedback(QUESTION, ANSWER)
        .await
        .unwrap();
    assert_eq!(outcome.feedback().rating, "7/10");
}

#[tokio::test]
async fn test_out_of_range_rating_degrades() {
    let provider = ScriptedProvider::replying(&[r#"{"rating": "15/10", "feedback": "Great"}"#]);
    let extractor = StructuredExtractor::new(provider);

    let outcome = extractor
        .extract_rating_feedback(QUESTION, "")
        .await
        .unwrap();
    match outcome {
        FeedbackOutcome::Degraded { feedback, reason } => {
            assert_eq!(feedback.rating, FALLBACK_RATING);
            assert_eq!(feedback.feedback, FALLBACK_FEEDBACK);
            assert!(reason.contains("Invalid rating"));
        }
        other => panic!("expected degraded outcome, got {:?}", other),
    }
}

#[tokio::test]
async fn test_service_error_propagates_without_retry() {
    let provider = ScriptedProvider::new(vec![Err(network_error())]);
    let extractor = StructuredExtractor::new(provider.clone());

    let err = extractor
        .extract_rating_feedback(QUESTION, ANSWER)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::Generation(_)));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_feedback_retry_policy_retries_content_failures() {
    let provider = ScriptedProvider::replying(&[
        "Here is my rating: great!",
        r#"{"rating": "9/10", "feedback": "Clear and complete"}"#,
    ]);
    let extractor =
        StructuredExtractor::new(provider.clone()).with_feedback_retry(RetryPolicy::new(2, 100));

    let outcome = extractor
        .extract_rating_feedback(QUESTION, ANSWER)
        .await
        .unwrap();
    assert!(!outcome.is_degraded());
    assert_eq!(outcome.feedback().rating, "9/10");
    assert_eq!(provider.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_feedback_retry_policy_retries_service_failures() {
    let provider = ScriptedProvider::new(vec![
        Err(network_error()),
        Ok(r#"{"rating": "6/10", "feedback": "Add an example"}"#.to_string()),
    ]);
    let extractor =
        StructuredExtractor::new(provider.clone()).with_feedback_retry(RetryPolicy::new(1, 100));

    let outcome = extractor
        .extract_rating_feedback(QUESTION, ANSWER)
        .await
        .unwrap();
    assert_eq!(outcome.feedback().rating, "6/10");
    assert_eq!(provider.calls(), 2);
}
