//! Subscription and Analytics Integration Tests

use chrono::{Duration, Utc};

use ai_mockprep::models::Plan;
use ai_mockprep::{AppState, ConfigService, Database};
use mockprep_extract::GenerationRequest;

use crate::common::{valid_pairs_json, ScriptedProvider};

const EMAIL: &str = "dev@example.com";

#[tokio::test]
async fn test_subscription_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new();
    state
        .initialize_with(
            ConfigService::with_path(dir.path().join("config.json")).unwrap(),
            Database::new_in_memory().unwrap(),
            ScriptedProvider::replying(&[]),
        )
        .await
        .unwrap();

    assert!(!state.is_pro(EMAIL).await.unwrap());

    let subscriptions = state.subscription_service().await.unwrap();
    let start = Utc::now();
    subscriptions
        .activate_pro(EMAIL, "pay_123", "order_456", start)
        .unwrap();
    assert!(state.is_pro(EMAIL).await.unwrap());

    let check = subscriptions
        .check(EMAIL, start + Duration::days(45))
        .unwrap();
    assert!(check.expired);
    assert_eq!(check.plan, Plan::Free);
    assert!(!state.is_pro(EMAIL).await.unwrap());
}

#[tokio::test]
async fn test_analytics_over_recorded_answers() {
    let frontend = valid_pairs_json(2);
    let backend = valid_pairs_json(2);
    let provider = ScriptedProvider::replying(&[
        frontend.as_str(),
        r#"{"rating": "9/10", "feedback": "Great"}"#,
        r#"{"rating": "7/10", "feedback": "Good"}"#,
        backend.as_str(),
        r#"{"rating": "4/10", "feedback": "Needs depth"}"#,
        backend.as_str(),
    ]);

    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new();
    state
        .initialize_with(
            ConfigService::with_path(dir.path().join("config.json")).unwrap(),
            Database::new_in_memory().unwrap(),
            provider,
        )
        .await
        .unwrap();
    let service = state.interview_service().await.unwrap();

    let first = service
        .create_interview(
            GenerationRequest::new("React Developer", "React").with_question_count(2),
            EMAIL,
        )
        .await
        .unwrap();
    service.record_answer(&first.mock_id, 0, "answer one", EMAIL).await.unwrap();
    service.record_answer(&first.mock_id, 1, "answer two", EMAIL).await.unwrap();

    let second = service
        .create_interview(
            GenerationRequest::new("Node Backend Engineer", "Node").with_question_count(2),
            EMAIL,
        )
        .await
        .unwrap();
    service.record_answer(&second.mock_id, 0, "answer three", EMAIL).await.unwrap();

    // Never answered
    service
        .create_interview(
            GenerationRequest::new("Data Engineer", "SQL").with_question_count(2),
            EMAIL,
        )
        .await
        .unwrap();

    let report = state.analytics(EMAIL).await.unwrap();
    assert_eq!(report.total_interviews, 3);
    assert_eq!(report.completed_interviews, 2);
    assert_eq!(report.completion_rate, 67);
    assert_eq!(report.average_score, 6);
    assert_eq!(report.skill_breakdown["Frontend Development"], 80);
    assert_eq!(report.skill_breakdown["Backend Development"], 40);
    assert_eq!(report.strengths[0].skill, "Frontend Development");
    assert_eq!(report.weaknesses[0].skill, "Backend Development");
    assert_eq!(report.recent_performance.len(), 2);
    assert_eq!(report.recent_performance[0].mock_id, first.mock_id);
    assert_eq!(report.improvement_rate, -50);
}

#[tokio::test]
async fn test_analytics_for_unknown_user_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new();
    state
        .initialize_with(
            ConfigService::with_path(dir.path().join("config.json")).unwrap(),
            Database::new_in_memory().unwrap(),
            ScriptedProvider::replying(&[]),
        )
        .await
        .unwrap();

    let report = state.analytics("nobody@example.com").await.unwrap();
    assert_eq!(report.total_interviews, 0);
    assert!(report.recent_performance.is_empty());
}
