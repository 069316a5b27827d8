//! Interview Flow Integration Tests
//!
//! Runs the interview service through `AppState` with a scripted provider,
//! a temporary config file and an in-memory database.

use std::sync::Arc;

use ai_mockprep::{AppError, AppState, ConfigService, Database};
use mockprep_extract::{GenerationRequest, InterviewKind};
use tempfile::TempDir;

use crate::common::{valid_pairs_json, ScriptedProvider};

const EMAIL: &str = "dev@example.com";

async fn state_with(provider: Arc<ScriptedProvider>) -> (AppState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigService::with_path(dir.path().join("config.json")).unwrap();
    let database = Database::new_in_memory().unwrap();

    let state = AppState::new();
    state.initialize_with(config, database, provider).await.unwrap();
    (state, dir)
}

#[tokio::test]
async fn test_uninitialized_state_reports_unhealthy() {
    let state = AppState::new();
    assert!(!state.is_database_healthy());
    assert!(!state.is_config_healthy());
    assert!(!state.is_extractor_ready());
    assert!(state.interview_service().await.is_err());
}

#[tokio::test]
async fn test_initialized_state_is_healthy() {
    let (state, _dir) = state_with(ScriptedProvider::replying(&[])).await;
    assert!(state.is_database_healthy());
    assert!(state.is_config_healthy());
    assert!(state.is_extractor_ready());
    state.check_provider().await.unwrap();
}

#[tokio::test]
async fn test_create_interview_and_record_answers() {
    let pairs = valid_pairs_json(5);
    let provider = ScriptedProvider::replying(&[
        pairs.as_str(),
        r#"{"rating": "8/10", "feedback": "Solid explanation"}"#,
        "The answer was fine I guess",
    ]);
    let (state, _dir) = state_with(provider.clone()).await;
    let service = state.interview_service().await.unwrap();

    let request = GenerationRequest::new("Frontend Developer", "React")
        .with_experience(2)
        .with_kind(InterviewKind::Technical)
        .with_question_count(0);
    let interview = service.create_interview(request, EMAIL).await.unwrap();

    assert_eq!(interview.created_by, EMAIL);
    assert_eq!(interview.job_experience, 2);
    let questions = service.questions(&interview.mock_id).unwrap();
    assert_eq!(questions.len(), 5);

    let rated = service
        .record_answer(&interview.mock_id, 0, "It is a virtual copy of the DOM", EMAIL)
        .await
        .unwrap();
    assert_eq!(rated.rating, "8/10");
    assert!(!rated.degraded);
    assert_eq!(rated.question, questions[0].question);
    assert_eq!(rated.correct_ans, questions[0].answer);

    let degraded = service
        .record_answer(&interview.mock_id, 1, "No idea", EMAIL)
        .await
        .unwrap();
    assert!(degraded.degraded);
    assert_eq!(degraded.rating, "5/10");

    let answers = service.feedback(&interview.mock_id).unwrap();
    assert_eq!(answers.len(), 2);
    assert_eq!(answers[0].id, rated.id);
    assert_eq!(answers[1].id, degraded.id);
    assert_eq!(provider.calls(), 3);

    let summaries = service.interviews_for_user(EMAIL).unwrap();
    assert_eq!(summaries.len(), 1);
    assert!(summaries[0].is_completed);
    assert_eq!(summaries[0].total_answered, 2);
    assert_eq!(summaries[0].average_score, 7);
}

#[tokio::test]
async fn test_record_answer_rejects_bad_index() {
    let pairs = valid_pairs_json(2);
    let provider = ScriptedProvider::replying(&[pairs.as_str()]);
    let (state, _dir) = state_with(provider.clone()).await;
    let service = state.interview_service().await.unwrap();

    let interview = service
        .create_interview(GenerationRequest::new("Backend Developer", "Rust").with_question_count(2), EMAIL)
        .await
        .unwrap();

    let err = service
        .record_answer(&interview.mock_id, 5, "answer", EMAIL)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_unknown_interview_is_not_found() {
    let (state, _dir) = state_with(ScriptedProvider::replying(&[])).await;
    let service = state.interview_service().await.unwrap();

    assert!(matches!(
        service.questions("missing"),
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.record_answer("missing", 0, "answer", EMAIL).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_blank_role_is_rejected() {
    let provider = ScriptedProvider::replying(&[]);
    let (state, _dir) = state_with(provider.clone()).await;
    let service = state.interview_service().await.unwrap();

    let err = service
        .create_interview(GenerationRequest::new("  ", "React"), EMAIL)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_oversized_question_count_is_rejected() {
    let provider = ScriptedProvider::replying(&[]);
    let (state, _dir) = state_with(provider.clone()).await;
    let service = state.interview_service().await.unwrap();

    let err = service
        .create_interview(
            GenerationRequest::new("Frontend Developer", "React").with_question_count(10_000),
            EMAIL,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(provider.calls(), 0);
    assert!(service.interviews_for_user(EMAIL).unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_generation_persists_nothing() {
    let provider = ScriptedProvider::replying(&[]);
    let (state, _dir) = state_with(provider.clone()).await;
    let service = state.interview_service().await.unwrap();

    let err = service
        .create_interview(GenerationRequest::new("Frontend Developer", "React"), EMAIL)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Extraction(_)));
    assert!(err.to_string().contains("Failed to generate AI questions"));
    assert_eq!(provider.calls(), 4);
    assert!(service.interviews_for_user(EMAIL).unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_interview() {
    let pairs = valid_pairs_json(1);
    let provider = ScriptedProvider::replying(&[pairs.as_str()]);
    let (state, _dir) = state_with(provider).await;
    let service = state.interview_service().await.unwrap();

    let interview = service
        .create_interview(GenerationRequest::new("Frontend Developer", "React").with_question_count(1), EMAIL)
        .await
        .unwrap();

    service.delete_interview(&interview.mock_id).unwrap();
    assert!(service.interviews_for_user(EMAIL).unwrap().is_empty());
    assert!(matches!(
        service.delete_interview(&interview.mock_id),
        Err(AppError::NotFound(_))
    ));
}
