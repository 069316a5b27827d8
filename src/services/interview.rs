//! Interview Service
//!
//! Creates mock interviews from generated questions and records rated answers.

use chrono::Utc;
use mockprep_extract::{GenerationRequest, QuestionAnswerPair, StructuredExtractor};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{InterviewSummary, MockInterview, UserAnswer, MAX_QUESTION_COUNT};
use crate::storage::Database;
use crate::utils::error::{AppError, AppResult};

/// Service tying the extractor to interview and answer persistence
#[derive(Debug, Clone)]
pub struct InterviewService {
    db: Database,
    extractor: StructuredExtractor,
    default_question_count: u32,
}

impl InterviewService {
    /// Create a new interview service
    pub fn new(db: Database, extractor: StructuredExtractor, default_question_count: u32) -> Self {
        Self {
            db,
            extractor,
            default_question_count,
        }
    }

    /// Generate questions for a role and persist them as a new interview
    pub async fn create_interview(
        &self,
        mut request: GenerationRequest,
        created_by: &str,
    ) -> AppResult<MockInterview> {
        if request.role.trim().is_empty() {
            return Err(AppError::validation("Job position is required"));
        }
        if request.question_count == 0 {
            request.question_count = self.default_question_count;
        }
        if request.question_count > MAX_QUESTION_COUNT {
            return Err(AppError::validation(format!(
                "Question count must be between 1 and {}",
                MAX_QUESTION_COUNT
            )));
        }

        let json_mock_resp = self.extractor.extract_questions_json(&request).await?;

        let interview = MockInterview {
            mock_id: Uuid::new_v4().to_string(),
            json_mock_resp,
            job_position: request.role,
            job_desc: request.context,
            job_experience: request.experience_years,
            interview_type: request.kind,
            created_by: created_by.to_string(),
            created_at: Utc::now(),
        };
        self.db.insert_mock_interview(&interview)?;

        info!(
            mock_id = %interview.mock_id,
            kind = %interview.interview_type,
            "Mock interview created"
        );
        Ok(interview)
    }

    /// Load an interview or fail with `NotFound`
    pub fn interview(&self, mock_id: &str) -> AppResult<MockInterview> {
        self.db
            .get_mock_interview(mock_id)?
            .ok_or_else(|| AppError::not_found(format!("Interview {}", mock_id)))
    }

    /// The persisted question list of an interview
    pub fn questions(&self, mock_id: &str) -> AppResult<Vec<QuestionAnswerPair>> {
        self.interview(mock_id)?.questions()
    }

    /// Rate an answer to one of the interview's questions and append the record.
    ///
    /// Unusable rating content is stored as the degraded fallback value; only a
    /// generation service failure is returned as an error.
    pub async fn record_answer(
        &self,
        mock_id: &str,
        question_index: usize,
        user_answer: &str,
        user_email: &str,
    ) -> AppResult<UserAnswer> {
        let questions = self.questions(mock_id)?;
        let pair = questions.get(question_index).ok_or_else(|| {
            AppError::validation(format!(
                "Question index {} out of range for {} questions",
                question_index,
                questions.len()
            ))
        })?;

        let outcome = self
            .extractor
            .extract_rating_feedback(&pair.question, user_answer)
            .await?;
        let degraded = outcome.is_degraded();
        if degraded {
            warn!(mock_id = %mock_id, question_index, "Storing fallback rating");
        }
        let feedback = outcome.into_feedback();

        let mut answer = UserAnswer {
            id: 0,
            mock_id: mock_id.to_string(),
            question: pair.question.clone(),
            correct_ans: pair.answer.clone(),
            user_ans: user_answer.to_string(),
            rating: feedback.rating,
            feedback: feedback.feedback,
            degraded,
            user_email: user_email.to_string(),
            created_at: Utc::now(),
        };
        answer.id = self.db.insert_user_answer(&answer)?;

        info!(mock_id = %mock_id, answer_id = answer.id, rating = %answer.rating, "Answer recorded");
        Ok(answer)
    }

    /// Recorded answers of an interview, in the order they were given
    pub fn feedback(&self, mock_id: &str) -> AppResult<Vec<UserAnswer>> {
        self.db.list_user_answers(mock_id)
    }

    /// A user's interviews, newest first, with completion and score
    pub fn interviews_for_user(&self, email: &str) -> AppResult<Vec<InterviewSummary>> {
        self.db
            .list_mock_interviews_by_creator(email)?
            .into_iter()
            .map(|interview| {
                let answers = self.db.list_user_answers(&interview.mock_id)?;
                Ok(summarize(interview, &answers))
            })
            .collect()
    }

    /// Every interview of a user paired with its answers
    pub fn history_for_user(&self, email: &str) -> AppResult<Vec<(MockInterview, Vec<UserAnswer>)>> {
        self.db
            .list_mock_interviews_by_creator(email)?
            .into_iter()
            .map(|interview| {
                let answers = self.db.list_user_answers(&interview.mock_id)?;
                Ok((interview, answers))
            })
            .collect()
    }

    /// Delete an interview and its answers
    pub fn delete_interview(&self, mock_id: &str) -> AppResult<()> {
        self.interview(mock_id)?;
        self.db.delete_mock_interview(mock_id)
    }
}

/// Summarize an interview; unreadable ratings count as zero
pub fn summarize(interview: MockInterview, answers: &[UserAnswer]) -> InterviewSummary {
    let total_answered = answers.len();
    let average_score = if total_answered == 0 {
        0
    } else {
        let sum: u32 = answers.iter().map(|a| a.score().unwrap_or(0)).sum();
        (sum as f64 / total_answered as f64).round() as u32
    };

    InterviewSummary {
        interview,
        is_completed: total_answered > 0,
        average_score,
        total_answered,
    }
}
