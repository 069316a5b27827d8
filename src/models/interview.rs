//! Interview Models
//!
//! Mock interview sessions and per-user summaries.

use chrono::{DateTime, Utc};
use mockprep_extract::{InterviewKind, QuestionAnswerPair};
use serde::{Deserialize, Serialize};

use crate::utils::error::AppResult;

/// A generated mock interview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockInterview {
    /// Public interview identifier (UUID v4)
    pub mock_id: String,
    /// Question/answer pairs serialized as a JSON array
    pub json_mock_resp: String,
    /// Target job role
    pub job_position: String,
    /// Job description or tech stack
    pub job_desc: String,
    /// Years of experience
    pub job_experience: u32,
    /// Technical or behavioral
    pub interview_type: InterviewKind,
    /// Email of the creating user
    pub created_by: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl MockInterview {
    /// Deserialize the stored question list
    pub fn questions(&self) -> AppResult<Vec<QuestionAnswerPair>> {
        Ok(serde_json::from_str(&self.json_mock_resp)?)
    }
}

/// An interview with its completion status and score
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSummary {
    #[serde(flatten)]
    pub interview: MockInterview,
    /// At least one answer has been recorded
    pub is_completed: bool,
    /// Rounded mean of the answer scores out of 10
    pub average_score: u32,
    /// Number of recorded answers
    pub total_answered: usize,
}
