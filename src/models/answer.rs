//! Answer Models

use chrono::{DateTime, Utc};
use mockprep_extract::RatingFeedback;
use serde::{Deserialize, Serialize};

/// A recorded answer with its rating. Never updated after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswer {
    /// Row identifier
    pub id: i64,
    /// Interview the answer belongs to
    pub mock_id: String,
    /// Question text as asked
    pub question: String,
    /// Model answer generated with the question
    pub correct_ans: String,
    /// The user's transcribed answer
    pub user_ans: String,
    /// Rating in `N/10` form
    pub rating: String,
    /// Improvement feedback
    pub feedback: String,
    /// Rating and feedback are the fallback value
    pub degraded: bool,
    /// Email of the answering user
    pub user_email: String,
    /// Record time
    pub created_at: DateTime<Utc>,
}

impl UserAnswer {
    /// Score out of 10 read from the rating
    pub fn score(&self) -> Option<u32> {
        RatingFeedback::new(self.rating.clone(), self.feedback.clone()).score()
    }
}
