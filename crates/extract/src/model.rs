//! Extraction Models
//!
//! Requests handed to the extractor and the schema-valid values it returns.

use serde::{Deserialize, Serialize};

/// Question count used when a request asks for zero questions.
pub const DEFAULT_QUESTION_COUNT: u32 = 5;

/// Minimum question length (in characters) after trimming.
pub const MIN_QUESTION_CHARS: usize = 5;

/// Minimum answer length (in characters) after trimming.
pub const MIN_ANSWER_CHARS: usize = 10;

/// Rating substituted when feedback cannot be extracted.
pub const FALLBACK_RATING: &str = "5/10";

/// Feedback text substituted when feedback cannot be extracted.
pub const FALLBACK_FEEDBACK: &str = "Unable to generate feedback due to response format issue.";

/// Kind of interview the questions are generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewKind {
    #[default]
    Technical,
    Behavioral,
}

impl std::fmt::Display for InterviewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterviewKind::Technical => write!(f, "technical"),
            InterviewKind::Behavioral => write!(f, "behavioral"),
        }
    }
}

impl std::str::FromStr for InterviewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "technical" => Ok(InterviewKind::Technical),
            "behavioral" | "behavioural" => Ok(InterviewKind::Behavioral),
            other => Err(format!("Unknown interview kind: {}", other)),
        }
    }
}

/// Target schema of an extraction call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaKind {
    QuestionList,
    RatingFeedback,
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaKind::QuestionList => write!(f, "question-list"),
            SchemaKind::RatingFeedback => write!(f, "rating-feedback"),
        }
    }
}

/// Input to question extraction. Built per call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Target job role, e.g. "Frontend Developer"
    pub role: String,
    /// Tech stack or job description
    pub context: String,
    /// Years of experience
    #[serde(default)]
    pub experience_years: u32,
    /// Technical or behavioral
    #[serde(default)]
    pub kind: InterviewKind,
    /// Number of questions wanted; 0 means the default
    #[serde(default = "default_question_count")]
    pub question_count: u32,
}

fn default_question_count() -> u32 {
    DEFAULT_QUESTION_COUNT
}

impl GenerationRequest {
    /// Create a technical request for five questions.
    pub fn new(role: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            context: context.into(),
            experience_years: 0,
            kind: InterviewKind::default(),
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }

    pub fn with_experience(mut self, years: u32) -> Self {
        self.experience_years = years;
        self
    }

    pub fn with_kind(mut self, kind: InterviewKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_question_count(mut self, count: u32) -> Self {
        self.question_count = count;
        self
    }

    /// Question count with the zero case mapped to the default.
    pub fn effective_question_count(&self) -> usize {
        if self.question_count == 0 {
            DEFAULT_QUESTION_COUNT as usize
        } else {
            self.question_count as usize
        }
    }
}

/// A generated interview question with its model answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswerPair {
    pub question: String,
    pub answer: String,
}

impl QuestionAnswerPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Whether both fields meet their minimum lengths.
    pub fn is_schema_valid(&self) -> bool {
        self.question.trim().chars().count() >= MIN_QUESTION_CHARS
            && self.answer.trim().chars().count() >= MIN_ANSWER_CHARS
    }
}

/// A rating in `N/10` form with feedback text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingFeedback {
    pub rating: String,
    pub feedback: String,
}

impl RatingFeedback {
    pub fn new(rating: impl Into<String>, feedback: impl Into<String>) -> Self {
        Self {
            rating: rating.into(),
            feedback: feedback.into(),
        }
    }

    /// The fixed value used when nothing usable came back.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_RATING, FALLBACK_FEEDBACK)
    }

    /// Numeric score out of 10, read from the leading digits of the rating.
    pub fn score(&self) -> Option<u32> {
        let digits: String = self
            .rating
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    }
}

/// Result of rating/feedback extraction.
///
/// `Degraded` carries the fixed fallback value so it can be persisted like a
/// genuine rating, plus the reason extraction failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FeedbackOutcome {
    Rated(RatingFeedback),
    Degraded {
        feedback: RatingFeedback,
        reason: String,
    },
}

impl FeedbackOutcome {
    /// Degraded outcome holding the fallback value.
    pub fn degraded(reason: impl Into<String>) -> Self {
        FeedbackOutcome::Degraded {
            feedback: RatingFeedback::fallback(),
            reason: reason.into(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, FeedbackOutcome::Degraded { .. })
    }

    pub fn feedback(&self) -> &RatingFeedback {
        match self {
            FeedbackOutcome::Rated(feedback) => feedback,
            FeedbackOutcome::Degraded { feedback, .. } => feedback,
        }
    }

    /// The always schema-valid value, rated or fallback.
    pub fn into_feedback(self) -> RatingFeedback {
        match self {
            FeedbackOutcome::Rated(feedback) => feedback,
            FeedbackOutcome::Degraded { feedback, .. } => feedback,
        }
    }
}

/// Stages of one extraction call, used as a structured logging field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStage {
    BuildingPrompt,
    AwaitingResponse,
    Cleaning,
    Parsing,
    Validating,
    Done,
    Failed,
    Retry,
    Fallback,
    Error,
}

impl std::fmt::Display for ExtractionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExtractionStage::BuildingPrompt => "building_prompt",
            ExtractionStage::AwaitingResponse => "awaiting_response",
            ExtractionStage::Cleaning => "cleaning",
            ExtractionStage::Parsing => "parsing",
            ExtractionStage::Validating => "validating",
            ExtractionStage::Done => "done",
            ExtractionStage::Failed => "failed",
            ExtractionStage::Retry => "retry",
            ExtractionStage::Fallback => "fallback",
            ExtractionStage::Error => "error",
        };
        write!(f, "{}", name)
    }
}
