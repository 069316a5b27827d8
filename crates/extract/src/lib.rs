//! AI MockPrep Extract
//!
//! Turns unreliable generation-service text into schema-valid values:
//! - Question lists (`[{question, answer}]`) with repair, a parse cascade,
//!   post-validation, template fallback and bounded retry
//! - Rating/feedback objects with a tagged degraded result
//!
//! Every stage is a plain function so it can be tested on its own; the
//! `StructuredExtractor` wires them to an `LlmProvider`.

pub mod cascade;
pub mod clean;
pub mod error;
pub mod extractor;
pub mod fallback;
pub mod feedback;
pub mod model;
pub mod prompt;
pub mod repair;
pub mod validate;

// Re-export main types
pub use cascade::{run_cascade, CascadeMatch, ParseError, ParseStrategy, PARSE_CASCADE};
pub use error::{ExtractError, ExtractResult};
pub use extractor::StructuredExtractor;
pub use feedback::{normalize_rating, parse_rating_feedback};
pub use model::{
    ExtractionStage, FeedbackOutcome, GenerationRequest, InterviewKind, QuestionAnswerPair,
    RatingFeedback, SchemaKind, DEFAULT_QUESTION_COUNT, FALLBACK_FEEDBACK, FALLBACK_RATING,
};
pub use repair::{repair_json, RepairStep, REPAIR_PIPELINE};
