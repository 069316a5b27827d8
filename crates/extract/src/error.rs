//! Extraction Errors

use mockprep_llm::LlmError;
use thiserror::Error;

/// Errors raised while turning generated text into structured values.
///
/// Only `Exhausted` and `Generation` ever reach callers of the extractor; the
/// other variants describe why a single attempt failed.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The generation service call itself failed
    #[error("Generation service error: {0}")]
    Generation(#[from] LlmError),

    /// No `[` ... `]` span in the response
    #[error("No valid JSON array found in AI response")]
    NoArrayFound,

    /// No `{` ... `}` span in the response
    #[error("No valid JSON object found in AI response")]
    NoObjectFound,

    /// Validation left nothing usable
    #[error("No valid questions could be extracted or generated")]
    NoValidQuestions,

    /// A required field was missing or empty
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Rating could not be normalised to `N/10`
    #[error("Invalid rating: {0}")]
    InvalidRating(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Every attempt failed
    #[error("Failed to generate AI questions after {attempts} attempts. Last error: {last_error}")]
    Exhausted { attempts: u32, last_error: String },
}

/// Result type alias for extraction
pub type ExtractResult<T> = Result<T, ExtractError>;

impl From<ExtractError> for String {
    fn from(err: ExtractError) -> String {
        err.to_string()
    }
}
