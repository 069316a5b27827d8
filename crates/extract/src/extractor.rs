//! Structured-Response Extractor
//!
//! Drives one extraction call end to end:
//! generate -> clean -> repair -> parse cascade -> validate.
//!
//! The question path retries the whole attempt with linear backoff and fails
//! only after the retry budget is spent. The rating path substitutes a
//! degraded fallback on content failures and only propagates service errors.

use std::sync::Arc;

use mockprep_core::RetryPolicy;
use mockprep_llm::{LlmError, LlmProvider, LlmRequestOptions, Message};
use tracing::{debug, error, info, warn};

use crate::cascade::run_cascade;
use crate::clean::{delimit_array, strip_code_fences};
use crate::error::{ExtractError, ExtractResult};
use crate::fallback::fallback_items;
use crate::feedback::parse_rating_feedback;
use crate::model::{
    ExtractionStage, FeedbackOutcome, GenerationRequest, QuestionAnswerPair, SchemaKind,
};
use crate::prompt::{feedback_prompt, question_prompt};
use crate::repair::repair_json;
use crate::validate::validate_pairs;

/// Why one rating attempt failed.
enum FeedbackFailure {
    Service(LlmError),
    Content(ExtractError),
}

/// Extractor bound to one generation provider.
///
/// Holds no per-request state, so one value can serve concurrent calls.
#[derive(Clone)]
pub struct StructuredExtractor {
    provider: Arc<dyn LlmProvider>,
    question_retry: RetryPolicy,
    feedback_retry: RetryPolicy,
    request_options: LlmRequestOptions,
}

impl StructuredExtractor {
    /// Create an extractor with the default policies: three question retries
    /// and no feedback retries.
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            question_retry: RetryPolicy::default(),
            feedback_retry: RetryPolicy::no_retry(),
            request_options: LlmRequestOptions::default(),
        }
    }

    pub fn with_question_retry(mut self, policy: RetryPolicy) -> Self {
        self.question_retry = policy;
        self
    }

    pub fn with_feedback_retry(mut self, policy: RetryPolicy) -> Self {
        self.feedback_retry = policy;
        self
    }

    pub fn with_request_options(mut self, options: LlmRequestOptions) -> Self {
        self.request_options = options;
        self
    }

    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    pub fn question_retry(&self) -> RetryPolicy {
        self.question_retry
    }

    pub fn feedback_retry(&self) -> RetryPolicy {
        self.feedback_retry
    }

    /// Generate schema-valid question/answer pairs.
    ///
    /// On success the list is non-empty and no longer than the requested
    /// count. Returns `ExtractError::Exhausted` once every attempt has failed.
    pub async fn extract_questions(
        &self,
        request: &GenerationRequest,
    ) -> ExtractResult<Vec<QuestionAnswerPair>> {
        let mut attempt: u32 = 1;
        loop {
            match self.attempt_questions(request, attempt).await {
                Ok(pairs) => {
                    info!(
                        schema = %SchemaKind::QuestionList,
                        attempt,
                        count = pairs.len(),
                        "Questions extracted"
                    );
                    return Ok(pairs);
                }
                Err(e) => {
                    warn!(
                        schema = %SchemaKind::QuestionList,
                        stage = %ExtractionStage::Failed,
                        attempt,
                        error = %e,
                        "Question extraction attempt failed"
                    );

                    if !self.question_retry.should_retry(attempt) {
                        error!(
                            stage = %ExtractionStage::Error,
                            attempts = attempt,
                            "Question extraction exhausted retries"
                        );
                        return Err(ExtractError::Exhausted {
                            attempts: attempt,
                            last_error: e.to_string(),
                        });
                    }

                    let delay = self.question_retry.delay_for(attempt);
                    debug!(
                        stage = %ExtractionStage::Retry,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Backing off before next attempt"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// [`Self::extract_questions`] serialized as a JSON array string, the form
    /// the persistence layer stores.
    pub async fn extract_questions_json(&self, request: &GenerationRequest) -> ExtractResult<String> {
        let pairs = self.extract_questions(request).await?;
        Ok(serde_json::to_string(&pairs)?)
    }

    async fn attempt_questions(
        &self,
        request: &GenerationRequest,
        attempt: u32,
    ) -> ExtractResult<Vec<QuestionAnswerPair>> {
        debug!(stage = %ExtractionStage::BuildingPrompt, attempt, kind = %request.kind);
        let prompt = question_prompt(request);

        debug!(stage = %ExtractionStage::AwaitingResponse, attempt, provider = self.provider.name());
        let response = self
            .provider
            .send_message(vec![Message::user(prompt)], None, self.request_options.clone())
            .await?;

        debug!(stage = %ExtractionStage::Cleaning, attempt);
        let raw = response.non_empty_content().unwrap_or_default();
        let cleaned = strip_code_fences(raw);
        let delimited = delimit_array(&cleaned).ok_or(ExtractError::NoArrayFound)?;
        let repaired = repair_json(delimited);

        debug!(stage = %ExtractionStage::Parsing, attempt);
        let items = match run_cascade(&repaired) {
            Some(found) => found.items,
            None => {
                debug!(stage = %ExtractionStage::Fallback, attempt, "Using template questions");
                fallback_items(request)
            }
        };

        debug!(stage = %ExtractionStage::Validating, attempt, items = items.len());
        let pairs = validate_pairs(&items, request);
        if pairs.is_empty() {
            return Err(ExtractError::NoValidQuestions);
        }

        debug!(stage = %ExtractionStage::Done, attempt);
        Ok(pairs)
    }

    /// Rate a user's answer.
    ///
    /// Content problems never surface as errors: they come back as
    /// `FeedbackOutcome::Degraded` with the fixed fallback value. Only a
    /// generation service failure that outlives the feedback retry policy is
    /// returned as `Err`.
    pub async fn extract_rating_feedback(
        &self,
        question: &str,
        user_answer: &str,
    ) -> ExtractResult<FeedbackOutcome> {
        let prompt = feedback_prompt(question, user_answer);
        let mut attempt: u32 = 1;

        loop {
            debug!(
                schema = %SchemaKind::RatingFeedback,
                stage = %ExtractionStage::AwaitingResponse,
                attempt
            );
            let failure = match self
                .provider
                .send_message(
                    vec![Message::user(prompt.clone())],
                    None,
                    self.request_options.clone(),
                )
                .await
            {
                Ok(response) => {
                    let raw = response.non_empty_content().unwrap_or_default();
                    match parse_rating_feedback(raw) {
                        Ok(feedback) => {
                            debug!(stage = %ExtractionStage::Done, attempt, rating = %feedback.rating);
                            return Ok(FeedbackOutcome::Rated(feedback));
                        }
                        Err(e) => FeedbackFailure::Content(e),
                    }
                }
                Err(e) => FeedbackFailure::Service(e),
            };

            if self.feedback_retry.should_retry(attempt) {
                let delay = self.feedback_retry.delay_for(attempt);
                debug!(
                    stage = %ExtractionStage::Retry,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying feedback generation"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            return match failure {
                FeedbackFailure::Service(e) => {
                    error!(attempts = attempt, error = %e, "Feedback generation failed");
                    Err(ExtractError::Generation(e))
                }
                FeedbackFailure::Content(e) => {
                    warn!(
                        stage = %ExtractionStage::Fallback,
                        attempts = attempt,
                        reason = %e,
                        "Feedback degraded to fallback value"
                    );
                    Ok(FeedbackOutcome::degraded(e.to_string()))
                }
            };
        }
    }
}

impl std::fmt::Debug for StructuredExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuredExtractor")
            .field("provider", &self.provider.name())
            .field("model", &self.provider.model())
            .field("question_retry", &self.question_retry)
            .field("feedback_retry", &self.feedback_retry)
            .finish()
    }
}
