//! Test doubles shared across integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockprep_llm::{
    LlmError, LlmProvider, LlmRequestOptions, LlmResponse, LlmResult, Message, ProviderConfig,
};

/// Provider that replays queued replies and counts calls.
///
/// Once the queue is empty every call returns text without any JSON in it.
pub struct ScriptedProvider {
    config: ProviderConfig,
    replies: Mutex<VecDeque<LlmResult<String>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<LlmResult<String>>) -> Arc<Self> {
        Arc::new(Self {
            config: ProviderConfig::default(),
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    /// Provider replying with the given texts in order
    pub fn replying(texts: &[&str]) -> Arc<Self> {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompt text of every call so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        _system: Option<String>,
        _request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.extend(messages.iter().map(|m| m.content.clone()));
        }

        let next = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("I could not think of any questions.".to_string()));
        next.map(|text| LlmResponse::text(text, "scripted-model"))
    }

    async fn health_check(&self) -> LlmResult<()> {
        Ok(())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

/// A network failure as the HTTP layer reports it
pub fn network_error() -> LlmError {
    LlmError::NetworkError {
        message: "connection reset".to_string(),
    }
}

/// A JSON array of `count` well-formed pairs
pub fn valid_pairs_json(count: usize) -> String {
    let items: Vec<String> = (1..=count)
        .map(|i| {
            format!(
                r#"{{"question": "Question number {i} about React?", "answer": "Model answer number {i} with detail"}}"#
            )
        })
        .collect();
    format!("[{}]", items.join(", "))
}
