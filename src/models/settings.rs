//! Settings Models
//!
//! Application configuration and settings data structures.

use mockprep_core::RetryPolicy;
use mockprep_extract::DEFAULT_QUESTION_COUNT;
use mockprep_llm::{ProviderConfig, ProviderType};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the API key for any provider
pub const ENV_API_KEY: &str = "MOCKPREP_API_KEY";
/// Environment variable overriding the default question count
pub const ENV_QUESTION_COUNT: &str = "INTERVIEW_QUESTION_COUNT";
/// Environment variable overriding the model name
pub const ENV_MODEL: &str = "MOCKPREP_MODEL";

/// Largest question count a single interview may ask for
pub const MAX_QUESTION_COUNT: u32 = 20;

/// Application configuration stored in config.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generation provider: "gemini" or "openai"
    #[serde(default = "default_provider")]
    pub provider: ProviderType,
    /// Model name for the provider
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL override for the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// API key; usually supplied through the environment instead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum output tokens per call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Questions generated per interview
    #[serde(default = "default_question_count")]
    pub question_count: u32,
    /// Retry policy for question generation
    #[serde(default)]
    pub question_retry: RetryPolicy,
    /// Retry policy for rating/feedback generation
    #[serde(default = "RetryPolicy::no_retry")]
    pub feedback_retry: RetryPolicy,
}

fn default_provider() -> ProviderType {
    ProviderType::Gemini
}

fn default_model() -> String {
    ProviderType::Gemini.default_model().to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_question_count() -> u32 {
    DEFAULT_QUESTION_COUNT
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: None,
            api_key: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            question_count: default_question_count(),
            question_retry: RetryPolicy::default(),
            feedback_retry: RetryPolicy::no_retry(),
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub provider: Option<ProviderType>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub question_count: Option<u32>,
    pub question_retry: Option<RetryPolicy>,
    pub feedback_retry: Option<RetryPolicy>,
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(provider) = update.provider {
            self.provider = provider;
        }
        if let Some(model) = update.model {
            self.model = model;
        }
        if let Some(base_url) = update.base_url {
            self.base_url = Some(base_url).filter(|url| !url.trim().is_empty());
        }
        if let Some(api_key) = update.api_key {
            self.api_key = Some(api_key).filter(|key| !key.trim().is_empty());
        }
        if let Some(temperature) = update.temperature {
            self.temperature = temperature;
        }
        if let Some(max_tokens) = update.max_tokens {
            self.max_tokens = max_tokens;
        }
        if let Some(timeout) = update.timeout_secs {
            self.timeout_secs = timeout;
        }
        if let Some(count) = update.question_count {
            self.question_count = count;
        }
        if let Some(policy) = update.question_retry {
            self.question_retry = policy;
        }
        if let Some(policy) = update.feedback_retry {
            self.feedback_retry = policy;
        }
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// The API key comes from `MOCKPREP_API_KEY`, then from the provider's own
    /// variable (`GEMINI_API_KEY` or `OPENAI_API_KEY`). Counts that do not
    /// parse or fall outside `1..=MAX_QUESTION_COUNT` are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let provider_var = self.provider.api_key_env_var();

        if let Some(key) = non_empty(ENV_API_KEY).or_else(|| non_empty(provider_var)) {
            self.api_key = Some(key);
        }
        if let Some(model) = non_empty(ENV_MODEL) {
            self.model = model;
        }
        if let Some(count) = non_empty(ENV_QUESTION_COUNT) {
            match count.trim().parse::<u32>() {
                Ok(parsed) if (1..=MAX_QUESTION_COUNT).contains(&parsed) => {
                    self.question_count = parsed;
                }
                _ => {
                    tracing::warn!(value = %count, "Ignoring invalid {}", ENV_QUESTION_COUNT);
                }
            }
        }
    }

    /// Provider configuration for the generation service
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            provider: self.provider,
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout_secs: self.timeout_secs,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model cannot be empty".to_string());
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "Invalid temperature: {}. Must be between 0.0 and 2.0",
                self.temperature
            ));
        }

        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }

        if !(1..=MAX_QUESTION_COUNT).contains(&self.question_count) {
            return Err(format!(
                "question_count must be between 1 and {}",
                MAX_QUESTION_COUNT
            ));
        }

        for (name, policy) in [
            ("question_retry", &self.question_retry),
            ("feedback_retry", &self.feedback_retry),
        ] {
            policy.validate().map_err(|e| format!("{}: {}", name, e))?;
        }

        Ok(())
    }
}
