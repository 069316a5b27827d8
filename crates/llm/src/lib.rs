//! AI MockPrep LLM
//!
//! Provides a unified interface for the text-generation services used to
//! generate interview questions and rate answers:
//! - Google Gemini (`generateContent`)
//! - OpenAI and OpenAI-compatible chat completions
//!
//! Also includes the HTTP client factory and a provider factory.

pub mod gemini;
pub mod http_client;
pub mod openai;
pub mod provider;
pub mod types;

// Re-export main types
pub use gemini::GeminiProvider;
pub use http_client::build_http_client;
pub use openai::OpenAIProvider;
pub use provider::{create_provider, LlmProvider};
pub use types::*;
