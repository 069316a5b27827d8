//! AI MockPrep Core
//!
//! Foundational types shared by every crate in the AI MockPrep workspace. This
//! crate has no dependencies on application-level code (database, HTTP, LLM
//! providers).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `retry` - Attempt-indexed linear backoff policy (`RetryPolicy`)

pub mod error;
pub mod retry;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Retry Policy ───────────────────────────────────────────────────────
pub use retry::{RetryPolicy, MAX_BASE_DELAY_MS};
