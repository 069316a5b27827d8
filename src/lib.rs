//! AI MockPrep - Rust Backend Library
//!
//! This library provides the backend functionality for the AI MockPrep application.
//! It includes:
//! - Interview, answer, subscription and analytics services
//! - Storage layer (SQLite, Config)
//! - Data models and utilities
//!
//! Question and feedback extraction lives in `mockprep-extract`; generation
//! providers live in `mockprep-llm`.

pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use models::settings::{AppConfig, SettingsUpdate};
pub use services::{compute_analytics, InterviewService, SubscriptionService};
pub use state::AppState;
pub use storage::{ConfigService, Database};
pub use utils::error::{AppError, AppResult};
