//! Integration Tests Module
//!
//! End-to-end tests for AI MockPrep: question extraction against scripted
//! generation responses, rating/feedback extraction, and the interview,
//! subscription and analytics flows over an in-memory database.

// Scripted generation provider shared by the tests below
mod common;

// Question list extraction: repair, cascade, fallback and retry
mod question_extraction_test;

// Rating/feedback extraction and degraded results
mod rating_feedback_test;

// Interview creation, answer recording and summaries through AppState
mod interview_flow_test;

// Subscription checks and analytics reports
mod subscription_analytics_test;
