//! Services
//!
//! Business logic services for the application.
//! Services combine the extractor with persistence and are called by the host.

pub mod analytics;
pub mod interview;
pub mod subscription;

pub use analytics::compute_analytics;
pub use interview::InterviewService;
pub use subscription::SubscriptionService;
