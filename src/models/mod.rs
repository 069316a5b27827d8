//! Data Models
//!
//! Contains all data structures used throughout the application.

pub mod analytics;
pub mod answer;
pub mod interview;
pub mod settings;
pub mod subscription;

pub use analytics::*;
pub use answer::*;
pub use interview::*;
pub use settings::*;
pub use subscription::*;
