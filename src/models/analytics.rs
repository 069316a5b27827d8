//! Analytics Models
//!
//! Progress report computed from a user's interviews and recorded answers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Score of one completed interview, as a percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformancePoint {
    pub mock_id: String,
    /// Interview creation date (RFC 3339)
    pub date: String,
    /// Average rating times ten, rounded
    pub score: u32,
    pub job_position: String,
}

/// A skill with its percentage score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillScore {
    pub skill: String,
    pub score: u32,
}

/// Average score for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProgress {
    /// `YYYY-MM`
    pub month: String,
    /// Percentage score
    pub score: u32,
    /// Completed interviews in the month
    pub interviews: u32,
}

/// Full analytics report for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_interviews: u32,
    pub completed_interviews: u32,
    /// Completed over total, as a rounded percentage
    pub completion_rate: u32,
    /// Mean interview rating out of 10, rounded
    pub average_score: u32,
    /// Percent change between the earlier and later half of interviews
    pub improvement_rate: i64,
    /// Skill name to percentage score
    pub skill_breakdown: BTreeMap<String, u32>,
    /// Up to the ten most recent completed interviews, oldest first
    pub recent_performance: Vec<PerformancePoint>,
    /// Skills scoring 70% or more, best first, at most three
    pub strengths: Vec<SkillScore>,
    /// Skills scoring under 60%, worst first, at most three
    pub weaknesses: Vec<SkillScore>,
    /// Up to the last six months with activity, oldest first
    pub monthly_progress: Vec<MonthlyProgress>,
}
