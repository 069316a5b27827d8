//! Analytics Service
//!
//! Pure computation of a user's progress report from their interviews and the
//! answers recorded against them. Ratings that cannot be read count as zero.

use std::collections::BTreeMap;

use crate::models::{
    AnalyticsReport, MockInterview, MonthlyProgress, PerformancePoint, SkillScore, UserAnswer,
};

const RECENT_LIMIT: usize = 10;
const MONTH_LIMIT: usize = 6;
const HIGHLIGHT_LIMIT: usize = 3;
const STRENGTH_THRESHOLD: u32 = 70;
const WEAKNESS_THRESHOLD: u32 = 60;

/// Skill bucket for a job position, matched on lowercase keywords
pub fn skill_for_position(job_position: &str) -> &'static str {
    let position = job_position.to_lowercase();
    if position.contains("frontend") || position.contains("react") {
        "Frontend Development"
    } else if position.contains("backend") || position.contains("node") {
        "Backend Development"
    } else if position.contains("full") {
        "Full Stack Development"
    } else {
        "General Programming"
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn percent(score_out_of_ten: f64) -> u32 {
    (score_out_of_ten * 10.0).round().max(0.0) as u32
}

fn answer_score(answer: &UserAnswer) -> f64 {
    answer.score().unwrap_or(0) as f64
}

/// A completed interview with its mean rating out of 10
struct Completed<'a> {
    interview: &'a MockInterview,
    average: f64,
}

/// Build the analytics report for one user's interviews
pub fn compute_analytics(history: &[(MockInterview, Vec<UserAnswer>)]) -> AnalyticsReport {
    let total = history.len() as u32;

    let mut completed: Vec<Completed<'_>> = history
        .iter()
        .filter_map(|(interview, answers)| {
            let scores: Vec<f64> = answers.iter().map(answer_score).collect();
            mean(&scores).map(|average| Completed { interview, average })
        })
        .collect();
    completed.sort_by_key(|c| c.interview.created_at);

    let completion_rate = if total > 0 {
        (completed.len() as f64 / total as f64 * 100.0).round() as u32
    } else {
        0
    };

    let averages: Vec<f64> = completed.iter().map(|c| c.average).collect();
    let average_score = mean(&averages).map(|m| m.round() as u32).unwrap_or(0);
    let percents: Vec<f64> = averages.iter().map(|&a| percent(a) as f64).collect();

    let recent_performance = completed
        .iter()
        .skip(completed.len().saturating_sub(RECENT_LIMIT))
        .map(|c| PerformancePoint {
            mock_id: c.interview.mock_id.clone(),
            date: c.interview.created_at.to_rfc3339(),
            score: percent(c.average),
            job_position: c.interview.job_position.clone(),
        })
        .collect();

    let skill_breakdown = skill_breakdown(history);
    let (strengths, weaknesses) = highlights(&skill_breakdown);

    AnalyticsReport {
        total_interviews: total,
        completed_interviews: completed.len() as u32,
        completion_rate,
        average_score,
        improvement_rate: improvement_rate(&percents),
        skill_breakdown,
        recent_performance,
        strengths,
        weaknesses,
        monthly_progress: monthly_progress(&completed),
    }
}

/// Percent change from the earlier half to the later half of a chronological
/// score series. The earlier half takes the extra element on odd lengths.
/// The report feeds it the rounded percentage score of every completed
/// interview.
pub fn improvement_rate(chronological: &[f64]) -> i64 {
    if chronological.len() < 2 {
        return 0;
    }

    let split = chronological.len().div_ceil(2);
    let (first, second) = chronological.split_at(split);
    match (mean(first), mean(second)) {
        (Some(first), Some(second)) if first > 0.0 => {
            ((second - first) / first * 100.0).round() as i64
        }
        _ => 0,
    }
}

fn skill_breakdown(history: &[(MockInterview, Vec<UserAnswer>)]) -> BTreeMap<String, u32> {
    let mut by_skill: BTreeMap<&'static str, Vec<f64>> = BTreeMap::new();
    for (interview, answers) in history {
        if answers.is_empty() {
            continue;
        }
        by_skill
            .entry(skill_for_position(&interview.job_position))
            .or_default()
            .extend(answers.iter().map(answer_score));
    }

    by_skill
        .into_iter()
        .filter_map(|(skill, scores)| mean(&scores).map(|m| (skill.to_string(), percent(m))))
        .collect()
}

fn highlights(skills: &BTreeMap<String, u32>) -> (Vec<SkillScore>, Vec<SkillScore>) {
    let scored = |filter: &dyn Fn(u32) -> bool| -> Vec<SkillScore> {
        skills
            .iter()
            .filter(|(_, score)| filter(**score))
            .map(|(skill, score)| SkillScore {
                skill: skill.clone(),
                score: *score,
            })
            .collect()
    };

    let mut strengths = scored(&|score: u32| score >= STRENGTH_THRESHOLD);
    strengths.sort_by(|a, b| b.score.cmp(&a.score));
    strengths.truncate(HIGHLIGHT_LIMIT);

    let mut weaknesses = scored(&|score: u32| score < WEAKNESS_THRESHOLD);
    weaknesses.sort_by(|a, b| a.score.cmp(&b.score));
    weaknesses.truncate(HIGHLIGHT_LIMIT);

    (strengths, weaknesses)
}

fn monthly_progress(completed: &[Completed<'_>]) -> Vec<MonthlyProgress> {
    let mut by_month: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for c in completed {
        by_month
            .entry(c.interview.created_at.format("%Y-%m").to_string())
            .or_default()
            .push(c.average);
    }

    let skip = by_month.len().saturating_sub(MONTH_LIMIT);
    by_month
        .into_iter()
        .skip(skip)
        .map(|(month, averages)| MonthlyProgress {
            month,
            score: mean(&averages).map(percent).unwrap_or(0),
            interviews: averages.len() as u32,
        })
        .collect()
}
