//! Fallback Templates
//!
//! Role-parameterised question/answer pairs substituted when no parse
//! strategy could recover anything from the response.

use serde_json::Value;

use crate::model::{GenerationRequest, InterviewKind, QuestionAnswerPair};

fn technical_templates(request: &GenerationRequest) -> Vec<QuestionAnswerPair> {
    let role = &request.role;
    let context = &request.context;
    let years = request.experience_years;
    vec![
        QuestionAnswerPair::new(
            format!("What technologies have you used in your {} years as a {}?", years, role),
            format!("I have {} years of experience working with {} and related technologies.", years, context),
        ),
        QuestionAnswerPair::new(
            format!("How do you approach problem-solving in {} role?", role),
            "I break down complex problems into smaller parts and use systematic approaches to find solutions.",
        ),
        QuestionAnswerPair::new(
            "Describe a challenging technical project you worked on",
            format!(
                "I worked on a project involving {} where I had to overcome technical challenges and deliver results.",
                context
            ),
        ),
        QuestionAnswerPair::new(
            "How do you stay updated with new technologies?",
            "I regularly read documentation, attend webinars, and practice with new tools to stay current.",
        ),
        QuestionAnswerPair::new(
            format!("What is your experience with {}?", context),
            format!(
                "I have hands-on experience with {} and have used it in multiple projects during my career.",
                context
            ),
        ),
    ]
}

fn behavioral_templates(request: &GenerationRequest) -> Vec<QuestionAnswerPair> {
    vec![
        QuestionAnswerPair::new(
            format!("Tell me about a challenging situation you faced as a {}", request.role),
            "I encountered a challenging deadline where I had to prioritize tasks and communicate effectively with my team to deliver on time.",
        ),
        QuestionAnswerPair::new(
            "How do you handle conflicts in a team environment?",
            "I listen to all perspectives, facilitate open communication, and work towards finding mutually beneficial solutions.",
        ),
        QuestionAnswerPair::new(
            "Describe a time when you had to learn something new quickly",
            "I had to quickly adapt to new processes and technologies, which I approached through focused learning and practice.",
        ),
        QuestionAnswerPair::new(
            "How do you manage stress and tight deadlines?",
            "I prioritize tasks, break them into manageable steps, and maintain clear communication with stakeholders.",
        ),
        QuestionAnswerPair::new(
            "Tell me about a time you showed leadership",
            "I took initiative in guiding team members, making decisions, and ensuring project goals were met effectively.",
        ),
    ]
}

/// The five templates for the request's interview kind.
pub fn templates(request: &GenerationRequest) -> Vec<QuestionAnswerPair> {
    match request.kind {
        InterviewKind::Technical => technical_templates(request),
        InterviewKind::Behavioral => behavioral_templates(request),
    }
}

/// Templates sized to the requested count, repeating from the start when
/// more than five are asked for.
pub fn fallback_pairs(request: &GenerationRequest) -> Vec<QuestionAnswerPair> {
    templates(request)
        .into_iter()
        .cycle()
        .take(request.effective_question_count())
        .collect()
}

/// [`fallback_pairs`] as JSON items so they go through post-validation like
/// any parsed output.
pub fn fallback_items(request: &GenerationRequest) -> Vec<Value> {
    fallback_pairs(request)
        .into_iter()
        .map(|pair| {
            serde_json::json!({
                "question": pair.question,
                "answer": pair.answer,
            })
        })
        .collect()
}
