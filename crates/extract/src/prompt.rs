//! Prompt Builders

use crate::model::{GenerationRequest, InterviewKind};

/// Prompt asking for exactly `question_count` question/answer objects as a
/// bare JSON array.
pub fn question_prompt(request: &GenerationRequest) -> String {
    let count = request.effective_question_count();
    match request.kind {
        InterviewKind::Technical => format!(
            r#"You are an interview question generator. Return ONLY a valid JSON array with exactly {count} technical interview questions for {role}.

Job details:
- Position: {role}
- Tech stack: {context}
- Experience: {years} years

CRITICAL REQUIREMENTS:
1. Return ONLY a valid JSON array - no markdown, no code fences, no explanations, no extra text
2. Use simple English words only - no smart quotes, apostrophes, or special characters in text
3. Keep answers under 80 words each
4. Each object must have exactly these keys: "question" and "answer"

JSON array format:
[
{{"question": "What is React", "answer": "React is a JavaScript library for building user interfaces using components"}},
{{"question": "Explain REST APIs", "answer": "REST APIs are web services that use HTTP methods to perform operations on resources"}}
]

Generate the JSON array now:"#,
            count = count,
            role = request.role,
            context = request.context,
            years = request.experience_years,
        ),
        InterviewKind::Behavioral => format!(
            r#"You are an interview question generator. Return ONLY a valid JSON array with exactly {count} behavioral interview questions for {role}.

Job details:
- Position: {role}
- Experience: {years} years

CRITICAL REQUIREMENTS:
1. Return ONLY a valid JSON array - no markdown, no code fences, no explanations, no extra text
2. Use simple English words only - no smart quotes, apostrophes, or special characters in text
3. Keep answers under 80 words using the STAR method
4. Each object must have exactly these keys: "question" and "answer"

JSON array format:
[
{{"question": "Tell me about a challenging project", "answer": "Situation: I faced a tight deadline. Task: Complete the project on time. Action: I organized my workflow and communicated with stakeholders. Result: Project delivered successfully"}},
{{"question": "Describe a team conflict", "answer": "Situation: Team had different opinions. Task: Resolve the disagreement. Action: I facilitated open discussion and found common ground. Result: Team unity was restored"}}
]

Generate the JSON array now:"#,
            count = count,
            role = request.role,
            years = request.experience_years,
        ),
    }
}

/// Prompt asking for a single `{"rating", "feedback"}` object.
pub fn feedback_prompt(question: &str, user_answer: &str) -> String {
    format!(
        r#"Question: {question}, User Answer: {user_answer}. Based on the question and user answer, please provide a rating out of 10 and feedback for improvement. Respond ONLY with valid JSON in this exact format: {{"rating": "X/10", "feedback": "your feedback here"}}"#,
        question = question,
        user_answer = user_answer,
    )
}
