//! Feedback Normalizer
//!
//! Turns the generator's reply to a feedback prompt into a complete
//! `FeedbackRecord`. Parsing failures never escape: they fall through to a
//! deterministic record chosen from the answer's heuristic labels.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use mock_interview_llm::Generation;

use super::classifier::{classify_answer, AnswerLabel, AnswerLabels};
use crate::models::interview::FeedbackRecord;

/// Highest score an answer can receive
pub const MAX_SCORE: u8 = 10;

/// Why a generator reply could not be read as structured feedback
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeedbackParseError {
    #[error("generator returned no response")]
    NoResponse,
    #[error("reply is not valid JSON: {0}")]
    NotJson(String),
    #[error("reply is not a JSON object")]
    NotAnObject,
}

/// Extract a JSON payload from a reply, handling markdown fences and
/// surrounding prose.
pub fn extract_json(text: &str) -> String {
    let trimmed = text.trim();

    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        let content_start = after_fence.find('\n').map(|nl| nl + 1).unwrap_or(0);
        let content = &after_fence[content_start..];
        if let Some(end) = content.find("```") {
            return content[..end].trim().to_string();
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start <= end {
            return trimmed[start..=end].to_string();
        }
    }

    trimmed.to_string()
}

fn parse_score(value: Option<&Value>) -> u8 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    raw.filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, f64::from(MAX_SCORE)) as u8)
        .unwrap_or(0)
}

fn parse_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Parse a structured feedback reply.
///
/// Missing fields take neutral defaults (score 0, empty lists, empty text).
pub fn parse_feedback(text: &str) -> Result<FeedbackRecord, FeedbackParseError> {
    let json = extract_json(text);
    let value: Value =
        serde_json::from_str(&json).map_err(|e| FeedbackParseError::NotJson(e.to_string()))?;
    let object = value.as_object().ok_or(FeedbackParseError::NotAnObject)?;

    Ok(FeedbackRecord {
        score: parse_score(object.get("score")),
        strengths: parse_list(object.get("strengths")),
        improvements: parse_list(object.get("improvements")),
        feedback: object
            .get("feedback")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    })
}

fn record(score: u8, strengths: &[&str], improvements: &[&str], feedback: &str) -> FeedbackRecord {
    FeedbackRecord {
        score,
        strengths: strengths.iter().map(|s| s.to_string()).collect(),
        improvements: improvements.iter().map(|s| s.to_string()).collect(),
        feedback: feedback.to_string(),
    }
}

/// Fixed record for unprofessional or offensive answers
pub fn rejection_record() -> FeedbackRecord {
    record(
        1,
        &[],
        &[
            "Maintain a professional tone throughout the interview",
            "Engage with the question that was asked",
            "Stay respectful even when a question feels difficult",
        ],
        "This response is unprofessional and would not be acceptable in a real interview. \
         Stay respectful and engage with the question so your answer can be evaluated.",
    )
}

/// Deterministic feedback for an answer, chosen by its primary label
pub fn fallback_record(labels: &AnswerLabels) -> FeedbackRecord {
    match labels.primary() {
        Some(AnswerLabel::Unprofessional) | Some(AnswerLabel::Offensive) => rejection_record(),
        Some(AnswerLabel::Refusal) => record(
            1,
            &[],
            &[
                "Attempt an answer even if you are unsure",
                "Explain your reasoning step by step",
                "Ask for clarification instead of declining",
            ],
            "Declining to answer leaves the interviewer with nothing to evaluate. \
             Even a partial answer that shows your reasoning is better than none.",
        ),
        Some(AnswerLabel::AsksForExplanation) => record(
            6,
            &["Willing to seek clarification"],
            &[
                "Restate the question in your own words before answering",
                "Follow up with an attempted answer after clarifying",
            ],
            "Asking for clarification is reasonable when a question is ambiguous. \
             Make sure you follow it with a concrete attempt at the answer.",
        ),
        Some(AnswerLabel::Vague) => record(
            3,
            &[],
            &[
                "Provide specific examples",
                "Expand on your answer with more detail",
                "Structure your response clearly",
            ],
            "Your answer is too brief or uncertain to show what you know. \
             Add specifics and walk through your thinking.",
        ),
        Some(AnswerLabel::Empty) => record(
            0,
            &[],
            &["Provide an answer to the question"],
            "No answer was given.",
        ),
        Some(AnswerLabel::Detailed) => record(
            9,
            &["Thorough and detailed response", "Good depth of explanation"],
            &["Keep answers concise and focused"],
            "A thorough answer with good depth. \
             Make sure the key point stays easy to find in longer responses.",
        ),
        None => record(
            5,
            &["Attempted to answer the question"],
            &[
                "Support your answer with a concrete example",
                "Explain the reasoning behind your answer",
            ],
            "A reasonable attempt. \
             Adding concrete examples and explaining your reasoning would make it stronger.",
        ),
    }
}

/// Produce the complete feedback record for one answer.
///
/// Hostile answers get the rejection record whatever the generator said.
/// Otherwise a parsed reply wins, and an unusable reply falls back to the
/// label-driven record.
pub fn normalize_feedback(generation: &Generation, answer: &str) -> FeedbackRecord {
    let labels = classify_answer(answer);

    if labels.is_hostile() {
        debug!(
            labels = ?labels.iter().map(|l| l.as_str()).collect::<Vec<_>>(),
            "Hostile answer, using rejection record"
        );
        return rejection_record();
    }

    let parsed = match generation {
        Generation::Text(text) => parse_feedback(text),
        Generation::NoResponse => Err(FeedbackParseError::NoResponse),
    };

    match parsed {
        Ok(record) => record,
        Err(e) => {
            let label = labels
                .primary()
                .map(|l| l.as_str())
                .unwrap_or("generic_attempt");
            debug!(error = %e, label, "Feedback unusable, using heuristic fallback");
            fallback_record(&labels)
        }
    }
}
