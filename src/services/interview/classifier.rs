//! Answer Classifier
//!
//! Keyword and length heuristics over raw answer text. Labels are not
//! mutually exclusive; `AnswerLabels::primary` resolves them to the single
//! label that drives fallback feedback.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Heuristic label attached to an answer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AnswerLabel {
    /// Disengaged or dismissive tone
    Unprofessional,
    /// Explicitly declines to answer
    Refusal,
    /// Contains profanity
    Offensive,
    /// Blank or a single period
    Empty,
    /// Asks the interviewer for clarification
    AsksForExplanation,
    /// Too short or openly unsure
    Vague,
    /// Long or multi-line
    Detailed,
}

impl AnswerLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unprofessional => "unprofessional",
            Self::Refusal => "refusal",
            Self::Offensive => "offensive",
            Self::Empty => "empty",
            Self::AsksForExplanation => "asks_for_explanation",
            Self::Vague => "vague",
            Self::Detailed => "detailed",
        }
    }
}

/// Order in which labels are consulted when synthesizing fallback feedback
pub const FALLBACK_PRIORITY: [AnswerLabel; 7] = [
    AnswerLabel::Unprofessional,
    AnswerLabel::Refusal,
    AnswerLabel::AsksForExplanation,
    AnswerLabel::Vague,
    AnswerLabel::Offensive,
    AnswerLabel::Empty,
    AnswerLabel::Detailed,
];

const DISENGAGED_PHRASES: &[&str] = &[
    "not in the mood",
    "don't feel like",
    "can't be bothered",
    "don't want to",
    "not interested",
    "whatever",
    "i don't care",
    "this is stupid",
    "waste of time",
    "boring",
    "annoying",
];

const UNSURE_PHRASES: &[&str] = &["i don't know", "i dont know", "not sure"];

const REFUSAL_VERBS: &[&str] = &["tell", "answer", "say"];

const CLARIFICATION_PHRASES: &[&str] = &["explain", "why", "how", "what", "can you"];

const STOP_PHRASES: &[&str] = &[
    "stop",
    "end",
    "quit",
    "exit",
    "stop interview",
    "end interview",
    "stop the interview",
    "end the interview",
];

const VAGUE_MAX_CHARS: usize = 20;
const DETAILED_MIN_CHARS: usize = 120;
const DETAILED_MIN_LINES: usize = 3;

static PROFANITY: OnceLock<Option<Regex>> = OnceLock::new();

/// Match against a pattern compiled once on first use.
fn pattern_matches(cell: &'static OnceLock<Option<Regex>>, pattern: &str, text: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(text))
}

/// Lowercase and fold typographic apostrophes so phrase lists match.
fn normalize(text: &str) -> String {
    text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'")
}

/// Set of labels computed for one answer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerLabels {
    labels: Vec<AnswerLabel>,
}

impl AnswerLabels {
    pub fn contains(&self, label: AnswerLabel) -> bool {
        self.labels.contains(&label)
    }

    pub fn iter(&self) -> impl Iterator<Item = AnswerLabel> + '_ {
        self.labels.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Unprofessional or offensive answers always receive the rejection record
    pub fn is_hostile(&self) -> bool {
        self.contains(AnswerLabel::Unprofessional) || self.contains(AnswerLabel::Offensive)
    }

    /// First label in `FALLBACK_PRIORITY`; `None` means a generic attempt
    pub fn primary(&self) -> Option<AnswerLabel> {
        FALLBACK_PRIORITY.into_iter().find(|l| self.contains(*l))
    }

    fn push(&mut self, label: AnswerLabel) {
        self.labels.push(label);
    }
}

/// Classify a raw answer
pub fn classify_answer(answer: &str) -> AnswerLabels {
    let text = normalize(answer);
    let trimmed = text.trim();
    let mut labels = AnswerLabels::default();

    if DISENGAGED_PHRASES.iter().any(|p| trimmed.contains(p)) {
        labels.push(AnswerLabel::Unprofessional);
    }
    if trimmed.contains("no") && REFUSAL_VERBS.iter().any(|v| trimmed.contains(v)) {
        labels.push(AnswerLabel::Refusal);
    }
    if pattern_matches(
        &PROFANITY,
        r"\b(\w*fuck\w*|shit\w*|bitch\w*|bastards?|assholes?|damn\w*|crap\w*|dicks?|piss\w*)\b",
        trimmed,
    ) {
        labels.push(AnswerLabel::Offensive);
    }
    if trimmed.is_empty() || trimmed == "." {
        labels.push(AnswerLabel::Empty);
    }
    if CLARIFICATION_PHRASES.iter().any(|p| trimmed.contains(p)) {
        labels.push(AnswerLabel::AsksForExplanation);
    }
    let chars = trimmed.chars().count();
    if chars < VAGUE_MAX_CHARS || UNSURE_PHRASES.iter().any(|p| trimmed.contains(p)) {
        labels.push(AnswerLabel::Vague);
    }
    if chars > DETAILED_MIN_CHARS || trimmed.lines().count() >= DETAILED_MIN_LINES {
        labels.push(AnswerLabel::Detailed);
    }

    labels
}

/// Whether an answer consists only of a request to stop the interview
pub fn is_stop_request(answer: &str) -> bool {
    let text = normalize(answer);
    let phrase = text
        .trim()
        .trim_end_matches(|c: char| c == '.' || c == '!' || c == '?')
        .trim();
    STOP_PHRASES.contains(&phrase)
}
