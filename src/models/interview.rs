//! Interview Models
//!
//! Sessions, turns, feedback records and the response payloads returned by
//! the session manager.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mock_interview_core::InterviewCategory;

/// Lifecycle state of a session, derived from its stored fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Waiting for the candidate to declare the role to prepare for
    AwaitingRole,
    /// Question/answer/feedback loop
    InProgress,
    /// Terminated; no more answers are accepted
    Ended,
}

impl SessionStatus {
    /// Get the string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingRole => "awaiting_role",
            Self::InProgress => "in_progress",
            Self::Ended => "ended",
        }
    }
}

/// One mock interview conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterviewSession {
    /// Unique session ID
    pub id: String,
    /// Topic given when the session was started
    pub topic: String,
    /// Owning user, if any
    pub user_id: Option<String>,
    /// Role declared by the candidate in the first answer
    pub role: Option<String>,
    /// Explicit or inferred interview category
    pub category: Option<InterviewCategory>,
    /// Whether the first answer has been consumed as the role declaration
    pub role_chosen: bool,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl InterviewSession {
    /// Derive the lifecycle state
    pub fn status(&self) -> SessionStatus {
        if self.ended_at.is_some() {
            SessionStatus::Ended
        } else if self.role_chosen {
            SessionStatus::InProgress
        } else {
            SessionStatus::AwaitingRole
        }
    }
}

/// One question/answer/feedback unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterviewTurn {
    /// Parent session ID
    pub session_id: String,
    /// Zero-based, gap-free position within the session
    pub order_index: u32,
    pub question: String,
    pub answer: Option<String>,
    pub feedback: Option<String>,
    /// 0..=10, 0 means "not evaluated"
    pub score: u8,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

impl InterviewTurn {
    /// Create an unanswered turn
    pub fn new(
        session_id: impl Into<String>,
        order_index: u32,
        question: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            order_index,
            question: question.into(),
            answer: None,
            feedback: None,
            score: 0,
            strengths: Vec::new(),
            improvements: Vec::new(),
        }
    }

    /// Whether the turn still waits for an answer
    pub fn is_open(&self) -> bool {
        self.answer.is_none()
    }

    /// Store a graded answer on this turn
    pub fn apply_feedback(&mut self, answer: &str, record: &FeedbackRecord) {
        self.answer = Some(answer.to_string());
        self.score = record.score;
        self.strengths = record.strengths.clone();
        self.improvements = record.improvements.clone();
        self.feedback = Some(record.feedback.clone());
    }

    /// Per-turn feedback view used in summaries
    pub fn turn_feedback(&self) -> TurnFeedback {
        TurnFeedback {
            order_index: self.order_index,
            question: self.question.clone(),
            score: self.score,
            strengths: self.strengths.clone(),
            improvements: self.improvements.clone(),
        }
    }
}

/// A complete, normalized evaluation of one answer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackRecord {
    /// 0..=10
    pub score: u8,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    /// Short narrative feedback
    pub feedback: String,
}

/// Rating band for an overall score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverallRating {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl OverallRating {
    /// Band a 0..=10 score
    pub fn from_score(score: u8) -> Self {
        match score {
            8.. => Self::Excellent,
            6..=7 => Self::Good,
            4..=5 => Self::Fair,
            _ => Self::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

/// Feedback of a single turn as reported at session end
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TurnFeedback {
    pub order_index: u32,
    pub question: String,
    pub score: u8,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

// ============================================================================
// Response types
// ============================================================================

/// Returned by `start_session`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStarted {
    pub session_id: String,
    pub topic: String,
    pub started_at: DateTime<Utc>,
    /// The greeting asking which role to prepare for
    pub current_question: String,
}

/// Returned by `submit_answer`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub session_id: String,
    /// Next question, absent when the answer ended the session
    pub current_question: Option<String>,
    /// Evaluation of the answer just submitted; absent for the role declaration
    pub feedback: Option<FeedbackRecord>,
    /// Present only when a stop keyword ended the session
    pub summary: Option<SessionSummary>,
}

/// Returned by `end_session`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Narrative closing summary
    pub summary: String,
    pub overall_score: u8,
    pub overall_rating: OverallRating,
    /// Number of turns that counted toward the overall score
    pub answered_count: usize,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    /// Every turn, in order
    pub feedback: Vec<TurnFeedback>,
}

/// Full view of a stored session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetail {
    pub session: InterviewSession,
    pub status: SessionStatus,
    pub turns: Vec<InterviewTurn>,
}
