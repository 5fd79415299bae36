//! Mock Interview Service
//!
//! Turn-based mock interview orchestration.
//!
//! ## Architecture
//! - `prompts.rs` - Question, feedback and summary prompts plus fixed interviewer lines
//! - `classifier.rs` - Heuristic answer labels with a fixed fallback priority
//! - `feedback.rs` - Structured feedback extraction with deterministic fallbacks
//! - `scoring.rs` - Overall score and consolidated strengths/improvements
//! - `state.rs` - SQLite-backed session and turn persistence
//! - `manager.rs` - Session state machine with per-session serialization

pub mod classifier;
pub mod feedback;
pub mod manager;
pub mod prompts;
pub mod scoring;
pub mod state;

pub use classifier::{classify_answer, is_stop_request, AnswerLabel, AnswerLabels};
pub use feedback::{normalize_feedback, parse_feedback, FeedbackParseError};
pub use manager::{InterviewManager, InterviewOptions};
pub use scoring::{aggregate, ScoreSummary};
pub use state::SessionStore;
