//! Score Aggregator
//!
//! Reduces a session's turn history into an overall score and the
//! consolidated strengths and improvements.

use crate::models::interview::{InterviewTurn, OverallRating};

/// Aggregated result over a session's turns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreSummary {
    /// Rounded mean of counted scores, 0 when nothing counted
    pub overall_score: u8,
    /// Number of turns that counted
    pub counted: usize,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

impl ScoreSummary {
    pub fn rating(&self) -> OverallRating {
        OverallRating::from_score(self.overall_score)
    }
}

/// Whether a turn contributes to the overall score.
///
/// The role declaration and the introduction are never scored, so they are
/// excluded by the positive-score requirement.
pub fn is_counted(turn: &InterviewTurn) -> bool {
    turn.score > 0
        && turn
            .answer
            .as_deref()
            .is_some_and(|answer| !answer.trim().is_empty())
}

/// Aggregate turns in order. Lists are concatenated without deduplication.
pub fn aggregate(turns: &[InterviewTurn]) -> ScoreSummary {
    let mut summary = ScoreSummary::default();
    let mut total: u32 = 0;

    for turn in turns.iter().filter(|t| is_counted(t)) {
        summary.counted += 1;
        total += u32::from(turn.score);
        summary.strengths.extend_from_slice(&turn.strengths);
        summary.improvements.extend_from_slice(&turn.improvements);
    }

    if summary.counted > 0 {
        let mean = f64::from(total) / summary.counted as f64;
        summary.overall_score = mean.round() as u8;
    }

    summary
}
