//! Feedback and Scoring Integration Tests
//!
//! - Hostile answers override whatever the generator returned
//! - Heuristic fallback records when the reply cannot be parsed
//! - Aggregation over a realistic turn history

use std::sync::Arc;

use mock_interview::models::interview::InterviewTurn;
use mock_interview::services::interview::classifier::{classify_answer, AnswerLabel};
use mock_interview::services::interview::feedback::{
    fallback_record, normalize_feedback, rejection_record,
};
use mock_interview::services::interview::scoring::aggregate;
use mock_interview_llm::Generation;

use super::support::{create_manager, feedback_json, ScriptedProvider};

#[test]
fn test_not_in_the_mood_always_scores_one() {
    let answer = "Sorry, I'm just not in the mood to talk about databases.";
    let replies = [
        Generation::Text(feedback_json(10, "Perfect", "Nothing")),
        Generation::Text("Brilliant answer!".to_string()),
        Generation::Text("```json\n{\"score\": 8}\n```".to_string()),
        Generation::NoResponse,
    ];

    for reply in &replies {
        let record = normalize_feedback(reply, answer);
        assert_eq!(record.score, 1);
        assert_eq!(record, rejection_record());
        assert!(record.strengths.is_empty());
        assert_eq!(record.improvements.len(), 3);
    }
}

#[test]
fn test_short_answer_parse_failure_scores_three() {
    let answer = "Use Redis.";
    assert_eq!(classify_answer(answer).primary(), Some(AnswerLabel::Vague));

    let record = normalize_feedback(&Generation::Text("Good effort overall".to_string()), answer);
    assert_eq!(record.score, 3);
    let improvements = &record.improvements;
    assert!(improvements.contains(&"Provide specific examples".to_string()));
}

#[test]
fn test_priority_asks_before_vague() {
    // Both labels hold; clarification requests win
    let labels = classify_answer("Why?");
    assert!(labels.contains(AnswerLabel::AsksForExplanation));
    assert!(labels.contains(AnswerLabel::Vague));
    assert_eq!(fallback_record(&labels).score, 6);
}

#[test]
fn test_refusal_with_profanity_gets_rejection() {
    let answer = "No, I'm not going to tell you that, damn it.";
    let labels = classify_answer(answer);
    assert!(labels.contains(AnswerLabel::Refusal));
    assert!(labels.contains(AnswerLabel::Offensive));

    let reply = Generation::Text(feedback_json(7, "Honest", "Be polite"));
    let record = normalize_feedback(&reply, answer);
    assert_eq!(record, rejection_record());
}

#[test]
fn test_partial_reply_gets_neutral_defaults() {
    let record = normalize_feedback(
        &Generation::Text(r#"{"score": 6, "feedback": "Decent structure."}"#.to_string()),
        "I split the work into small reviewed changes",
    );
    assert_eq!(record.score, 6);
    assert!(record.strengths.is_empty());
    assert!(record.improvements.is_empty());
    assert_eq!(record.feedback, "Decent structure.");
}

#[test]
fn test_aggregate_counts_only_scored_answers() {
    let mut greeting = InterviewTurn::new("s", 0, "What role?");
    greeting.answer = Some("Backend Engineer".to_string());
    let mut intro = InterviewTurn::new("s", 1, "Let's start.");
    intro.answer = Some(String::new());
    let mut first = InterviewTurn::new("s", 2, "Q1");
    first.answer = Some("Answer one".to_string());
    first.score = 7;
    first.strengths = vec!["Clear".to_string()];
    let mut second = InterviewTurn::new("s", 3, "Q2");
    second.answer = Some("Answer two".to_string());
    second.score = 9;
    second.strengths = vec!["Clear".to_string()];
    let open = InterviewTurn::new("s", 4, "Q3");

    let summary = aggregate(&[greeting, intro, first, second, open]);
    assert_eq!(summary.overall_score, 8);
    assert_eq!(summary.counted, 2);
    // duplicates retained
    assert_eq!(summary.strengths, vec!["Clear", "Clear"]);
}

#[tokio::test]
async fn test_hostile_answer_through_session() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        "What is a load balancer?".to_string(),
        feedback_json(9, "Great", "None"),
        "What is a reverse proxy?".to_string(),
    ]));
    let manager = create_manager(provider);
    let started = manager.start_session("Prep", None, None).unwrap();
    manager
        .submit_answer(&started.session_id, "Site Reliability Engineer")
        .await
        .unwrap();

    let outcome = manager
        .submit_answer(&started.session_id, "Whatever, this is a waste of time")
        .await
        .unwrap();
    assert_eq!(outcome.feedback.unwrap(), rejection_record());

    let detail = manager.get_session(&started.session_id).unwrap();
    let graded = &detail.turns[2];
    assert_eq!(graded.score, 1);
    assert_eq!(
        graded.feedback.as_deref(),
        Some(rejection_record().feedback.as_str())
    );
}
