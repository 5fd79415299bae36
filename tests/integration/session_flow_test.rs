//! Session Flow Integration Tests
//!
//! - Role selection, question/answer/feedback loop and termination
//! - Turn ordering and role_chosen invariants
//! - Generator outages degrading to local fallbacks
//! - Idempotent end, persistence across manager instances
//! - Serialization of concurrent answers to one session

use std::sync::Arc;

use mock_interview::models::interview::{OverallRating, SessionStatus};
use mock_interview::services::interview::prompts::{introduction, FALLBACK_QUESTION};
use mock_interview::services::interview::InterviewManager;
use mock_interview::storage::database::Database;
use mock_interview::utils::error::AppError;
use mock_interview_core::InterviewCategory;

use super::support::{create_manager, create_store, feedback_json, test_options, ScriptedProvider};

fn assert_gap_free(manager: &InterviewManager, session_id: &str) {
    let detail = manager.get_session(session_id).unwrap();
    let indices: Vec<u32> = detail.turns.iter().map(|t| t.order_index).collect();
    let expected: Vec<u32> = (0..detail.turns.len() as u32).collect();
    assert_eq!(indices, expected);
    let open: Vec<u32> = detail
        .turns
        .iter()
        .filter(|t| t.is_open())
        .map(|t| t.order_index)
        .collect();
    assert!(open.len() <= 1, "more than one open turn: {:?}", open);
}

// ============================================================================
// Full conversation
// ============================================================================

#[tokio::test]
async fn test_full_interview_flow() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        "What is the difference between a process and a thread?".to_string(),
        feedback_json(7, "Correct definitions", "Mention memory isolation"),
        "How would you make a cache safe for concurrent readers?".to_string(),
        feedback_json(9, "Considered lock granularity", "Discuss eviction"),
        "Describe how you would shard a user table.".to_string(),
        "Solid technical depth. Work on covering edge cases.".to_string(),
    ]));
    let manager = create_manager(provider.clone());

    let started = manager.start_session("Systems prep", None, None).unwrap();
    let greeting = &started.current_question;
    assert!(greeting.starts_with("Welcome to your mock interview!"));
    assert_eq!(started.topic, "Systems prep");

    let detail = manager.get_session(&started.session_id).unwrap();
    assert!(!detail.session.role_chosen);
    assert_eq!(detail.status, SessionStatus::AwaitingRole);

    let outcome = manager
        .submit_answer(&started.session_id, "Backend Engineer")
        .await
        .unwrap();
    assert_eq!(
        outcome.current_question.as_deref(),
        Some("What is the difference between a process and a thread?")
    );
    assert!(outcome.feedback.is_none());
    let detail = manager.get_session(&started.session_id).unwrap();
    assert!(detail.session.role_chosen);

    let outcome = manager
        .submit_answer(
            &started.session_id,
            "A process has its own address space while threads share one.",
        )
        .await
        .unwrap();
    let feedback = outcome.feedback.unwrap();
    assert_eq!(feedback.score, 7);
    assert_eq!(feedback.strengths, vec!["Correct definitions"]);
    assert_eq!(
        outcome.current_question.as_deref(),
        Some("How would you make a cache safe for concurrent readers?")
    );
    let detail = manager.get_session(&started.session_id).unwrap();
    assert!(detail.session.role_chosen);

    let outcome = manager
        .submit_answer(
            &started.session_id,
            "Use a read-write lock per shard so readers never block each other.",
        )
        .await
        .unwrap();
    assert_eq!(outcome.feedback.unwrap().score, 9);

    let summary = manager.end_session(&started.session_id).await.unwrap();
    assert_eq!(summary.overall_score, 8);
    assert_eq!(summary.answered_count, 2);
    assert_eq!(summary.overall_rating, OverallRating::Excellent);
    assert_eq!(
        summary.strengths,
        vec!["Correct definitions", "Considered lock granularity"]
    );
    assert_eq!(
        summary.improvements,
        vec!["Mention memory isolation", "Discuss eviction"]
    );
    assert_eq!(
        summary.summary,
        "Solid technical depth. Work on covering edge cases."
    );
    assert_eq!(summary.feedback.len(), 5);
    assert_eq!(summary.started_at, started.started_at);

    assert_gap_free(&manager, &started.session_id);
    assert_eq!(
        manager.get_session(&started.session_id).unwrap().status,
        SessionStatus::Ended
    );

    // The summary prompt carries every exchange
    let prompts = provider.prompts();
    let summary_prompt = prompts.last().unwrap();
    assert!(summary_prompt.contains("Systems prep"));
    assert!(summary_prompt.contains("A: Backend Engineer"));
    assert!(summary_prompt.contains("Feedback: Scored 9 out of 10."));
}

#[tokio::test]
async fn test_question_prompt_carries_full_history() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        "First question?".to_string(),
        feedback_json(6, "Clear", "Add detail"),
        "Second question?".to_string(),
    ]));
    let manager = create_manager(provider.clone());
    let started = manager.start_session("Prep", None, None).unwrap();

    manager
        .submit_answer(&started.session_id, "Backend Engineer")
        .await
        .unwrap();
    manager
        .submit_answer(
            &started.session_id,
            "I would profile before optimizing anything",
        )
        .await
        .unwrap();

    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 3);
    let question_prompt = &prompts[2];
    let greeting = question_prompt
        .find("Q1: Welcome to your mock interview!")
        .unwrap();
    let intro = question_prompt
        .find(introduction(InterviewCategory::Technical))
        .unwrap();
    let first = question_prompt.find("Q3: First question?").unwrap();
    assert!(greeting < intro && intro < first);
    let last_answer = "A3: I would profile before optimizing anything";
    assert!(question_prompt.contains(last_answer));
}

// ============================================================================
// Category inference
// ============================================================================

#[tokio::test]
async fn test_hr_manager_infers_hr() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        "Tell me about a time you resolved a conflict in your team.".to_string(),
    ]));
    let manager = create_manager(provider.clone());
    let started = manager.start_session("Prep", None, None).unwrap();

    manager
        .submit_answer(&started.session_id, "HR Manager")
        .await
        .unwrap();

    let detail = manager.get_session(&started.session_id).unwrap();
    assert_eq!(detail.session.category, Some(InterviewCategory::Hr));
    assert_eq!(detail.session.role.as_deref(), Some("HR Manager"));
    assert_eq!(
        detail.turns[1].question,
        introduction(InterviewCategory::Hr)
    );
    assert!(provider.prompts()[0].contains("STAR"));
}

#[tokio::test]
async fn test_backend_engineer_infers_technical() {
    let provider = Arc::new(ScriptedProvider::new(vec!["What is an index?".to_string()]));
    let manager = create_manager(provider);
    let started = manager.start_session("Prep", None, None).unwrap();

    manager
        .submit_answer(&started.session_id, "Backend Engineer")
        .await
        .unwrap();

    let detail = manager.get_session(&started.session_id).unwrap();
    assert_eq!(detail.session.category, Some(InterviewCategory::Technical));
}

#[tokio::test]
async fn test_explicit_category_greeting() {
    let manager = create_manager(Arc::new(ScriptedProvider::unreachable()));
    let started = manager
        .start_session("Prep", Some("user-1"), Some(InterviewCategory::Technical))
        .unwrap();
    assert!(started.current_question.contains("technical interviewer"));
}

// ============================================================================
// Generator outages
// ============================================================================

#[tokio::test]
async fn test_unreachable_generator_mid_loop_uses_fallback_question() {
    let provider = Arc::new(ScriptedProvider::new(vec!["What is a deadlock?".to_string()]));
    let manager = create_manager(provider);
    let started = manager.start_session("Prep", None, None).unwrap();
    manager
        .submit_answer(&started.session_id, "Backend Engineer")
        .await
        .unwrap();

    let outcome = manager
        .submit_answer(
            &started.session_id,
            "Two threads each hold a lock the other one needs",
        )
        .await
        .unwrap();
    assert_eq!(outcome.current_question.as_deref(), Some(FALLBACK_QUESTION));
    let feedback = outcome.feedback.unwrap();
    assert_eq!(feedback.score, 5);

    // The loop keeps going
    let outcome = manager
        .submit_answer(
            &started.session_id,
            "I migrated a monolith to services and kept both running in parallel",
        )
        .await
        .unwrap();
    assert_eq!(outcome.current_question.as_deref(), Some(FALLBACK_QUESTION));
    assert_gap_free(&manager, &started.session_id);

    let summary = manager.end_session(&started.session_id).await.unwrap();
    assert_eq!(summary.answered_count, 2);
    assert!(summary.summary.contains("2 questions"));
}

#[tokio::test]
async fn test_unreachable_generator_for_first_question() {
    let manager = create_manager(Arc::new(ScriptedProvider::unreachable()));
    let started = manager.start_session("Prep", None, None).unwrap();

    let outcome = manager
        .submit_answer(&started.session_id, "Data Engineer")
        .await
        .unwrap();
    assert_eq!(outcome.current_question.as_deref(), Some(FALLBACK_QUESTION));
}

#[tokio::test]
async fn test_sentinel_and_blank_replies_count_as_no_response() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        "   ".to_string(),
        "[Gemini] No response".to_string(),
        "[Gemini] No response".to_string(),
    ]));
    let manager = create_manager(provider);
    let started = manager.start_session("Prep", None, None).unwrap();

    let outcome = manager
        .submit_answer(&started.session_id, "Backend Engineer")
        .await
        .unwrap();
    assert_eq!(outcome.current_question.as_deref(), Some(FALLBACK_QUESTION));

    let outcome = manager
        .submit_answer(&started.session_id, "Mutex.")
        .await
        .unwrap();
    assert_eq!(outcome.feedback.unwrap().score, 3);
    assert_eq!(outcome.current_question.as_deref(), Some(FALLBACK_QUESTION));
}

// ============================================================================
// Termination
// ============================================================================

#[tokio::test]
async fn test_end_is_idempotent() {
    let provider = Arc::new(ScriptedProvider::new(vec!["What is a heap?".to_string()]));
    let manager = create_manager(provider);
    let started = manager.start_session("Prep", None, None).unwrap();
    manager
        .submit_answer(&started.session_id, "Backend Engineer")
        .await
        .unwrap();
    let turns_before = manager
        .get_session(&started.session_id)
        .unwrap()
        .turns
        .len();

    let first = manager.end_session(&started.session_id).await.unwrap();
    let second = manager.end_session(&started.session_id).await.unwrap();

    assert_eq!(first.started_at, second.started_at);
    assert_eq!(first.started_at, started.started_at);
    assert_eq!(first.ended_at, second.ended_at);
    assert!(!first.summary.is_empty());
    assert!(!second.summary.is_empty());
    assert_eq!(
        manager
            .get_session(&started.session_id)
            .unwrap()
            .turns
            .len(),
        turns_before
    );
}

#[tokio::test]
async fn test_end_before_role_is_valid() {
    let manager = create_manager(Arc::new(ScriptedProvider::unreachable()));
    let started = manager.start_session("Prep", None, None).unwrap();

    let summary = manager.end_session(&started.session_id).await.unwrap();
    assert_eq!(summary.overall_score, 0);
    assert_eq!(summary.answered_count, 0);
    assert_eq!(summary.overall_rating, OverallRating::Poor);
    assert_eq!(summary.feedback.len(), 1);
}

#[tokio::test]
async fn test_answer_after_end_fails() {
    let manager = create_manager(Arc::new(ScriptedProvider::unreachable()));
    let started = manager.start_session("Prep", None, None).unwrap();
    manager.end_session(&started.session_id).await.unwrap();

    let result = manager
        .submit_answer(&started.session_id, "Backend Engineer")
        .await;
    assert!(matches!(result, Err(AppError::SessionEnded(_))));
}

#[tokio::test]
async fn test_unknown_session() {
    let manager = create_manager(Arc::new(ScriptedProvider::unreachable()));

    assert!(matches!(
        manager.submit_answer("missing", "hello").await,
        Err(AppError::SessionNotFound(_))
    ));
    assert!(matches!(
        manager.end_session("missing").await,
        Err(AppError::SessionNotFound(_))
    ));
    assert!(matches!(
        manager.get_session("missing"),
        Err(AppError::SessionNotFound(_))
    ));
}

// ============================================================================
// Persistence and concurrency
// ============================================================================

#[tokio::test]
async fn test_session_resumes_with_new_manager() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("interviews.db");

    let session_id = {
        let db = Database::open(&path).unwrap();
        let manager = InterviewManager::new(
            create_store(&db),
            Arc::new(ScriptedProvider::new(vec!["What is a B-tree?".to_string()])),
            test_options(),
        );
        let started = manager.start_session("Prep", Some("user-7"), None).unwrap();
        manager
            .submit_answer(&started.session_id, "Database Engineer")
            .await
            .unwrap();
        started.session_id
    };

    let db = Database::open(&path).unwrap();
    let manager = InterviewManager::new(
        create_store(&db),
        Arc::new(ScriptedProvider::new(vec![
            feedback_json(8, "Balanced tree", "Mention page size"),
            "What is write amplification?".to_string(),
        ])),
        test_options(),
    );

    let outcome = manager
        .submit_answer(&session_id, "A balanced tree whose nodes map to disk pages")
        .await
        .unwrap();
    assert_eq!(outcome.feedback.unwrap().score, 8);
    assert_eq!(
        outcome.current_question.as_deref(),
        Some("What is write amplification?")
    );
    assert_gap_free(&manager, &session_id);

    let sessions = manager.list_sessions(Some("user-7")).unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].role.as_deref(), Some("Database Engineer"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_answers_are_serialized() {
    let provider = Arc::new(ScriptedProvider::new(vec!["What is a race condition?".to_string()]));
    let manager = Arc::new(create_manager(provider));
    let started = manager.start_session("Prep", None, None).unwrap();
    manager
        .submit_answer(&started.session_id, "Backend Engineer")
        .await
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..4 {
        let manager = manager.clone();
        let session_id = started.session_id.clone();
        handles.push(tokio::spawn(async move {
            manager
                .submit_answer(
                    &session_id,
                    &format!("Concurrent answer number {} with detail", i),
                )
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let detail = manager.get_session(&started.session_id).unwrap();
    // greeting, intro, first question, plus one appended turn per answer
    assert_eq!(detail.turns.len(), 7);
    assert_gap_free(&manager, &started.session_id);
    assert!(detail.turns.last().unwrap().is_open());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sessions_progress_independently() {
    let manager = Arc::new(create_manager(Arc::new(ScriptedProvider::unreachable())));
    let a = manager.start_session("A", None, None).unwrap();
    let b = manager.start_session("B", None, None).unwrap();

    let (ra, rb) = tokio::join!(
        manager.submit_answer(&a.session_id, "HR Manager"),
        manager.submit_answer(&b.session_id, "Backend Engineer"),
    );
    ra.unwrap();
    rb.unwrap();

    assert_eq!(
        manager.get_session(&a.session_id).unwrap().session.category,
        Some(InterviewCategory::Hr)
    );
    assert_eq!(
        manager.get_session(&b.session_id).unwrap().session.category,
        Some(InterviewCategory::Technical)
    );
}
