//! Command Layer Integration Tests
//!
//! Validation of blank input, error reporting through `CommandResponse`,
//! and a full session driven through the command handlers.

use std::sync::Arc;

use mock_interview::commands::{
    end_session, get_health, get_session, get_settings, list_sessions, start_session,
    submit_answer, update_settings, AnswerRequest, EndSessionRequest, StartSessionRequest,
};
use mock_interview::models::interview::SessionStatus;
use mock_interview::models::settings::SettingsUpdate;
use mock_interview::state::AppState;
use mock_interview::storage::{ConfigService, Database};

use super::support::{feedback_json, ScriptedProvider};

async fn create_state(provider: ScriptedProvider) -> (AppState, tempfile::TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = ConfigService::open(temp_dir.path().join("config.json")).unwrap();
    let db = Database::new_in_memory().unwrap();

    let state = AppState::new();
    state
        .initialize_with(config, db, Arc::new(provider))
        .await
        .unwrap();
    (state, temp_dir)
}

fn start_request(topic: &str) -> StartSessionRequest {
    StartSessionRequest {
        topic: topic.to_string(),
        user_id: None,
        category: None,
    }
}

#[tokio::test]
async fn test_blank_input_is_rejected() {
    let (state, _dir) = create_state(ScriptedProvider::unreachable()).await;

    let response = start_session(&state, start_request("   ")).await;
    assert!(!response.success);
    assert!(response.error.unwrap().contains("topic"));

    let response = submit_answer(
        &state,
        AnswerRequest {
            session_id: String::new(),
            answer: "Backend Engineer".to_string(),
        },
    )
    .await;
    assert!(response.error.unwrap().contains("session_id"));

    let started = start_session(&state, start_request("Prep"))
        .await
        .data
        .unwrap();
    let response = submit_answer(
        &state,
        AnswerRequest {
            session_id: started.session_id.clone(),
            answer: " \n ".to_string(),
        },
    )
    .await;
    assert!(response.error.unwrap().contains("answer"));

    let response = end_session(
        &state,
        EndSessionRequest {
            session_id: "  ".to_string(),
        },
    )
    .await;
    assert!(!response.success);

    // Nothing reached the session
    let detail = get_session(&state, &started.session_id).await.data.unwrap();
    assert_eq!(detail.status, SessionStatus::AwaitingRole);
    assert!(detail.turns[0].is_open());
}

#[tokio::test]
async fn test_unknown_session_is_reported() {
    let (state, _dir) = create_state(ScriptedProvider::unreachable()).await;

    let response = submit_answer(
        &state,
        AnswerRequest {
            session_id: "does-not-exist".to_string(),
            answer: "hello".to_string(),
        },
    )
    .await;
    assert!(!response.success);
    assert!(response.error.unwrap().contains("Session not found"));
}

#[tokio::test]
async fn test_session_through_commands() {
    let provider = ScriptedProvider::new(vec![
        "Describe a time you handled a difficult stakeholder.".to_string(),
        feedback_json(6, "Used STAR structure", "Quantify the result"),
        "How do you give critical feedback to a peer?".to_string(),
    ]);
    let (state, _dir) = create_state(provider).await;

    let started = start_session(
        &state,
        StartSessionRequest {
            topic: "Leadership prep".to_string(),
            user_id: Some("user-42".to_string()),
            category: Some("hr".to_string()),
        },
    )
    .await
    .into_result()
    .unwrap();
    assert!(started.current_question.contains("HR interviewer"));

    let outcome = submit_answer(
        &state,
        AnswerRequest {
            session_id: started.session_id.clone(),
            answer: "Engineering Lead".to_string(),
        },
    )
    .await
    .into_result()
    .unwrap();
    assert_eq!(
        outcome.current_question.as_deref(),
        Some("Describe a time you handled a difficult stakeholder.")
    );

    let outcome = submit_answer(
        &state,
        AnswerRequest {
            session_id: started.session_id.clone(),
            answer: "A client kept changing scope, so I set up weekly reviews and a change log."
                .to_string(),
        },
    )
    .await
    .into_result()
    .unwrap();
    assert_eq!(outcome.feedback.unwrap().score, 6);

    let summary = end_session(
        &state,
        EndSessionRequest {
            session_id: started.session_id.clone(),
        },
    )
    .await
    .into_result()
    .unwrap();
    assert_eq!(summary.overall_score, 6);
    assert_eq!(summary.improvements, vec!["Quantify the result"]);

    let sessions = list_sessions(&state, Some("user-42".to_string()))
        .await
        .into_result()
        .unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].id, started.session_id);

    let others = list_sessions(&state, Some("someone-else".to_string()))
        .await
        .into_result()
        .unwrap();
    assert!(others.is_empty());
}

#[tokio::test]
async fn test_health_and_settings() {
    let (state, _dir) = create_state(ScriptedProvider::unreachable()).await;

    let health = get_health(&state).await.data.unwrap();
    assert!(health.database);
    assert!(health.config);
    assert!(health.generator_reachable);
    assert_eq!(health.status, "healthy");

    let settings = get_settings(&state).await.data.unwrap();
    assert_eq!(settings.request_timeout_secs, 30);

    let response = update_settings(
        &state,
        SettingsUpdate {
            request_timeout_secs: Some(0),
            ..Default::default()
        },
    )
    .await;
    assert!(!response.success);

    let updated = update_settings(
        &state,
        SettingsUpdate {
            end_on_stop_keyword: Some(true),
            ..Default::default()
        },
    )
    .await
    .into_result()
    .unwrap();
    assert!(updated.end_on_stop_keyword);
}
