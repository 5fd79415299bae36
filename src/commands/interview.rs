//! Interview Commands
//!
//! Entry points for the mock interview service. Input is validated here,
//! before it reaches the session manager.

use serde::{Deserialize, Serialize};

use mock_interview_core::InterviewCategory;

use crate::models::interview::{
    AnswerOutcome, InterviewSession, SessionDetail, SessionStarted, SessionSummary,
};
use crate::models::response::CommandResponse;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

/// Request to start a session
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StartSessionRequest {
    pub topic: String,
    #[serde(default)]
    pub user_id: Option<String>,
    /// "technical" or "hr"; anything else leaves the category unset
    #[serde(default)]
    pub category: Option<String>,
}

/// Request to answer the current question
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnswerRequest {
    pub session_id: String,
    pub answer: String,
}

/// Request to end a session
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EndSessionRequest {
    pub session_id: String,
}

fn require(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{} must not be blank", field)));
    }
    Ok(())
}

/// Start a new interview session
pub async fn start_session(
    state: &AppState,
    request: StartSessionRequest,
) -> CommandResponse<SessionStarted> {
    let result = async {
        require(&request.topic, "topic")?;
        let manager = state.interview_manager().await?;
        let category = InterviewCategory::from_hint(request.category.as_deref());
        let user_id = request.user_id.as_deref().filter(|u| !u.trim().is_empty());
        manager.start_session(&request.topic, user_id, category)
    }
    .await;

    result.into()
}

/// Submit an answer to the current question
pub async fn submit_answer(
    state: &AppState,
    request: AnswerRequest,
) -> CommandResponse<AnswerOutcome> {
    let result = async {
        require(&request.session_id, "session_id")?;
        require(&request.answer, "answer")?;
        let manager = state.interview_manager().await?;
        manager
            .submit_answer(request.session_id.trim(), &request.answer)
            .await
    }
    .await;

    result.into()
}

/// End a session and return its summary
pub async fn end_session(
    state: &AppState,
    request: EndSessionRequest,
) -> CommandResponse<SessionSummary> {
    let result = async {
        require(&request.session_id, "session_id")?;
        let manager = state.interview_manager().await?;
        manager.end_session(request.session_id.trim()).await
    }
    .await;

    result.into()
}

/// Get a session with its turns
pub async fn get_session(state: &AppState, session_id: &str) -> CommandResponse<SessionDetail> {
    let result = async {
        require(session_id, "session_id")?;
        let manager = state.interview_manager().await?;
        manager.get_session(session_id.trim())
    }
    .await;

    result.into()
}

/// List sessions, optionally for one user
pub async fn list_sessions(
    state: &AppState,
    user_id: Option<String>,
) -> CommandResponse<Vec<InterviewSession>> {
    let result = async {
        let manager = state.interview_manager().await?;
        manager.list_sessions(user_id.as_deref().filter(|u| !u.trim().is_empty()))
    }
    .await;

    result.into()
}
