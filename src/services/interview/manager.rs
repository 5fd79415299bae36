//! Interview Session Manager
//!
//! Drives one session through role selection, the question/answer/feedback
//! loop and termination. Operations on the same session are serialized with
//! a per-session lock; every generator failure degrades to a local fallback.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use mock_interview_core::{infer_category, InterviewCategory};
use mock_interview_llm::{Generation, LlmError, LlmProvider};

use super::classifier::is_stop_request;
use super::feedback::normalize_feedback;
use super::prompts::{
    build_feedback_prompt, build_question_prompt, build_summary_prompt, clean_question, greeting,
    introduction, Exchange, GradedExchange, FALLBACK_QUESTION,
};
use super::scoring::{aggregate, ScoreSummary};
use super::state::SessionStore;
use crate::models::interview::{
    AnswerOutcome, InterviewSession, InterviewTurn, SessionDetail, SessionStarted, SessionStatus,
    SessionSummary,
};
use crate::models::settings::AppConfig;
use crate::utils::error::{AppError, AppResult};

/// Runtime options for the session manager
#[derive(Debug, Clone)]
pub struct InterviewOptions {
    /// Upper bound for a single generator call
    pub generator_timeout: Duration,
    /// End the session when an answer is only a stop keyword
    pub end_on_stop_keyword: bool,
}

impl Default for InterviewOptions {
    fn default() -> Self {
        Self {
            generator_timeout: Duration::from_secs(30),
            end_on_stop_keyword: false,
        }
    }
}

impl InterviewOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            generator_timeout: Duration::from_secs(config.request_timeout_secs),
            end_on_stop_keyword: config.end_on_stop_keyword,
        }
    }
}

/// Interview session manager
pub struct InterviewManager {
    store: SessionStore,
    provider: Arc<dyn LlmProvider>,
    options: InterviewOptions,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl InterviewManager {
    /// Create a new manager
    pub fn new(
        store: SessionStore,
        provider: Arc<dyn LlmProvider>,
        options: InterviewOptions,
    ) -> Self {
        Self {
            store,
            provider,
            options,
            locks: DashMap::new(),
        }
    }

    /// Start a new session.
    ///
    /// Turn 0 is a fixed greeting asking which role to prepare for; the
    /// generator is not called.
    pub fn start_session(
        &self,
        topic: &str,
        user_id: Option<&str>,
        category: Option<InterviewCategory>,
    ) -> AppResult<SessionStarted> {
        let session = InterviewSession {
            id: Uuid::new_v4().to_string(),
            topic: topic.trim().to_string(),
            user_id: user_id.map(|u| u.to_string()),
            role: None,
            category,
            role_chosen: false,
            started_at: Utc::now(),
            ended_at: None,
        };
        let first_turn = InterviewTurn::new(&session.id, 0, greeting(category));

        self.store.create_session(&session, &first_turn)?;

        info!(
            session_id = %session.id,
            category = category.map(|c| c.as_str()).unwrap_or("unset"),
            "Interview session started"
        );

        Ok(SessionStarted {
            session_id: session.id,
            topic: session.topic,
            started_at: session.started_at,
            current_question: first_turn.question,
        })
    }

    /// Submit the answer to the current question
    pub async fn submit_answer(&self, session_id: &str, answer: &str) -> AppResult<AnswerOutcome> {
        self.ensure_exists(session_id)?;
        let lock = self.session_lock(session_id);
        let result = {
            let _guard = lock.lock().await;
            self.apply_answer(session_id, answer).await
        };
        self.release_lock(session_id, lock);
        result
    }

    /// End a session and summarize it. Repeated calls keep the first end
    /// time and summarize again.
    pub async fn end_session(&self, session_id: &str) -> AppResult<SessionSummary> {
        self.ensure_exists(session_id)?;
        let lock = self.session_lock(session_id);
        let result = {
            let _guard = lock.lock().await;
            self.end_loaded(session_id).await
        };
        self.release_lock(session_id, lock);
        result
    }

    /// Get a session with its full turn history
    pub fn get_session(&self, session_id: &str) -> AppResult<SessionDetail> {
        let (session, turns) = self.load(session_id)?;
        Ok(SessionDetail {
            status: session.status(),
            session,
            turns,
        })
    }

    /// List sessions, newest first
    pub fn list_sessions(&self, user_id: Option<&str>) -> AppResult<Vec<InterviewSession>> {
        self.store.list_sessions(user_id)
    }

    /// Whether the generator passes its health check within the timeout
    pub async fn check_generator(&self) -> bool {
        let timeout = self.options.generator_timeout;
        match tokio::time::timeout(timeout, self.provider.health_check()).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                debug!(
                    provider = self.provider.name(),
                    error = %e,
                    "Generator health check failed"
                );
                false
            }
            Err(_) => false,
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    async fn end_loaded(&self, session_id: &str) -> AppResult<SessionSummary> {
        let (session, turns) = self.load(session_id)?;
        self.finish(&session, &turns).await
    }

    async fn apply_answer(&self, session_id: &str, answer: &str) -> AppResult<AnswerOutcome> {
        let (mut session, turns) = self.load(session_id)?;
        let status = session.status();
        debug!(session_id = %session_id, status = status.as_str(), "Answer received");

        let current = match status {
            SessionStatus::Ended => return Err(AppError::SessionEnded(session_id.to_string())),
            _ => open_turn(session_id, &turns)?,
        };

        match status {
            SessionStatus::AwaitingRole => self.declare_role(&mut session, current, answer).await,
            _ if self.options.end_on_stop_keyword && is_stop_request(answer) => {
                info!(session_id = %session_id, "Stop keyword received, ending session");
                let summary = self.finish(&session, &turns).await?;
                Ok(AnswerOutcome {
                    session_id: session.id,
                    current_question: None,
                    feedback: None,
                    summary: Some(summary),
                })
            }
            _ => self.grade_answer(&session, &turns, current, answer).await,
        }
    }

    /// Consume the first answer as the role declaration
    async fn declare_role(
        &self,
        session: &mut InterviewSession,
        mut current: InterviewTurn,
        answer: &str,
    ) -> AppResult<AnswerOutcome> {
        let category = session.category.unwrap_or_else(|| infer_category(answer));
        session.role = Some(answer.to_string());
        session.category = Some(category);
        session.role_chosen = true;
        current.answer = Some(answer.to_string());

        // The introduction expects no answer; an empty one keeps it closed.
        let intro_index = current.order_index + 1;
        let mut intro = InterviewTurn::new(&session.id, intro_index, introduction(category));
        intro.answer = Some(String::new());

        let prompt = build_question_prompt(answer, category, &[]);
        let question = self.next_question(&prompt).await;
        let first_question = InterviewTurn::new(&session.id, intro.order_index + 1, question);

        self.store
            .commit_turns(session, &current, &[intro, first_question.clone()])?;

        info!(
            session_id = %session.id,
            category = category.as_str(),
            order_index = first_question.order_index,
            "Role declared, interview in progress"
        );

        Ok(AnswerOutcome {
            session_id: session.id.clone(),
            current_question: Some(first_question.question),
            feedback: None,
            summary: None,
        })
    }

    /// Grade the answer to the current question and issue the next one
    async fn grade_answer(
        &self,
        session: &InterviewSession,
        turns: &[InterviewTurn],
        mut current: InterviewTurn,
        answer: &str,
    ) -> AppResult<AnswerOutcome> {
        let category = session.category.unwrap_or_else(|| {
            infer_category(session.role.as_deref().unwrap_or(&session.topic))
        });
        let role = session.role.as_deref().unwrap_or(&session.topic);

        let feedback_prompt = build_feedback_prompt(&current.question, answer, category);
        let generation = self.generate(&feedback_prompt).await;
        let record = normalize_feedback(&generation, answer);
        current.apply_feedback(answer, &record);

        debug!(
            session_id = %session.id,
            order_index = current.order_index,
            score = record.score,
            "Answer graded"
        );

        let history: Vec<Exchange<'_>> = turns
            .iter()
            .map(|turn| {
                let turn = if turn.order_index == current.order_index {
                    &current
                } else {
                    turn
                };
                Exchange {
                    question: &turn.question,
                    answer: turn.answer.as_deref().unwrap_or(""),
                }
            })
            .collect();
        let prompt = build_question_prompt(role, category, &history);
        let question = self.next_question(&prompt).await;
        let next = InterviewTurn::new(&session.id, current.order_index + 1, question);

        self.store
            .commit_turns(session, &current, std::slice::from_ref(&next))?;

        info!(
            session_id = %session.id,
            order_index = next.order_index,
            score = record.score,
            "Next question issued"
        );

        Ok(AnswerOutcome {
            session_id: session.id.clone(),
            current_question: Some(next.question),
            feedback: Some(record),
            summary: None,
        })
    }

    /// Mark the session ended and build its summary
    async fn finish(
        &self,
        session: &InterviewSession,
        turns: &[InterviewTurn],
    ) -> AppResult<SessionSummary> {
        let ended_at = self.store.mark_ended(&session.id, Utc::now())?;
        let score = aggregate(turns);

        let exchanges: Vec<GradedExchange<'_>> = turns
            .iter()
            .map(|turn| GradedExchange {
                question: &turn.question,
                answer: turn.answer.as_deref().unwrap_or(""),
                feedback: turn.feedback.as_deref().unwrap_or(""),
            })
            .collect();
        let prompt = build_summary_prompt(&session.topic, session.category, &exchanges);
        let summary = match self.generate(&prompt).await {
            Generation::Text(text) => text.trim().to_string(),
            Generation::NoResponse => {
                debug!(session_id = %session.id, "Summary unavailable, using local summary");
                local_summary(&score)
            }
        };

        info!(
            session_id = %session.id,
            overall_score = score.overall_score,
            answered = score.counted,
            "Interview session ended"
        );

        Ok(SessionSummary {
            session_id: session.id.clone(),
            started_at: session.started_at,
            ended_at,
            summary,
            overall_score: score.overall_score,
            overall_rating: score.rating(),
            answered_count: score.counted,
            strengths: score.strengths,
            improvements: score.improvements,
            feedback: turns.iter().map(InterviewTurn::turn_feedback).collect(),
        })
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn ensure_exists(&self, session_id: &str) -> AppResult<()> {
        match self.store.get_session(session_id)? {
            Some(_) => Ok(()),
            None => Err(AppError::session_not_found(session_id)),
        }
    }

    fn session_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(session_id.to_string())
            .or_default()
            .clone()
    }

    /// Drop the map entry once no other caller holds or waits on the lock
    fn release_lock(&self, session_id: &str, lock: Arc<Mutex<()>>) {
        self.locks.remove_if(session_id, |_, entry| {
            Arc::ptr_eq(entry, &lock) && Arc::strong_count(entry) == 2
        });
    }

    fn load(&self, session_id: &str) -> AppResult<(InterviewSession, Vec<InterviewTurn>)> {
        let session = self
            .store
            .get_session(session_id)?
            .ok_or_else(|| AppError::session_not_found(session_id))?;
        let turns = self.store.get_turns(session_id)?;
        Ok((session, turns))
    }

    /// Call the generator, bounded by the configured timeout
    async fn generate(&self, prompt: &str) -> Generation {
        let timeout = self.options.generator_timeout;
        let result = match tokio::time::timeout(timeout, self.provider.send_prompt(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout {
                seconds: timeout.as_secs(),
            }),
        };
        if let Err(e) = &result {
            warn!(provider = self.provider.name(), error = %e, "Generator call failed");
        }
        Generation::from_result(result)
    }

    /// Ask the generator for a question, falling back to the fixed one
    async fn next_question(&self, prompt: &str) -> String {
        let question = match self.generate(prompt).await {
            Generation::Text(text) => clean_question(&text),
            Generation::NoResponse => None,
        };
        question.unwrap_or_else(|| {
            debug!("Question generation unavailable, using fallback question");
            FALLBACK_QUESTION.to_string()
        })
    }
}

impl std::fmt::Debug for InterviewManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterviewManager")
            .field("provider", &self.provider.name())
            .field("options", &self.options)
            .finish()
    }
}

/// Validate turn ordering and return the open current turn.
///
/// Indices must run 0, 1, 2, ... and only the last turn may be open.
fn open_turn(session_id: &str, turns: &[InterviewTurn]) -> AppResult<InterviewTurn> {
    let current = turns
        .last()
        .ok_or_else(|| AppError::NoCurrentTurn(session_id.to_string()))?;

    for (expected, turn) in turns.iter().enumerate() {
        if turn.order_index as usize != expected {
            return Err(AppError::integrity(format!(
                "session {} has turn index {} at position {}",
                session_id, turn.order_index, expected
            )));
        }
    }
    if !current.is_open() {
        return Err(AppError::integrity(format!(
            "session {} has no open turn",
            session_id
        )));
    }
    if let Some(stale) = turns[..turns.len() - 1].iter().find(|t| t.is_open()) {
        return Err(AppError::integrity(format!(
            "session {} has an unanswered turn {} before the current one",
            session_id, stale.order_index
        )));
    }

    Ok(current.clone())
}

fn local_summary(score: &ScoreSummary) -> String {
    if score.counted == 0 {
        return "The interview ended before any answers were evaluated. \
                Answer a few questions in a new session to get a performance summary."
            .to_string();
    }

    let mut summary = format!(
        "You answered {} question{} with an overall score of {}/10 ({}).",
        score.counted,
        if score.counted == 1 { "" } else { "s" },
        score.overall_score,
        score.rating().label(),
    );
    if let Some(strength) = score.strengths.first() {
        summary.push_str(&format!(" Strongest point: {}.", strength.trim_end_matches('.')));
    }
    if let Some(improvement) = score.improvements.first() {
        summary.push_str(&format!(" Focus next on: {}.", improvement.trim_end_matches('.')));
    }
    summary
}
