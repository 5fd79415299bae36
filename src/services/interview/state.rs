//! Session Persistence
//!
//! Stores sessions and their turns in SQLite. Every state transition is
//! committed in a single transaction so a turn is never left half-updated.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension, Row, Transaction};

use mock_interview_core::InterviewCategory;

use crate::models::interview::{InterviewSession, InterviewTurn};
use crate::storage::database::DbPool;
use crate::utils::error::{AppError, AppResult};

const SESSION_COLUMNS: &str =
    "id, topic, user_id, role, category, role_chosen, started_at, ended_at";

const TURN_COLUMNS: &str =
    "session_id, order_index, question, answer, feedback, score, strengths, improvements";

fn conversion_error(
    index: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err))
}

fn timestamp_at(row: &Row<'_>, index: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(index)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(index, e))
}

fn list_at(row: &Row<'_>, index: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(index)?;
    serde_json::from_str(&raw).map_err(|e| conversion_error(index, e))
}

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<InterviewSession> {
    let category = row
        .get::<_, Option<String>>(4)?
        .map(|raw| raw.parse::<InterviewCategory>())
        .transpose()
        .map_err(|e| conversion_error(4, e))?;
    let ended_at = match row.get::<_, Option<String>>(7)? {
        Some(_) => Some(timestamp_at(row, 7)?),
        None => None,
    };

    Ok(InterviewSession {
        id: row.get(0)?,
        topic: row.get(1)?,
        user_id: row.get(2)?,
        role: row.get(3)?,
        category,
        role_chosen: row.get::<_, i32>(5)? != 0,
        started_at: timestamp_at(row, 6)?,
        ended_at,
    })
}

fn turn_from_row(row: &Row<'_>) -> rusqlite::Result<InterviewTurn> {
    Ok(InterviewTurn {
        session_id: row.get(0)?,
        order_index: row.get(1)?,
        question: row.get(2)?,
        answer: row.get(3)?,
        feedback: row.get(4)?,
        score: row.get(5)?,
        strengths: list_at(row, 6)?,
        improvements: list_at(row, 7)?,
    })
}

fn insert_turn(tx: &Transaction<'_>, turn: &InterviewTurn) -> AppResult<()> {
    tx.execute(
        &format!(
            "INSERT INTO interview_turns ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            TURN_COLUMNS
        ),
        params![
            turn.session_id,
            turn.order_index,
            turn.question,
            turn.answer,
            turn.feedback,
            turn.score,
            serde_json::to_string(&turn.strengths)?,
            serde_json::to_string(&turn.improvements)?,
        ],
    )?;
    Ok(())
}

/// SQLite-backed store for interview sessions
#[derive(Clone)]
pub struct SessionStore {
    pool: DbPool,
}

impl SessionStore {
    /// Create a new store over the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn connection(&self) -> AppResult<PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| AppError::database(format!("Failed to get connection: {}", e)))
    }

    /// Create the session and turn tables
    pub fn init_schema(&self) -> AppResult<()> {
        let conn = self.connection()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS interview_sessions (
                id TEXT PRIMARY KEY,
                topic TEXT NOT NULL,
                user_id TEXT,
                role TEXT,
                category TEXT,
                role_chosen INTEGER NOT NULL DEFAULT 0,
                started_at TEXT NOT NULL,
                ended_at TEXT
            );

            CREATE TABLE IF NOT EXISTS interview_turns (
                session_id TEXT NOT NULL,
                order_index INTEGER NOT NULL,
                question TEXT NOT NULL,
                answer TEXT,
                feedback TEXT,
                score INTEGER NOT NULL DEFAULT 0,
                strengths TEXT NOT NULL DEFAULT '[]',
                improvements TEXT NOT NULL DEFAULT '[]',
                UNIQUE (session_id, order_index),
                FOREIGN KEY (session_id) REFERENCES interview_sessions(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_interview_sessions_user_id
                ON interview_sessions(user_id);",
        )?;

        Ok(())
    }

    /// Insert a new session together with its greeting turn
    pub fn create_session(
        &self,
        session: &InterviewSession,
        first_turn: &InterviewTurn,
    ) -> AppResult<()> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;

        tx.execute(
            &format!(
                "INSERT INTO interview_sessions ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                SESSION_COLUMNS
            ),
            params![
                session.id,
                session.topic,
                session.user_id,
                session.role,
                session.category.map(|c| c.as_str()),
                session.role_chosen as i32,
                session.started_at.to_rfc3339(),
                session.ended_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        insert_turn(&tx, first_turn)?;

        tx.commit()?;
        Ok(())
    }

    /// Get a session by ID
    pub fn get_session(&self, id: &str) -> AppResult<Option<InterviewSession>> {
        let conn = self.connection()?;

        let session = conn
            .query_row(
                &format!(
                    "SELECT {} FROM interview_sessions WHERE id = ?1",
                    SESSION_COLUMNS
                ),
                params![id],
                session_from_row,
            )
            .optional()?;

        Ok(session)
    }

    /// Get all turns of a session, ordered by index
    pub fn get_turns(&self, session_id: &str) -> AppResult<Vec<InterviewTurn>> {
        let conn = self.connection()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM interview_turns WHERE session_id = ?1 ORDER BY order_index ASC",
            TURN_COLUMNS
        ))?;
        let turns = stmt
            .query_map(params![session_id], turn_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(turns)
    }

    /// Persist one state transition atomically.
    ///
    /// Updates the session row, records the answer on `answered` (which must
    /// still be open in storage) and appends `appended`.
    pub fn commit_turns(
        &self,
        session: &InterviewSession,
        answered: &InterviewTurn,
        appended: &[InterviewTurn],
    ) -> AppResult<()> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;

        tx.execute(
            "UPDATE interview_sessions SET role = ?2, category = ?3, role_chosen = ?4
             WHERE id = ?1",
            params![
                session.id,
                session.role,
                session.category.map(|c| c.as_str()),
                session.role_chosen as i32,
            ],
        )?;

        let updated = tx.execute(
            "UPDATE interview_turns
             SET answer = ?3, feedback = ?4, score = ?5, strengths = ?6, improvements = ?7
             WHERE session_id = ?1 AND order_index = ?2 AND answer IS NULL",
            params![
                answered.session_id,
                answered.order_index,
                answered.answer,
                answered.feedback,
                answered.score,
                serde_json::to_string(&answered.strengths)?,
                serde_json::to_string(&answered.improvements)?,
            ],
        )?;
        if updated != 1 {
            return Err(AppError::integrity(format!(
                "turn {} of session {} is not open",
                answered.order_index, answered.session_id
            )));
        }

        for turn in appended {
            insert_turn(&tx, turn)?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Set the termination timestamp unless one is already stored.
    ///
    /// Returns the stored timestamp.
    pub fn mark_ended(&self, id: &str, ended_at: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;

        tx.execute(
            "UPDATE interview_sessions SET ended_at = ?2 WHERE id = ?1 AND ended_at IS NULL",
            params![id, ended_at.to_rfc3339()],
        )?;
        let session = tx
            .query_row(
                &format!(
                    "SELECT {} FROM interview_sessions WHERE id = ?1",
                    SESSION_COLUMNS
                ),
                params![id],
                session_from_row,
            )
            .optional()?
            .ok_or_else(|| AppError::session_not_found(id))?;

        tx.commit()?;
        session
            .ended_at
            .ok_or_else(|| AppError::integrity(format!("session {} has no end time", id)))
    }

    /// List sessions, newest first, optionally for one user
    pub fn list_sessions(&self, user_id: Option<&str>) -> AppResult<Vec<InterviewSession>> {
        let conn = self.connection()?;

        let sessions = match user_id {
            Some(user_id) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM interview_sessions WHERE user_id = ?1 ORDER BY started_at DESC",
                    SESSION_COLUMNS
                ))?;
                let rows = stmt.query_map(params![user_id], session_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM interview_sessions ORDER BY started_at DESC",
                    SESSION_COLUMNS
                ))?;
                let rows = stmt.query_map([], session_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(sessions)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish()
    }
}
