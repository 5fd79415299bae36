//! Mock Interview - Rust Backend Library
//!
//! Turn-based mock interview orchestration. It includes:
//! - Command handlers with input validation
//! - Interview services (session state machine, prompts, answer
//!   classification, feedback normalization, scoring)
//! - Storage layer (SQLite, Config)
//! - Data models and utilities

pub mod commands;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

// Re-export commonly used items from commands
pub use commands::{
    // Health commands
    get_health,
    // Settings commands
    get_settings, update_settings,
    // Interview commands
    end_session, get_session, list_sessions, start_session, submit_answer,
    AnswerRequest, EndSessionRequest, StartSessionRequest,
};
pub use models::interview::*;
pub use models::response::*;
pub use models::settings::{AppConfig, SettingsUpdate};
pub use state::AppState;
pub use utils::error::{AppError, AppResult};
