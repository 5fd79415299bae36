//! Mock Interview Core
//!
//! Foundational error types and the interview category model for the mock
//! interview workspace. This crate has zero dependencies on application-level
//! code (database, LLM providers, etc.).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `category` - Interview category and role-based category inference

pub mod category;
pub mod error;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Interview Category ─────────────────────────────────────────────────
pub use category::{infer_category, InterviewCategory};
