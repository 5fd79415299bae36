//! Mock Interview LLM
//!
//! Provides the narrow prompt-in/text-out interface to the external text
//! generator used by the interview engine:
//! - `LlmProvider` trait and HTTP error mapping
//! - Gemini (`generateContent` REST endpoint)
//! - `Generation` result type folding every failure into `NoResponse`
//!
//! Also includes the HTTP client factory.

pub mod gemini;
pub mod http_client;
pub mod provider;
pub mod types;

// Re-export main types
pub use gemini::GeminiProvider;
pub use http_client::build_http_client;
pub use provider::LlmProvider;
pub use types::*;
