//! LLM Types
//!
//! Core types for text-generation provider interactions.

use serde::{Deserialize, Serialize};

/// Literal sentinel returned by the generator boundary when no usable text
/// came back (malformed reply, empty candidates, transport failure).
pub const NO_RESPONSE: &str = "[Gemini] No response";

/// Configuration for a text-generation provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL override (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Model name to use
    pub model: String,
    /// Maximum tokens to generate
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Temperature (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_max_output_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: "gemini-2.0-flash".to_string(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Outcome of one generator call as seen by callers.
///
/// Failures are folded into `NoResponse`: the caller decides which local
/// fallback applies, no error ever escapes the generator boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// Non-blank text extracted from the first candidate
    Text(String),
    /// The generator failed, timed out or replied with nothing usable
    NoResponse,
}

impl Generation {
    /// Fold a provider result into a generation.
    ///
    /// Blank text and the literal sentinel are both `NoResponse`.
    pub fn from_result(result: LlmResult<String>) -> Self {
        match result {
            Ok(text) => Self::from_text(text),
            Err(_) => Self::NoResponse,
        }
    }

    /// Wrap raw text, mapping blank text and the sentinel to `NoResponse`.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() || text.trim() == NO_RESPONSE {
            Self::NoResponse
        } else {
            Self::Text(text)
        }
    }
}

/// Error types for LLM operations
#[derive(Debug, Clone)]
pub enum LlmError {
    /// Authentication failed (invalid API key)
    AuthenticationFailed { message: String },
    /// Rate limit exceeded
    RateLimited {
        message: String,
        retry_after: Option<u32>,
    },
    /// Model not found or not available
    ModelNotFound { model: String },
    /// Invalid request (bad parameters)
    InvalidRequest { message: String },
    /// Server error from the provider
    ServerError {
        message: String,
        status: Option<u16>,
    },
    /// Network/connection error
    NetworkError { message: String },
    /// Request exceeded the configured timeout
    Timeout { seconds: u64 },
    /// Response parsing error
    ParseError { message: String },
    /// The reply parsed but carried no text
    EmptyResponse,
    /// Other error
    Other { message: String },
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmError::AuthenticationFailed { message } => {
                write!(f, "Authentication failed: {}", message)
            }
            LlmError::RateLimited { message, .. } => {
                write!(f, "Rate limited: {}", message)
            }
            LlmError::ModelNotFound { model } => {
                write!(f, "Model not found: {}", model)
            }
            LlmError::InvalidRequest { message } => {
                write!(f, "Invalid request: {}", message)
            }
            LlmError::ServerError { message, status } => {
                if let Some(s) = status {
                    write!(f, "Server error ({}): {}", s, message)
                } else {
                    write!(f, "Server error: {}", message)
                }
            }
            LlmError::NetworkError { message } => {
                write!(f, "Network error: {}", message)
            }
            LlmError::Timeout { seconds } => {
                write!(f, "Request timed out after {}s", seconds)
            }
            LlmError::ParseError { message } => {
                write!(f, "Parse error: {}", message)
            }
            LlmError::EmptyResponse => write!(f, "Provider returned no text"),
            LlmError::Other { message } => {
                write!(f, "Error: {}", message)
            }
        }
    }
}

impl std::error::Error for LlmError {}

/// Result type for LLM operations
pub type LlmResult<T> = Result<T, LlmError>;
