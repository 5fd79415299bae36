//! Settings Models
//!
//! Application configuration and settings data structures.

use serde::{Deserialize, Serialize};

use mock_interview_llm::ProviderConfig;

/// Environment variable that overrides the configured API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Application configuration stored in config.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gemini model used for questions, feedback and summaries
    #[serde(default = "default_model")]
    pub model: String,
    /// Endpoint override for the generator (e.g. a local proxy)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// API key; `GEMINI_API_KEY` takes precedence when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Upper bound for a single generator call, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// End the session when an answer is only a stop keyword
    #[serde(default)]
    pub end_on_stop_keyword: bool,
    /// SQLite file; defaults to ~/.mock-interview/interviews.db
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<String>,
    /// Default tracing filter, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: None,
            api_key: None,
            request_timeout_secs: default_request_timeout_secs(),
            end_on_stop_keyword: false,
            database_path: None,
            log_level: default_log_level(),
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub end_on_stop_keyword: Option<bool>,
    pub database_path: Option<String>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(model) = update.model {
            self.model = model;
        }
        if let Some(base_url) = update.base_url {
            self.base_url = Some(base_url).filter(|u| !u.trim().is_empty());
        }
        if let Some(api_key) = update.api_key {
            self.api_key = Some(api_key).filter(|k| !k.trim().is_empty());
        }
        if let Some(timeout) = update.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
        if let Some(enabled) = update.end_on_stop_keyword {
            self.end_on_stop_keyword = enabled;
        }
        if let Some(path) = update.database_path {
            self.database_path = Some(path).filter(|p| !p.trim().is_empty());
        }
        if let Some(level) = update.log_level {
            self.log_level = level;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }

        if !(1..=600).contains(&self.request_timeout_secs) {
            return Err(format!(
                "request_timeout_secs must be between 1 and 600, got {}",
                self.request_timeout_secs
            ));
        }

        if !["trace", "debug", "info", "warn", "error"].contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level: {}. Must be one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    /// Resolve the API key, preferring the environment over the file
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }

    /// Build the provider configuration injected into the generator
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            api_key: self.resolve_api_key(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            timeout_secs: self.request_timeout_secs,
            ..Default::default()
        }
    }
}
