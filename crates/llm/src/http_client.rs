//! HTTP Client Factory
//!
//! Provides a factory function for building reqwest clients with a bounded
//! request timeout.

use std::time::Duration;

use super::types::{LlmError, LlmResult};

/// Build a `reqwest::Client` whose requests fail after `timeout`.
///
/// Proxy environment variables are ignored; the generator endpoint is
/// always reached directly.
pub fn build_http_client(timeout: Duration) -> LlmResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .no_proxy()
        .build()
        .map_err(|e| LlmError::Other {
            message: format!("failed to build HTTP client: {}", e),
        })
}
