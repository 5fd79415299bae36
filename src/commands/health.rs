//! Health Check Commands
//!
//! Commands for checking the health status of backend services.

use crate::models::response::{CommandResponse, HealthResponse};
use crate::state::AppState;

/// Get the health status of all backend services
pub async fn get_health(state: &AppState) -> CommandResponse<HealthResponse> {
    let mut health = HealthResponse::default();

    health.database = state.is_database_healthy();
    health.config = state.is_config_healthy();
    health.generator_configured = state.is_generator_configured().await;
    health.generator_reachable = match state.interview_manager().await {
        Ok(manager) => manager.check_generator().await,
        Err(_) => false,
    };

    // A missing credential degrades to fallback questions, not an outage
    health.status = if health.database && health.config {
        "healthy".to_string()
    } else {
        "degraded".to_string()
    };

    CommandResponse::ok(health)
}
