use axum::extract::State;
use serde::Serialize;

use crate::domain::shared::{api_response::timestamp_now, ApiResponse};
use crate::infrastructure::http::{AppState, API_VERSION};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: String,
    /// Seconds since the process started
    pub uptime: f64,
    pub environment: &'static str,
    pub version: &'static str,
}

/// GET /health - Liveness probe
pub async fn health(State(state): State<AppState>) -> ApiResponse<HealthStatus> {
    ApiResponse::success(HealthStatus {
        status: "healthy",
        timestamp: timestamp_now(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        environment: state.config.environment.as_str(),
        version: API_VERSION,
    })
}
