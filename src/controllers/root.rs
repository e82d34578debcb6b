use serde::Serialize;

use crate::domain::shared::ApiResponse;
use crate::infrastructure::http::API_VERSION;

#[derive(Debug, Serialize)]
pub struct ServiceIndex {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub health: &'static str,
    /// Advertised only; nothing is mounted under it yet
    pub api: &'static str,
}

/// GET / - Service index
pub async fn index() -> ApiResponse<ServiceIndex> {
    ApiResponse::success(ServiceIndex {
        message: "Log Monitoring System API",
        version: API_VERSION,
        endpoints: Endpoints {
            health: "/health",
            api: "/api",
        },
    })
}
