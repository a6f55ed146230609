//! Health and readiness handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use fraud_scoring_core::constants::APP_VERSION;
use fraud_scoring_core::logic::service::RegistryStatus;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    model_loaded: bool,
    version: &'static str,
    environment: String,
    timestamp: i64,
}

/// Liveness; 200 even while artifacts are loading
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model_loaded: state.service.registry().is_ready(),
        version: APP_VERSION,
        environment: state.config.environment.clone(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

/// Readiness; 503 until artifacts are loaded
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<RegistryStatus>) {
    let status = state.service.registry().status();
    let code = if status.model_loaded {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}
