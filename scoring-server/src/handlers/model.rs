//! Model metadata handler

use axum::{extract::State, Json};
use serde::Serialize;

use fraud_scoring_core::logic::service::ServiceStats;
use fraud_scoring_core::ModelInfo;

use crate::{AppResult, AppState};

#[derive(Serialize)]
pub struct ModelResponse {
    #[serde(flatten)]
    info: ModelInfo,
    stats: ServiceStats,
}

pub async fn info(State(state): State<AppState>) -> AppResult<Json<ModelResponse>> {
    let info = state.service.model_info()?;
    Ok(Json(ModelResponse {
        info,
        stats: state.service.stats(),
    }))
}
