//! Scoring handlers

use axum::{extract::State, Json};
use serde::Deserialize;

use fraud_scoring_core::{PredictionResponse, ScoreResponse, Transaction};

use crate::error::{AppJson, AppQuery};
use crate::{AppResult, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct PredictParams {
    pub top_k: Option<usize>,
}

/// Decision only
pub async fn score(
    State(state): State<AppState>,
    AppJson(tx): AppJson<Transaction>,
) -> AppResult<Json<ScoreResponse>> {
    let decision = state.service.score(&tx)?;
    Ok(Json(ScoreResponse::from(&decision)))
}

/// Decision plus ranked reasons
pub async fn predict(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PredictParams>,
    AppJson(tx): AppJson<Transaction>,
) -> AppResult<Json<PredictionResponse>> {
    let response = state.service.predict(&tx, params.top_k)?;
    tracing::debug!(
        probability = response.fraud_probability,
        is_fraud = response.is_fraud,
        "Prediction served"
    );
    Ok(Json(response))
}
