//! Error handling

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{FromRequest, FromRequestParts},
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use fraud_scoring_core::FraudError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("validation failed: {0}")]
    ValidationError(String),

    // Service state
    #[error("not ready: {0}")]
    NotReady(String),
    #[error("unsupported: {0}")]
    Unsupported(String),

    // Generic errors
    #[error("internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::ValidationError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.as_str()),
            AppError::NotReady(msg) => {
                tracing::warn!("Rejected request, service not ready: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "Model artifacts are not loaded")
            }
            AppError::Unsupported(msg) => (StatusCode::NOT_IMPLEMENTED, msg.as_str()),
            AppError::InternalError(_) => {
                tracing::error!("{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<FraudError> for AppError {
    fn from(err: FraudError) -> Self {
        match err {
            FraudError::Schema(e) => AppError::ValidationError(e.to_string()),
            FraudError::NotReady(msg) => AppError::NotReady(msg),
            FraudError::UnsupportedModel(model) => AppError::Unsupported(format!(
                "Model `{}` does not support explanations",
                model
            )),
            other => AppError::InternalError(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// `Json` whose rejection renders as `AppError`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Query` whose rejection renders as `AppError`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
