//! In-process router tests

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use fraud_scoring_core::logic::artifacts::model_digest;
use fraud_scoring_core::logic::features::NumericStats;
use fraud_scoring_core::{
    CalibrationArtifact, CalibrationResult, ColumnLayout, FeatureSchema, FeatureStats, FieldSpec,
    FraudError, FraudScoringService, LogisticModel, ModelArtifact, ModelFile, ModelRegistry,
    ServingArtifacts,
};

use crate::config::Config;
use crate::{create_router, AppError, AppState};

fn schema() -> FeatureSchema {
    FeatureSchema::new(vec![
        FieldSpec::numeric("amount").with_min(0.0),
        FieldSpec::categorical("merchant_category", ["electronics", "grocery", "travel"]),
        FieldSpec::numeric("ip_risk_score").with_range(0.0, 1.0),
    ])
    .unwrap()
}

fn artifacts() -> ServingArtifacts {
    let stats = FeatureStats {
        numeric: vec![
            NumericStats { name: "amount".into(), mean: 1000.0, std: 2000.0 },
            NumericStats { name: "ip_risk_score".into(), mean: 0.5, std: 0.25 },
        ],
    };
    // amount, ip_risk_score, merchant x3
    let model = ModelArtifact::Logistic(LogisticModel {
        weights: vec![0.3, 1.5, 0.4, -0.6, 0.1],
        bias: -1.0,
        reference: Vec::new(),
    });
    let file = ModelFile::new("lr-http", &ColumnLayout::from_schema(&schema()), model);
    let sha = model_digest(&file).unwrap();

    let calibration = CalibrationArtifact::new(
        CalibrationResult {
            threshold: 0.42,
            target_recall: 0.95,
            achieved_precision: 0.35,
            achieved_recall: 0.95,
            recall_monotone: true,
            used_fallback: false,
            cut_points: 80,
        },
        schema(),
        stats,
        sha.clone(),
    );
    ServingArtifacts::from_parts(file, &sha, calibration).unwrap()
}

fn app(registry: ModelRegistry) -> Router {
    let config = Config::default();
    create_router(AppState {
        service: Arc::new(FraudScoringService::new(Arc::new(registry), config.top_k)),
        config,
    })
}

fn ready_app() -> Router {
    app(ModelRegistry::ready(artifacts()))
}

fn transaction() -> Value {
    json!({
        "amount": 9000.0,
        "merchant_category": "electronics",
        "ip_risk_score": 0.95,
        "extra_field": "ignored"
    })
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health_while_loading() {
    let (status, body) = send(app(ModelRegistry::new()), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], false);
    assert_eq!(body["version"], fraud_scoring_core::constants::APP_VERSION);
}

#[tokio::test]
async fn test_ready_reflects_registry() {
    let (status, body) = send(app(ModelRegistry::new()), get("/ready")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["state"], "loading");

    let (status, body) = send(ready_app(), get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_loaded"], true);
}

#[tokio::test]
async fn test_predict_before_load_is_503() {
    let (status, body) = send(app(ModelRegistry::new()), post_json("/predict", &transaction())).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], 503);
}

#[tokio::test]
async fn test_predict_after_failed_load_is_503() {
    let registry = ModelRegistry::new();
    registry.fail("model file missing");

    let (status, _) = send(app(registry), post_json("/api/v1/predict", &transaction())).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_predict_returns_reasons() {
    let (status, body) = send(ready_app(), post_json("/predict", &transaction())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_fraud"], true);
    assert_eq!(body["threshold_used"], 0.42);
    assert_eq!(body["risk_level"], "High");

    let reasons = body["reasons"].as_array().unwrap();
    assert_eq!(reasons.len(), 3);
    assert_eq!(reasons[0]["direction"], "increase_risk");
}

#[tokio::test]
async fn test_predict_top_k_query() {
    let (status, body) = send(ready_app(), post_json("/api/v1/predict?top_k=1", &transaction())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reasons"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_zero_top_k_returns_empty_reasons() {
    let (status, body) = send(ready_app(), post_json("/predict?top_k=0", &transaction())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_fraud"], true);
    assert!(body["reasons"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_bad_top_k_is_400() {
    let (status, _) = send(ready_app(), post_json("/predict?top_k=many", &transaction())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_score_has_no_reasons() {
    let (status, body) = send(ready_app(), post_json("/api/v1/score", &transaction())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "fraud");
    assert!(body.get("reasons").is_none());
}

#[tokio::test]
async fn test_missing_field_is_422() {
    let mut tx = transaction();
    tx.as_object_mut().unwrap().remove("ip_risk_score");

    let (status, body) = send(ready_app(), post_json("/predict", &tx)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("ip_risk_score"));
}

#[tokio::test]
async fn test_wrong_type_is_422() {
    let mut tx = transaction();
    tx["amount"] = json!("a lot");

    let (status, _) = send(ready_app(), post_json("/predict", &tx)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from("{\"amount\": "))
        .unwrap();

    let (status, body) = send(ready_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_model_metadata() {
    let (status, body) = send(ready_app(), get("/api/v1/model")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["threshold"], 0.42);
    assert_eq!(body["model_family"], "logistic");
    assert_eq!(body["numerical_cols"], json!(["amount", "ip_risk_score"]));
    assert_eq!(body["categorical_cols"], json!(["merchant_category"]));
    assert!(body["stats"]["prediction_count"].is_u64());
}

#[test]
fn test_app_error_display() {
    assert_eq!(
        AppError::NotReady("model loading".into()).to_string(),
        "not ready: model loading"
    );
    let err: AppError = FraudError::InvalidProbability(1.5).into();
    assert!(matches!(err, AppError::InternalError(_)));
    assert!(err.to_string().starts_with("internal error: "));
}
