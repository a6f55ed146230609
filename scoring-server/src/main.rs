//! Fraud Scoring Server
//!
//! HTTP surface over `fraud_scoring_core`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    FRAUD SCORING SERVER                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌─────────────────┐  ┌──────────────────┐  │
//! │  │  API      │  │  Scoring        │  │  Artifact Loader │  │
//! │  │  (Axum)   │─►│  Service        │◄─│  (blocking task) │  │
//! │  └───────────┘  └────────┬────────┘  └────────┬─────────┘  │
//! │                          ▼                    ▼            │
//! │                   ┌──────────────────────────────┐         │
//! │                   │ Model Registry (Arc, RwLock) │         │
//! │                   └──────────────────────────────┘         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod handlers;
mod error;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fraud_scoring_core::{FraudScoringService, ModelRegistry};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging (JSON lines in production)
    let json_logs = config.is_production();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "fraud_scoring_server=debug,fraud_scoring_core=info,tower_http=debug".into()))
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!("Fraud Scoring Server starting ({})...", config.environment);
    tracing::info!("Artifacts: {}", config.artifact_dir.display());

    // Artifacts load in the background; requests get 503 until then
    let registry = Arc::new(ModelRegistry::new());
    spawn_artifact_loader(Arc::clone(&registry), &config);

    // Build application state
    let state = AppState {
        service: Arc::new(FraudScoringService::new(registry, config.top_k)),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<FraudScoringService>,
    pub config: config::Config,
}

/// Load artifacts on the blocking pool
fn spawn_artifact_loader(
    registry: Arc<ModelRegistry>,
    config: &config::Config,
) -> tokio::task::JoinHandle<()> {
    let dir = config.artifact_dir.clone();
    let model_file = config.model_file.clone();
    let calibration_file = config.calibration_file.clone();

    tokio::task::spawn_blocking(move || {
        match registry.load_from(&dir, &model_file, &calibration_file) {
            Ok(()) => tracing::info!("Artifacts loaded, service ready"),
            Err(e) => tracing::error!("Artifact load failed, service stays unavailable: {}", e),
        }
    })
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let ops_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/ready", get(handlers::health::ready));

    let scoring_routes = Router::new()
        .route("/predict", post(handlers::predict::predict))
        .route("/api/v1/predict", post(handlers::predict::predict))
        .route("/api/v1/score", post(handlers::predict::score))
        .route("/api/v1/model", get(handlers::model::info));

    // Combine all routes
    Router::new()
        .merge(ops_routes)
        .merge(scoring_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
