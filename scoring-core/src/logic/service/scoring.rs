//! Scoring service: request front door over the model registry

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::constants::DEFAULT_TOP_K;
use crate::error::Result;
use crate::logic::features::Transaction;
use crate::logic::policy::ScoreResult;
use super::registry::ModelRegistry;
use super::response::{ModelInfo, PredictionResponse, ServiceStats};

/// Front door for request handlers.
///
/// Holds no scoring state of its own besides request counters; every call
/// goes through the registry, so requests before load fail with `NotReady`.
#[derive(Debug)]
pub struct FraudScoringService {
    registry: Arc<ModelRegistry>,
    default_top_k: usize,
    prediction_count: AtomicU64,
    error_count: AtomicU64,
    latency_sum_us: AtomicU64,
}

impl FraudScoringService {
    pub fn new(registry: Arc<ModelRegistry>, default_top_k: usize) -> Self {
        Self {
            registry,
            default_top_k: default_top_k.max(1),
            prediction_count: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
        }
    }

    pub fn with_registry(registry: Arc<ModelRegistry>) -> Self {
        Self::new(registry, DEFAULT_TOP_K)
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    pub fn default_top_k(&self) -> usize {
        self.default_top_k
    }

    pub fn score(&self, tx: &Transaction) -> Result<ScoreResult> {
        let start = Instant::now();
        let result = self.registry.artifacts().and_then(|a| a.score(tx));
        self.track(start, result.is_ok());
        result
    }

    /// `top_k` defaults to the configured value and is capped at the field count
    pub fn predict(&self, tx: &Transaction, top_k: Option<usize>) -> Result<PredictionResponse> {
        let start = Instant::now();
        let result = self.registry.artifacts().and_then(|a| {
            let k = top_k.unwrap_or(self.default_top_k).min(a.schema().len());
            a.predict(tx, k)
        });
        self.track(start, result.is_ok());
        result
    }

    pub fn model_info(&self) -> Result<ModelInfo> {
        Ok(self.registry.artifacts()?.info())
    }

    pub fn stats(&self) -> ServiceStats {
        let count = self.prediction_count.load(Ordering::Relaxed);
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        ServiceStats {
            prediction_count: count,
            error_count: self.error_count.load(Ordering::Relaxed),
            avg_latency_ms: if count > 0 { (sum as f64 / count as f64) / 1000.0 } else { 0.0 },
        }
    }

    fn track(&self, start: Instant, ok: bool) {
        if ok {
            self.prediction_count.fetch_add(1, Ordering::Relaxed);
            self.latency_sum_us
                .fetch_add(start.elapsed().as_micros() as u64, Ordering::Relaxed);
        } else {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
    }
}
