//! Logic Module - Scoring Engines
//!
//! ## Structure
//! - `schema/` - Feature schema + frozen column layout
//! - `features/` - Transactions, training statistics, encoder
//! - `model/` - Scorer capability and model families
//! - `calibration/` - PR curve, threshold search, evaluation metrics
//! - `policy/` - Decision threshold + risk tiers
//! - `explain/` - Attribution engine
//! - `artifacts/` - Persisted model/calibration artifacts
//! - `dataset/` - Labeled records (JSONL) and the hold-out split
//! - `service/` - Readiness-guarded serving and the offline pipeline

pub mod schema;
pub mod features;
pub mod model;
pub mod calibration;
pub mod policy;
pub mod explain;
pub mod artifacts;
pub mod dataset;
pub mod service;
