//! Calibration Module - offline threshold search
//!
//! ## Structure
//! - `curve`: precision–recall curve over held-out scores
//! - `calibrator`: threshold search under a minimum-recall constraint
//! - `metrics`: confusion matrix, ROC-AUC, average precision
//!
//! Runs once after training; its result gates every serving decision.

pub mod curve;
pub mod calibrator;
pub mod metrics;


pub use curve::{CutPoint, LabeledScore, PrecisionRecallCurve};
pub use calibrator::{calibrate, calibrate_curve, CalibrationResult};
pub use metrics::{average_precision, evaluate, roc_auc, ConfusionMatrix, EvaluationReport};
