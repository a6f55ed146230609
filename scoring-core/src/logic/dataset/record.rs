use serde::{Deserialize, Serialize};

use crate::logic::calibration::LabeledScore;
use crate::logic::features::Transaction;

/// One labeled transaction, one JSONL line
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ValidationRecord {
    pub transaction: Transaction,
    pub is_fraud: bool,
}

impl ValidationRecord {
    pub fn new(transaction: Transaction, is_fraud: bool) -> Self {
        Self { transaction, is_fraud }
    }

    /// Pair with a model score for calibration
    pub fn scored(&self, score: f64) -> LabeledScore {
        LabeledScore::new(score, self.is_fraud)
    }
}
