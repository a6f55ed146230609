//! Features Module - Transaction Encoding
//!
//! Tách logic encoding khỏi scoring: the encoder only knows the frozen
//! schema and statistics, never the model.

pub mod transaction;
pub mod stats;
pub mod vector;
pub mod encoder;


// Re-export common types
pub use transaction::Transaction;
pub use stats::{FeatureStats, NumericStats};
pub use vector::EncodedVector;
pub use encoder::{encode, Encoder};
