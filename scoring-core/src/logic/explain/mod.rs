//! Explain Module - per-prediction attribution

pub mod types;
pub mod engine;


pub use types::{Attribution, Direction, Explanation};
pub use engine::{explain, explain_full};
