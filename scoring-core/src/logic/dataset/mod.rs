//! Dataset Module - labeled transactions for the offline run
//!
//! JSONL in/out plus the stratified hold-out split used before calibration.

pub mod record;
pub mod io;
pub mod split;

#[cfg(test)]
mod tests;

pub use record::ValidationRecord;
pub use io::{read_jsonl, write_jsonl};
pub use split::stratified_split;
