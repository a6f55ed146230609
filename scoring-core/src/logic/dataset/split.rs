use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{FraudError, Result};
use super::record::ValidationRecord;

/// Stratified hold-out split, deterministic for a given seed.
///
/// Each class is shuffled on its own and `test_fraction` of it (rounded,
/// at least one record when the class has two or more) goes to the held-out
/// side, so both sides keep the fraud rate. Returns `(train, held_out)`.
pub fn stratified_split(
    records: &[ValidationRecord],
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<ValidationRecord>, Vec<ValidationRecord>)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(FraudError::CalibrationInput(format!(
            "test fraction {} must be in (0, 1)",
            test_fraction
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(records.len());
    let mut held_out = Vec::new();

    for class in [true, false] {
        let mut members: Vec<&ValidationRecord> =
            records.iter().filter(|r| r.is_fraud == class).collect();
        members.shuffle(&mut rng);

        let n = members.len();
        let mut take = (n as f64 * test_fraction).round() as usize;
        if n >= 2 {
            take = take.clamp(1, n - 1);
        }

        held_out.extend(members[..take].iter().map(|r| (*r).clone()));
        train.extend(members[take..].iter().map(|r| (*r).clone()));
    }

    Ok((train, held_out))
}
