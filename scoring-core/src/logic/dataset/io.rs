use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{FraudError, Result};
use super::record::ValidationRecord;

/// Read labeled records from a JSONL file. Blank lines are skipped.
pub fn read_jsonl(path: &Path) -> Result<Vec<ValidationRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: ValidationRecord = serde_json::from_str(&line).map_err(|e| {
            FraudError::CalibrationInput(format!("{} line {}: {}", path.display(), i + 1, e))
        })?;
        records.push(record);
    }

    log::info!(
        "Read {} records ({} fraud) from {}",
        records.len(),
        records.iter().filter(|r| r.is_fraud).count(),
        path.display()
    );
    Ok(records)
}

/// Write records as JSONL (truncates). Returns the number written.
pub fn write_jsonl(path: &Path, records: &[ValidationRecord]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut out = BufWriter::new(File::create(path)?);
    for record in records {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    Ok(records.len())
}
