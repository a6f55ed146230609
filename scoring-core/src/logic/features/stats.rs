//! Training-time statistics
//!
//! Per-numeric-field mean and population standard deviation, derived once
//! at training time and frozen into the calibration artifact.

use serde::{Deserialize, Serialize};

use crate::error::{FraudError, Result, SchemaError};
use crate::logic::schema::{FeatureSchema, FieldKind};
use super::transaction::Transaction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub name: String,
    pub mean: f64,
    pub std: f64,
}

impl NumericStats {
    /// `(value - mean) / std`, or 0 for constant columns
    pub fn standardize(&self, value: f64) -> f64 {
        if self.std == 0.0 {
            0.0
        } else {
            (value - self.mean) / self.std
        }
    }
}

/// Frozen scaling statistics, in numeric-field schema order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    pub numeric: Vec<NumericStats>,
}

impl FeatureStats {
    /// Fit mean/std (ddof = 0) for every numeric field of `schema`
    pub fn fit(schema: &FeatureSchema, records: &[Transaction]) -> Result<Self> {
        if records.is_empty() {
            return Err(FraudError::CalibrationInput(
                "cannot fit feature statistics on an empty set".into(),
            ));
        }

        let n = records.len() as f64;
        let mut numeric = Vec::new();

        for field in schema.fields.iter().filter(|f| f.kind == FieldKind::Numeric) {
            let values = records
                .iter()
                .map(|tx| tx.numeric(field))
                .collect::<std::result::Result<Vec<f64>, SchemaError>>()?;

            let mean = values.iter().sum::<f64>() / n;
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

            numeric.push(NumericStats {
                name: field.name.clone(),
                mean,
                std: variance.sqrt(),
            });
        }

        log::debug!(
            "Fitted statistics for {} numeric fields over {} records",
            numeric.len(),
            records.len()
        );

        Ok(Self { numeric })
    }

    /// Mean 0, std 1 for every numeric field (no scaling)
    pub fn identity(schema: &FeatureSchema) -> Self {
        Self {
            numeric: schema
                .numerical_cols()
                .into_iter()
                .map(|name| NumericStats {
                    name,
                    mean: 0.0,
                    std: 1.0,
                })
                .collect(),
        }
    }

    /// Names and order must match the schema's numeric fields
    pub fn validate(&self, schema: &FeatureSchema) -> Result<()> {
        let expected = schema.numerical_cols();
        let actual: Vec<&str> = self.numeric.iter().map(|s| s.name.as_str()).collect();

        if expected.len() != actual.len() || expected.iter().zip(&actual).any(|(e, a)| e != a) {
            return Err(SchemaError::Invalid(format!(
                "statistics cover {:?}, schema expects {:?}",
                actual, expected
            ))
            .into());
        }

        for stat in &self.numeric {
            if !stat.mean.is_finite() || !stat.std.is_finite() || stat.std < 0.0 {
                return Err(SchemaError::Invalid(format!(
                    "statistics for `{}` are not usable (mean {}, std {})",
                    stat.name, stat.mean, stat.std
                ))
                .into());
            }
        }

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&NumericStats> {
        self.numeric.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::schema::FieldSpec;

    fn schema() -> FeatureSchema {
        FeatureSchema::new(vec![
            FieldSpec::numeric("amount"),
            FieldSpec::categorical("device", ["mobile"]),
            FieldSpec::numeric("hour_anomaly"),
        ])
        .unwrap()
    }

    #[test]
    fn test_fit_population_std() {
        let records: Vec<_> = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]
            .iter()
            .map(|a| {
                Transaction::new()
                    .with("amount", *a)
                    .with("device", "mobile")
                    .with("hour_anomaly", 1.0)
            })
            .collect();

        let stats = FeatureStats::fit(&schema(), &records).unwrap();
        assert_eq!(stats.numeric.len(), 2);
        assert_eq!(stats.numeric[0].mean, 5.0);
        assert_eq!(stats.numeric[0].std, 2.0);
        // constant column
        assert_eq!(stats.numeric[1].std, 0.0);
        assert_eq!(stats.numeric[1].standardize(42.0), 0.0);
    }

    #[test]
    fn test_fit_rejects_empty_set() {
        assert!(matches!(
            FeatureStats::fit(&schema(), &[]),
            Err(FraudError::CalibrationInput(_))
        ));
    }

    #[test]
    fn test_fit_propagates_schema_errors() {
        let records = vec![Transaction::new().with("amount", 1.0)];
        assert!(matches!(
            FeatureStats::fit(&schema(), &records),
            Err(FraudError::Schema(SchemaError::MissingField(_)))
        ));
    }

    #[test]
    fn test_validate_against_schema() {
        let schema = schema();
        let stats = FeatureStats::identity(&schema);
        assert!(stats.validate(&schema).is_ok());

        let mut swapped = stats.clone();
        swapped.numeric.swap(0, 1);
        assert!(swapped.validate(&schema).is_err());

        let mut negative = stats;
        negative.numeric[0].std = -1.0;
        assert!(negative.validate(&schema).is_err());
    }
}
