//! Schema Types
//!
//! Field specs and the ordered schema. KHÔNG chứa encoding logic.

use serde::{Deserialize, Serialize};

use crate::constants::SCHEMA_VERSION;
use crate::error::{Result, SchemaError};
use crate::logic::features::Transaction;

// ============================================================================
// FIELD SPEC
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Numeric,
    Categorical,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Numeric => "numeric",
            FieldKind::Categorical => "categorical",
        }
    }
}

/// One required input field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,

    /// Frozen vocabulary, one-hot order (categorical only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_categories: Vec<String>,

    /// Inclusive valid range (numeric only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl FieldSpec {
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Numeric,
            allowed_categories: Vec::new(),
            min: None,
            max: None,
        }
    }

    pub fn categorical<I, S>(name: impl Into<String>, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: FieldKind::Categorical,
            allowed_categories: categories.into_iter().map(Into::into).collect(),
            min: None,
            max: None,
        }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn is_numeric(&self) -> bool {
        self.kind == FieldKind::Numeric
    }

    /// Position of `value` in the vocabulary
    pub fn category_index(&self, value: &str) -> Option<usize> {
        self.allowed_categories.iter().position(|c| c == value)
    }

    /// Range check for numeric values
    pub fn check_range(&self, value: f64) -> std::result::Result<(), SchemaError> {
        let min = self.min.unwrap_or(f64::NEG_INFINITY);
        let max = self.max.unwrap_or(f64::INFINITY);
        if value < min || value > max {
            return Err(SchemaError::OutOfRange {
                field: self.name.clone(),
                value,
                min,
                max,
            });
        }
        Ok(())
    }
}

// ============================================================================
// FEATURE SCHEMA
// ============================================================================

/// Canonical ordered list of required fields.
///
/// Frozen at training time and persisted with the calibration artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u8,
    pub fields: Vec<FieldSpec>,
}

impl FeatureSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self> {
        let schema = Self {
            version: SCHEMA_VERSION,
            fields,
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Build from the column lists recorded in the persisted artifact
    pub fn from_columns(
        numerical_cols: &[String],
        categorical_cols: &[(String, Vec<String>)],
    ) -> Result<Self> {
        let fields = numerical_cols
            .iter()
            .map(FieldSpec::numeric)
            .chain(
                categorical_cols
                    .iter()
                    .map(|(name, cats)| FieldSpec::categorical(name.clone(), cats.clone())),
            )
            .collect();
        Self::new(fields)
    }

    /// Structural checks: unique non-empty names, sane ranges, non-empty vocabularies
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(SchemaError::Invalid("schema has no fields".into()).into());
        }

        let mut seen = std::collections::HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(SchemaError::Invalid("empty field name".into()).into());
            }
            if !seen.insert(field.name.as_str()) {
                return Err(
                    SchemaError::Invalid(format!("duplicate field `{}`", field.name)).into(),
                );
            }

            match field.kind {
                FieldKind::Numeric => {
                    if !field.allowed_categories.is_empty() {
                        return Err(SchemaError::Invalid(format!(
                            "numeric field `{}` declares categories",
                            field.name
                        ))
                        .into());
                    }
                    if let (Some(min), Some(max)) = (field.min, field.max) {
                        if min.is_nan() || max.is_nan() || min > max {
                            return Err(SchemaError::Invalid(format!(
                                "field `{}` has an empty range",
                                field.name
                            ))
                            .into());
                        }
                    }
                }
                FieldKind::Categorical => {
                    if field.allowed_categories.is_empty() {
                        return Err(SchemaError::Invalid(format!(
                            "categorical field `{}` has no categories",
                            field.name
                        ))
                        .into());
                    }
                    let unique: std::collections::HashSet<_> =
                        field.allowed_categories.iter().collect();
                    if unique.len() != field.allowed_categories.len() {
                        return Err(SchemaError::Invalid(format!(
                            "categorical field `{}` repeats a category",
                            field.name
                        ))
                        .into());
                    }
                }
            }
        }

        Ok(())
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, index: usize) -> Option<&FieldSpec> {
        self.fields.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn numerical_cols(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.kind == FieldKind::Numeric)
            .map(|f| f.name.clone())
            .collect()
    }

    pub fn categorical_cols(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.kind == FieldKind::Categorical)
            .map(|f| f.name.clone())
            .collect()
    }

    /// Replace every categorical vocabulary with the sorted set of values seen
    /// in `records`. Values that are not strings are skipped here; the
    /// encoder rejects them later.
    pub fn infer_vocabulary(mut self, records: &[Transaction]) -> Result<Self> {
        for field in self.fields.iter_mut() {
            if field.kind != FieldKind::Categorical {
                continue;
            }
            let mut seen: Vec<String> = records
                .iter()
                .filter_map(|tx| tx.get(&field.name).and_then(|v| v.as_str()))
                .map(str::to_string)
                .collect();
            seen.sort();
            seen.dedup();
            if !seen.is_empty() {
                field.allowed_categories = seen;
            }
        }
        self.validate()?;
        Ok(self)
    }

    /// Built-in card transaction schema
    pub fn transactions() -> Self {
        let fields = vec![
            FieldSpec::numeric("transaction_hour").with_range(0.0, 23.0),
            FieldSpec::numeric("day_of_week").with_range(0.0, 6.0),
            FieldSpec::numeric("age").with_range(0.0, 120.0),
            FieldSpec::numeric("merchant_base_risk").with_range(0.0, 1.0),
            FieldSpec::numeric("amount").with_min(0.0),
            FieldSpec::numeric("avg_30d_amount").with_min(0.0),
            FieldSpec::numeric("previous_transactions_24h").with_min(0.0),
            FieldSpec::numeric("last_hour_transactions").with_min(0.0),
            FieldSpec::numeric("balance"),
            FieldSpec::numeric("ip_risk_score").with_range(0.0, 1.0),
            FieldSpec::numeric("is_foreign").with_range(0.0, 1.0),
            FieldSpec::numeric("device_mismatch").with_range(0.0, 1.0),
            FieldSpec::numeric("location_change").with_range(0.0, 1.0),
            FieldSpec::numeric("amount_anomaly"),
            FieldSpec::numeric("hour_anomaly").with_range(0.0, 1.0),
            FieldSpec::categorical("gender", ["F", "M"]),
            FieldSpec::categorical("home_country", ["CMR", "DE", "FR", "GB", "NG", "US"]),
            FieldSpec::categorical("transaction_country", ["CMR", "DE", "FR", "GB", "NG", "US"]),
            FieldSpec::categorical(
                "merchant_category",
                ["electronics", "entertainment", "fashion", "grocery", "travel"],
            ),
            FieldSpec::categorical("transaction_type", ["in_store", "online"]),
            FieldSpec::categorical("card_type", ["Amex", "Discover", "Mastercard", "Visa"]),
            FieldSpec::categorical("device", ["desktop", "mobile", "tablet"]),
        ];

        Self {
            version: SCHEMA_VERSION,
            fields,
        }
    }
}
