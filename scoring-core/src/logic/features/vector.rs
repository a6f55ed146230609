//! Encoded Vector - Core data structure for model input
//!
//! **Versioned vector with layout validation**
//!
//! Carries the layout version and hash it was produced under so a vector
//! can never be fed to a model built for another layout.

use serde::{Deserialize, Serialize};

use crate::error::{FraudError, Result};
use crate::logic::schema::ColumnLayout;

// ============================================================================
// VERSIONED ENCODED VECTOR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedVector {
    /// Layout version
    pub version: u8,
    /// CRC32 hash of the column layout (for mismatch detection)
    pub layout_hash: u32,
    /// Values in column layout order
    values: Vec<f64>,
}

impl EncodedVector {
    /// Wrap raw values produced for `layout`
    pub fn from_values(layout: &ColumnLayout, values: Vec<f64>) -> Result<Self> {
        if values.len() != layout.width() {
            return Err(FraudError::InvalidModel(format!(
                "vector has {} values, layout has {} columns",
                values.len(),
                layout.width()
            )));
        }
        Ok(Self {
            version: layout.version(),
            layout_hash: layout.hash(),
            values,
        })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Get column by name
    pub fn get_by_name(&self, layout: &ColumnLayout, name: &str) -> Option<f64> {
        layout.column_index(name).and_then(|i| self.get(i))
    }

    /// Validate that this vector is compatible with `layout`
    pub fn validate(&self, layout: &ColumnLayout) -> Result<()> {
        layout.validate(self.version, self.layout_hash)?;
        if self.values.len() != layout.width() {
            return Err(FraudError::InvalidModel(format!(
                "vector has {} values, layout has {} columns",
                self.values.len(),
                layout.width()
            )));
        }
        Ok(())
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self, layout: &ColumnLayout) -> serde_json::Value {
        serde_json::json!({
            "layout_version": self.version,
            "layout_hash": self.layout_hash,
            "values": self.values,
            "named_values": layout.columns().iter()
                .zip(self.values.iter())
                .map(|(column, value)| (column.name.clone(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}
