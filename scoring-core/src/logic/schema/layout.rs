//! Column Layout - Frozen Encoded Column Order
//!
//! **CRITICAL: This file controls the encoded vector layout**
//!
//! ## Rules (NEVER break these):
//! 1. Numeric fields first, in schema order
//! 2. Then one one-hot block per categorical field, in schema order
//! 3. Categories inside a block follow the frozen vocabulary order
//!
//! The layout hash covers the version, every column name and the kind of
//! its field. Any artifact or vector carrying a different hash is rejected.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::{FraudError, Result};
use super::types::{FeatureSchema, FieldKind};

// ============================================================================
// COLUMNS
// ============================================================================

/// One encoded column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// `field` for numeric, `field=category` for one-hot
    pub name: String,
    /// Index of the owning field in the schema
    pub field_index: usize,
    pub category: Option<String>,
}

/// One-hot block of a categorical field
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalBlock {
    pub field_index: usize,
    pub offset: usize,
    pub width: usize,
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Encoded layout derived from a schema. Cheap to rebuild, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    version: u8,
    hash: u32,
    field_names: Vec<String>,
    columns: Vec<Column>,
    numeric_fields: Vec<usize>,
    blocks: Vec<CategoricalBlock>,
}

impl ColumnLayout {
    pub fn from_schema(schema: &FeatureSchema) -> Self {
        let mut columns = Vec::new();
        let mut numeric_fields = Vec::new();
        let mut blocks = Vec::new();

        for (i, field) in schema.fields.iter().enumerate() {
            if field.kind == FieldKind::Numeric {
                numeric_fields.push(i);
                columns.push(Column {
                    name: field.name.clone(),
                    field_index: i,
                    category: None,
                });
            }
        }

        for (i, field) in schema.fields.iter().enumerate() {
            if field.kind != FieldKind::Categorical {
                continue;
            }
            blocks.push(CategoricalBlock {
                field_index: i,
                offset: columns.len(),
                width: field.allowed_categories.len(),
            });
            for category in &field.allowed_categories {
                columns.push(Column {
                    name: format!("{}={}", field.name, category),
                    field_index: i,
                    category: Some(category.clone()),
                });
            }
        }

        let hash = compute_layout_hash(schema.version, &columns, schema);

        Self {
            version: schema.version,
            hash,
            field_names: schema.fields.iter().map(|f| f.name.clone()).collect(),
            columns,
            numeric_fields,
            blocks,
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// Encoded vector length
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn field_count(&self) -> usize {
        self.field_names.len()
    }

    pub fn field_name(&self, field_index: usize) -> Option<&str> {
        self.field_names.get(field_index).map(String::as_str)
    }

    /// Numeric field indices; numeric column `k` belongs to `numeric_fields()[k]`
    pub fn numeric_fields(&self) -> &[usize] {
        &self.numeric_fields
    }

    pub fn categorical_blocks(&self) -> &[CategoricalBlock] {
        &self.blocks
    }

    /// Get column index by name (O(n) but columns are few)
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_name(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(|c| c.name.as_str())
    }

    /// Validate that incoming data matches this layout
    pub fn validate(&self, incoming_version: u8, incoming_hash: u32) -> Result<()> {
        if incoming_version != self.version || incoming_hash != self.hash {
            return Err(FraudError::LayoutMismatch {
                expected_version: self.version,
                expected_hash: self.hash,
                actual_version: incoming_version,
                actual_hash: incoming_hash,
            });
        }
        Ok(())
    }

    pub fn info(&self) -> LayoutInfo {
        LayoutInfo {
            version: self.version,
            hash: self.hash,
            column_count: self.columns.len(),
            column_names: self.columns.iter().map(|c| c.name.clone()).collect(),
        }
    }
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over version + ordered columns (kind tag, name)
fn compute_layout_hash(version: u8, columns: &[Column], schema: &FeatureSchema) -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[version]);

    for column in columns {
        let kind = schema
            .fields
            .get(column.field_index)
            .map(|f| f.kind)
            .unwrap_or(FieldKind::Numeric);
        hasher.update(kind.as_str().as_bytes());
        hasher.update(&[0]);
        hasher.update(column.name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Layout hash of a schema without keeping the layout around
pub fn layout_hash(schema: &FeatureSchema) -> u32 {
    ColumnLayout::from_schema(schema).hash()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub column_count: usize,
    pub column_names: Vec<String>,
}

// ============================================================================
// TESTS
// ============================================================================
