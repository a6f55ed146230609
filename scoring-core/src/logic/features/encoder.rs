//! Encoder - raw transaction → encoded vector
//!
//! Pure function of the transaction and the frozen schema/statistics:
//! - numeric: `(value - mean) / std`, 0 when `std == 0`
//! - categorical: one-hot over the frozen vocabulary, unknown value → all zero

use crate::error::Result;
use crate::logic::schema::{ColumnLayout, FeatureSchema, FieldKind};
use super::stats::FeatureStats;
use super::transaction::Transaction;
use super::vector::EncodedVector;

/// Where a schema field lands in the encoded vector
#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    /// Numeric column index (== stats index)
    Numeric(usize),
    /// Offset of the one-hot block
    OneHot(usize),
}

/// Frozen encoding: schema + statistics + derived layout
#[derive(Debug, Clone)]
pub struct Encoder {
    schema: FeatureSchema,
    stats: FeatureStats,
    layout: ColumnLayout,
    slots: Vec<Slot>,
}

impl Encoder {
    pub fn new(schema: FeatureSchema, stats: FeatureStats) -> Result<Self> {
        schema.validate()?;
        stats.validate(&schema)?;

        let layout = ColumnLayout::from_schema(&schema);

        let mut slots = vec![Slot::Numeric(0); schema.len()];
        for (column, &field_index) in layout.numeric_fields().iter().enumerate() {
            slots[field_index] = Slot::Numeric(column);
        }
        for block in layout.categorical_blocks() {
            slots[block.field_index] = Slot::OneHot(block.offset);
        }

        Ok(Self {
            schema,
            stats,
            layout,
            slots,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn stats(&self) -> &FeatureStats {
        &self.stats
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Encode one transaction. Fields are checked in schema order, so the
    /// first reported error is deterministic. Unknown extra fields are ignored.
    pub fn encode(&self, tx: &Transaction) -> Result<EncodedVector> {
        let mut values = vec![0.0f64; self.layout.width()];

        for (field, slot) in self.schema.fields.iter().zip(&self.slots) {
            match (field.kind, *slot) {
                (FieldKind::Numeric, Slot::Numeric(column)) => {
                    let raw = tx.numeric(field)?;
                    values[column] = self.stats.numeric[column].standardize(raw);
                }
                (FieldKind::Categorical, Slot::OneHot(offset)) => {
                    let raw = tx.categorical(field)?;
                    match field.category_index(raw) {
                        Some(position) => values[offset + position] = 1.0,
                        None => log::debug!(
                            "Unknown category `{}` for `{}` - encoded as all-zero",
                            raw,
                            field.name
                        ),
                    }
                }
                // slots are derived from the same schema
                _ => unreachable!("slot kind disagrees with field kind"),
            }
        }

        EncodedVector::from_values(&self.layout, values)
    }
}

/// One-shot encode without keeping an `Encoder` around
pub fn encode(
    tx: &Transaction,
    schema: &FeatureSchema,
    stats: &FeatureStats,
) -> Result<EncodedVector> {
    Encoder::new(schema.clone(), stats.clone())?.encode(tx)
}
