//! Schema Module
//!
//! Canonical field list and the frozen encoded column layout derived from it.

pub mod types;
pub mod layout;

#[cfg(test)]
mod tests;

pub use types::{FeatureSchema, FieldKind, FieldSpec};
pub use layout::{layout_hash, CategoricalBlock, Column, ColumnLayout, LayoutInfo};
