//! Schema validation tests

use crate::error::{FraudError, SchemaError};
use crate::logic::features::Transaction;
use super::{FeatureSchema, FieldKind, FieldSpec};

#[test]
fn test_rejects_duplicate_fields() {
    let result = FeatureSchema::new(vec![
        FieldSpec::numeric("amount"),
        FieldSpec::numeric("amount"),
    ]);
    assert!(matches!(
        result,
        Err(FraudError::Schema(SchemaError::Invalid(_)))
    ));
}

#[test]
fn test_rejects_empty_vocabulary() {
    let result = FeatureSchema::new(vec![FieldSpec::categorical(
        "device",
        Vec::<String>::new(),
    )]);
    assert!(result.is_err());
}

#[test]
fn test_rejects_inverted_range() {
    let result = FeatureSchema::new(vec![FieldSpec::numeric("age").with_range(10.0, 1.0)]);
    assert!(result.is_err());
}

#[test]
fn test_rejects_empty_schema() {
    assert!(FeatureSchema::new(vec![]).is_err());
}

#[test]
fn test_from_columns_keeps_order() {
    let schema = FeatureSchema::from_columns(
        &["amount".to_string(), "age".to_string()],
        &[("device".to_string(), vec!["mobile".to_string()])],
    )
    .unwrap();
    assert_eq!(schema.numerical_cols(), vec!["amount", "age"]);
    assert_eq!(schema.categorical_cols(), vec!["device"]);
    assert_eq!(schema.field(2).map(|f| f.kind), Some(FieldKind::Categorical));
}

#[test]
fn test_range_check() {
    let spec = FieldSpec::numeric("ip_risk_score").with_range(0.0, 1.0);
    assert!(spec.check_range(0.0).is_ok());
    assert!(spec.check_range(1.0).is_ok());
    assert!(matches!(
        spec.check_range(1.5),
        Err(SchemaError::OutOfRange { .. })
    ));
    assert!(FieldSpec::numeric("balance").check_range(-1e9).is_ok());
}

#[test]
fn test_infer_vocabulary_sorts_and_dedups() {
    let schema = FeatureSchema::new(vec![
        FieldSpec::numeric("amount"),
        FieldSpec::categorical("device", ["placeholder"]),
    ])
    .unwrap();

    let records = vec![
        Transaction::new().with("amount", 1.0).with("device", "tablet"),
        Transaction::new().with("amount", 2.0).with("device", "mobile"),
        Transaction::new().with("amount", 3.0).with("device", "tablet"),
    ];

    let schema = schema.infer_vocabulary(&records).unwrap();
    assert_eq!(
        schema.field(1).unwrap().allowed_categories,
        vec!["mobile".to_string(), "tablet".to_string()]
    );
}

#[test]
fn test_schema_serde_roundtrip_preserves_hash() {
    let schema = FeatureSchema::transactions();
    let json = serde_json::to_string(&schema).unwrap();
    let back: FeatureSchema = serde_json::from_str(&json).unwrap();
    assert_eq!(back, schema);
    assert_eq!(super::layout_hash(&back), super::layout_hash(&schema));
}
