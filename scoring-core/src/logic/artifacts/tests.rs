use tempfile::tempdir;

use crate::error::FraudError;
use crate::logic::calibration::CalibrationResult;
use crate::logic::features::{FeatureStats, NumericStats};
use crate::logic::model::{LogisticModel, ModelArtifact};
use crate::logic::policy::{decide, Label};
use crate::logic::schema::{ColumnLayout, FeatureSchema, FieldSpec};
use super::storage::{load_calibration, load_model, model_digest, save_calibration, save_model};
use super::types::{CalibrationArtifact, ModelFile};
use super::validate::{validate_calibration, validate_pairing};

fn schema() -> FeatureSchema {
    FeatureSchema::new(vec![
        FieldSpec::numeric("amount").with_min(0.0),
        FieldSpec::categorical("device", ["desktop", "mobile"]),
    ])
    .unwrap()
}

fn stats() -> FeatureStats {
    FeatureStats {
        numeric: vec![NumericStats { name: "amount".into(), mean: 100.0, std: 50.0 }],
    }
}

fn model_file() -> ModelFile {
    let layout = ColumnLayout::from_schema(&schema());
    let model = ModelArtifact::Logistic(LogisticModel {
        weights: vec![1.2, -0.3, 0.4],
        bias: -2.0,
        reference: Vec::new(),
    });
    ModelFile::new("lr-test", &layout, model)
}

fn calibration(sha: &str) -> CalibrationArtifact {
    let result = CalibrationResult {
        threshold: 0.42,
        target_recall: 0.95,
        achieved_precision: 0.31,
        achieved_recall: 0.96,
        recall_monotone: true,
        used_fallback: false,
        cut_points: 120,
    };
    CalibrationArtifact::new(result, schema(), stats(), sha)
}

#[test]
fn test_model_roundtrip_and_digest() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("fraud_model.json");
    let file = model_file();

    let saved = save_model(&file, &path).unwrap();
    let (loaded, digest) = load_model(&path).unwrap();

    assert_eq!(saved, digest);
    assert_eq!(saved, model_digest(&file).unwrap());
    assert_eq!(digest.len(), 64);
    assert_eq!(loaded.name, "lr-test");
    assert_eq!(loaded.model, file.model);
}

#[test]
fn test_calibration_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model_metadata.json");
    let sha = model_digest(&model_file()).unwrap();
    let artifact = calibration(&sha);

    save_calibration(&artifact, &path).unwrap();
    let loaded = load_calibration(&path).unwrap();

    assert_eq!(loaded.threshold(), 0.42);
    assert_eq!(loaded.calibration, artifact.calibration);
    assert_eq!(loaded.numerical_cols, vec!["amount"]);
    assert_eq!(loaded.categorical_cols, vec!["device"]);
    assert_eq!(loaded.schema, artifact.schema);
    assert_eq!(loaded.model_sha256, sha);
}

#[test]
fn test_calibration_fields_are_top_level() {
    let artifact = calibration(&"0".repeat(64));
    let value = serde_json::to_value(&artifact).unwrap();

    for key in [
        "threshold",
        "target_recall",
        "achieved_precision",
        "achieved_recall",
        "categorical_cols",
        "numerical_cols",
        "layout_hash",
        "model_sha256",
    ] {
        assert!(value.get(key).is_some(), "missing key {}", key);
    }
    assert!(value.get("calibration").is_none());
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let err = load_calibration(&dir.path().join("nope.json")).unwrap_err();
    match err {
        FraudError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("Expected Io error, got {:?}", other),
    }
}

#[test]
fn test_reject_layout_hash_mismatch() {
    let mut artifact = calibration(&"a".repeat(64));
    artifact.layout_hash ^= 0xdead_beef;

    match validate_calibration(&artifact) {
        Err(FraudError::LayoutMismatch { expected_hash, actual_hash, .. }) => {
            assert_eq!(expected_hash ^ 0xdead_beef, actual_hash);
        }
        other => panic!("Expected LayoutMismatch error, got {:?}", other),
    }
}

#[test]
fn test_reject_inconsistent_columns() {
    let mut artifact = calibration(&"a".repeat(64));
    artifact.numerical_cols.push("velocity".into());
    assert!(matches!(validate_calibration(&artifact), Err(FraudError::Schema(_))));
}

#[test]
fn test_reject_bad_digest() {
    let artifact = calibration("not-a-digest");
    assert!(matches!(validate_calibration(&artifact), Err(FraudError::InvalidModel(_))));
}

#[test]
fn test_pairing() {
    let file = model_file();
    let sha = model_digest(&file).unwrap();
    let artifact = calibration(&sha);
    let layout = validate_calibration(&artifact).unwrap();

    assert!(validate_pairing(&file, &sha, &artifact, &layout).is_ok());

    let other = "b".repeat(64);
    assert!(matches!(
        validate_pairing(&file, &other, &artifact, &layout),
        Err(FraudError::InvalidModel(_))
    ));
}

#[test]
fn test_pairing_rejects_wrong_width() {
    let mut file = model_file();
    file.model = ModelArtifact::Logistic(LogisticModel {
        weights: vec![1.0, 1.0],
        bias: 0.0,
        reference: Vec::new(),
    });
    file.n_features = 2;
    let sha = model_digest(&file).unwrap();
    let artifact = calibration(&sha);
    let layout = validate_calibration(&artifact).unwrap();

    assert!(matches!(
        validate_pairing(&file, &sha, &artifact, &layout),
        Err(FraudError::InvalidModel(_))
    ));
}

#[test]
fn test_threshold_bits_survive_reload() {
    // parses one ULP high without exact float parsing
    let threshold = 0.9742447372584027_f64;
    let dir = tempdir().unwrap();
    let path = dir.path().join("model_metadata.json");

    let mut artifact = calibration(&"ab".repeat(32));
    artifact.calibration.threshold = threshold;
    save_calibration(&artifact, &path).unwrap();
    let loaded = load_calibration(&path).unwrap();

    assert_eq!(loaded.threshold().to_bits(), threshold.to_bits());
    let decision = decide(threshold, &loaded.calibration).unwrap();
    assert_eq!(decision.label(), Label::Fraud);
}

#[test]
fn test_model_weight_bits_survive_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fraud_model.json");
    let mut file = model_file();
    if let ModelArtifact::Logistic(model) = &mut file.model {
        model.weights = vec![0.9742447372584027, -0.1 - 0.2, 1.0 / 3.0];
        model.bias = std::f64::consts::E;
    }

    save_model(&file, &path).unwrap();
    let (loaded, _) = load_model(&path).unwrap();

    match (&file.model, &loaded.model) {
        (ModelArtifact::Logistic(a), ModelArtifact::Logistic(b)) => {
            let bits = |m: &LogisticModel| m.weights.iter().map(|w| w.to_bits()).collect::<Vec<_>>();
            assert_eq!(bits(a), bits(b));
            assert_eq!(a.bias.to_bits(), b.bias.to_bits());
        }
        _ => panic!("model family changed on reload"),
    }
}
