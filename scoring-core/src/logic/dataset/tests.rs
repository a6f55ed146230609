use std::fs;

use tempfile::tempdir;

use crate::error::FraudError;
use crate::logic::features::Transaction;
use super::{read_jsonl, stratified_split, write_jsonl, ValidationRecord};

fn records(n: usize, fraud_every: usize) -> Vec<ValidationRecord> {
    (0..n)
        .map(|i| {
            let tx = Transaction::new()
                .with("amount", i as f64 * 10.0)
                .with("device", if i % 2 == 0 { "mobile" } else { "desktop" });
            ValidationRecord::new(tx, i % fraud_every == 0)
        })
        .collect()
}

#[test]
fn test_jsonl_write_and_read() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data").join("validation.jsonl");
    let data = records(25, 5);

    assert_eq!(write_jsonl(&path, &data).unwrap(), 25);

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 25);
    assert!(content.lines().next().unwrap().contains("\"is_fraud\":true"));

    let loaded = read_jsonl(&path).unwrap();
    assert_eq!(loaded, data);
}

#[test]
fn test_blank_lines_are_skipped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("v.jsonl");
    fs::write(
        &path,
        "{\"transaction\":{\"amount\":1.0},\"is_fraud\":false}\n\n{\"transaction\":{\"amount\":2.0},\"is_fraud\":true}\n",
    )
    .unwrap();

    let loaded = read_jsonl(&path).unwrap();
    assert_eq!(loaded.len(), 2);
    assert!(loaded[1].is_fraud);
}

#[test]
fn test_bad_line_reports_line_number() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("v.jsonl");
    fs::write(&path, "{\"transaction\":{},\"is_fraud\":false}\nnot json\n").unwrap();

    match read_jsonl(&path) {
        Err(FraudError::CalibrationInput(msg)) => assert!(msg.contains("line 2")),
        other => panic!("Expected CalibrationInput error, got {:?}", other),
    }
}

#[test]
fn test_split_keeps_fraud_rate() {
    let data = records(200, 10); // 20 fraud
    let (train, held_out) = stratified_split(&data, 0.2, 42).unwrap();

    assert_eq!(train.len() + held_out.len(), 200);
    assert_eq!(held_out.len(), 40);
    assert_eq!(held_out.iter().filter(|r| r.is_fraud).count(), 4);
    assert_eq!(train.iter().filter(|r| r.is_fraud).count(), 16);
}

#[test]
fn test_split_is_deterministic() {
    let data = records(100, 7);
    let a = stratified_split(&data, 0.3, 7).unwrap();
    let b = stratified_split(&data, 0.3, 7).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_split_keeps_a_rare_positive_on_both_sides() {
    let data = records(50, 25); // 2 fraud
    let (train, held_out) = stratified_split(&data, 0.1, 1).unwrap();

    assert_eq!(train.iter().filter(|r| r.is_fraud).count(), 1);
    assert_eq!(held_out.iter().filter(|r| r.is_fraud).count(), 1);
}

#[test]
fn test_split_rejects_bad_fraction() {
    let data = records(10, 2);
    assert!(stratified_split(&data, 0.0, 1).is_err());
    assert!(stratified_split(&data, 1.0, 1).is_err());
}
