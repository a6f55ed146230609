//! Offline pipeline
//!
//! Train-time only: fit statistics, fit a model, score the held-out set,
//! calibrate, and freeze the result next to the model it was tuned on.
//! Any error aborts the run.

use std::path::Path;

use crate::constants::get_target_recall;
use crate::error::{FraudError, Result};
use crate::logic::artifacts::{model_digest, save_calibration, save_model, CalibrationArtifact, ModelFile};
use crate::logic::calibration::{calibrate, evaluate, EvaluationReport, LabeledScore};
use crate::logic::dataset::ValidationRecord;
use crate::logic::features::{Encoder, FeatureStats, Transaction};
use crate::logic::model::{FitConfig, LogisticModel, ModelArtifact, Scorer};
use crate::logic::schema::FeatureSchema;

/// Output of one calibration run, ready to persist
#[derive(Debug, Clone)]
pub struct FrozenRun {
    pub model_file: ModelFile,
    pub model_sha256: String,
    pub calibration: CalibrationArtifact,
    pub report: EvaluationReport,
}

/// Encode and score every record
pub fn score_validation_set<S>(
    encoder: &Encoder,
    scorer: &S,
    records: &[ValidationRecord],
) -> Result<Vec<LabeledScore>>
where
    S: Scorer + ?Sized,
{
    records
        .iter()
        .map(|r| -> Result<LabeledScore> {
            let vector = encoder.encode(&r.transaction)?;
            let p = scorer.predict_proba(vector.as_slice())?;
            Ok(r.scored(p))
        })
        .collect()
}

/// Fit standardisation stats and a logistic model on `records`
pub fn train_logistic(
    schema: &FeatureSchema,
    records: &[ValidationRecord],
    config: &FitConfig,
) -> Result<(FeatureStats, LogisticModel)> {
    let transactions: Vec<Transaction> = records.iter().map(|r| r.transaction.clone()).collect();
    let stats = FeatureStats::fit(schema, &transactions)?;
    let encoder = Encoder::new(schema.clone(), stats.clone())?;

    let x = transactions
        .iter()
        .map(|tx| encoder.encode(tx).map(|v| v.as_slice().to_vec()))
        .collect::<Result<Vec<_>>>()?;
    let y: Vec<bool> = records.iter().map(|r| r.is_fraud).collect();

    let model = LogisticModel::fit(&x, &y, config)?;
    log::info!(
        "Trained logistic model on {} records ({} fraud)",
        records.len(),
        y.iter().filter(|f| **f).count()
    );
    Ok((stats, model))
}

/// Score the held-out set with `model`, calibrate, and bind the result to the model digest
pub fn calibrate_and_freeze(
    schema: FeatureSchema,
    stats: FeatureStats,
    model: ModelFile,
    validation: &[ValidationRecord],
    target_recall: f64,
) -> Result<FrozenRun> {
    if validation.is_empty() {
        return Err(FraudError::CalibrationInput("validation set is empty".into()));
    }

    let encoder = Encoder::new(schema.clone(), stats.clone())?;
    encoder
        .layout()
        .validate(model.schema_version, model.layout_hash)?;

    let scorer = model.model.clone().into_scorer(&model.name)?;
    if scorer.n_features() != encoder.layout().width() {
        return Err(FraudError::InvalidModel(format!(
            "model `{}` expects {} features, layout has {} columns",
            model.name,
            scorer.n_features(),
            encoder.layout().width()
        )));
    }

    let scores = score_validation_set(&encoder, scorer.as_ref(), validation)?;
    let result = calibrate(&scores, target_recall)?;
    let report = evaluate(&scores, result.threshold);

    log::info!(
        "Calibrated `{}`: threshold {:.6}, precision {:.4}, recall {:.4}, auc {:?}",
        model.name,
        result.threshold,
        report.precision,
        report.recall,
        report.roc_auc
    );

    let model_sha256 = model_digest(&model)?;
    let calibration = CalibrationArtifact::new(result, schema, stats, model_sha256.clone());

    Ok(FrozenRun {
        model_file: model,
        model_sha256,
        calibration,
        report,
    })
}

/// Write both files; the written model must hash to what the calibration recorded
pub fn persist(run: &FrozenRun, dir: &Path, model_file: &str, calibration_file: &str) -> Result<()> {
    let digest = save_model(&run.model_file, &dir.join(model_file))?;
    if digest != run.calibration.model_sha256 {
        return Err(FraudError::InvalidModel(format!(
            "written model hashes to {}, calibration expects {}",
            digest, run.calibration.model_sha256
        )));
    }
    save_calibration(&run.calibration, &dir.join(calibration_file))
}

/// Convenience for a freshly trained logistic model.
///
/// Without an explicit target the recall comes from `get_target_recall`.
pub fn freeze_logistic(
    name: &str,
    schema: FeatureSchema,
    stats: FeatureStats,
    model: LogisticModel,
    validation: &[ValidationRecord],
    target_recall: Option<f64>,
) -> Result<FrozenRun> {
    let target_recall = target_recall.unwrap_or_else(get_target_recall);
    let layout = crate::logic::schema::ColumnLayout::from_schema(&schema);
    let file = ModelFile::new(name, &layout, ModelArtifact::Logistic(model));
    calibrate_and_freeze(schema, stats, file, validation, target_recall)
}
