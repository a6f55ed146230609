//! Attribution Engine
//!
//! Decomposes one prediction into per-feature signed contributions and
//! ranks them. One-hot columns are folded back into their field, so a
//! categorical field gets a single attribution.
//!
//! Ranking: `|contribution|` descending, magnitudes quantised to
//! `RANKING_QUANTUM` so float noise cannot reorder near-equal features;
//! ties keep schema order (stable sort over schema-ordered input).

use crate::constants::{ADDITIVITY_TOLERANCE, RANKING_QUANTUM};
use crate::error::{FraudError, Result};
use crate::logic::features::EncodedVector;
use crate::logic::model::Scorer;
use crate::logic::schema::ColumnLayout;
use super::types::{Attribution, Direction, Explanation};

/// Top-`top_k` attributions for one encoded transaction
pub fn explain<S>(
    vector: &EncodedVector,
    scorer: &S,
    layout: &ColumnLayout,
    top_k: usize,
) -> Result<Vec<Attribution>>
where
    S: Scorer + ?Sized,
{
    Ok(explain_full(vector, scorer, layout)?.into_top(top_k))
}

/// All attributions, ranked
pub fn explain_full<S>(vector: &EncodedVector, scorer: &S, layout: &ColumnLayout) -> Result<Explanation>
where
    S: Scorer + ?Sized,
{
    if !scorer.capabilities().can_explain {
        return Err(FraudError::UnsupportedModel(scorer.name().to_string()));
    }

    vector.validate(layout)?;

    let decomposition = scorer.decompose(vector.as_slice())?;
    if decomposition.contributions.len() != layout.width() {
        return Err(FraudError::InvalidModel(format!(
            "model `{}` returned {} contributions for {} columns",
            scorer.name(),
            decomposition.contributions.len(),
            layout.width()
        )));
    }

    let residual = decomposition.residual();
    if !(residual <= ADDITIVITY_TOLERANCE) {
        log::warn!(
            "Decomposition from `{}` is off by {:.6} - refusing to explain",
            scorer.name(),
            residual
        );
        return Err(FraudError::InvalidModel(format!(
            "contributions of `{}` do not add up to probability - baseline (off by {})",
            scorer.name(),
            residual
        )));
    }

    // Fold columns into their owning field
    let mut per_field = vec![0.0f64; layout.field_count()];
    for (column, contribution) in layout.columns().iter().zip(&decomposition.contributions) {
        per_field[column.field_index] += contribution;
    }

    let mut attributions: Vec<Attribution> = per_field
        .into_iter()
        .enumerate()
        .map(|(i, contribution)| Attribution {
            feature_name: layout.field_name(i).unwrap_or("unknown").to_string(),
            signed_contribution: contribution,
            direction: Direction::from_contribution(contribution),
        })
        .collect();

    rank(&mut attributions);

    Ok(Explanation {
        probability: decomposition.probability,
        baseline_probability: decomposition.baseline_probability,
        attributions,
    })
}

/// Stable sort by quantised magnitude, descending
fn rank(attributions: &mut [Attribution]) {
    attributions.sort_by(|a, b| {
        magnitude_key(b.signed_contribution).total_cmp(&magnitude_key(a.signed_contribution))
    });
}

fn magnitude_key(contribution: f64) -> f64 {
    (contribution.abs() / RANKING_QUANTUM).round()
}
