//! Score aggregation over a freelancer's eligible reports.
//!
//! Pure functions: no I/O, no hidden settings lookup. Callers pass the active
//! [`QualitySettings`] explicitly.
//!
//! QS ratings are averaged on their raw 0-5 scale first and rescaled by
//! `qs_multiplier` once, when blended into the combined score. Every place
//! that displays a combined score or compares one against
//! `probation_threshold` goes through [`combine`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{QualityReport, QualitySettings};

/// Averages and combined score for a set of reports.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ScoreSummary {
    /// Number of eligible reports that were considered.
    pub eligible_reports: usize,
    pub avg_lqa: Option<f64>,
    pub avg_qs: Option<f64>,
    pub combined: Option<f64>,
}

/// Compute average LQA, average QS, and the combined score.
///
/// Reports whose status is not eligible (`finalized`, `translator_accepted`)
/// are ignored. The result does not depend on the order of `reports`.
#[must_use]
pub fn aggregate(reports: &[QualityReport], settings: &QualitySettings) -> ScoreSummary {
    let eligible: Vec<&QualityReport> = reports.iter().filter(|r| r.status.is_eligible()).collect();

    let avg_lqa = mean(eligible.iter().filter_map(|r| r.lqa_score));
    let avg_qs = mean(eligible.iter().filter_map(|r| r.qs_score));

    ScoreSummary {
        eligible_reports: eligible.len(),
        avg_lqa,
        avg_qs,
        combined: combine(avg_lqa, avg_qs, settings),
    }
}

/// Blend the two averages into one 0-100 score.
///
/// - both present: `(avg_lqa * lqa_weight + avg_qs * qs_multiplier) / (lqa_weight + 1)`
/// - only LQA: `avg_lqa`
/// - only QS: `avg_qs * qs_multiplier`
/// - neither: `None`
#[must_use]
pub fn combine(
    avg_lqa: Option<f64>,
    avg_qs: Option<f64>,
    settings: &QualitySettings,
) -> Option<f64> {
    match (avg_lqa, avg_qs) {
        (Some(lqa), Some(qs)) => Some(
            lqa.mul_add(settings.lqa_weight, scale_qs(qs, settings)) / (settings.lqa_weight + 1.0),
        ),
        (Some(lqa), None) => Some(lqa),
        (None, Some(qs)) => Some(scale_qs(qs, settings)),
        (None, None) => None,
    }
}

/// Rescale a 0-5 QS value onto the 0-100 LQA scale.
#[must_use]
pub fn scale_qs(qs: f64, settings: &QualitySettings) -> f64 {
    qs * settings.qs_multiplier
}

/// Arithmetic mean, summed in sorted order so the result is independent of
/// input order.
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut values: Vec<f64> = values.collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let sum: f64 = values.iter().sum();
    #[allow(clippy::cast_precision_loss)]
    Some(sum / values.len() as f64)
}
