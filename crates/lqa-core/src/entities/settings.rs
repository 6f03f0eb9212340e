use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

const fn default_dispute_period_days() -> u32 {
    7
}

const fn default_probation_threshold() -> f64 {
    70.0
}

const fn default_lqa_weight() -> f64 {
    4.0
}

const fn default_qs_multiplier() -> f64 {
    20.0
}

/// Longest dispute period a settings record may carry (ten years).
pub const MAX_DISPUTE_PERIOD_DAYS: u32 = 3650;

/// Review policy values.
///
/// Loaded once per operation and passed explicitly into scoring and
/// escalation. When no active record exists the defaults apply.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct QualitySettings {
    /// Days a translator has to accept or dispute a submitted report.
    #[serde(default = "default_dispute_period_days")]
    pub dispute_period_days: u32,
    /// Combined score below which a freelancer is warned (0-100).
    #[serde(default = "default_probation_threshold")]
    pub probation_threshold: f64,
    /// Weight of the LQA average in the combined score.
    #[serde(default = "default_lqa_weight")]
    pub lqa_weight: f64,
    /// Factor that rescales a 0-5 QS rating onto the 0-100 LQA scale.
    #[serde(default = "default_qs_multiplier")]
    pub qs_multiplier: f64,
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            dispute_period_days: default_dispute_period_days(),
            probation_threshold: default_probation_threshold(),
            lqa_weight: default_lqa_weight(),
            qs_multiplier: default_qs_multiplier(),
        }
    }
}

impl QualitySettings {
    /// Check that every value is in range.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` naming the first offending field.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(1..=MAX_DISPUTE_PERIOD_DAYS).contains(&self.dispute_period_days) {
            return Err(CoreError::Validation(format!(
                "dispute_period_days must be within 1-{MAX_DISPUTE_PERIOD_DAYS}, got {}",
                self.dispute_period_days
            )));
        }
        if !(0.0..=100.0).contains(&self.probation_threshold) {
            return Err(CoreError::Validation(format!(
                "probation_threshold must be within 0-100, got {}",
                self.probation_threshold
            )));
        }
        if !(self.lqa_weight > 0.0 && self.lqa_weight.is_finite()) {
            return Err(CoreError::Validation(format!(
                "lqa_weight must be greater than 0, got {}",
                self.lqa_weight
            )));
        }
        if !(self.qs_multiplier > 0.0 && self.qs_multiplier.is_finite()) {
            return Err(CoreError::Validation(format!(
                "qs_multiplier must be greater than 0, got {}",
                self.qs_multiplier
            )));
        }
        Ok(())
    }
}

/// A persisted settings record. At most one is active at a time.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SettingsRecord {
    pub id: String,
    #[serde(flatten)]
    pub settings: QualitySettings,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}
