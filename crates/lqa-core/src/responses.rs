//! CLI response types returned as JSON by `lqa` commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Freelancer, QualityReport, QualitySettings};
use crate::scoring::ScoreSummary;

/// Response from `lqa freelancer score`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ScorecardResponse {
    pub freelancer: Freelancer,
    pub settings: QualitySettings,
    pub summary: ScoreSummary,
    /// Whether the combined score is below `probation_threshold`.
    pub below_threshold: bool,
}

/// Response from report transition commands.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TransitionResponse {
    pub report: QualityReport,
    pub notifications_sent: u32,
    pub notifications_failed: u32,
}

/// Response from `lqa sweep`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SweepResponse {
    pub auto_accepted: Vec<String>,
    /// Reports that changed concurrently and were skipped.
    pub skipped: Vec<String>,
    pub notifications_sent: u32,
    pub notifications_failed: u32,
}
