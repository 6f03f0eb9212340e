//! Typed audit detail payloads.
//!
//! Each audit action can carry a structured `detail` JSON blob. These types
//! give the common shapes a schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Detail for `AuditAction::StatusChanged`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: String,
    pub to: String,
    pub action: String,
    pub reason: Option<String>,
}

/// Detail for `AuditAction::EscalationRaised`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EscalationDetail {
    /// `freelancer_warning` or `consecutive_low_lqa`.
    pub kind: String,
    pub scores: Vec<f64>,
    pub threshold: f64,
}

/// Detail for `AuditAction::SettingsChanged`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SettingsChangedDetail {
    pub previous_id: Option<String>,
    pub dispute_period_days: u32,
    pub probation_threshold: f64,
    pub lqa_weight: f64,
    pub qs_multiplier: f64,
}
