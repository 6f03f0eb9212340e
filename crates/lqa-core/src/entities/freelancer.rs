use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::FreelancerStatus;

/// A freelance linguist whose work is reviewed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Freelancer {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub status: FreelancerStatus,
    pub created_at: DateTime<Utc>,
}
