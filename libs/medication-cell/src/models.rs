use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub id: u32,
    pub name: String,
    pub description: String,
}

/// Ordered from least to most serious.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: u32,
    pub med1_id: u32,
    pub med2_id: u32,
    pub severity: Severity,
    pub description: String,
    pub recommendation: String,
}

impl Interaction {
    /// True when this row covers the unordered pair {a, b}.
    pub fn involves_pair(&self, a: u32, b: u32) -> bool {
        (self.med1_id == a && self.med2_id == b) || (self.med1_id == b && self.med2_id == a)
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckInteractionsRequest {
    pub medication_ids: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionFinding {
    #[serde(flatten)]
    pub interaction: Interaction,
    pub med1_name: String,
    pub med2_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionReport {
    pub medications: Vec<Medication>,
    pub interactions: Vec<InteractionFinding>,
    pub pairs_checked: usize,
    pub highest_severity: Option<Severity>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MedicationListResponse {
    pub medications: Vec<Medication>,
    pub total: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MedicationError {
    #[error("Medication {0} not found")]
    NotFound(u32),

    #[error("Medication {0} is already selected")]
    AlreadySelected(u32),
}

impl From<MedicationError> for AppError {
    fn from(err: MedicationError) -> Self {
        match err {
            MedicationError::NotFound(_) => AppError::NotFound(err.to_string()),
            MedicationError::AlreadySelected(_) => AppError::Conflict(err.to_string()),
        }
    }
}
