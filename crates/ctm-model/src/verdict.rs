//! Per-pair verdicts and per-patient results.

use serde::{Deserialize, Serialize};

use crate::trial::TrialCriteria;

/// Where an excluded condition was found on the patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionSource {
    Condition,
    Allergy,
}

/// The gate that rejected a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IneligibleReason {
    AgeOutOfRange {
        age_months: u32,
        min_months: u32,
        max_months: u32,
    },
    NoInclusionMatch,
    Excluded {
        condition: String,
        source: ExclusionSource,
    },
}

impl std::fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AgeOutOfRange {
                age_months,
                min_months,
                max_months,
            } => write!(
                f,
                "age {age_months} months outside [{min_months}, {max_months}]"
            ),
            Self::NoInclusionMatch => f.write_str("no inclusion condition matched"),
            Self::Excluded { source, .. } => match source {
                ExclusionSource::Condition => f.write_str("excluded condition present"),
                ExclusionSource::Allergy => f.write_str("excluded allergy present"),
            },
        }
    }
}

/// Outcome of evaluating one patient against one trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityVerdict {
    pub trial_id: String,
    pub trial_name: String,
    pub eligible: bool,
    /// Inclusion conditions the patient has, in inclusion order. Empty when
    /// ineligible or when the trial lists no inclusion conditions.
    pub matched_criteria: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<IneligibleReason>,
}

impl EligibilityVerdict {
    pub fn eligible(trial: &TrialCriteria, matched_criteria: Vec<String>) -> Self {
        Self {
            trial_id: trial.trial_id.clone(),
            trial_name: trial.trial_name.clone(),
            eligible: true,
            matched_criteria,
            reason: None,
        }
    }

    pub fn ineligible(trial: &TrialCriteria, reason: IneligibleReason) -> Self {
        Self {
            trial_id: trial.trial_id.clone(),
            trial_name: trial.trial_name.clone(),
            eligible: false,
            matched_criteria: Vec::new(),
            reason: Some(reason),
        }
    }
}

/// An eligible trial as it appears in the result document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibleTrial {
    pub trial_id: String,
    pub trial_name: String,
    #[serde(rename = "eligibilityCriteriaMet")]
    pub matched_criteria: Vec<String>,
}

impl EligibleTrial {
    /// Keeps the trial, name and matched criteria of an eligible verdict.
    pub fn from_verdict(verdict: EligibilityVerdict) -> Option<Self> {
        if !verdict.eligible {
            return None;
        }
        Some(Self {
            trial_id: verdict.trial_id,
            trial_name: verdict.trial_name,
            matched_criteria: verdict.matched_criteria,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientResult {
    pub patient_id: String,
    pub eligible_trials: Vec<EligibleTrial>,
}

impl PatientResult {
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            eligible_trials: Vec::new(),
        }
    }

    pub fn is_eligible_for(&self, trial_id: &str) -> bool {
        self.eligible_trials.iter().any(|t| t.trial_id == trial_id)
    }
}
