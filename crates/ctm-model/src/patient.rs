use serde::{Deserialize, Serialize};

use crate::condition::ConditionSet;
use crate::error::{ModelError, Result};

/// Structured view of one patient used for matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    pub patient_id: String,
    pub age_months: u32,
    pub conditions: ConditionSet,
    pub allergies: ConditionSet,
}

impl PatientProfile {
    pub fn new(patient_id: impl Into<String>, age_months: u32) -> Result<Self> {
        let patient_id = patient_id.into();
        if patient_id.trim().is_empty() {
            return Err(ModelError::EmptyIdentifier {
                field: "patient id",
            });
        }
        Ok(Self {
            patient_id,
            age_months,
            conditions: ConditionSet::new(),
            allergies: ConditionSet::new(),
        })
    }

    pub fn with_conditions(mut self, conditions: ConditionSet) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn with_allergies(mut self, allergies: ConditionSet) -> Self {
        self.allergies = allergies;
        self
    }
}
