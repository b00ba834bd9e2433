use serde::{Deserialize, Serialize};

use crate::age::AgeBound;
use crate::condition::ConditionSet;
use crate::error::{ModelError, Result};

/// Structured eligibility criteria for one trial.
///
/// Built once from the raw trial record and shared read-only across every
/// patient evaluated in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialCriteria {
    pub trial_id: String,
    pub trial_name: String,
    pub min_age: AgeBound,
    pub max_age: AgeBound,
    pub inclusion_conditions: ConditionSet,
    pub exclusion_conditions: ConditionSet,
}

impl TrialCriteria {
    pub fn new(
        trial_id: impl Into<String>,
        trial_name: impl Into<String>,
        min_age: AgeBound,
        max_age: AgeBound,
    ) -> Result<Self> {
        let trial_id = trial_id.into();
        if trial_id.trim().is_empty() {
            return Err(ModelError::EmptyIdentifier { field: "trial id" });
        }
        Ok(Self {
            trial_id,
            trial_name: trial_name.into(),
            min_age,
            max_age,
            inclusion_conditions: ConditionSet::new(),
            exclusion_conditions: ConditionSet::new(),
        })
    }

    pub fn with_inclusion(mut self, conditions: ConditionSet) -> Self {
        self.inclusion_conditions = conditions;
        self
    }

    pub fn with_exclusion(mut self, conditions: ConditionSet) -> Self {
        self.exclusion_conditions = conditions;
        self
    }

    /// Inclusive age-range check.
    pub fn accepts_age(&self, age_months: u32) -> bool {
        self.min_age.months <= age_months && age_months <= self.max_age.months
    }

    pub fn has_inverted_age_range(&self) -> bool {
        self.min_age.months > self.max_age.months
    }

    /// Rejects a range where both bounds were stated by the trial and the
    /// minimum exceeds the maximum. Inversions caused by a defaulted bound
    /// pass; such a trial simply accepts no patient.
    pub fn validate_age_range(&self) -> Result<()> {
        let both_stated = !self.min_age.is_default() && !self.max_age.is_default();
        if both_stated && self.has_inverted_age_range() {
            return Err(ModelError::InvertedAgeRange {
                trial_id: self.trial_id.clone(),
                min_months: self.min_age.months,
                max_months: self.max_age.months,
            });
        }
        Ok(())
    }
}
