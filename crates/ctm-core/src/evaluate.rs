//! Eligibility decision for one patient and one trial.
//!
//! Gates run in a fixed order and stop at the first failure:
//!
//! 1. **Age**: the patient's age in months lies in `[min_age, max_age]`.
//! 2. **Inclusion**: when the trial lists inclusion conditions, the patient
//!    has at least one of them. An empty inclusion set imposes nothing.
//! 3. **Exclusion**: no exclusion condition appears among the patient's
//!    conditions or allergies. Exclusion overrides a successful inclusion.
//!
//! An eligible verdict carries the matched inclusion conditions in the order
//! the trial lists them.

use ctm_model::{
    EligibilityVerdict, ExclusionSource, IneligibleReason, PatientProfile, TrialCriteria,
};

pub fn evaluate(patient: &PatientProfile, trial: &TrialCriteria) -> EligibilityVerdict {
    if !trial.accepts_age(patient.age_months) {
        return EligibilityVerdict::ineligible(
            trial,
            IneligibleReason::AgeOutOfRange {
                age_months: patient.age_months,
                min_months: trial.min_age.months,
                max_months: trial.max_age.months,
            },
        );
    }

    let matched = if trial.inclusion_conditions.is_empty() {
        Vec::new()
    } else {
        let matched = trial
            .inclusion_conditions
            .intersection_ordered(&patient.conditions);
        if matched.is_empty() {
            return EligibilityVerdict::ineligible(trial, IneligibleReason::NoInclusionMatch);
        }
        matched
    };

    if let Some(reason) = exclusion_hit(patient, trial) {
        return EligibilityVerdict::ineligible(trial, reason);
    }

    EligibilityVerdict::eligible(trial, matched)
}

fn exclusion_hit(patient: &PatientProfile, trial: &TrialCriteria) -> Option<IneligibleReason> {
    let excluded = &trial.exclusion_conditions;
    if let Some(condition) = excluded.first_shared(&patient.conditions) {
        return Some(IneligibleReason::Excluded {
            condition: condition.to_string(),
            source: ExclusionSource::Condition,
        });
    }
    excluded
        .first_shared(&patient.allergies)
        .map(|condition| IneligibleReason::Excluded {
            condition: condition.to_string(),
            source: ExclusionSource::Allergy,
        })
}
