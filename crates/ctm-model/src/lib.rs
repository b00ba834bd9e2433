//! Data model for clinical trial matching.

pub mod age;
pub mod condition;
pub mod error;
pub mod issue;
pub mod options;
pub mod patient;
pub mod trial;
pub mod verdict;

pub use age::{
    AgeBound, AgeBoundKind, AgeSource, DEFAULT_MAX_AGE_MONTHS, DEFAULT_MIN_AGE_MONTHS,
    MONTHS_PER_YEAR,
};
pub use condition::{ConditionSet, normalize_condition};
pub use error::{ModelError, Result};
pub use issue::{IssueKind, MatchRun, RunIssue};
pub use options::{DISEASE_LABEL, MatchOptions};
pub use patient::PatientProfile;
pub use trial::TrialCriteria;
pub use verdict::{
    EligibilityVerdict, EligibleTrial, ExclusionSource, IneligibleReason, PatientResult,
};
