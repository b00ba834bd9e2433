//! Matching engine for the clinical trial matcher.
//!
//! The engine turns trial records into structured [`TrialCriteria`] once per
//! trial, then evaluates every patient against every trial:
//!
//! - [`age`]: age strings and criteria-text age patterns to months.
//! - [`criteria`]: inclusion / exclusion block splitting.
//! - [`recognizer`]: the entity recognition seam and the bundled lexicon
//!   recognizer.
//! - [`extract`]: recognizer output to normalized condition sets.
//! - [`trial`]: criteria building with per-trial memoization.
//! - [`evaluate`]: the pure eligibility decision for one pair.
//! - [`orchestrator`]: the cross product, in parallel, with per-patient
//!   failure isolation.
//!
//! [`TrialCriteria`]: ctm_model::TrialCriteria

pub mod age;
pub mod criteria;
pub mod evaluate;
pub mod extract;
pub mod orchestrator;
pub mod recognizer;
pub mod trial;

pub use age::{age_from_criteria, normalize_age, parse_age_string, resolve_age_bound};
pub use criteria::{CriteriaSection, CriteriaSections, split_criteria};
pub use evaluate::evaluate;
pub use extract::{ConditionExtractor, ExtractedCriteria};
pub use orchestrator::MatchingOrchestrator;
pub use recognizer::{Entity, EntityRecognizer, LexiconRecognizer, RecognizerError};
pub use trial::{
    BuildError, CacheLookup, CriteriaCache, TrialBuild, TrialCatalog, build_trial_catalog,
    build_trial_criteria,
};
