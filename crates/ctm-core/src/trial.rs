//! Building structured trial criteria from trial records.
//!
//! Criteria depend only on the trial, so each trial is built once and the
//! result shared by every patient. [`CriteriaCache`] memoizes by trial id,
//! which keeps the recognizer from running more than once per trial.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};

use ctm_ingest::{IngestError, SourcedRecord, TrialRecord};
use ctm_model::{
    AgeBoundKind, IssueKind, MatchOptions, ModelError, RunIssue, TrialCriteria,
};

use crate::age::resolve_age_bound;
use crate::extract::ConditionExtractor;

/// Reasons a trial record cannot become [`TrialCriteria`].
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl BuildError {
    pub fn issue_kind(&self) -> IssueKind {
        match self {
            Self::Model(ModelError::InvertedAgeRange { .. }) => IssueKind::InvertedAgeRange,
            _ => IssueKind::MalformedInput,
        }
    }
}

/// Criteria built from one record plus any non-fatal issues.
#[derive(Debug)]
pub struct TrialBuild {
    pub criteria: TrialCriteria,
    pub issues: Vec<RunIssue>,
}

/// Resolves age bounds and condition sets for one trial record.
///
/// `source` names the record (usually its file name) for error messages.
pub fn build_trial_criteria(
    record: &TrialRecord,
    source: &str,
    extractor: &ConditionExtractor,
    options: &MatchOptions,
) -> Result<TrialBuild, BuildError> {
    let trial_id = record.trial_id(source)?;
    let trial_name = record.trial_name(trial_id);
    let text = record.eligibility_text();

    let min_age = resolve_age_bound(
        record.minimum_age(),
        text,
        AgeBoundKind::Minimum,
        options.default_min_age_months,
    );
    let max_age = resolve_age_bound(
        record.maximum_age(),
        text,
        AgeBoundKind::Maximum,
        options.default_max_age_months,
    );

    let criteria = TrialCriteria::new(trial_id, trial_name, min_age, max_age)?;
    criteria.validate_age_range()?;
    if criteria.has_inverted_age_range() {
        warn!(
            trial_id,
            min_months = min_age.months,
            max_months = max_age.months,
            "age range inverted by a defaulted bound; trial accepts no patient"
        );
    }

    let extracted = extractor.extract_criteria(text);
    let mut issues = Vec::new();
    for (section, error) in extracted.failures {
        warn!(trial_id, %section, %error, "recognizer failed; using empty condition set");
        issues.push(RunIssue::new(
            IssueKind::RecognizerFailure,
            trial_id,
            format!("{section} criteria: {error}"),
        ));
    }

    debug!(
        trial_id,
        min_age = %min_age,
        max_age = %max_age,
        inclusion = ?extracted.inclusion.as_slice(),
        exclusion = ?extracted.exclusion.as_slice(),
        "trial criteria built"
    );

    Ok(TrialBuild {
        criteria: criteria
            .with_inclusion(extracted.inclusion)
            .with_exclusion(extracted.exclusion),
        issues,
    })
}

/// Whether a lookup built new criteria or reused cached ones.
#[derive(Debug, Clone)]
pub enum CacheLookup {
    Built(Arc<TrialCriteria>),
    Cached(Arc<TrialCriteria>),
}

impl CacheLookup {
    pub fn criteria(&self) -> &Arc<TrialCriteria> {
        match self {
            Self::Built(criteria) | Self::Cached(criteria) => criteria,
        }
    }
}

/// Memoized trial criteria keyed by trial id.
#[derive(Debug, Default)]
pub struct CriteriaCache {
    entries: HashMap<String, Arc<TrialCriteria>>,
}

impl CriteriaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, trial_id: &str) -> Option<Arc<TrialCriteria>> {
        self.entries.get(trial_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns cached criteria for the record's trial id, building and
    /// caching them on first sight. Issues from a fresh build are appended
    /// to `issues`.
    pub fn get_or_build(
        &mut self,
        record: &TrialRecord,
        source: &str,
        extractor: &ConditionExtractor,
        options: &MatchOptions,
        issues: &mut Vec<RunIssue>,
    ) -> Result<CacheLookup, BuildError> {
        let trial_id = record.trial_id(source)?;
        if let Some(existing) = self.entries.get(trial_id) {
            return Ok(CacheLookup::Cached(Arc::clone(existing)));
        }
        let build = build_trial_criteria(record, source, extractor, options)?;
        issues.extend(build.issues);
        let criteria = Arc::new(build.criteria);
        self.entries
            .insert(criteria.trial_id.clone(), Arc::clone(&criteria));
        Ok(CacheLookup::Built(criteria))
    }
}

/// Trials ready for matching, in record order.
#[derive(Debug, Default)]
pub struct TrialCatalog {
    pub trials: Vec<Arc<TrialCriteria>>,
    pub issues: Vec<RunIssue>,
}

/// Builds criteria for every record, skipping malformed and duplicate
/// trials. The first record seen for a trial id wins.
pub fn build_trial_catalog(
    records: &[SourcedRecord<TrialRecord>],
    extractor: &ConditionExtractor,
    options: &MatchOptions,
) -> TrialCatalog {
    let start = Instant::now();
    let mut cache = CriteriaCache::new();
    let mut catalog = TrialCatalog::default();

    for sourced in records {
        let source = sourced.source_name();
        match cache.get_or_build(
            &sourced.record,
            &source,
            extractor,
            options,
            &mut catalog.issues,
        ) {
            Ok(CacheLookup::Built(criteria)) => catalog.trials.push(criteria),
            Ok(CacheLookup::Cached(criteria)) => {
                warn!(
                    trial_id = %criteria.trial_id,
                    source_file = %source,
                    "duplicate trial id; keeping first definition"
                );
                catalog.issues.push(RunIssue::new(
                    IssueKind::DuplicateTrial,
                    criteria.trial_id.clone(),
                    format!("{source} repeats an already loaded trial id and was skipped"),
                ));
            }
            Err(error) => {
                warn!(source_file = %source, %error, "skipping trial record");
                catalog
                    .issues
                    .push(RunIssue::new(error.issue_kind(), source, error.to_string()));
            }
        }
    }

    info!(
        trial_count = catalog.trials.len(),
        issue_count = catalog.issues.len(),
        duration_ms = start.elapsed().as_millis(),
        "trial criteria ready"
    );
    catalog
}
