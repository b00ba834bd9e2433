//! Matching pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: read patient bundles and trial documents
//! 2. **Criteria**: build structured criteria once per trial
//! 3. **Match**: evaluate every patient against every trial
//! 4. **Output**: write results and the issue report
//!
//! Issues from every stage are carried forward and end up in the final
//! [`MatchRun`]; none of them stops the pipeline. Only an unreadable input
//! folder, an unusable lexicon, or an unwritable output is fatal.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span, trace};

use ctm_core::{
    ConditionExtractor, EntityRecognizer, LexiconRecognizer, MatchingOrchestrator, TrialCatalog,
    build_trial_catalog,
};
use ctm_ingest::{
    SourcedRecord, TrialRecord, current_year, load_patient_profiles, load_trial_records,
};
use ctm_model::{MatchOptions, MatchRun, PatientProfile, RunIssue, TrialCriteria};
use ctm_report::{ReportFormat, ReportOutputs, write_reports};

use crate::logging::redact_value;
use crate::types::{CriteriaSummary, MatchSummary};

/// Inputs for a full matching run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub patients_dir: PathBuf,
    pub trials_dir: PathBuf,
    pub options: MatchOptions,
    /// Lexicon CSV replacing the built-in one.
    pub lexicon: Option<PathBuf>,
    /// Where to write reports. `None` skips the output stage.
    pub output_dir: Option<PathBuf>,
    pub format: ReportFormat,
}

// ============================================================================
// Recognizer setup
// ============================================================================

/// Loads the lexicon recognizer and wraps it in an extractor using the
/// configured disease labels.
pub fn build_extractor(
    lexicon: Option<&Path>,
    options: &MatchOptions,
) -> Result<ConditionExtractor> {
    let recognizer = match lexicon {
        Some(path) => LexiconRecognizer::from_csv_path(path)
            .with_context(|| format!("load lexicon {}", path.display()))?,
        None => LexiconRecognizer::default_diseases().context("load built-in lexicon")?,
    };
    info!(
        recognizer = recognizer.name(),
        terms = recognizer.len(),
        labels = ?options.disease_labels,
        "entity recognizer ready"
    );
    Ok(ConditionExtractor::new(Arc::new(recognizer)).with_labels(options.disease_labels.clone()))
}

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Result of the ingest stage.
#[derive(Debug)]
pub struct IngestResult {
    pub patients: Vec<PatientProfile>,
    pub trial_records: Vec<SourcedRecord<TrialRecord>>,
    /// Records skipped as malformed.
    pub issues: Vec<RunIssue>,
}

pub fn ingest(
    patients_dir: &Path,
    trials_dir: &Path,
    reference_year: i32,
) -> Result<IngestResult> {
    let span = info_span!(
        "ingest",
        patients_dir = %patients_dir.display(),
        trials_dir = %trials_dir.display(),
        reference_year
    );
    let _guard = span.enter();
    let start = Instant::now();

    let (patients, mut issues) =
        load_patient_profiles(patients_dir, reference_year).context("load patients")?;
    let trials = load_trial_records(trials_dir).context("load trials")?;
    issues.extend(trials.issues);

    for patient in &patients {
        trace!(
            patient_id = %patient.patient_id,
            age_months = patient.age_months,
            conditions = redact_value(&patient.conditions.as_slice().join("; ")),
            allergies = redact_value(&patient.allergies.as_slice().join("; ")),
            "patient profile"
        );
    }

    info!(
        patient_count = patients.len(),
        trial_file_count = trials.records.len(),
        skipped = issues.len(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(IngestResult {
        patients,
        trial_records: trials.records,
        issues,
    })
}

// ============================================================================
// Stage 2: Criteria
// ============================================================================

pub fn criteria(
    records: &[SourcedRecord<TrialRecord>],
    extractor: &ConditionExtractor,
    options: &MatchOptions,
) -> TrialCatalog {
    info_span!("criteria", trial_file_count = records.len())
        .in_scope(|| build_trial_catalog(records, extractor, options))
}

// ============================================================================
// Stage 3: Match
// ============================================================================

pub fn match_patients(
    patients: &[PatientProfile],
    trials: &[Arc<TrialCriteria>],
    options: &MatchOptions,
) -> MatchRun {
    info_span!(
        "match",
        patient_count = patients.len(),
        trial_count = trials.len()
    )
    .in_scope(|| MatchingOrchestrator::new(options.clone()).run_all(patients, trials))
}

// ============================================================================
// Stage 4: Output
// ============================================================================

pub fn output(output_dir: &Path, run: &MatchRun, format: ReportFormat) -> Result<ReportOutputs> {
    info_span!("output", output_dir = %output_dir.display())
        .in_scope(|| write_reports(output_dir, run, format))
        .context("write reports")
}

// ============================================================================
// Entry points
// ============================================================================

/// Runs every stage and returns the combined outcome.
///
/// Issues are ordered by stage: ingest, then criteria, then matching.
pub fn run_pipeline(config: &PipelineConfig) -> Result<MatchSummary> {
    let start = Instant::now();
    let reference_year = config.options.reference_year.unwrap_or_else(current_year);
    let extractor = build_extractor(config.lexicon.as_deref(), &config.options)?;

    let ingested = ingest(&config.patients_dir, &config.trials_dir, reference_year)?;
    let catalog = criteria(&ingested.trial_records, &extractor, &config.options);
    let matched = match_patients(&ingested.patients, &catalog.trials, &config.options);

    let mut issues = ingested.issues;
    issues.extend(catalog.issues);
    issues.extend(matched.issues);
    let run = MatchRun {
        results: matched.results,
        issues,
    };

    let outputs = match &config.output_dir {
        Some(dir) => Some(output(dir, &run, config.format)?),
        None => None,
    };

    info!(
        patients = ingested.patients.len(),
        trials = catalog.trials.len(),
        eligible_pairs = run.eligible_pair_count(),
        errors = run.error_count(),
        warnings = run.warning_count(),
        duration_ms = start.elapsed().as_millis(),
        "matching run complete"
    );

    Ok(MatchSummary {
        patients_dir: config.patients_dir.clone(),
        trials_dir: config.trials_dir.clone(),
        reference_year,
        patient_count: ingested.patients.len(),
        trial_count: catalog.trials.len(),
        run,
        outputs,
    })
}

/// Loads and builds criteria for every trial without matching.
pub fn inspect_criteria(
    trials_dir: &Path,
    lexicon: Option<&Path>,
    options: &MatchOptions,
) -> Result<CriteriaSummary> {
    let extractor = build_extractor(lexicon, options)?;
    let loaded = info_span!("ingest", trials_dir = %trials_dir.display())
        .in_scope(|| load_trial_records(trials_dir))
        .context("load trials")?;
    let catalog = criteria(&loaded.records, &extractor, options);

    let mut issues = loaded.issues;
    issues.extend(catalog.issues);
    Ok(CriteriaSummary {
        trials_dir: trials_dir.to_path_buf(),
        trials: catalog.trials,
        issues,
    })
}
