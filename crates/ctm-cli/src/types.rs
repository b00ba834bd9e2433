use std::path::PathBuf;
use std::sync::Arc;

use ctm_model::{MatchRun, RunIssue, TrialCriteria};
use ctm_report::ReportOutputs;

/// Outcome of the `match` command.
#[derive(Debug)]
pub struct MatchSummary {
    pub patients_dir: PathBuf,
    pub trials_dir: PathBuf,
    pub reference_year: i32,
    /// Patients loaded successfully (evaluated or failed during matching).
    pub patient_count: usize,
    /// Trials that passed criteria building.
    pub trial_count: usize,
    /// Results plus every issue from ingest, criteria and matching.
    pub run: MatchRun,
    /// `None` for dry runs.
    pub outputs: Option<ReportOutputs>,
}

impl MatchSummary {
    pub fn has_issues(&self) -> bool {
        self.run.has_issues()
    }
}

/// Outcome of the `criteria` command.
#[derive(Debug)]
pub struct CriteriaSummary {
    pub trials_dir: PathBuf,
    pub trials: Vec<Arc<TrialCriteria>>,
    pub issues: Vec<RunIssue>,
}

impl CriteriaSummary {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}
