//! Warnings and errors collected during a run.
//!
//! Issues never abort a run. They are reported on a channel separate from the
//! result document so consumers can tell processed patients from skipped ones.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::verdict::PatientResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A record is missing a required field or is not a valid document.
    MalformedInput,
    /// Both stated age bounds exist and the minimum exceeds the maximum.
    InvertedAgeRange,
    /// A trial id was seen more than once; later records are skipped.
    DuplicateTrial,
    /// The entity recognizer failed on a criteria block.
    RecognizerFailure,
    /// Evaluating one patient failed; other patients were unaffected.
    PartialBatchFailure,
}

impl IssueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MalformedInput => "malformed input",
            Self::InvertedAgeRange => "inverted age range",
            Self::DuplicateTrial => "duplicate trial",
            Self::RecognizerFailure => "recognizer failure",
            Self::PartialBatchFailure => "patient evaluation failed",
        }
    }

    /// Skipped or failed records, as opposed to degraded ones.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Self::MalformedInput | Self::InvertedAgeRange | Self::PartialBatchFailure
        )
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunIssue {
    pub kind: IssueKind,
    /// Patient id, trial id, or source path identifying the record.
    pub record: String,
    pub message: String,
}

impl RunIssue {
    pub fn new(kind: IssueKind, record: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            record: record.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for RunIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.kind, self.record, self.message)
    }
}

/// Everything a matching run produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRun {
    pub results: Vec<PatientResult>,
    pub issues: Vec<RunIssue>,
}

impl MatchRun {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.kind.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues.len() - self.error_count()
    }

    /// Number of (patient, eligible trial) pairs across all results.
    pub fn eligible_pair_count(&self) -> usize {
        self.results.iter().map(|r| r.eligible_trials.len()).sum()
    }
}
