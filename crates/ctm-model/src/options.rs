//! Configuration options for a matching run.

use serde::{Deserialize, Serialize};

use crate::age::{DEFAULT_MAX_AGE_MONTHS, DEFAULT_MIN_AGE_MONTHS};

/// Entity label the recognizer uses for disease mentions.
pub const DISEASE_LABEL: &str = "DISEASE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Calendar year patient ages are computed against. `None` uses the
    /// current year at run time.
    pub reference_year: Option<i32>,

    /// Minimum age in months when a trial states none.
    pub default_min_age_months: u32,

    /// Maximum age in months when a trial states none.
    pub default_max_age_months: u32,

    /// Recognizer labels treated as condition mentions (case-insensitive).
    pub disease_labels: Vec<String>,

    /// Evaluate patients concurrently.
    pub parallel: bool,

    /// Worker count for concurrent evaluation. `None` uses the global pool.
    pub threads: Option<usize>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            reference_year: None,
            default_min_age_months: DEFAULT_MIN_AGE_MONTHS,
            default_max_age_months: DEFAULT_MAX_AGE_MONTHS,
            disease_labels: vec![DISEASE_LABEL.to_string()],
            parallel: true,
            threads: None,
        }
    }
}

impl MatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    pub fn with_disease_labels(mut self, labels: Vec<String>) -> Self {
        self.disease_labels = labels;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}
