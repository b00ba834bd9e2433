//! Report writers for the trial matcher.
//!
//! - **results.json**: one entry per processed patient with the trials they
//!   are eligible for.
//! - **results.csv**: the same data flattened to one row per
//!   (patient, eligible trial) pair.
//! - **issues.json**: skipped and failed records, written only when a run
//!   recorded any.

mod common;
mod json;
mod output;
mod table;

pub use common::{
    CRITERIA_SEPARATOR, ISSUES_JSON, RESULTS_CSV, RESULTS_JSON, ensure_output_dir,
    ensure_parent_dir,
};
pub use json::{render_results_json, write_issues_json, write_results_json};
pub use output::{ReportFormat, ReportOutputs, write_reports};
pub use table::{CSV_HEADER, render_results_csv, write_results_csv};
