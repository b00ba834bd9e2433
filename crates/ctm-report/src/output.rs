//! Writing every requested artifact for a run.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use ctm_model::MatchRun;

use crate::common::{ISSUES_JSON, RESULTS_CSV, RESULTS_JSON, ensure_output_dir};
use crate::json::{write_issues_json, write_results_json};
use crate::table::write_results_csv;

/// Which result documents to write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
    Both,
}

impl ReportFormat {
    pub fn includes_json(self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }

    pub fn includes_csv(self) -> bool {
        matches!(self, Self::Csv | Self::Both)
    }
}

/// Paths of the files a run wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOutputs {
    pub results_json: Option<PathBuf>,
    pub results_csv: Option<PathBuf>,
    pub issues_json: Option<PathBuf>,
}

impl ReportOutputs {
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        [&self.results_json, &self.results_csv, &self.issues_json]
            .into_iter()
            .flatten()
            .map(PathBuf::as_path)
    }
}

/// Writes the result documents for `format` into `output_dir`, plus
/// `issues.json` when the run recorded issues.
pub fn write_reports(
    output_dir: &Path,
    run: &MatchRun,
    format: ReportFormat,
) -> Result<ReportOutputs> {
    let output_dir = ensure_output_dir(output_dir)?;
    let mut outputs = ReportOutputs::default();

    if format.includes_json() {
        let path = output_dir.join(RESULTS_JSON);
        write_results_json(&path, &run.results)?;
        outputs.results_json = Some(path);
    }
    if format.includes_csv() {
        let path = output_dir.join(RESULTS_CSV);
        write_results_csv(&path, &run.results)?;
        outputs.results_csv = Some(path);
    }
    if run.has_issues() {
        let path = output_dir.join(ISSUES_JSON);
        write_issues_json(&path, &run.issues)?;
        outputs.issues_json = Some(path);
    }

    info!(
        output_dir = %output_dir.display(),
        files = outputs.paths().count(),
        "reports written"
    );
    Ok(outputs)
}
