//! Flattened CSV export: one row per (patient, eligible trial) pair.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use ctm_model::PatientResult;

use crate::common::{CRITERIA_SEPARATOR, ensure_parent_dir};

pub const CSV_HEADER: [&str; 4] = [
    "trialId",
    "trialName",
    "eligibilityCriteriaMet",
    "patientId",
];

fn write_rows<W: Write>(writer: W, results: &[PatientResult]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    // Written explicitly so an export with no rows still has columns.
    csv.write_record(CSV_HEADER).context("write csv header")?;
    for result in results {
        for trial in &result.eligible_trials {
            let criteria = trial.matched_criteria.join(CRITERIA_SEPARATOR);
            csv.write_record([
                trial.trial_id.as_str(),
                trial.trial_name.as_str(),
                criteria.as_str(),
                result.patient_id.as_str(),
            ])
            .with_context(|| format!("write row for patient {}", result.patient_id))?;
        }
    }
    csv.flush().context("flush csv")?;
    Ok(())
}

/// Renders the CSV export to a string.
pub fn render_results_csv(results: &[PatientResult]) -> Result<String> {
    let mut buffer = Vec::new();
    write_rows(&mut buffer, results)?;
    String::from_utf8(buffer).context("csv output is not UTF-8")
}

pub fn write_results_csv(path: &Path, results: &[PatientResult]) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_rows(file, results).with_context(|| format!("write {}", path.display()))
}
