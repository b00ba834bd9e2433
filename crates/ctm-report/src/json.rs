//! JSON documents: the result list and the issue report.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use ctm_model::{PatientResult, RunIssue};

use crate::common::ensure_parent_dir;

/// Renders results as a pretty-printed JSON array.
pub fn render_results_json(results: &[PatientResult]) -> Result<String> {
    serde_json::to_string_pretty(results).context("serialize results")
}

pub fn write_results_json(path: &Path, results: &[PatientResult]) -> Result<()> {
    write_json(path, results)
}

pub fn write_issues_json(path: &Path, issues: &[RunIssue]) -> Result<()> {
    write_json(path, issues)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("write {}", path.display()))?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
