//! Shared helpers for report writers.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File name of the JSON result document.
pub const RESULTS_JSON: &str = "results.json";

/// File name of the flattened CSV export.
pub const RESULTS_CSV: &str = "results.csv";

/// File name of the issue report.
pub const ISSUES_JSON: &str = "issues.json";

/// Separator between matched criteria in a CSV cell.
pub const CRITERIA_SEPARATOR: &str = "; ";

/// Ensure a parent directory exists for a file path.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    Ok(())
}

/// Ensure an output directory exists and return it.
pub fn ensure_output_dir(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir.to_path_buf())
}
