// JSON report for the plotting side.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::pipeline::AnalysisReport;

pub fn to_json(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize analysis report")
}

/// Write `report` as pretty-printed JSON, creating parent directories.
pub fn write_report(path: &Path, report: &AnalysisReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, to_json(report)?)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    info!(path = %path.display(), "Wrote analysis report");
    Ok(())
}
