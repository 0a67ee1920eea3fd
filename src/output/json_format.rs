//! JSON output formatting.

use crate::error::{ReportError, ReportResult};
use crate::types::ScanReport;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Write the report as pretty-printed JSON.
pub fn write_json<W: Write + ?Sized>(report: &ScanReport, out: &mut W) -> ReportResult<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    Ok(())
}

/// Read a report previously written by [`write_json`].
///
/// Reports whose counters disagree with their results are rejected.
pub fn load_report(path: &Path) -> ReportResult<ScanReport> {
    let content = fs::read_to_string(path)?;
    let report: ScanReport = serde_json::from_str(&content)?;
    match report.inconsistency() {
        Some(problem) => Err(ReportError::Inconsistent(problem)),
        None => Ok(report),
    }
}
