//! Short summary file pointing at the other artifacts.

use super::{
    format_duration, CONTENT_DIR, CSV_REPORT, HTML_REPORT, JSON_REPORT, SUMMARY_REPORT,
    TEXT_REPORT,
};
use crate::error::ReportResult;
use crate::types::ScanReport;
use chrono::{DateTime, Utc};
use std::io::Write;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn write_summary<W: Write>(
    report: &ScanReport,
    out: &mut W,
    generated_at: DateTime<Utc>,
) -> ReportResult<()> {
    let rate = report.success_rate();
    let failure_rate = if report.target_count() == 0 { 0.0 } else { 100.0 - rate };

    writeln!(out, "TORSCOUT - SCAN SUMMARY")?;
    writeln!(out, "{}", "═".repeat(60))?;
    writeln!(out)?;
    writeln!(out, "QUICK STATS:")?;
    writeln!(out, "   • Total Targets Scanned: {}", report.target_count())?;
    writeln!(out, "   • Successful: {} ({:.1}%)", report.success_count(), rate)?;
    writeln!(out, "   • Failed: {} ({:.1}%)", report.failure_count(), failure_rate)?;
    if report.is_cancelled() {
        writeln!(out, "   • Run was cancelled before all targets were attempted")?;
    }
    writeln!(out)?;
    writeln!(out, "TIMING:")?;
    writeln!(out, "   • Started: {}", report.started_at().format(TIME_FORMAT))?;
    writeln!(out, "   • Completed: {}", report.finished_at().format(TIME_FORMAT))?;
    writeln!(out, "   • Duration: {}", format_duration(report.duration()))?;
    writeln!(out)?;
    writeln!(out, "OUTPUT FILES GENERATED:")?;
    for (name, what) in [
        (JSON_REPORT, "Machine-readable JSON format"),
        (HTML_REPORT, "HTML visualization"),
        (TEXT_REPORT, "Detailed text report"),
        (CSV_REPORT, "CSV format for spreadsheets"),
        (SUMMARY_REPORT, "This summary file"),
    ] {
        writeln!(out, "   • {:<18}- {}", name, what)?;
    }
    writeln!(
        out,
        "   • {:<18}- {} captured page(s)",
        format!("{}/", CONTENT_DIR),
        report.captured_pages().count()
    )?;
    writeln!(out)?;
    writeln!(out, "{}", "═".repeat(60))?;
    writeln!(out, "Generated: {}", generated_at.format(TIME_FORMAT))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::sample_report;
    use crate::types::ReportBuilder;

    #[test]
    fn test_summary_rates() {
        let mut buf = Vec::new();
        write_summary(&sample_report(), &mut buf, Utc::now()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Total Targets Scanned: 3"));
        assert!(text.contains("Successful: 2 (66.7%)"));
        assert!(text.contains("Failed: 1 (33.3%)"));
        assert!(text.contains("1 captured page(s)"));
    }

    #[test]
    fn test_empty_run_has_zero_rates() {
        let report = ReportBuilder::start().finish(false);
        let mut buf = Vec::new();
        write_summary(&report, &mut buf, Utc::now()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Successful: 0 (0.0%)"));
        assert!(text.contains("Failed: 0 (0.0%)"));
    }
}
