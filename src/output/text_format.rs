//! Detailed line-oriented text log.

use super::format_duration;
use crate::error::ReportResult;
use crate::types::ScanReport;
use chrono::{DateTime, SecondsFormat, Utc};
use std::io::Write;

const RULE: &str =
    "══════════════════════════════════════════════════════════════════════════════";

fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Write the full per-target log.
pub fn write_text_log<W: Write>(
    report: &ScanReport,
    out: &mut W,
    generated_at: DateTime<Utc>,
) -> ReportResult<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "                    TORSCOUT - DETAILED SCAN REPORT")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out)?;

    writeln!(out, "SCAN SUMMARY")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Start Time:       {}", rfc3339(report.started_at()))?;
    writeln!(out, "End Time:         {}", rfc3339(report.finished_at()))?;
    writeln!(out, "Duration:         {}", format_duration(report.duration()))?;
    if report.is_cancelled() {
        writeln!(out, "Cancelled:        yes")?;
    }
    writeln!(out)?;

    writeln!(out, "STATISTICS")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Total URLs:       {}", report.target_count())?;
    writeln!(out, "Successful:       {}", report.success_count())?;
    writeln!(out, "Failed:           {}", report.failure_count())?;
    writeln!(out, "Success Rate:     {:.2}%", report.success_rate())?;
    writeln!(out)?;

    writeln!(out, "DETAILED RESULTS")?;
    writeln!(out, "{}", RULE)?;

    for (i, outcome) in report.outcomes().iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "[{}] URL: {}", i + 1, outcome.url)?;
        if let Some(label) = &outcome.label {
            writeln!(out, "    Name:         {}", label)?;
        }
        writeln!(out, "    Status:       {}", outcome.kind)?;
        writeln!(out, "    HTTP Code:    {}", outcome.status_code)?;
        writeln!(
            out,
            "    Timestamp:    {}",
            outcome.captured_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        if let Some(error) = &outcome.error {
            writeln!(out, "    Error:        {}", error)?;
        }
        if !outcome.body.is_empty() {
            let note = if outcome.truncated { " (truncated)" } else { "" };
            writeln!(
                out,
                "    Content Size: {} bytes{}",
                outcome.content_size(),
                note
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Report generated: {}", rfc3339(generated_at))?;
    writeln!(out, "{}", RULE)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::sample_report;
    use chrono::TimeZone;

    #[test]
    fn test_text_log_entries() {
        let generated = Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap();
        let mut buf = Vec::new();
        write_text_log(&sample_report(), &mut buf, generated).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Duration:         3.25s"));
        assert!(text.contains("Success Rate:     66.67%"));
        assert!(text.contains("[1] URL: example.onion"));
        assert!(text.contains("    Name:         Example"));
        assert!(text.contains("[2] URL: http://down.onion/path/"));
        assert!(text.contains("    Error:        Request failed"));
        assert!(text.contains("    Content Size: 5 bytes\n"));
        assert!(text.contains("Report generated: 2024-05-01T13:00:00Z"));
        assert!(!text.contains("Cancelled"));
    }
}
