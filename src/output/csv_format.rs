//! CSV output formatting.

use crate::error::ReportResult;
use crate::types::ScanReport;
use chrono::SecondsFormat;
use std::io::Write;

/// Write one row per outcome, in target-list order.
pub fn write_csv<W: Write>(report: &ScanReport, out: W) -> ReportResult<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record([
        "URL",
        "Status",
        "HTTP_Code",
        "Timestamp",
        "Content_Size",
        "Error",
    ])?;

    for outcome in report.outcomes() {
        wtr.write_record([
            outcome.url.as_str(),
            &outcome.kind.to_string(),
            &outcome.status_code.to_string(),
            &outcome.captured_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            &outcome.content_size().to_string(),
            outcome.error.as_deref().unwrap_or("None"),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::sample_report;

    #[test]
    fn test_csv_rows() {
        let mut buf = Vec::new();
        write_csv(&sample_report(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "URL,Status,HTTP_Code,Timestamp,Content_Size,Error");
        assert_eq!(
            lines[1],
            "example.onion,SUCCESS,200,2024-05-01T12:00:00Z,5,None"
        );
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_csv_quotes_error_text() {
        let mut buf = Vec::new();
        write_csv(&sample_report(), &mut buf).unwrap();

        let mut rdr = csv::Reader::from_reader(buf.as_slice());
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            &rows[1][5],
            "Request failed: connection refused, \"proxy\" said no"
        );
        assert_eq!(&rows[1][2], "0");
    }
}
