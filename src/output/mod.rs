//! Output module - renders a finished [`ScanReport`].
//!
//! Writers for each artifact format take any `io::Write`, so the same code
//! serves files, stdout and tests. [`save_report`] writes the full artifact
//! set into a directory:
//!
//! | file | content |
//! |---|---|
//! | `scan_report.json` | lossless JSON record |
//! | `scan_report.txt` | line-oriented detailed log |
//! | `scan_report.csv` | one row per outcome |
//! | `scan_report.html` | self-contained visual report |
//! | `SCAN_SUMMARY.txt` | quick stats and file index |
//! | `content/*.html` | captured body of every successful fetch |

mod content;
mod csv_format;
mod html_format;
mod json_format;
mod plain;
mod summary;
mod text_format;

pub use content::{content_file_name, save_contents, CONTENT_DIR};
pub use csv_format::write_csv;
pub use html_format::render_html;
pub use json_format::{load_report, write_json};
pub use plain::{
    print_error, print_info, print_scan_header, print_success, print_warning, write_plain,
};
pub use summary::write_summary;
pub use text_format::write_text_log;

use crate::cli::OutputFormat;
use crate::error::ReportResult;
use crate::types::ScanReport;
use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const JSON_REPORT: &str = "scan_report.json";
pub const TEXT_REPORT: &str = "scan_report.txt";
pub const CSV_REPORT: &str = "scan_report.csv";
pub const HTML_REPORT: &str = "scan_report.html";
pub const SUMMARY_REPORT: &str = "SCAN_SUMMARY.txt";

/// Files written by [`save_report`].
#[derive(Debug, Clone, Default)]
pub struct SavedArtifacts {
    /// Report files, in the order they were written.
    pub reports: Vec<PathBuf>,
    /// Captured page bodies under `content/`.
    pub contents: Vec<PathBuf>,
}

/// Print a report to stdout in the requested format.
pub fn print_results(report: &ScanReport, format: OutputFormat) -> ReportResult<()> {
    write_results(report, format, &mut io::stdout().lock())
}

/// Render a report in the requested format to any writer.
pub fn write_results<W: Write + ?Sized>(
    report: &ScanReport,
    format: OutputFormat,
    out: &mut W,
) -> ReportResult<()> {
    match format {
        OutputFormat::Plain => write_plain(report, out)?,
        OutputFormat::Json => {
            write_json(report, out)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_csv(report, &mut *out)?,
    }
    out.flush()?;
    Ok(())
}

/// Write every report artifact into `dir`, creating it if needed.
pub fn save_report(report: &ScanReport, dir: &Path) -> ReportResult<SavedArtifacts> {
    save_report_at(report, dir, Utc::now())
}

/// [`save_report`] with a fixed generation timestamp.
pub fn save_report_at(
    report: &ScanReport,
    dir: &Path,
    generated_at: DateTime<Utc>,
) -> ReportResult<SavedArtifacts> {
    fs::create_dir_all(dir)?;
    let mut saved = SavedArtifacts::default();

    let path = dir.join(JSON_REPORT);
    write_file(&path, |w| write_json(report, w))?;
    info!("JSON report saved to {}", path.display());
    saved.reports.push(path);

    let path = dir.join(HTML_REPORT);
    let html = render_html(report, generated_at)?;
    fs::write(&path, html)?;
    info!("HTML report saved to {}", path.display());
    saved.reports.push(path);

    let path = dir.join(TEXT_REPORT);
    write_file(&path, |w| write_text_log(report, w, generated_at))?;
    info!("Text report saved to {}", path.display());
    saved.reports.push(path);

    let path = dir.join(CSV_REPORT);
    write_file(&path, |w| write_csv(report, w))?;
    info!("CSV report saved to {}", path.display());
    saved.reports.push(path);

    saved.contents = save_contents(report, dir);

    let path = dir.join(SUMMARY_REPORT);
    write_file(&path, |w| write_summary(report, w, generated_at))?;
    info!("Summary saved to {}", path.display());
    saved.reports.push(path);

    Ok(saved)
}

fn write_file<F>(path: &Path, render: F) -> ReportResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> ReportResult<()>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    render(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Human-readable duration, e.g. `4.20s` or `3m 7.05s`.
pub fn format_duration(duration: chrono::Duration) -> String {
    let millis = duration.num_milliseconds().max(0);
    let minutes = millis / 60_000;
    let seconds = (millis % 60_000) as f64 / 1000.0;
    if minutes > 0 {
        format!("{}m {:.2}s", minutes, seconds)
    } else {
        format!("{:.2}s", seconds)
    }
}
