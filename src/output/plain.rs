//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use super::format_duration;
use crate::types::{OutcomeKind, ScanReport};
use console::{style, Style};
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::Path;

const HEAVY_RULE: &str = "═══════════════════════════════════════════════════════════════";
const LIGHT_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Write results in human-readable plain text format.
pub fn write_plain<W: Write + ?Sized>(report: &ScanReport, out: &mut W) -> io::Result<()> {
    // Header
    writeln!(out)?;
    writeln!(out, "{}", style(HEAVY_RULE).magenta())?;
    writeln!(
        out,
        "                    {} Scan Results",
        style("torscout").magenta().bold()
    )?;
    writeln!(out, "{}", style(HEAVY_RULE).magenta())?;
    writeln!(out)?;

    writeln!(
        out,
        "  {} {} targets in {}",
        style("Statistics:").bold(),
        report.target_count(),
        format_duration(report.duration())
    )?;
    writeln!(
        out,
        "               {} successful, {} failed ({:.1}%)",
        style(report.success_count()).green().bold(),
        style(report.failure_count()).red(),
        report.success_rate()
    )?;
    if report.is_cancelled() {
        writeln!(
            out,
            "               {}",
            style("cancelled before all targets were attempted").yellow()
        )?;
    }
    writeln!(out)?;

    if report.outcomes().is_empty() {
        writeln!(out, "  {}", style("No targets to display.").dim())?;
    } else {
        writeln!(out, "  {}", style(LIGHT_RULE).dim())?;
        writeln!(
            out,
            "  {:<34}  {:^9}  {:>4}  {}",
            style("URL").bold(),
            style("STATUS").bold(),
            style("CODE").bold(),
            style("DETAILS").bold()
        )?;
        writeln!(out, "  {}", style(LIGHT_RULE).dim())?;

        for outcome in report.outcomes() {
            let status_style = match outcome.kind {
                OutcomeKind::Success => Style::new().green().bold(),
                OutcomeKind::PartialSuccess => Style::new().yellow(),
                OutcomeKind::RequestFailed | OutcomeKind::RequestBuildError => Style::new().red(),
            };

            let details = match &outcome.error {
                Some(error) => truncate_string(error, 40),
                None => format!("{} bytes", outcome.content_size()),
            };

            writeln!(
                out,
                "  {:<34}  {:^9}  {:>4}  {}",
                truncate_string(&outcome.url, 34),
                status_style.apply_to(outcome.kind.to_string()),
                outcome.status_code,
                style(details).dim()
            )?;
        }

        writeln!(out, "  {}", style(LIGHT_RULE).dim())?;
    }

    writeln!(out)?;
    writeln!(out, "{}", style(HEAVY_RULE).magenta())?;
    writeln!(out)?;

    Ok(())
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(source: &Path, targets: usize, proxy: SocketAddr) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").magenta(),
        style("torscout").magenta().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{} Targets: {}",
        style("•").dim(),
        style(source.display()).white().bold()
    );
    println!("{} Proxy: socks5h://{}", style("•").dim(), style(proxy).yellow());
    println!(
        "{} Fetching {} targets...",
        style("•").dim(),
        style(targets).white().bold()
    );
    println!();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Truncate to at most `max_chars` characters, adding an ellipsis if cut.
fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
