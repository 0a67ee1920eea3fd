//! Console progress sink: a progress bar with tagged result lines above it.

use crate::scanner::ProgressSink;
use crate::types::{FetchOutcome, OutcomeKind, ScanReport, Target};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Draws an `indicatif` bar on stderr and prints one line per target.
pub struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::hidden();
        if let Ok(bar_style) = ProgressStyle::default_bar()
            .template("{spinner:.magenta} [{elapsed_precise}] [{bar:40.magenta/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(bar_style.progress_chars("=>-"));
        }
        Self { bar }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ConsoleProgress {
    fn scan_started(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
    }

    fn target_started(&self, _index: usize, target: &Target) {
        self.bar
            .println(format!("{} Scanning: {}", style("[INFO]").blue().bold(), target.url()));
        self.bar.set_message(target.url().to_string());
    }

    fn target_finished(&self, _index: usize, outcome: &FetchOutcome) {
        let line = match outcome.kind {
            OutcomeKind::Success => format!(
                "{} {} -> {} ({} bytes)",
                style("[SUCCESS]").green().bold(),
                outcome.url,
                outcome.status_code,
                outcome.content_size()
            ),
            OutcomeKind::PartialSuccess => format!(
                "{} {} -> {} ({})",
                style("[PARTIAL]").yellow().bold(),
                outcome.url,
                outcome.status_code,
                outcome.error.as_deref().unwrap_or_default()
            ),
            OutcomeKind::RequestFailed | OutcomeKind::RequestBuildError => format!(
                "{} {} -> {}",
                style("[ERR]").red().bold(),
                outcome.url,
                outcome.error.as_deref().unwrap_or_default()
            ),
        };
        self.bar.println(line);
        self.bar.inc(1);
    }

    fn scan_finished(&self, report: &ScanReport) {
        let msg = if report.is_cancelled() { "cancelled" } else { "done" };
        self.bar.finish_with_message(msg);
    }
}
