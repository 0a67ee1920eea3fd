//! Scanner module - fetches targets one at a time and builds the report.
//!
//! The scan is strictly sequential: a fetch starts only after the previous
//! one has completed and the pacing delay has elapsed. A single request in
//! flight keeps the shared Tor circuit from being burst and makes requests
//! harder to correlate.

pub mod http;
pub mod progress;
pub mod traits;

use crate::types::{ReportBuilder, ScanReport, Target};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub use http::{normalize_url, HttpFetcher};
pub use progress::{LogProgress, NoProgress, ProgressSink};
pub use traits::{FetchConfig, Fetcher, DEFAULT_USER_AGENT, MAX_BODY_BYTES};

/// Default wait between two consecutive fetches.
pub const DEFAULT_PACING_DELAY: Duration = Duration::from_secs(1);

/// Run-level policy for the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Wait between one target's completion and the next fetch start.
    pub pacing_delay: Duration,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            pacing_delay: DEFAULT_PACING_DELAY,
        }
    }
}

impl ScanOptions {
    /// Set the pacing delay.
    pub fn with_pacing_delay(mut self, delay: Duration) -> Self {
        self.pacing_delay = delay;
        self
    }
}

/// Drives one scan run.
///
/// The orchestrator is consumed by [`run`](Self::run), so a run goes from
/// not started, through running (a [`ReportBuilder`] is being filled), to
/// finished (a frozen [`ScanReport`]) exactly once.
pub struct ScanOrchestrator<'a> {
    fetcher: &'a dyn Fetcher,
    options: ScanOptions,
    progress: &'a dyn ProgressSink,
    cancel: CancellationToken,
}

impl<'a> ScanOrchestrator<'a> {
    /// Create an orchestrator that logs progress through `tracing`.
    pub fn new(fetcher: &'a dyn Fetcher, options: ScanOptions) -> Self {
        Self {
            fetcher,
            options,
            progress: &LogProgress,
            cancel: CancellationToken::new(),
        }
    }

    /// Send progress notifications to `sink`.
    pub fn with_progress(mut self, sink: &'a dyn ProgressSink) -> Self {
        self.progress = sink;
        self
    }

    /// Stop between targets once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Fetch every target in order and return the finalized report.
    ///
    /// Per-target failures are recorded in the report and never stop the
    /// run. On cancellation the report holds the targets attempted so far.
    pub async fn run(self, targets: Vec<Target>) -> ScanReport {
        self.progress.scan_started(targets.len());

        let mut report = ReportBuilder::start();
        let mut cancelled = false;

        for (index, target) in targets.iter().enumerate() {
            if index > 0 && !self.pace().await {
                cancelled = true;
                break;
            }
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            self.progress.target_started(index, target);
            let outcome = self.fetcher.fetch(target).await;
            self.progress.target_finished(index, &outcome);
            report.record(outcome);
        }

        if cancelled {
            warn!(
                "Scan cancelled after {} of {} targets",
                report.recorded(),
                targets.len()
            );
        }

        let report = report.finish(cancelled);
        self.progress.scan_finished(&report);
        report
    }

    /// Wait out the pacing delay. Returns `false` if cancelled meanwhile.
    async fn pace(&self) -> bool {
        if self.options.pacing_delay.is_zero() {
            return !self.cancel.is_cancelled();
        }

        debug!("Pacing for {:?}", self.options.pacing_delay);
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(self.options.pacing_delay) => true,
        }
    }
}
