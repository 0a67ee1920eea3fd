//! Progress notifications emitted while a scan runs.
//!
//! These are for operator visibility only; the [`ScanReport`] is the data
//! contract.

use crate::types::{FetchOutcome, ScanReport, Target};
use tracing::{info, warn};

/// Receives one notification per fetch attempt and its outcome.
///
/// All methods default to doing nothing.
pub trait ProgressSink: Send + Sync {
    /// Called once before the first target.
    fn scan_started(&self, _total: usize) {}

    /// Called right before a target is fetched.
    fn target_started(&self, _index: usize, _target: &Target) {}

    /// Called right after a target's outcome is known.
    fn target_finished(&self, _index: usize, _outcome: &FetchOutcome) {}

    /// Called once with the frozen report.
    fn scan_finished(&self, _report: &ScanReport) {}
}

/// Writes progress lines through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn scan_started(&self, total: usize) {
        info!("Starting scan of {} targets", total);
    }

    fn target_started(&self, _index: usize, target: &Target) {
        info!("Scanning: {}", target.url());
    }

    fn target_finished(&self, _index: usize, outcome: &FetchOutcome) {
        match &outcome.error {
            None => info!("{} -> {} (HTTP {})", outcome.url, outcome.kind, outcome.status_code),
            Some(error) => warn!("{} -> {} ({})", outcome.url, outcome.kind, error),
        }
    }

    fn scan_finished(&self, report: &ScanReport) {
        info!(
            "Scan complete: {}/{} successful",
            report.success_count(),
            report.target_count()
        );
    }
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {}
