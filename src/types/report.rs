//! Aggregate scan report.
//!
//! A [`ReportBuilder`] is the mutable, in-progress form owned by the
//! orchestrator while a run is executing. [`ReportBuilder::finish`] freezes
//! it into a read-only [`ScanReport`] that can be shared with the output
//! writers.

use super::FetchOutcome;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The finalized result of one scan run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    #[serde(rename = "total_urls")]
    target_count: usize,
    #[serde(rename = "successful")]
    success_count: usize,
    #[serde(rename = "failed")]
    failure_count: usize,
    #[serde(rename = "start_time")]
    started_at: DateTime<Utc>,
    #[serde(rename = "end_time")]
    finished_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    cancelled: bool,
    #[serde(rename = "results")]
    outcomes: Vec<FetchOutcome>,
}

impl ScanReport {
    pub fn target_count(&self) -> usize {
        self.target_count
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn failure_count(&self) -> usize {
        self.failure_count
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    /// Whether the run was stopped before every target was attempted.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Outcomes in target-list order.
    pub fn outcomes(&self) -> &[FetchOutcome] {
        &self.outcomes
    }

    /// Wall-clock duration of the run.
    pub fn duration(&self) -> Duration {
        self.finished_at - self.started_at
    }

    /// Percentage of successful targets, 0 when nothing was scanned.
    pub fn success_rate(&self) -> f64 {
        if self.target_count == 0 {
            0.0
        } else {
            self.success_count as f64 / self.target_count as f64 * 100.0
        }
    }

    /// Successful outcomes that captured a non-empty body.
    pub fn captured_pages(&self) -> impl Iterator<Item = &FetchOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.is_success() && !o.body.is_empty())
    }

    /// Describe the first broken aggregate invariant, if any.
    ///
    /// Reports built through [`ReportBuilder`] always pass; this exists for
    /// reports loaded back from disk.
    pub fn inconsistency(&self) -> Option<String> {
        if self.success_count + self.failure_count != self.target_count {
            return Some(format!(
                "successful ({}) + failed ({}) != total ({})",
                self.success_count, self.failure_count, self.target_count
            ));
        }
        if self.outcomes.len() != self.target_count {
            return Some(format!(
                "{} results recorded for {} targets",
                self.outcomes.len(),
                self.target_count
            ));
        }
        let successes = self.outcomes.iter().filter(|o| o.is_success()).count();
        if successes != self.success_count {
            return Some(format!(
                "{} successful results but successful = {}",
                successes, self.success_count
            ));
        }
        if self.finished_at < self.started_at {
            return Some("end_time precedes start_time".to_string());
        }
        if let Some(bad) = self.outcomes.iter().find(|o| !o.is_consistent()) {
            return Some(format!(
                "result for '{}' has status {} with HTTP code {}",
                bad.url, bad.kind, bad.status_code
            ));
        }
        None
    }
}

/// In-progress report for a running scan.
#[derive(Debug)]
pub struct ReportBuilder {
    started_at: DateTime<Utc>,
    success_count: usize,
    failure_count: usize,
    outcomes: Vec<FetchOutcome>,
}

impl ReportBuilder {
    /// Start a report at the current time.
    pub fn start() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Start a report at a fixed time.
    pub fn starting_at(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            success_count: 0,
            failure_count: 0,
            outcomes: Vec::new(),
        }
    }

    /// Append one outcome and update the counters.
    pub fn record(&mut self, outcome: FetchOutcome) {
        if outcome.is_success() {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
        }
        self.outcomes.push(outcome);
    }

    /// Number of outcomes recorded so far.
    pub fn recorded(&self) -> usize {
        self.outcomes.len()
    }

    /// Freeze the report at the current time.
    pub fn finish(self, cancelled: bool) -> ScanReport {
        self.finish_at(Utc::now(), cancelled)
    }

    /// Freeze the report at a fixed time. A clock that went backwards is
    /// clamped so the end never precedes the start.
    pub fn finish_at(self, finished_at: DateTime<Utc>, cancelled: bool) -> ScanReport {
        ScanReport {
            target_count: self.outcomes.len(),
            success_count: self.success_count,
            failure_count: self.failure_count,
            started_at: self.started_at,
            finished_at: finished_at.max(self.started_at),
            cancelled,
            outcomes: self.outcomes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Target;

    fn outcome(url: &str, ok: bool) -> FetchOutcome {
        let target = Target::new(url).unwrap();
        if ok {
            FetchOutcome::success(&target, Utc::now(), 200, "body".to_string())
        } else {
            FetchOutcome::request_failed(&target, Utc::now(), "Request failed: refused")
        }
    }

    #[test]
    fn test_empty_report() {
        let report = ReportBuilder::start().finish(false);
        assert_eq!(report.target_count(), 0);
        assert_eq!(report.success_rate(), 0.0);
        assert!(report.inconsistency().is_none());
    }

    #[test]
    fn test_counts_follow_outcomes() {
        let mut builder = ReportBuilder::start();
        builder.record(outcome("a.onion", true));
        builder.record(outcome("b.onion", false));
        builder.record(outcome("c.onion", true));
        let report = builder.finish(false);

        assert_eq!(report.target_count(), 3);
        assert_eq!(report.success_count(), 2);
        assert_eq!(report.failure_count(), 1);
        assert_eq!(
            report.outcomes().iter().map(|o| o.url.as_str()).collect::<Vec<_>>(),
            vec!["a.onion", "b.onion", "c.onion"]
        );
        assert!((report.success_rate() - 66.666).abs() < 0.01);
        assert_eq!(report.captured_pages().count(), 2);
    }

    #[test]
    fn test_finish_clamps_backwards_clock() {
        let start = Utc::now();
        let report = ReportBuilder::starting_at(start).finish_at(start - Duration::seconds(5), false);
        assert_eq!(report.finished_at(), start);
        assert_eq!(report.duration(), Duration::zero());
    }

    #[test]
    fn test_inconsistency_detected_after_tampering() {
        let mut builder = ReportBuilder::start();
        builder.record(outcome("a.onion", true));
        let mut value = serde_json::to_value(builder.finish(false)).unwrap();
        value["failed"] = serde_json::json!(4);

        let tampered: ScanReport = serde_json::from_value(value).unwrap();
        assert!(tampered.inconsistency().is_some());
    }
}
