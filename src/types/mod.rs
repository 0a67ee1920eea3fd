//! Core data model: targets, per-target outcomes and the aggregate report.

mod outcome;
mod report;
mod target;

pub use outcome::{FetchOutcome, OutcomeKind};
pub use report::{ReportBuilder, ScanReport};
pub use target::Target;
