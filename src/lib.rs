//! # torscout - Sequential Tor Hidden-Service Scanner
//!
//! torscout reads a list of targets (usually `.onion` addresses), fetches
//! each one through a local Tor SOCKS5 proxy, classifies the outcome and
//! writes a set of reports.
//!
//! ## Features
//!
//! - **Proxy discovery**: probes the Tor Browser port (9150) and falls back
//!   to the system daemon port (9050)
//! - **Polite pacing**: one request in flight, with a pause between targets
//! - **Bounded capture**: bodies are read up to 1 MiB and flagged when cut
//! - **Flexible input**: YAML/JSON target documents or one URL per line
//! - **Multiple outputs**: JSON, text log, CSV, HTML and captured pages
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use torscout::loader::load_targets;
//! use torscout::proxy::{ProxyClientFactory, ProxyConfig};
//! use torscout::scanner::{FetchConfig, HttpFetcher, ScanOptions, ScanOrchestrator};
//! use std::path::Path;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let loaded = load_targets(Path::new("targets.yaml"))?;
//! let proxy = ProxyClientFactory::new(ProxyConfig::default()).build().await?;
//! let fetcher = HttpFetcher::from_proxy(&proxy, FetchConfig::default());
//!
//! let report = ScanOrchestrator::new(&fetcher, ScanOptions::default())
//!     .run(loaded.targets)
//!     .await;
//! println!("{}/{} reachable", report.success_count(), report.target_count());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Targets, per-target outcomes and the aggregate report
//! - [`loader`] - Target list parsing
//! - [`proxy`] - SOCKS5 endpoint probing and HTTP client construction
//! - [`scanner`] - The `Fetcher` trait, its HTTP implementation and the orchestrator
//! - [`output`] - Report artifacts and console rendering
//! - [`config`] - Settings file handling
//! - [`cli`] - Command definitions and handlers
//! - [`error`] - Error types

pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod proxy;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ReportError, ScanError};
pub use scanner::{Fetcher, HttpFetcher, ScanOptions, ScanOrchestrator};
pub use types::{FetchOutcome, OutcomeKind, ScanReport, Target};
