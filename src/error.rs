//! Error types for torscout.
//!
//! Uses `thiserror` for ergonomic error definitions. Only pipeline-fatal
//! conditions are errors; a target that cannot be fetched is recorded as a
//! [`FetchOutcome`](crate::types::FetchOutcome) instead.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort a scan before any target is fetched.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to read targets from '{}': {source}", path.display())]
    TargetSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no SOCKS5 proxy reachable on {primary} or {fallback}: {reason}")]
    ProxyUnavailable {
        primary: SocketAddr,
        fallback: SocketAddr,
        reason: String,
    },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// Errors related to configuration management.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {reason}", path.display())]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid config format: {0}")]
    InvalidFormat(String),

    #[error("invalid setting: {0}")]
    Invalid(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidFormat(e.to_string())
    }
}

/// Errors raised while writing or loading report artifacts.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("inconsistent report: {0}")]
    Inconsistent(String),
}

/// Top-level error for CLI commands.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("no targets found in '{}'", .0.display())]
    NoTargets(PathBuf),

    #[error("{0}")]
    Usage(String),
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;
/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
/// Result type alias for report operations.
pub type ReportResult<T> = Result<T, ReportError>;
/// Result type alias for CLI commands.
pub type CliResult<T> = Result<T, CliError>;
