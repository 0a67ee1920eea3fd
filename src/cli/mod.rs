//! CLI subcommand definitions and handlers.
//!
//! Implements a git-like subcommand architecture:
//! - `torscout scan <targets> [output_dir]` - Fetch every target through Tor
//! - `torscout report <scan_report.json> [output_dir]` - Regenerate artifacts
//!
//! The bare form `torscout <targets> [output_dir]` is kept as an alias for
//! `scan`.

mod progress;
mod report;
mod scan;

pub use progress::ConsoleProgress;
pub use report::ReportCommand;
pub use scan::ScanCommand;

use crate::error::{CliError, CliResult};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// torscout - fetch a list of .onion targets through a local Tor proxy.
///
/// Targets are fetched one at a time with a pause between requests, and
/// every run produces JSON, text, CSV and HTML reports plus the captured
/// page bodies.
#[derive(Parser, Debug)]
#[command(name = "torscout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sequential Tor hidden-service scanner", long_about = None)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to custom configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // Legacy mode: if no subcommand, treat the positionals as `scan` arguments
    /// Targets file (legacy mode, use 'torscout scan' instead)
    #[arg(value_name = "TARGETS", hide = true)]
    pub legacy_targets: Option<PathBuf>,

    /// Output directory (legacy mode)
    #[arg(value_name = "OUTPUT_DIR", hide = true)]
    pub legacy_output_dir: Option<PathBuf>,
}

impl Cli {
    /// The command to run, with the legacy form mapped onto `scan`.
    pub fn into_command(self) -> CliResult<Commands> {
        match (self.command, self.legacy_targets) {
            (Some(command), _) => Ok(command),
            (None, Some(targets)) => Ok(Commands::Scan(ScanCommand::new(
                targets,
                self.legacy_output_dir,
            ))),
            (None, None) => Err(CliError::Usage(
                "missing targets file; usage: torscout scan <TARGETS> [OUTPUT_DIR]".to_string(),
            )),
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every target in a targets file through the Tor proxy
    #[command(alias = "s")]
    Scan(ScanCommand),

    /// Rebuild report artifacts from a saved scan_report.json
    #[command(alias = "r")]
    Report(ReportCommand),
}

/// How a command finished, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    /// Interrupted by Ctrl-C; partial results were still reported.
    Cancelled,
}

impl RunStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Completed => 0,
            Self::Cancelled => 130,
        }
    }
}

/// Console rendering of the final report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_subcommand() {
        let cli = Cli::try_parse_from([
            "torscout",
            "scan",
            "targets.yaml",
            "out",
            "--proxy-port",
            "9250",
            "--format",
            "json",
            "--no-save",
        ])
        .unwrap();

        match cli.into_command().unwrap() {
            Commands::Scan(scan) => {
                assert_eq!(scan.targets, PathBuf::from("targets.yaml"));
                assert_eq!(scan.output_dir, Some(PathBuf::from("out")));
                assert_eq!(scan.proxy_port, Some(9250));
                assert_eq!(scan.format, OutputFormat::Json);
                assert!(scan.no_save);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_legacy_form_maps_to_scan() {
        let cli = Cli::try_parse_from(["torscout", "-v", "targets.txt", "results"]).unwrap();
        assert!(cli.verbose);

        match cli.into_command().unwrap() {
            Commands::Scan(scan) => {
                assert_eq!(scan.targets, PathBuf::from("targets.txt"));
                assert_eq!(scan.output_dir, Some(PathBuf::from("results")));
                assert_eq!(scan.format, OutputFormat::Plain);
                assert!(!scan.no_save);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_missing_targets_is_usage_error() {
        let cli = Cli::try_parse_from(["torscout"]).unwrap();
        assert!(matches!(cli.into_command(), Err(CliError::Usage(_))));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(RunStatus::Completed.exit_code(), 0);
        assert_eq!(RunStatus::Cancelled.exit_code(), 130);
    }
}
