//! Report subcommand implementation.

use crate::cli::RunStatus;
use crate::config::AppSettings;
use crate::error::CliResult;
use crate::output;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Rebuild every report artifact from a saved JSON report.
#[derive(Parser, Debug)]
pub struct ReportCommand {
    /// Path to a scan_report.json written by a previous scan
    #[arg(value_name = "REPORT")]
    pub input: PathBuf,

    /// Directory for the regenerated artifacts [default: output]
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,
}

impl ReportCommand {
    pub fn execute(&self, config: Option<&Path>, quiet: bool) -> CliResult<RunStatus> {
        let dir = match &self.output_dir {
            Some(dir) => dir.clone(),
            None => AppSettings::resolve(config)?.output_dir,
        };

        let report = output::load_report(&self.input)?;
        let saved = output::save_report(&report, &dir)?;

        if !quiet {
            output::print_success(&format!(
                "Regenerated {} report files and {} captured pages in {}",
                saved.reports.len(),
                saved.contents.len(),
                dir.display()
            ));
        }
        Ok(RunStatus::Completed)
    }
}
