//! Scan subcommand implementation.
//!
//! Handles `torscout scan <targets> [output_dir]`: resolve settings, load
//! targets, pick the proxy endpoint, run the orchestrator and write the
//! report artifacts.

use crate::cli::{ConsoleProgress, OutputFormat, RunStatus};
use crate::config::AppSettings;
use crate::error::{CliError, CliResult};
use crate::loader::load_targets;
use crate::output;
use crate::proxy::ProxyClientFactory;
use crate::scanner::{HttpFetcher, LogProgress, ProgressSink, ScanOrchestrator};
use crate::types::ScanReport;
use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Fetch every target in a targets file through the Tor proxy.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Targets file: YAML/JSON with a `targets` list, or one URL per line
    #[arg(value_name = "TARGETS")]
    pub targets: PathBuf,

    /// Directory for report artifacts [default: output]
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// SOCKS5 port probed first [default: 9150]
    #[arg(short = 'p', long, value_name = "PORT")]
    pub proxy_port: Option<u16>,

    /// SOCKS5 port used when the first one does not answer [default: 9050]
    #[arg(long, value_name = "PORT")]
    pub fallback_port: Option<u16>,

    /// Pause between two fetches in milliseconds [default: 1000]
    #[arg(short = 'd', long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Console rendering of the final report
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,

    /// Don't write report files
    #[arg(long)]
    pub no_save: bool,
}

impl ScanCommand {
    /// A scan with default flags, as built by the legacy invocation.
    pub fn new(targets: PathBuf, output_dir: Option<PathBuf>) -> Self {
        Self {
            targets,
            output_dir,
            proxy_port: None,
            fallback_port: None,
            delay_ms: None,
            format: OutputFormat::Plain,
            no_save: false,
        }
    }

    /// Layer the command-line flags over loaded settings.
    pub fn apply_overrides(&self, mut settings: AppSettings) -> AppSettings {
        if let Some(port) = self.proxy_port {
            settings.primary_port = port;
        }
        if let Some(port) = self.fallback_port {
            settings.fallback_port = port;
        }
        if let Some(delay) = self.delay_ms {
            settings.pacing_delay_ms = delay;
        }
        if let Some(dir) = &self.output_dir {
            settings.output_dir = dir.clone();
        }
        settings
    }

    /// Execute the scan command.
    pub async fn execute(&self, config: Option<&Path>, quiet: bool) -> CliResult<RunStatus> {
        let settings = self.apply_overrides(AppSettings::resolve(config)?);
        settings.validate()?;

        let loaded = load_targets(&self.targets)?;
        if loaded.targets.is_empty() {
            return Err(CliError::NoTargets(self.targets.clone()));
        }
        info!(
            "Loaded {} targets ({} format)",
            loaded.targets.len(),
            loaded.format
        );

        let proxy = ProxyClientFactory::new(settings.proxy_config()).build().await?;
        let planned = loaded.targets.len();

        // Keep stdout clean for JSON/CSV
        let console = !quiet && self.format == OutputFormat::Plain;
        if console {
            output::print_scan_header(&self.targets, planned, proxy.endpoint());
        }

        let fetcher = HttpFetcher::from_proxy(&proxy, settings.fetch_config());
        let cancel = CancellationToken::new();
        let interrupt = spawn_interrupt_handler(cancel.clone());

        let console_progress;
        let progress: &dyn ProgressSink = if console {
            console_progress = ConsoleProgress::new();
            &console_progress
        } else {
            &LogProgress
        };

        let report = ScanOrchestrator::new(&fetcher, settings.scan_options())
            .with_progress(progress)
            .with_cancellation(cancel.clone())
            .run(loaded.targets)
            .await;
        interrupt.abort();

        if report.is_cancelled() {
            warn!(
                "Scan interrupted: {} of {} planned targets attempted",
                report.target_count(),
                planned
            );
        }

        self.deliver(&report, &settings.output_dir, console, &mut io::stdout().lock())?;

        Ok(if report.is_cancelled() {
            RunStatus::Cancelled
        } else {
            RunStatus::Completed
        })
    }

    /// Save the artifacts, then render the report to `out`. A failed
    /// console write is only logged.
    fn deliver(
        &self,
        report: &ScanReport,
        output_dir: &Path,
        console: bool,
        out: &mut dyn Write,
    ) -> CliResult<()> {
        let saved = if self.no_save {
            None
        } else {
            Some(output::save_report(report, output_dir)?)
        };

        if let Err(e) = output::write_results(report, self.format, out) {
            warn!("Could not print results: {}", e);
            return Ok(());
        }

        if let (true, Some(saved)) = (console, saved) {
            output::print_success(&format!(
                "{} report files and {} captured pages written to {}",
                saved.reports.len(),
                saved.contents.len(),
                output_dir.display()
            ));
        }
        Ok(())
    }
}

/// Cancel `token` on Ctrl-C.
fn spawn_interrupt_handler(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current target");
            token.cancel();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_settings() {
        let cmd = ScanCommand {
            proxy_port: Some(9250),
            delay_ms: Some(0),
            ..ScanCommand::new(PathBuf::from("t.txt"), Some(PathBuf::from("out")))
        };

        let settings = cmd.apply_overrides(AppSettings::default());
        assert_eq!(settings.primary_port, 9250);
        assert_eq!(settings.fallback_port, 9050);
        assert_eq!(settings.pacing_delay_ms, 0);
        assert_eq!(settings.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_no_flags_keep_settings() {
        let cmd = ScanCommand::new(PathBuf::from("t.txt"), None);
        assert_eq!(cmd.apply_overrides(AppSettings::default()), AppSettings::default());
    }

    #[tokio::test]
    async fn test_empty_targets_file_is_fatal() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "# nothing here\n\n").unwrap();
        let settings = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(settings.path(), "{}").unwrap();

        let cmd = ScanCommand::new(file.path().to_path_buf(), None);
        let result = cmd.execute(Some(settings.path()), true).await;

        assert!(matches!(result, Err(CliError::NoTargets(_))));
    }

    #[tokio::test]
    async fn test_missing_targets_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("settings.json");
        std::fs::write(&settings, "{}").unwrap();

        let cmd = ScanCommand::new(dir.path().join("missing.txt"), None);
        let result = cmd.execute(Some(&settings), true).await;

        assert!(matches!(result, Err(CliError::Scan(_))));
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    #[test]
    fn test_closed_stdout_keeps_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let report = crate::output::test_support::sample_report();

        for format in [OutputFormat::Plain, OutputFormat::Json, OutputFormat::Csv] {
            let cmd = ScanCommand {
                format,
                ..ScanCommand::new(PathBuf::from("t.txt"), None)
            };
            assert!(cmd.deliver(&report, &out, false, &mut ClosedPipe).is_ok());
        }

        assert!(out.join(output::JSON_REPORT).is_file());
        assert!(out.join(output::SUMMARY_REPORT).is_file());
        let page = out.join(output::CONTENT_DIR).join("example.onion.html");
        assert_eq!(std::fs::read(page).unwrap(), b"hello");
    }

    #[test]
    fn test_no_save_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let cmd = ScanCommand {
            no_save: true,
            ..ScanCommand::new(PathBuf::from("t.txt"), None)
        };

        let mut stdout = Vec::new();
        let report = crate::output::test_support::sample_report();
        cmd.deliver(&report, &out, false, &mut stdout).unwrap();

        assert!(!out.exists());
        assert!(String::from_utf8(stdout).unwrap().contains("example.onion"));
    }
}
