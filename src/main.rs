use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use torscout::cli::{Cli, Commands};
use torscout::error::{CliError, ScanError};
use torscout::output;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            if let Some(CliError::Scan(ScanError::ProxyUnavailable { .. })) =
                e.downcast_ref::<CliError>()
            {
                output::print_info(
                    "Start Tor Browser (port 9150) or the tor service (port 9050) and retry.",
                );
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    let quiet = cli.quiet;
    let config = cli.config.clone();

    let status = match cli.into_command()? {
        Commands::Scan(cmd) => cmd
            .execute(config.as_deref(), quiet)
            .await
            .with_context(|| format!("scan of '{}' failed", cmd.targets.display()))?,
        Commands::Report(cmd) => cmd
            .execute(config.as_deref(), quiet)
            .with_context(|| format!("could not rebuild report from '{}'", cmd.input.display()))?,
    };

    Ok(status.exit_code())
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = if verbose {
        "torscout=debug"
    } else if quiet {
        "torscout=warn"
    } else {
        "torscout=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
