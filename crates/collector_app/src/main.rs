mod cli;
mod config;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use collector_core::JobSource;
use collector_engine::{ensure_destination_dir, Collector, RunSummary, StdoutSink};
use collector_logging::{collector_info, LogSettings};

use crate::cli::Cli;
use crate::config::Settings;

fn main() -> ExitCode {
    let cli = Cli::parse();
    collector_logging::initialize(&LogSettings::from_verbosity(cli.verbose, cli.log_file.clone()));

    match run(&cli) {
        Ok(summary) => {
            collector_info!(
                "done: {} saved, {} already present, {} rejected, {} failed",
                summary.saved,
                summary.skipped,
                summary.rejected,
                summary.failed
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<RunSummary> {
    let settings = Settings::resolve(cli)?;

    // Both checks are fatal and happen before any network activity.
    let source = JobSource::open(&settings.source, settings.separator)?;
    ensure_destination_dir(&settings.limits.destination_dir)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let collector = Collector::new(settings.limits, Arc::new(StdoutSink))?;
    let summary = runtime.block_on(collector.run(source, settings.dispatch))?;
    Ok(summary)
}
