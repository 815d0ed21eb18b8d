use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use sysreport::cli::HostReportArgs;
use sysreport::facts::LiveHostFacts;
use sysreport::report::HostReport;

fn main() -> Result<()> {
    // Parse arguments
    let args = HostReportArgs::parse();

    // Initialize logging
    initialize_logging(args.verbose)?;

    info!("Starting host snapshot report");

    let mut facts = LiveHostFacts::new();
    let stdout = std::io::stdout();
    let mut report = HostReport::new(
        &mut facts,
        stdout.lock(),
        Duration::from_millis(args.sample_ms),
    );

    // Section failures are already printed inline; only a broken output
    // sink lands here, and even that does not change the exit status.
    if let Err(e) = report.run() {
        warn!("Report output failed: {}", e);
    }

    info!("Host snapshot report completed");
    Ok(())
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;
    Ok(())
}
