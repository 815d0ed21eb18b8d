use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use sysreport::cli::PackageReportArgs;
use sysreport::packages::{PackageManager, UnavailableRegistry};
use sysreport::report::PackageReport;

fn main() -> Result<()> {
    // Parse arguments
    let args = PackageReportArgs::parse();

    // Initialize logging
    initialize_logging(args.verbose)?;

    info!("Starting package inventory report");

    let stdout = std::io::stdout();
    let mut report = PackageReport::new(
        PackageManager::default(),
        &UnavailableRegistry,
        stdout.lock(),
        args.verbose,
    );

    // Query failures are already printed inline; only a broken output sink
    // lands here, and even that does not change the exit status.
    if let Err(e) = report.run() {
        warn!("Report output failed: {}", e);
    }

    info!("Package inventory report completed");
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
