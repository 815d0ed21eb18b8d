//! Command-line arguments for the sysreport binaries.
//!
//! Each reporter runs all of its sections unconditionally; the flags only
//! control logging verbosity and, for the host reporter, the CPU sampling
//! window.

use clap::Parser;

/// Command-line arguments for the host snapshot reporter.
#[derive(Parser, Debug)]
#[clap(name = "host-report", about = "Host telemetry snapshot reporter")]
pub struct HostReportArgs {
    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,

    /// CPU utilization sampling window in milliseconds
    #[clap(long, default_value = "1000")]
    pub sample_ms: u64,
}

/// Command-line arguments for the package inventory reporter.
#[derive(Parser, Debug)]
#[clap(name = "package-report", about = "Installed package inventory reporter")]
pub struct PackageReportArgs {
    /// Verbose logging and full package mapping dump
    #[clap(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_host_report_defaults() {
        let args = HostReportArgs::parse_from(["host-report"]);
        assert!(!args.verbose);
        assert_eq!(args.sample_ms, 1000);
    }

    #[test]
    fn test_host_report_flags() {
        let args = HostReportArgs::parse_from(["host-report", "--verbose", "--sample-ms", "250"]);
        assert!(args.verbose);
        assert_eq!(args.sample_ms, 250);
    }

    #[test]
    fn test_package_report_defaults() {
        let args = PackageReportArgs::parse_from(["package-report"]);
        assert!(!args.verbose);
    }

    #[test]
    fn test_package_report_verbose_short_flag() {
        let args = PackageReportArgs::parse_from(["package-report", "-v"]);
        assert!(args.verbose);
    }
}
