//! Global constants for the sysreport binaries.
//!
//! This module centralizes all hardcoded values to improve maintainability
//! and make configuration changes easier.

// Report layout constants
/// Width of the `=` run on each side of a section banner
pub const BANNER_WIDTH: usize = 40;

/// Width of the `=` run on each side of a nested block banner (swap details)
pub const SUB_BANNER_WIDTH: usize = 20;

// Sampling constants
/// Default CPU utilization sampling window in milliseconds
pub const DEFAULT_CPU_SAMPLE_MS: u64 = 1000;

// Platform data sources
/// Linux sysfs directory exposing CPU frequency bounds
pub const CPUFREQ_PATH: &str = "/sys/devices/system/cpu/cpu0/cpufreq";

/// Linux block-device I/O counter source
pub const DISKSTATS_PATH: &str = "/proc/diskstats";

/// Sector size used by the /proc/diskstats counters
pub const DISKSTATS_SECTOR_SIZE: u64 = 512;

// Service-manager listing commands
/// Windows-family service listing command
pub const WINDOWS_SERVICE_COMMAND: (&str, &[&str]) = ("net", &["start"]);

/// POSIX-family service listing command
pub const POSIX_SERVICE_COMMAND: (&str, &[&str]) = ("service", &["--status-all"]);
