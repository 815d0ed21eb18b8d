//! Installed-package inventory collection.
//!
//! The host package manager is described by [`PackageManager`]: a listing
//! command whose output is tabular text with a fixed-height header, one
//! `<name> <version> ...` row per package. Parsing is split out of the
//! command invocation so it can be tested against captured output.

use std::collections::BTreeMap;
use std::process::Command;

use anyhow::{anyhow, Context, Result};
use log::debug;

/// Pluggable registry lookup for latest published versions
pub mod registry;

pub use registry::{LatestVersionLookup, UnavailableRegistry};

/// Description of the host package manager's CLI surface.
#[derive(Debug, Clone)]
pub struct PackageManager {
    pub program: &'static str,
    pub list_args: &'static [&'static str],
    pub version_args: &'static [&'static str],
    /// Number of header lines preceding the data rows in the list output.
    pub header_lines: usize,
}

impl Default for PackageManager {
    fn default() -> Self {
        // pip's list output opens with a column-name line and a dashed rule.
        PackageManager {
            program: "pip",
            list_args: &["list"],
            version_args: &["--version"],
            header_lines: 2,
        }
    }
}

/// Parse tabular list output into a name -> version mapping.
///
/// The first `header_lines` lines are skipped; each remaining line
/// contributes its first two whitespace-separated tokens. Blank lines and
/// lines with fewer than two tokens are ignored. Duplicate names collapse,
/// last occurrence winning, mirroring the package manager's own uniqueness
/// constraint.
pub fn parse_package_table(output: &str, header_lines: usize) -> BTreeMap<String, String> {
    let mut packages = BTreeMap::new();
    for line in output.lines().skip(header_lines) {
        let mut tokens = line.split_whitespace();
        if let (Some(name), Some(version)) = (tokens.next(), tokens.next()) {
            packages.insert(name.to_string(), version.to_string());
        }
    }
    packages
}

/// Run the package manager's list command and parse its output.
pub fn installed_packages(manager: &PackageManager) -> Result<BTreeMap<String, String>> {
    debug!("Listing installed packages via {}", manager.program);
    let output = Command::new(manager.program)
        .args(manager.list_args)
        .output()
        .context(format!("Failed to execute {}", manager.program))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!(
            "{} list failed: {}",
            manager.program,
            stderr.trim()
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_package_table(&stdout, manager.header_lines))
}

/// Report the package manager's own version line.
pub fn manager_version(manager: &PackageManager) -> Result<String> {
    let output = Command::new(manager.program)
        .args(manager.version_args)
        .output()
        .context(format!("Failed to execute {}", manager.program))?;
    if !output.status.success() {
        return Err(anyhow!("{} did not report a version", manager.program));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
