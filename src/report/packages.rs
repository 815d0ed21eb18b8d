//! Package inventory and version comparison report.

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;
use log::debug;

use crate::packages::{installed_packages, manager_version, LatestVersionLookup, PackageManager};

use super::banner;

/// Assembles the package inventory report.
///
/// Inventory failures degrade to an empty mapping after printing the
/// failure line; the comparison section then simply has nothing to compare.
pub struct PackageReport<'a, W: Write> {
    manager: PackageManager,
    lookup: &'a dyn LatestVersionLookup,
    out: W,
    verbose: bool,
}

impl<'a, W: Write> PackageReport<'a, W> {
    pub fn new(
        manager: PackageManager,
        lookup: &'a dyn LatestVersionLookup,
        out: W,
        verbose: bool,
    ) -> Self {
        PackageReport {
            manager,
            lookup,
            out,
            verbose,
        }
    }

    /// Run all sections. Query failures surface inline; only the output
    /// sink itself can fail the run.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.out, "{}", banner("Package Manager"))?;
        match manager_version(&self.manager) {
            Ok(version) => writeln!(self.out, "{}", version)?,
            Err(err) => writeln!(self.out, "An error occurred: {}", err)?,
        }

        writeln!(self.out, "{}", banner("Package Information"))?;
        let packages = match installed_packages(&self.manager) {
            Ok(packages) => packages,
            Err(err) => {
                writeln!(self.out, "An error occurred: {}", err)?;
                BTreeMap::new()
            }
        };
        writeln!(self.out, "{} packages installed", packages.len())?;
        if self.verbose {
            for (name, version) in &packages {
                writeln!(self.out, "{}: {}", name, version)?;
            }
        }

        self.compare(&packages)?;
        Ok(())
    }

    /// Report packages whose installed version differs from the latest
    /// published one. Lookup failures are counted and surfaced as a single
    /// trailing line so one unreachable package cannot abort the rest.
    fn compare(&mut self, packages: &BTreeMap<String, String>) -> Result<()> {
        writeln!(self.out, "{}", banner("Package Version Comparison"))?;

        let mut failures = 0usize;
        let mut first_error = None;
        for (name, installed) in packages {
            match self.lookup.latest_version(name) {
                Ok(latest) => {
                    if *installed != latest {
                        writeln!(
                            self.out,
                            "Package: {} Installed Version: {} Latest Version: {}",
                            name, installed, latest
                        )?;
                    }
                }
                Err(err) => {
                    debug!("Version lookup failed for {}: {}", name, err);
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                    failures += 1;
                }
            }
        }

        if let Some(err) = first_error {
            writeln!(
                self.out,
                "An error occurred: {} of {} version lookups failed: {}",
                failures,
                packages.len(),
                err
            )?;
        }
        Ok(())
    }
}
