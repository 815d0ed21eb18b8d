//! Pluggable lookup for the latest published version of a package.

use anyhow::{bail, Result};

/// Source of truth for the latest published version of a package.
///
/// The registry search endpoint the original comparison relied on has been
/// retired, so the lookup is kept as a seam: an implementation may call a
/// registry's JSON API, read a vendored index, or serve a fixed table in
/// tests. The shipped default is [`UnavailableRegistry`].
pub trait LatestVersionLookup {
    /// Latest published version of `name`, or an error when the package is
    /// unknown or the registry cannot be reached.
    fn latest_version(&self, name: &str) -> Result<String>;
}

/// Default lookup used by the shipped binary: always unavailable.
///
/// Version comparison against it reports a single soft failure instead of
/// per-package mismatches.
pub struct UnavailableRegistry;

impl LatestVersionLookup for UnavailableRegistry {
    fn latest_version(&self, _name: &str) -> Result<String> {
        bail!("registry version lookup is not available: no search endpoint is configured")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_registry_always_errors() {
        let registry = UnavailableRegistry;
        assert!(registry.latest_version("requests").is_err());
        assert!(registry.latest_version("").is_err());
    }
}
