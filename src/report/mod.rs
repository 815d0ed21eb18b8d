//! Plain-text report assembly.
//!
//! Both reporters print sections delimited by titled `=` banner lines. A
//! section that fails its query prints `An error occurred: <message>` under
//! its banner and the run continues; no individual failure ever aborts the
//! report or changes the process exit status.

use crate::constants::{BANNER_WIDTH, SUB_BANNER_WIDTH};

/// Host snapshot report sections
pub mod host;

/// Package inventory and version comparison report
pub mod packages;

pub use host::HostReport;
pub use packages::PackageReport;

/// Section delimiter: the title between two `=` runs.
pub fn banner(title: &str) -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    format!("{} {} {}", rule, title, rule)
}

/// Narrower delimiter for nested blocks (the swap details).
pub fn sub_banner(title: &str) -> String {
    let rule = "=".repeat(SUB_BANNER_WIDTH);
    format!("{} {} {}", rule, title, rule)
}

/// Bare horizontal rule closing the process and service listings.
pub fn rule() -> String {
    "=".repeat(BANNER_WIDTH)
}
