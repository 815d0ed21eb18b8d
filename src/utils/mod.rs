//! Formatting utilities shared by both reporters.
//!
//! Every byte counter in the reports goes through [`format_size`] so sizes
//! read uniformly across sections, and the boot timestamp goes through
//! [`format_boot_time`].

use chrono::{DateTime, Datelike, Local, Timelike};

/// Units for binary (base-1024) size scaling, tried smallest-first.
const SIZE_UNITS: [&str; 6] = ["", "K", "M", "G", "T", "P"];

/// Render a byte count in human-readable form.
///
/// Picks the largest unit for which the scaled value stays below 1024 and
/// prints it with two decimal digits, e.g. `1.00KB` or `523.43MB`. Counts
/// too large for the unit table fall back to `YB`; that is a defined
/// ceiling, not an error. Negative counts are unrepresentable by type.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in SIZE_UNITS {
        if value < 1024.0 {
            return format!("{:.2}{}B", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.2}YB", value)
}

/// Render a boot timestamp as local calendar time.
///
/// Components are printed unpadded (`2024/3/7 9:5:1`), matching the
/// report's plain-text format. No timezone normalization is applied.
pub fn format_boot_time(boot: DateTime<Local>) -> String {
    format!(
        "{}/{}/{} {}:{}:{}",
        boot.year(),
        boot.month(),
        boot.day(),
        boot.hour(),
        boot.minute(),
        boot.second()
    )
}
