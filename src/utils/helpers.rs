//! Formatting helpers shared by the dashboard panels

use crate::utils::constants::{BYTES_PER_GB, FLAG_DISPLAY_LIMIT, FLAG_ELLIPSIS};

/// Format a byte count as gigabytes with two decimals ("12.34 GB")
pub fn format_gb(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / BYTES_PER_GB)
}

/// Format a byte count with its occupancy percentage ("12.34 GB (56.7%)")
pub fn format_gb_with_percent(bytes: u64, percent: f64) -> String {
    format!("{} ({})", format_gb(bytes), format_percent(percent))
}

/// Format a percentage with one decimal ("56.7%")
pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}

/// Format a frequency in MHz with two decimals
pub fn format_mhz(mhz: f64) -> String {
    format!("{:.2} MHz", mhz)
}

/// Format elapsed seconds as `H:MM:SS`, prefixed by days when needed
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    match days {
        0 => format!("{}:{:02}:{:02}", hours, minutes, secs),
        1 => format!("1 day, {}:{:02}:{:02}", hours, minutes, secs),
        _ => format!("{} days, {}:{:02}:{:02}", days, hours, minutes, secs),
    }
}

/// Join the first flags for display, marking elided entries with an ellipsis.
///
/// Only the rendered string is shortened; the caller's slice is left as is.
pub fn format_flags(flags: &[String]) -> String {
    let shown = flags
        .iter()
        .take(FLAG_DISPLAY_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    if flags.len() > FLAG_DISPLAY_LIMIT {
        format!("{}, {}", shown, FLAG_ELLIPSIS)
    } else {
        shown
    }
}

/// Occupancy ratio in percent, zero for an empty pool
pub fn percent_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
