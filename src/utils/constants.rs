//! Dashboard constants

use std::time::Duration;

/// Fixed refresh cadence of the dashboard loop
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Number of CPU feature flags shown before the list is elided
pub const FLAG_DISPLAY_LIMIT: usize = 15;

/// Marker appended to the flag list when entries were elided
pub const FLAG_ELLIPSIS: &str = "...";

/// Bytes in one (binary) gigabyte, as used for every size column
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Shown in place of a value the host does not expose
pub const NOT_AVAILABLE: &str = "N/A";

pub const UNKNOWN_CPU: &str = "Unknown CPU";
pub const UNKNOWN_ARCH: &str = "Unknown Architecture";

/// Printed once the terminal has been restored after a clean quit
pub const FAREWELL: &str = "Exiting... bye!";

/// Byte delivered for Ctrl+C when the terminal is in raw mode
pub const CTRL_C: char = '\u{3}';

/// Application directory name under the user's config dir
pub const APP_DIR: &str = "sysdash";
