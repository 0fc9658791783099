// Dashboard panels built from ratatui primitives:
// - Paragraph inside a titled Block for the CPU, Memory and Uptime panels
// - Table with a header row for the per-partition disk usage
pub mod panels;

pub use panels::{cpu_panel, disk_table, memory_panel, uptime_panel};
