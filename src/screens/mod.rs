pub mod dashboard;

// Single screen: CPU, Memory, Disk and Uptime panels stacked vertically,
// redrawn in place once per tick.

pub use dashboard::Renderer;
