pub mod error;
pub mod keys;
pub mod metrics;
pub mod probe;
pub mod signals;
pub mod terminal;

pub use error::{DashboardError, ProbeError};
pub use keys::{CrosstermKeys, KeyPoll};
pub use metrics::{CpuFrequency, CpuInfo, DiskInfo, MemoryInfo, MetricSource, MetricsSnapshot, UptimeInfo};
pub use probe::{HostProbe, SysinfoProbe};
pub use signals::ShutdownSignals;
pub use terminal::{CrosstermMode, TerminalMode, TerminalSession};
