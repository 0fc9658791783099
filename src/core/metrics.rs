//! Metric snapshots and the per-tick collector.
//!
//! A [`MetricsSnapshot`] is built from scratch on every tick and never
//! mutated afterwards; the renderer only ever borrows it.

use std::fmt;
use std::path::PathBuf;
use tracing::debug;

use crate::core::error::ProbeError;
use crate::core::probe::{DiskUsage, HostProbe, Partition};
use crate::utils::{format_uptime, UNKNOWN_ARCH, UNKNOWN_CPU};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuFrequency {
    pub current_mhz: f64,
    pub max_mhz: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CpuInfo {
    pub brand: String,
    pub architecture: String,
    pub bits: u32,
    pub physical_cores: Option<usize>,
    pub logical_threads: usize,
    pub frequency: Option<CpuFrequency>,
    pub flags: Vec<String>,
}

/// RAM and swap accounting, in bytes; percentages are OS occupancy ratios
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryInfo {
    pub total: u64,
    pub used: u64,
    pub available: u64,
    pub percent: f64,
    pub swap_total: u64,
    pub swap_used: u64,
    pub swap_percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiskInfo {
    pub device: String,
    pub mount_point: PathBuf,
    pub fs_type: String,
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f64,
}

impl DiskInfo {
    fn new(partition: Partition, usage: DiskUsage) -> Self {
        Self {
            device: partition.device,
            mount_point: partition.mount_point,
            fs_type: partition.fs_type,
            total: usage.total,
            used: usage.used,
            free: usage.free,
            percent: usage.percent,
        }
    }
}

/// Whole seconds since boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UptimeInfo {
    pub seconds: u64,
}

impl UptimeInfo {
    pub fn between(boot_time: u64, now: u64) -> Self {
        Self {
            seconds: now.saturating_sub(boot_time),
        }
    }
}

impl fmt::Display for UptimeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_uptime(self.seconds))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub cpu: CpuInfo,
    pub memory: MemoryInfo,
    pub disks: Vec<DiskInfo>,
    pub uptime: UptimeInfo,
}

/// Samples the host through a [`HostProbe`]. Holds no state between calls.
pub struct MetricSource<P> {
    probe: P,
}

impl<P: HostProbe> MetricSource<P> {
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    /// Never fails: unidentifiable hardware is reported as unknown
    pub fn sample_cpu(&mut self) -> CpuInfo {
        let identity = self.probe.cpu_identity();
        let frequency = self.probe.cpu_frequency();

        CpuInfo {
            brand: identity.brand.unwrap_or_else(|| UNKNOWN_CPU.to_string()),
            architecture: identity.architecture.unwrap_or_else(|| UNKNOWN_ARCH.to_string()),
            bits: identity.bits,
            physical_cores: identity.physical_cores,
            logical_threads: identity.logical_threads,
            frequency,
            flags: identity.flags,
        }
    }

    pub fn sample_memory(&mut self) -> Result<MemoryInfo, ProbeError> {
        self.probe.memory()
    }

    /// Partitions whose usage is unreadable for lack of permission are left
    /// out; any other failure aborts the sample.
    pub fn sample_disks(&mut self) -> Result<Vec<DiskInfo>, ProbeError> {
        let partitions = self.probe.partitions()?;
        let mut disks = Vec::with_capacity(partitions.len());

        for partition in partitions {
            match self.probe.partition_usage(&partition) {
                Ok(usage) => disks.push(DiskInfo::new(partition, usage)),
                Err(ProbeError::PermissionDenied(path)) => {
                    debug!(mount_point = %path.display(), "skipping unreadable partition");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(disks)
    }

    pub fn sample_uptime(&mut self) -> Result<UptimeInfo, ProbeError> {
        let boot_time = self.probe.boot_time()?;
        let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0);
        Ok(UptimeInfo::between(boot_time, now))
    }

    pub fn snapshot(&mut self) -> Result<MetricsSnapshot, ProbeError> {
        Ok(MetricsSnapshot {
            cpu: self.sample_cpu(),
            memory: self.sample_memory()?,
            disks: self.sample_disks()?,
            uptime: self.sample_uptime()?,
        })
    }
}
