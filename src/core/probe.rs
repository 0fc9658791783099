//! OS-facing metric queries.
//!
//! [`HostProbe`] is the seam between the dashboard and the host. The
//! production implementation reads CPU, memory and boot time through
//! `sysinfo`. Partitions come from the kernel mount table and each one is
//! measured with its own `statvfs` call, so a failing mount reports its error
//! instead of dropping out of the list. A couple of Linux pseudo-files fill in
//! what `sysinfo` does not carry (CPU flags, max frequency).

use std::fs;
use std::path::{Path, PathBuf};
use sysinfo::{CpuRefreshKind, System};

use crate::core::error::ProbeError;
use crate::core::metrics::{CpuFrequency, MemoryInfo};
use crate::utils::percent_of;

/// Raw CPU identification; unknown fields stay `None`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuIdentity {
    pub brand: Option<String>,
    pub architecture: Option<String>,
    pub bits: u32,
    pub physical_cores: Option<usize>,
    pub logical_threads: usize,
    pub flags: Vec<String>,
}

/// A mounted partition as enumerated by the OS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub device: String,
    pub mount_point: PathBuf,
    pub fs_type: String,
}

/// Space accounting of one partition, in bytes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f64,
}

/// Queries against the host. Every call re-reads the OS.
#[cfg_attr(test, mockall::automock)]
pub trait HostProbe {
    fn cpu_identity(&mut self) -> CpuIdentity;

    /// `None` when the host exposes no frequency counter
    fn cpu_frequency(&mut self) -> Option<CpuFrequency>;

    fn memory(&mut self) -> Result<MemoryInfo, ProbeError>;

    /// Non-virtual mounted partitions, in OS enumeration order
    fn partitions(&mut self) -> Result<Vec<Partition>, ProbeError>;

    /// Current usage, queried fresh for this one partition
    fn partition_usage(&mut self, partition: &Partition) -> Result<DiskUsage, ProbeError>;

    /// Boot time in seconds since the Unix epoch
    fn boot_time(&mut self) -> Result<u64, ProbeError>;
}

#[cfg(target_os = "linux")]
const PROC_MOUNTS: &str = "/proc/self/mounts";
#[cfg(target_os = "linux")]
const PROC_FILESYSTEMS: &str = "/proc/filesystems";

/// [`HostProbe`] backed by `sysinfo` and `statvfs`
pub struct SysinfoProbe {
    sys: System,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HostProbe for SysinfoProbe {
    fn cpu_identity(&mut self) -> CpuIdentity {
        self.sys.refresh_cpu();

        let brand = self
            .sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .filter(|brand| !brand.is_empty());

        CpuIdentity {
            brand,
            architecture: System::cpu_arch().filter(|arch| !arch.is_empty()),
            bits: usize::BITS,
            physical_cores: self.sys.physical_core_count(),
            logical_threads: self.sys.cpus().len(),
            flags: read_cpu_flags(),
        }
    }

    fn cpu_frequency(&mut self) -> Option<CpuFrequency> {
        self.sys
            .refresh_cpu_specifics(CpuRefreshKind::new().with_frequency());

        let cpus = self.sys.cpus();
        if cpus.is_empty() {
            return None;
        }

        // Average over all cores, like the kernel's per-policy readings
        let current = cpus.iter().map(|cpu| cpu.frequency() as f64).sum::<f64>() / cpus.len() as f64;
        if current <= 0.0 {
            return None;
        }

        Some(CpuFrequency {
            current_mhz: current,
            max_mhz: read_max_frequency_mhz().unwrap_or(0.0),
        })
    }

    fn memory(&mut self) -> Result<MemoryInfo, ProbeError> {
        self.sys.refresh_memory();

        let total = self.sys.total_memory();
        if total == 0 {
            return Err(ProbeError::Unavailable("memory statistics"));
        }
        let available = self.sys.available_memory();
        let swap_total = self.sys.total_swap();
        let swap_used = self.sys.used_swap();

        Ok(MemoryInfo {
            total,
            used: self.sys.used_memory(),
            available,
            percent: percent_of(total.saturating_sub(available), total),
            swap_total,
            swap_used,
            swap_percent: percent_of(swap_used, swap_total),
        })
    }

    fn partitions(&mut self) -> Result<Vec<Partition>, ProbeError> {
        list_partitions()
    }

    fn partition_usage(&mut self, partition: &Partition) -> Result<DiskUsage, ProbeError> {
        measure_partition(&partition.mount_point)
    }

    fn boot_time(&mut self) -> Result<u64, ProbeError> {
        match System::boot_time() {
            0 => Err(ProbeError::Unavailable("boot time")),
            secs => Ok(secs),
        }
    }
}

#[cfg(target_os = "linux")]
fn list_partitions() -> Result<Vec<Partition>, ProbeError> {
    let mounts = fs::read_to_string(PROC_MOUNTS).map_err(|e| ProbeError::from_io(PROC_MOUNTS, e))?;
    let filesystems =
        fs::read_to_string(PROC_FILESYSTEMS).map_err(|e| ProbeError::from_io(PROC_FILESYSTEMS, e))?;
    Ok(parse_mounts(&mounts, &physical_filesystems(&filesystems)))
}

#[cfg(not(target_os = "linux"))]
fn list_partitions() -> Result<Vec<Partition>, ProbeError> {
    let disks = sysinfo::Disks::new_with_refreshed_list();
    Ok(disks
        .list()
        .iter()
        .map(|disk| Partition {
            device: disk.name().to_string_lossy().into_owned(),
            mount_point: disk.mount_point().to_path_buf(),
            fs_type: disk.file_system().to_string_lossy().into_owned(),
        })
        .collect())
}

/// Filesystem types backed by a block device, i.e. the ones /proc/filesystems
/// does not mark "nodev". ZFS is listed as nodev but still holds real data.
fn physical_filesystems(raw: &str) -> Vec<String> {
    raw.lines()
        .filter_map(|line| match line.split_once('\t') {
            Some(("nodev", fs_type)) => (fs_type.trim() == "zfs").then(|| fs_type.trim().to_string()),
            Some((_, fs_type)) => Some(fs_type.trim().to_string()),
            None => Some(line.trim().to_string()),
        })
        .filter(|fs_type| !fs_type.is_empty())
        .collect()
}

/// Mount table entries on a physical filesystem, in kernel order
fn parse_mounts(raw: &str, physical: &[String]) -> Vec<Partition> {
    raw.lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let device = fields.next()?;
            let mount_point = fields.next()?;
            let fs_type = fields.next()?;
            if !physical.iter().any(|p| p == fs_type) {
                return None;
            }
            Some(Partition {
                device: device.to_string(),
                mount_point: unescape_mount_path(mount_point),
                fs_type: fs_type.to_string(),
            })
        })
        .collect()
}

/// The mount table writes space, tab, newline and backslash as `\ooo`
fn unescape_mount_path(raw: &str) -> PathBuf {
    let raw = raw.as_bytes();
    let mut bytes = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if let [b'\\', a @ b'0'..=b'3', b @ b'0'..=b'7', c @ b'0'..=b'7', ..] = raw[i..] {
            bytes.push((a - b'0') * 64 + (b - b'0') * 8 + (c - b'0'));
            i += 4;
        } else {
            bytes.push(raw[i]);
            i += 1;
        }
    }

    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStringExt;
        PathBuf::from(std::ffi::OsString::from_vec(bytes))
    }
    #[cfg(not(unix))]
    {
        PathBuf::from(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(unix)]
fn measure_partition(mount_point: &Path) -> Result<DiskUsage, ProbeError> {
    let stat = nix::sys::statvfs::statvfs(mount_point)
        .map_err(|errno| ProbeError::from_io(mount_point, errno.into()))?;
    let fragment = stat.fragment_size() as u64;
    Ok(usage_from_blocks(
        (stat.blocks() as u64).saturating_mul(fragment),
        (stat.blocks_free() as u64).saturating_mul(fragment),
        (stat.blocks_available() as u64).saturating_mul(fragment),
    ))
}

#[cfg(not(unix))]
fn measure_partition(mount_point: &Path) -> Result<DiskUsage, ProbeError> {
    let disks = sysinfo::Disks::new_with_refreshed_list();
    let disk = disks
        .list()
        .iter()
        .find(|disk| disk.mount_point() == mount_point)
        .ok_or_else(|| {
            ProbeError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is no longer mounted", mount_point.display()),
            ))
        })?;
    let free = disk.available_space();
    Ok(usage_from_blocks(disk.total_space(), free, free))
}

/// Space accounting from `statvfs` byte counts.
///
/// Blocks reserved for root count as neither used nor free, so `used + free`
/// can fall short of `total` and the percentage is taken over what an
/// unprivileged user can actually reach.
fn usage_from_blocks(total: u64, free_to_root: u64, free_to_user: u64) -> DiskUsage {
    let used = total.saturating_sub(free_to_root);
    DiskUsage {
        total,
        used,
        free: free_to_user,
        percent: percent_of(used, used.saturating_add(free_to_user)),
    }
}

/// Feature flags of the first CPU listed in /proc/cpuinfo
#[cfg(target_os = "linux")]
fn read_cpu_flags() -> Vec<String> {
    fs::read_to_string("/proc/cpuinfo")
        .map(|contents| parse_cpu_flags(&contents))
        .unwrap_or_default()
}

#[cfg(not(target_os = "linux"))]
fn read_cpu_flags() -> Vec<String> {
    Vec::new()
}

/// x86 kernels label the list "flags", arm64 ones "Features"
fn parse_cpu_flags(cpuinfo: &str) -> Vec<String> {
    cpuinfo
        .lines()
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            matches!(key.trim(), "flags" | "Features").then_some(value)
        })
        .map(|value| value.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

fn read_max_frequency_mhz() -> Option<f64> {
    let khz = fs::read_to_string("/sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq").ok()?;
    parse_khz(&khz).map(|khz| khz as f64 / 1000.0)
}

fn parse_khz(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}
