//! Host facilities provider backed by `sysinfo` and platform data sources.

use std::net::IpAddr;
use std::path::Path;
use std::process::Command;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use sysinfo::{CpuExt, DiskExt, NetworkExt, PidExt, ProcessExt, System, SystemExt, UserExt};

use crate::constants::{
    CPUFREQ_PATH, DISKSTATS_PATH, DISKSTATS_SECTOR_SIZE, POSIX_SERVICE_COMMAND,
    WINDOWS_SERVICE_COMMAND,
};
use crate::models::{
    CpuSnapshot, DiskIoTotals, DiskPartition, DiskUsage, HostIdentity, InterfaceAddress,
    MemorySnapshot, NetworkInterface, NetworkIoTotals, ProcessRecord, Queried,
};

use super::HostFacts;

lazy_static! {
    /// Whole-disk device names in /proc/diskstats. Partition rows are
    /// excluded so the totals are not double counted.
    static ref WHOLE_DISK: Regex = Regex::new(
        r"^(sd[a-z]+|hd[a-z]+|vd[a-z]+|xvd[a-z]+|nvme\d+n\d+|mmcblk\d+|dm-\d+|md\d+)$"
    )
    .expect("static device pattern");
}

/// Provider that queries the running host.
pub struct LiveHostFacts {
    system: System,
}

impl LiveHostFacts {
    /// Create a provider with a fully refreshed system snapshot.
    pub fn new() -> Self {
        debug!("Initializing host facilities provider");
        let mut system = System::new_all();
        system.refresh_all();
        LiveHostFacts { system }
    }
}

impl Default for LiveHostFacts {
    fn default() -> Self {
        Self::new()
    }
}

impl HostFacts for LiveHostFacts {
    fn identity(&mut self) -> Result<HostIdentity> {
        debug!("Reading host identity");
        let hostname = hostname::get()
            .map_err(|e| anyhow!("Failed to get hostname: {}", e))?
            .to_string_lossy()
            .to_string();

        Ok(HostIdentity {
            os_name: self.system.name().unwrap_or_default(),
            hostname,
            os_release: self.system.kernel_version().unwrap_or_default(),
            os_version: self.system.os_version().unwrap_or_default(),
            machine_arch: std::env::consts::ARCH.to_string(),
            processor_name: self
                .system
                .cpus()
                .first()
                .map(|cpu| cpu.brand().to_string())
                .unwrap_or_default(),
        })
    }

    fn cpu(&mut self, sample: Duration) -> Result<CpuSnapshot> {
        debug!("Sampling CPU utilization over {:?}", sample);
        let physical_cores = self.system.physical_core_count().unwrap_or(0);
        let logical_cores = self.system.cpus().len();
        let (freq_min_mhz, freq_max_mhz) = frequency_bounds();

        // Utilization needs two time-separated counter readings; the window
        // must not undercut sysinfo's own minimum refresh interval.
        self.system.refresh_cpu();
        thread::sleep(sample.max(System::MINIMUM_CPU_UPDATE_INTERVAL));
        self.system.refresh_cpu();

        Ok(CpuSnapshot {
            physical_cores,
            logical_cores,
            freq_max_mhz,
            freq_min_mhz,
            freq_current_mhz: self
                .system
                .cpus()
                .first()
                .map_or(0.0, |cpu| cpu.frequency() as f64),
            per_core_usage: self
                .system
                .cpus()
                .iter()
                .map(|cpu| cpu.cpu_usage())
                .collect(),
            total_usage: self.system.global_cpu_info().cpu_usage(),
        })
    }

    fn memory(&mut self) -> Result<MemorySnapshot> {
        debug!("Reading memory counters");
        self.system.refresh_memory();
        let total = self.system.total_memory();
        let used = self.system.used_memory();

        Ok(MemorySnapshot {
            total,
            available: self.system.available_memory(),
            used,
            percent: usage_percent(used, total),
        })
    }

    fn swap(&mut self) -> Result<MemorySnapshot> {
        debug!("Reading swap counters");
        self.system.refresh_memory();
        let total = self.system.total_swap();
        let used = self.system.used_swap();

        Ok(MemorySnapshot {
            total,
            available: self.system.free_swap(),
            used,
            percent: usage_percent(used, total),
        })
    }

    fn disk_partitions(&mut self) -> Result<Vec<DiskPartition>> {
        debug!("Enumerating disk partitions");
        self.system.refresh_disks_list();

        let mut partitions = Vec::new();
        for disk in self.system.disks() {
            let total = disk.total_space();
            // A zero-sized total marks a device that is not ready or not
            // readable; it stays in the list as a skipped entry.
            let usage = if total == 0 {
                Queried::Skipped
            } else {
                let free = disk.available_space();
                let used = total.saturating_sub(free);
                Queried::Ready(DiskUsage {
                    total,
                    used,
                    free,
                    percent: usage_percent(used, total),
                })
            };

            partitions.push(DiskPartition {
                device: disk.name().to_string_lossy().to_string(),
                mountpoint: disk.mount_point().to_string_lossy().to_string(),
                fstype: std::str::from_utf8(disk.file_system())
                    .unwrap_or("")
                    .to_string(),
                usage,
            });
        }

        Ok(partitions)
    }

    fn disk_io_totals(&mut self) -> Result<DiskIoTotals> {
        if !cfg!(target_os = "linux") {
            return Err(anyhow!(
                "disk I/O counters are not available on this platform"
            ));
        }

        let stats = std::fs::read_to_string(DISKSTATS_PATH)
            .context(format!("Failed to read {}", DISKSTATS_PATH))?;
        Ok(parse_diskstats(&stats))
    }

    fn network_interfaces(&mut self) -> Result<Vec<NetworkInterface>> {
        debug!("Enumerating network interfaces");
        let mut interfaces: Vec<NetworkInterface> = Vec::new();

        // IP addresses come from getifaddrs; classify_address drops every
        // family other than IPv4.
        let bound = if_addrs::get_if_addrs()
            .context("Failed to enumerate network interface addresses")?;
        for ifa in &bound {
            let classified = match ifa.addr {
                if_addrs::IfAddr::V4(ref v4) => classify_address(
                    IpAddr::V4(v4.ip),
                    IpAddr::V4(v4.netmask),
                    v4.broadcast.map(IpAddr::V4),
                ),
                if_addrs::IfAddr::V6(ref v6) => classify_address(
                    IpAddr::V6(v6.ip),
                    IpAddr::V6(v6.netmask),
                    v6.broadcast.map(IpAddr::V6),
                ),
            };
            if let Some(address) = classified {
                interface_entry(&mut interfaces, &ifa.name)
                    .addresses
                    .push(address);
            }
        }

        // Link-layer addresses come from the sysinfo network table.
        self.system.refresh_networks_list();
        for (name, data) in self.system.networks() {
            let mac = data.mac_address();
            if mac.is_unspecified() {
                continue;
            }
            interface_entry(&mut interfaces, name)
                .addresses
                .push(InterfaceAddress::Link {
                    address: mac.to_string(),
                });
        }

        Ok(interfaces)
    }

    fn network_io_totals(&mut self) -> Result<NetworkIoTotals> {
        debug!("Reading network I/O totals");
        self.system.refresh_networks();

        let mut totals = NetworkIoTotals::default();
        for (_name, data) in self.system.networks() {
            totals.bytes_sent += data.total_transmitted();
            totals.bytes_received += data.total_received();
        }
        Ok(totals)
    }

    fn boot_time(&mut self) -> Result<u64> {
        Ok(self.system.boot_time())
    }

    fn processes(&mut self) -> Result<Vec<Queried<ProcessRecord>>> {
        debug!("Enumerating processes");
        self.system.refresh_processes();
        self.system.refresh_users_list();

        let mut pids: Vec<_> = self.system.processes().keys().copied().collect();
        pids.sort_unstable();

        let mut records = Vec::with_capacity(pids.len());
        for pid in pids {
            let process = match self.system.processes().get(&pid) {
                Some(process) => process,
                None => continue,
            };
            // An empty name marks a process that exited while the table was
            // being refreshed.
            if process.name().is_empty() {
                records.push(Queried::Skipped);
                continue;
            }
            let username = process.user_id().and_then(|uid| {
                self.system
                    .users()
                    .iter()
                    .find(|user| user.id() == uid)
                    .map(|user| user.name().to_string())
            });
            records.push(Queried::Ready(ProcessRecord {
                pid: pid.as_u32(),
                name: process.name().to_string(),
                username,
            }));
        }

        Ok(records)
    }

    fn services(&mut self) -> Result<Vec<String>> {
        let (program, args) = if cfg!(target_os = "windows") {
            WINDOWS_SERVICE_COMMAND
        } else {
            POSIX_SERVICE_COMMAND
        };
        debug!("Listing services via {}", program);

        let output = Command::new(program)
            .args(args)
            .output()
            .context(format!("Failed to execute {}", program))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("{} failed: {}", program, stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect())
    }
}

/// Classify one bound address by family. IPv4 maps to a printable entry;
/// every other family yields `None` and is dropped from the report.
fn classify_address(
    ip: IpAddr,
    netmask: IpAddr,
    broadcast: Option<IpAddr>,
) -> Option<InterfaceAddress> {
    match (ip, netmask) {
        (IpAddr::V4(address), IpAddr::V4(netmask)) => Some(InterfaceAddress::V4 {
            address,
            netmask,
            broadcast: match broadcast {
                Some(IpAddr::V4(broadcast)) => Some(broadcast),
                _ => None,
            },
        }),
        _ => None,
    }
}

/// Find or append the interface entry for `name`, preserving first-seen
/// order.
fn interface_entry<'a>(
    interfaces: &'a mut Vec<NetworkInterface>,
    name: &str,
) -> &'a mut NetworkInterface {
    match interfaces.iter().position(|entry| entry.name == name) {
        Some(position) => &mut interfaces[position],
        None => {
            interfaces.push(NetworkInterface {
                name: name.to_string(),
                addresses: Vec::new(),
            });
            let last = interfaces.len() - 1;
            &mut interfaces[last]
        }
    }
}

/// Sum the sector counters of whole-disk rows in /proc/diskstats content.
/// After whitespace splitting, sectors read sit at index 5 and sectors
/// written at index 9; both are in 512-byte units regardless of the
/// device's native sector size.
fn parse_diskstats(stats: &str) -> DiskIoTotals {
    let mut totals = DiskIoTotals::default();
    for line in stats.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 10 || !WHOLE_DISK.is_match(fields[2]) {
            continue;
        }
        let sectors_read: u64 = fields[5].parse().unwrap_or(0);
        let sectors_written: u64 = fields[9].parse().unwrap_or(0);
        totals.read_bytes += sectors_read * DISKSTATS_SECTOR_SIZE;
        totals.written_bytes += sectors_written * DISKSTATS_SECTOR_SIZE;
    }
    totals
}

/// Advertised CPU frequency bounds from sysfs, in MHz. The kernel exposes
/// kHz values; hosts without a cpufreq directory report 0.0 for both
/// bounds.
fn frequency_bounds() -> (f64, f64) {
    let read_khz = |file: &str| -> f64 {
        std::fs::read_to_string(Path::new(CPUFREQ_PATH).join(file))
            .ok()
            .and_then(|content| content.trim().parse::<f64>().ok())
            .map_or(0.0, |khz| khz / 1000.0)
    };
    (read_khz("cpuinfo_min_freq"), read_khz("cpuinfo_max_freq"))
}

fn usage_percent(used: u64, total: u64) -> f32 {
    if total == 0 {
        0.0
    } else {
        (used as f64 * 100.0 / total as f64) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_classify_address_ipv4() {
        let classified = classify_address(
            IpAddr::V4(Ipv4Addr::new(192, 168, 1, 10)),
            IpAddr::V4(Ipv4Addr::new(255, 255, 255, 0)),
            Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 255))),
        );
        assert_eq!(
            classified,
            Some(InterfaceAddress::V4 {
                address: Ipv4Addr::new(192, 168, 1, 10),
                netmask: Ipv4Addr::new(255, 255, 255, 0),
                broadcast: Some(Ipv4Addr::new(192, 168, 1, 255)),
            })
        );
    }

    #[test]
    fn test_classify_address_unrecognized_family_dropped() {
        let classified = classify_address(
            IpAddr::V6(Ipv6Addr::LOCALHOST),
            IpAddr::V6(Ipv6Addr::UNSPECIFIED),
            None,
        );
        assert_eq!(classified, None);
    }

    #[test]
    fn test_classify_address_missing_broadcast() {
        let classified = classify_address(
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
            IpAddr::V4(Ipv4Addr::new(255, 0, 0, 0)),
            None,
        );
        assert_eq!(
            classified,
            Some(InterfaceAddress::V4 {
                address: Ipv4Addr::new(10, 0, 0, 1),
                netmask: Ipv4Addr::new(255, 0, 0, 0),
                broadcast: None,
            })
        );
    }

    #[test]
    fn test_interface_entry_groups_by_name() {
        let mut interfaces = Vec::new();
        interface_entry(&mut interfaces, "eth0")
            .addresses
            .push(InterfaceAddress::Link {
                address: "aa:bb:cc:dd:ee:ff".to_string(),
            });
        interface_entry(&mut interfaces, "lo");
        interface_entry(&mut interfaces, "eth0");

        assert_eq!(interfaces.len(), 2);
        assert_eq!(interfaces[0].name, "eth0");
        assert_eq!(interfaces[0].addresses.len(), 1);
        assert_eq!(interfaces[1].name, "lo");
    }

    #[test]
    fn test_parse_diskstats_sums_whole_disks() {
        let stats = "\
   8       0 sda 100 0 2048 0 50 0 1024 0 0 0 0
   8       1 sda1 90 0 1000 0 40 0 900 0 0 0 0
 259       0 nvme0n1 10 0 512 0 5 0 256 0 0 0 0
   7       0 loop0 5 0 4096 0 0 0 0 0 0 0 0
";
        let totals = parse_diskstats(stats);
        // sda and nvme0n1 count; the sda1 partition and loop0 do not.
        assert_eq!(totals.read_bytes, (2048 + 512) * 512);
        assert_eq!(totals.written_bytes, (1024 + 256) * 512);
    }

    #[test]
    fn test_parse_diskstats_ignores_short_lines() {
        let totals = parse_diskstats("8 0 sda 1 2 3\n\n");
        assert_eq!(totals, DiskIoTotals::default());
    }

    #[test]
    fn test_usage_percent_zero_total() {
        assert_eq!(usage_percent(10, 0), 0.0);
        assert!((usage_percent(1, 4) - 25.0).abs() < f32::EPSILON);
    }
}
