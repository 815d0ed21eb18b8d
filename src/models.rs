//! Core data models for host and package reports.
//!
//! Every structure here is transient: read once per invocation, formatted,
//! and discarded. Nothing is cached or persisted between runs.

use std::net::Ipv4Addr;

/// Outcome of querying one item during an enumeration pass.
///
/// Expected, benign unavailability (a device that is not ready, a process
/// that exited mid-enumeration) is carried as `Skipped` so the report loop
/// can drop the item silently and keep going.
#[derive(Debug, Clone, PartialEq)]
pub enum Queried<T> {
    Ready(T),
    Skipped,
}

/// Host identity fields, read once at report time.
#[derive(Debug, Clone, PartialEq)]
pub struct HostIdentity {
    pub os_name: String,
    pub hostname: String,
    pub os_release: String,
    pub os_version: String,
    pub machine_arch: String,
    pub processor_name: String,
}

/// CPU topology, frequency bounds and utilization snapshot.
///
/// The usage fields are only meaningful after a blocking sampling window;
/// see [`crate::facts::HostFacts::cpu`]. Frequency values are in MHz, with
/// 0.0 standing in for bounds the platform does not expose.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuSnapshot {
    pub physical_cores: usize,
    pub logical_cores: usize,
    pub freq_max_mhz: f64,
    pub freq_min_mhz: f64,
    pub freq_current_mhz: f64,
    pub per_core_usage: Vec<f32>,
    pub total_usage: f32,
}

/// Primary or swap memory counters. For swap, `available` carries the free
/// counter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemorySnapshot {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub percent: f32,
}

/// Usage counters for one mounted partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f32,
}

/// A mounted partition. The usage query outcome is carried per item: a
/// partition that is not ready (or not readable) stays in the list as
/// `Skipped` and is dropped at print time.
#[derive(Debug, Clone, PartialEq)]
pub struct DiskPartition {
    pub device: String,
    pub mountpoint: String,
    pub fstype: String,
    pub usage: Queried<DiskUsage>,
}

/// Cumulative read/write byte totals across all block devices since boot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DiskIoTotals {
    pub read_bytes: u64,
    pub written_bytes: u64,
}

/// One address bound to a network interface, classified by family.
///
/// Only IPv4 and link-layer addresses are represented; other families are
/// dropped during classification. The link-layer variant carries no netmask
/// or broadcast because the OS layer does not expose them.
#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceAddress {
    V4 {
        address: Ipv4Addr,
        netmask: Ipv4Addr,
        broadcast: Option<Ipv4Addr>,
    },
    Link {
        address: String,
    },
}

/// A network interface and its classified addresses.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkInterface {
    pub name: String,
    pub addresses: Vec<InterfaceAddress>,
}

/// Cumulative sent/received byte totals across all interfaces since boot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NetworkIoTotals {
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

/// Best-effort view of one running process. The owning user may be
/// unavailable under permission restrictions.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
    pub username: Option<String>,
}
