//! OS facilities provider abstraction.
//!
//! The libraries that answer host queries read live kernel state and are
//! process-global by nature. Routing every query through the [`HostFacts`]
//! trait keeps the report assembly testable: the binaries hand it a
//! [`LiveHostFacts`], tests hand it a mock returning fixed snapshots.

use std::time::Duration;

use anyhow::Result;

use crate::models::{
    CpuSnapshot, DiskIoTotals, DiskPartition, HostIdentity, MemorySnapshot, NetworkInterface,
    NetworkIoTotals, ProcessRecord, Queried,
};

/// Live provider backed by sysinfo and platform facilities
pub mod live;

pub use live::LiveHostFacts;

/// Query surface over the host operating system.
///
/// Each method is a one-shot synchronous query with no retry semantics; the
/// only call with a nontrivial duration is [`HostFacts::cpu`], which blocks
/// for its sampling window.
#[cfg_attr(test, mockall::automock)]
pub trait HostFacts {
    /// OS and hardware identity fields.
    fn identity(&mut self) -> Result<HostIdentity>;

    /// CPU topology, frequency bounds, and utilization sampled over
    /// `sample`. Blocks the calling thread for the full window: utilization
    /// needs two time-separated counter readings.
    fn cpu(&mut self, sample: Duration) -> Result<CpuSnapshot>;

    /// Primary memory counters (instantaneous, no sampling).
    fn memory(&mut self) -> Result<MemorySnapshot>;

    /// Swap counters (instantaneous, no sampling).
    fn swap(&mut self) -> Result<MemorySnapshot>;

    /// Mounted partitions. Partitions whose usage query fails due to
    /// access or readiness restrictions are carried as `Skipped`.
    fn disk_partitions(&mut self) -> Result<Vec<DiskPartition>>;

    /// Cumulative read/write byte totals across all block devices since
    /// boot.
    fn disk_io_totals(&mut self) -> Result<DiskIoTotals>;

    /// Network interfaces with their classified addresses. Addresses of
    /// families other than IPv4 and link-layer never appear.
    fn network_interfaces(&mut self) -> Result<Vec<NetworkInterface>>;

    /// Cumulative sent/received byte totals across all interfaces since
    /// boot.
    fn network_io_totals(&mut self) -> Result<NetworkIoTotals>;

    /// Boot timestamp as seconds since the Unix epoch.
    fn boot_time(&mut self) -> Result<u64>;

    /// Best-effort process table. Processes that vanish between
    /// enumeration and detail read are carried as `Skipped`.
    fn processes(&mut self) -> Result<Vec<Queried<ProcessRecord>>>;

    /// Raw output lines of the platform service-manager listing command.
    fn services(&mut self) -> Result<Vec<String>>;
}
