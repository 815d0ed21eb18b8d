//! Host snapshot report: eight sections in fixed order.

use std::io::Write;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{Local, TimeZone};

use crate::facts::HostFacts;
use crate::models::{InterfaceAddress, Queried};
use crate::utils::{format_boot_time, format_size};

use super::{banner, rule, sub_banner};

/// Assembles the host snapshot report against an injected facilities
/// provider.
///
/// Sections run strictly sequentially in the order of [`HostReport::run`];
/// each one prints its banner before querying, so a failed query still
/// leaves a titled section containing the failure line.
pub struct HostReport<'a, W: Write> {
    facts: &'a mut dyn HostFacts,
    out: W,
    sample: Duration,
}

impl<'a, W: Write> HostReport<'a, W> {
    pub fn new(facts: &'a mut dyn HostFacts, out: W, sample: Duration) -> Self {
        HostReport { facts, out, sample }
    }

    /// Run all sections. Individual section failures surface inline and
    /// never abort the remaining sections; only the output sink itself can
    /// fail the run.
    pub fn run(&mut self) -> Result<()> {
        self.section(Self::identity)?;
        self.section(Self::cpu)?;
        self.section(Self::memory)?;
        self.section(Self::disk)?;
        self.section(Self::network)?;
        self.section(Self::boot_time)?;
        self.section(Self::processes)?;
        self.section(Self::services)?;
        Ok(())
    }

    fn section(&mut self, render: fn(&mut Self) -> Result<()>) -> Result<()> {
        if let Err(err) = render(self) {
            writeln!(self.out, "An error occurred: {}", err)?;
        }
        Ok(())
    }

    fn identity(&mut self) -> Result<()> {
        writeln!(self.out, "{}", banner("System Information"))?;
        let identity = self.facts.identity()?;
        writeln!(self.out, "System: {}", identity.os_name)?;
        writeln!(self.out, "Node Name: {}", identity.hostname)?;
        writeln!(self.out, "Release: {}", identity.os_release)?;
        writeln!(self.out, "Version: {}", identity.os_version)?;
        writeln!(self.out, "Machine: {}", identity.machine_arch)?;
        writeln!(self.out, "Processor: {}", identity.processor_name)?;
        Ok(())
    }

    fn cpu(&mut self) -> Result<()> {
        writeln!(self.out, "{}", banner("CPU Info"))?;
        let cpu = self.facts.cpu(self.sample)?;
        writeln!(self.out, "Physical cores: {}", cpu.physical_cores)?;
        writeln!(self.out, "Total cores: {}", cpu.logical_cores)?;
        writeln!(self.out, "Max Frequency: {:.2}Mhz", cpu.freq_max_mhz)?;
        writeln!(self.out, "Min Frequency: {:.2}Mhz", cpu.freq_min_mhz)?;
        writeln!(self.out, "Current Frequency: {:.2}Mhz", cpu.freq_current_mhz)?;
        writeln!(self.out, "CPU Usage Per Core:")?;
        for (core, usage) in cpu.per_core_usage.iter().enumerate() {
            writeln!(self.out, "Core {}: {:.1}%", core, usage)?;
        }
        writeln!(self.out, "Total CPU Usage: {:.1}%", cpu.total_usage)?;
        Ok(())
    }

    fn memory(&mut self) -> Result<()> {
        writeln!(self.out, "{}", banner("Memory Information"))?;
        let memory = self.facts.memory()?;
        writeln!(self.out, "Total: {}", format_size(memory.total))?;
        writeln!(self.out, "Available: {}", format_size(memory.available))?;
        writeln!(self.out, "Used: {}", format_size(memory.used))?;
        writeln!(self.out, "Percentage: {:.1}%", memory.percent)?;

        writeln!(self.out, "{}", sub_banner("SWAP"))?;
        let swap = self.facts.swap()?;
        writeln!(self.out, "Total: {}", format_size(swap.total))?;
        writeln!(self.out, "Free: {}", format_size(swap.available))?;
        writeln!(self.out, "Used: {}", format_size(swap.used))?;
        writeln!(self.out, "Percentage: {:.1}%", swap.percent)?;
        Ok(())
    }

    fn disk(&mut self) -> Result<()> {
        writeln!(self.out, "{}", banner("Disk Information"))?;
        writeln!(self.out, "Partitions and Usage:")?;
        for partition in self.facts.disk_partitions()? {
            // A partition whose usage query was skipped does not appear at
            // all; enumeration of the remaining partitions continues.
            let usage = match partition.usage {
                Queried::Ready(usage) => usage,
                Queried::Skipped => continue,
            };
            writeln!(self.out, "=== Device: {} ===", partition.device)?;
            writeln!(self.out, "  Mountpoint: {}", partition.mountpoint)?;
            writeln!(self.out, "  File system type: {}", partition.fstype)?;
            writeln!(self.out, "  Total Size: {}", format_size(usage.total))?;
            writeln!(self.out, "  Used: {}", format_size(usage.used))?;
            writeln!(self.out, "  Free: {}", format_size(usage.free))?;
            writeln!(self.out, "  Percentage: {:.1}%", usage.percent)?;
        }

        let io = self.facts.disk_io_totals()?;
        writeln!(self.out, "Total read: {}", format_size(io.read_bytes))?;
        writeln!(self.out, "Total write: {}", format_size(io.written_bytes))?;
        Ok(())
    }

    fn network(&mut self) -> Result<()> {
        writeln!(self.out, "{}", banner("Network Information"))?;
        for interface in self.facts.network_interfaces()? {
            writeln!(self.out, "=== Interface: {} ===", interface.name)?;
            for address in &interface.addresses {
                match address {
                    InterfaceAddress::V4 {
                        address,
                        netmask,
                        broadcast,
                    } => {
                        writeln!(self.out, "  IP Address: {}", address)?;
                        writeln!(self.out, "  Netmask: {}", netmask)?;
                        if let Some(broadcast) = broadcast {
                            writeln!(self.out, "  Broadcast IP: {}", broadcast)?;
                        }
                    }
                    InterfaceAddress::Link { address } => {
                        writeln!(self.out, "  MAC Address: {}", address)?;
                    }
                }
            }
        }

        let io = self.facts.network_io_totals()?;
        writeln!(self.out, "Total Bytes Sent: {}", format_size(io.bytes_sent))?;
        writeln!(
            self.out,
            "Total Bytes Received: {}",
            format_size(io.bytes_received)
        )?;
        Ok(())
    }

    fn boot_time(&mut self) -> Result<()> {
        writeln!(self.out, "{}", banner("Boot Time"))?;
        let epoch = self.facts.boot_time()?;
        let boot = Local
            .timestamp_opt(epoch as i64, 0)
            .single()
            .ok_or_else(|| anyhow!("boot timestamp {} is out of range", epoch))?;
        writeln!(self.out, "Boot Time: {}", format_boot_time(boot))?;
        Ok(())
    }

    fn processes(&mut self) -> Result<()> {
        writeln!(self.out, "{}", banner("Running Processes"))?;
        for record in self.facts.processes()? {
            // A process that exited between enumeration and detail read is
            // an expected race, dropped without a log line.
            let record = match record {
                Queried::Ready(record) => record,
                Queried::Skipped => continue,
            };
            writeln!(
                self.out,
                "PID: {} Name: {} Username: {}",
                record.pid,
                record.name,
                record.username.as_deref().unwrap_or("-")
            )?;
        }
        writeln!(self.out, "{}", rule())?;
        Ok(())
    }

    fn services(&mut self) -> Result<()> {
        writeln!(self.out, "{}", banner("Running Services"))?;
        for line in self.facts.services()? {
            writeln!(self.out, "{}", line)?;
        }
        writeln!(self.out, "{}", rule())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::MockHostFacts;
    use crate::models::{
        CpuSnapshot, DiskIoTotals, DiskPartition, DiskUsage, HostIdentity, MemorySnapshot,
        NetworkInterface, NetworkIoTotals, ProcessRecord,
    };
    use anyhow::anyhow;
    use std::net::Ipv4Addr;

    const SECTION_TITLES: [&str; 8] = [
        "System Information",
        "CPU Info",
        "Memory Information",
        "Disk Information",
        "Network Information",
        "Boot Time",
        "Running Processes",
        "Running Services",
    ];

    fn sample_identity() -> HostIdentity {
        HostIdentity {
            os_name: "Linux".to_string(),
            hostname: "workstation-01".to_string(),
            os_release: "6.1.0".to_string(),
            os_version: "Debian 12".to_string(),
            machine_arch: "x86_64".to_string(),
            processor_name: "Test CPU".to_string(),
        }
    }

    fn sample_memory() -> MemorySnapshot {
        MemorySnapshot {
            total: 8 * 1024 * 1024 * 1024,
            available: 4 * 1024 * 1024 * 1024,
            used: 4 * 1024 * 1024 * 1024,
            percent: 50.0,
        }
    }

    fn ready_partition(device: &str) -> DiskPartition {
        DiskPartition {
            device: device.to_string(),
            mountpoint: format!("/mnt/{}", device),
            fstype: "ext4".to_string(),
            usage: Queried::Ready(DiskUsage {
                total: 100 * 1024 * 1024 * 1024,
                used: 50 * 1024 * 1024 * 1024,
                free: 50 * 1024 * 1024 * 1024,
                percent: 50.0,
            }),
        }
    }

    /// Variable parts of the mocked provider; one expectation is wired per
    /// trait method so no two expectations can shadow each other.
    struct FactsFixture {
        identity_fails: bool,
        partitions: Vec<DiskPartition>,
        interfaces: Vec<NetworkInterface>,
        processes: Vec<Queried<ProcessRecord>>,
    }

    impl Default for FactsFixture {
        fn default() -> Self {
            FactsFixture {
                identity_fails: false,
                partitions: vec![ready_partition("sda1")],
                interfaces: vec![NetworkInterface {
                    name: "eth0".to_string(),
                    addresses: vec![
                        InterfaceAddress::V4 {
                            address: Ipv4Addr::new(192, 168, 1, 10),
                            netmask: Ipv4Addr::new(255, 255, 255, 0),
                            broadcast: Some(Ipv4Addr::new(192, 168, 1, 255)),
                        },
                        InterfaceAddress::Link {
                            address: "aa:bb:cc:dd:ee:ff".to_string(),
                        },
                    ],
                }],
                processes: vec![Queried::Ready(ProcessRecord {
                    pid: 1,
                    name: "init".to_string(),
                    username: Some("root".to_string()),
                })],
            }
        }
    }

    fn mock_facts(fixture: FactsFixture) -> MockHostFacts {
        let FactsFixture {
            identity_fails,
            partitions,
            interfaces,
            processes,
        } = fixture;

        let mut facts = MockHostFacts::new();
        facts.expect_identity().returning(move || {
            if identity_fails {
                Err(anyhow!("identity query failed"))
            } else {
                Ok(sample_identity())
            }
        });
        facts.expect_cpu().returning(|_| {
            Ok(CpuSnapshot {
                physical_cores: 2,
                logical_cores: 4,
                freq_max_mhz: 4400.0,
                freq_min_mhz: 800.0,
                freq_current_mhz: 2100.0,
                per_core_usage: vec![10.0, 20.0, 30.0, 40.0],
                total_usage: 25.0,
            })
        });
        facts.expect_memory().returning(|| Ok(sample_memory()));
        facts.expect_swap().returning(|| Ok(sample_memory()));
        facts
            .expect_disk_partitions()
            .returning(move || Ok(partitions.clone()));
        facts.expect_disk_io_totals().returning(|| {
            Ok(DiskIoTotals {
                read_bytes: 1024,
                written_bytes: 2048,
            })
        });
        facts
            .expect_network_interfaces()
            .returning(move || Ok(interfaces.clone()));
        facts.expect_network_io_totals().returning(|| {
            Ok(NetworkIoTotals {
                bytes_sent: 4096,
                bytes_received: 8192,
            })
        });
        facts.expect_boot_time().returning(|| Ok(1_700_000_000));
        facts
            .expect_processes()
            .returning(move || Ok(processes.clone()));
        facts
            .expect_services()
            .returning(|| Ok(vec![" [ + ]  ssh".to_string()]));
        facts
    }

    fn render(facts: &mut MockHostFacts) -> String {
        let mut buf = Vec::new();
        HostReport::new(facts, &mut buf, Duration::from_millis(10))
            .run()
            .expect("report rendering");
        String::from_utf8(buf).expect("utf-8 report")
    }

    #[test]
    fn test_sections_render_in_fixed_order() {
        let mut facts = mock_facts(FactsFixture::default());
        let report = render(&mut facts);

        let mut last = 0;
        for title in SECTION_TITLES {
            let position = report
                .find(&banner(title))
                .unwrap_or_else(|| panic!("missing banner for {}", title));
            assert!(position >= last, "{} out of order", title);
            last = position;
        }
    }

    #[test]
    fn test_report_body_content() {
        let mut facts = mock_facts(FactsFixture::default());
        let report = render(&mut facts);

        assert!(report.contains("Node Name: workstation-01"));
        assert!(report.contains("Physical cores: 2"));
        assert!(report.contains("Core 3: 40.0%"));
        assert!(report.contains("Total: 8.00GB"));
        assert!(report.contains("  IP Address: 192.168.1.10"));
        assert!(report.contains("  MAC Address: aa:bb:cc:dd:ee:ff"));
        assert!(report.contains("Total Bytes Received: 8.00KB"));
        assert!(report.contains("PID: 1 Name: init Username: root"));
        assert!(report.contains(" [ + ]  ssh"));
    }

    #[test]
    fn test_inaccessible_partition_skipped_in_order() {
        let mut facts = mock_facts(FactsFixture {
            partitions: vec![
                ready_partition("sda1"),
                DiskPartition {
                    device: "sda2".to_string(),
                    mountpoint: "/mnt/sda2".to_string(),
                    fstype: "ext4".to_string(),
                    usage: Queried::Skipped,
                },
                ready_partition("sdb1"),
            ],
            ..FactsFixture::default()
        });
        let report = render(&mut facts);

        assert_eq!(report.matches("=== Device:").count(), 2);
        assert!(!report.contains("sda2"));
        let first = report.find("=== Device: sda1 ===").expect("sda1 block");
        let second = report.find("=== Device: sdb1 ===").expect("sdb1 block");
        assert!(first < second);
        // Totals still follow the partition blocks.
        assert!(report.contains("Total read: 1.00KB"));
    }

    #[test]
    fn test_exited_process_silently_omitted() {
        let mut facts = mock_facts(FactsFixture {
            processes: vec![
                Queried::Ready(ProcessRecord {
                    pid: 10,
                    name: "a".to_string(),
                    username: None,
                }),
                Queried::Skipped,
                Queried::Ready(ProcessRecord {
                    pid: 30,
                    name: "c".to_string(),
                    username: None,
                }),
            ],
            ..FactsFixture::default()
        });
        let report = render(&mut facts);

        assert!(report.contains("PID: 10 Name: a Username: -"));
        assert!(report.contains("PID: 30 Name: c Username: -"));
        assert_eq!(report.matches("PID: ").count(), 2);
    }

    #[test]
    fn test_section_failure_does_not_abort_run() {
        let mut facts = mock_facts(FactsFixture {
            identity_fails: true,
            ..FactsFixture::default()
        });
        let report = render(&mut facts);

        assert!(report.contains("An error occurred: identity query failed"));
        // Every later section still rendered under its banner.
        for title in SECTION_TITLES {
            assert!(report.contains(&banner(title)), "missing {}", title);
        }
        assert!(report.contains("Total CPU Usage: 25.0%"));
    }

    #[test]
    fn test_interface_prints_one_line_per_classified_address() {
        let mut facts = mock_facts(FactsFixture {
            interfaces: vec![NetworkInterface {
                name: "wlan0".to_string(),
                addresses: vec![InterfaceAddress::V4 {
                    address: Ipv4Addr::new(10, 0, 0, 2),
                    netmask: Ipv4Addr::new(255, 0, 0, 0),
                    broadcast: None,
                }],
            }],
            ..FactsFixture::default()
        });
        let report = render(&mut facts);

        assert_eq!(report.matches("  IP Address:").count(), 1);
        assert!(!report.contains("Broadcast IP"));
    }

    #[test]
    fn test_boot_time_renders_local_calendar_time() {
        let mut facts = mock_facts(FactsFixture::default());
        let report = render(&mut facts);

        let line = report
            .lines()
            .find(|line| line.starts_with("Boot Time: "))
            .expect("boot time line");
        // year/month/day hour:minute:second shape, unpadded components.
        let stamp = line.trim_start_matches("Boot Time: ");
        assert_eq!(stamp.split('/').count(), 3);
        assert_eq!(stamp.split(':').count(), 3);
    }
}
