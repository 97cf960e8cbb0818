//! `SystemProbe` for Linux hosts.
//!
//! Memory, host, CPU, volume and address data come from `sysinfo`; disk
//! topology and link state from sysfs; gateways from `/proc/net/route`; DNS from
//! `/etc/resolv.conf`; log entries from journald.

use std::collections::HashMap;
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::debug;
use sysinfo::{CpuRefreshKind, Disks, MemoryRefreshKind, Networks, RefreshKind, System};

use super::journal::journal_entries;
use super::sysfs::{
    block_devices, disk_from_sysfs, interface_facts, parse_default_gateways, parse_nameservers,
    partitions,
};
use crate::core::diagnostics::host::format_cim_datetime;
use crate::core::diagnostics::probe::{
    RawAdapter, RawComputerSystem, RawDisk, RawLogEntry, RawOperatingSystem, RawProcessor,
    RawUnicastAddress, RawVolume, SystemProbe,
};
use crate::core::diagnostics::{AdapterKind, LogSource, OperationalStatus};
use crate::error::{DiagError, Result};

const SYS_BLOCK: &str = "/sys/block";
const SYS_CLASS_NET: &str = "/sys/class/net";
const PROC_NET_ROUTE: &str = "/proc/net/route";
const RESOLV_CONF: &str = "/etc/resolv.conf";

#[derive(Debug)]
pub struct SysinfoProbe {
    sys_block: PathBuf,
    sys_class_net: PathBuf,
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoProbe {
    pub fn new() -> Self {
        Self {
            sys_block: PathBuf::from(SYS_BLOCK),
            sys_class_net: PathBuf::from(SYS_CLASS_NET),
        }
    }

    fn disk_name(device_id: &str) -> &str {
        device_id.strip_prefix("/dev/").unwrap_or(device_id)
    }
}

fn read_optional(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        debug!("Could not read {}: {}", path, e);
        String::new()
    })
}

impl SystemProbe for SysinfoProbe {
    fn physical_disks(&self) -> Result<Vec<RawDisk>> {
        let names = block_devices(&self.sys_block).map_err(|e| {
            DiagError::probe(format!("Failed to list {}: {}", self.sys_block.display(), e))
        })?;
        Ok(names
            .iter()
            .map(|name| disk_from_sysfs(&self.sys_block, name))
            .collect())
    }

    fn partition_links(&self, device_id: &str) -> Result<Vec<String>> {
        partitions(&self.sys_block, Self::disk_name(device_id)).map_err(|e| {
            DiagError::probe(format!("Failed to list partitions of {}: {}", device_id, e))
        })
    }

    fn logical_volumes(&self) -> Result<Vec<RawVolume>> {
        let disks = Disks::new_with_refreshed_list();

        Ok(disks
            .list()
            .iter()
            .filter(|disk| !disk.is_removable())
            .filter_map(|disk| {
                let device = disk.name().to_string_lossy().into_owned();
                // Pseudo and network filesystems have no backing partition
                if !device.starts_with("/dev/") {
                    return None;
                }
                Some(RawVolume {
                    device_id: disk.mount_point().to_string_lossy().into_owned(),
                    partition_id: Some(device),
                    size: Some(disk.total_space()),
                    free_space: Some(disk.available_space()),
                })
            })
            .collect())
    }

    fn network_adapters(&self) -> Result<Vec<RawAdapter>> {
        let networks = Networks::new_with_refreshed_list();

        let mut names: Vec<String> = fs::read_dir(&self.sys_class_net)
            .map_err(|e| {
                DiagError::probe(format!("Failed to list {}: {}", self.sys_class_net.display(), e))
            })?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        let mut gateways: HashMap<String, Vec<IpAddr>> = HashMap::new();
        for (iface, gateway) in parse_default_gateways(&read_optional(PROC_NET_ROUTE)) {
            gateways.entry(iface).or_default().push(IpAddr::V4(gateway));
        }
        let dns_servers = parse_nameservers(&read_optional(RESOLV_CONF));

        Ok(names
            .into_iter()
            .map(|name| {
                let facts = interface_facts(&self.sys_class_net, &name);

                let unicast_addresses = networks
                    .list()
                    .get(&name)
                    .map(|data| {
                        data.ip_networks()
                            .iter()
                            .map(|net| RawUnicastAddress {
                                address: net.addr,
                                ipv4_mask: match net.addr {
                                    IpAddr::V4(_) => Some(ipv4_mask(net.prefix)),
                                    IpAddr::V6(_) => None,
                                },
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                let dns = if facts.kind == AdapterKind::Loopback {
                    Vec::new()
                } else {
                    dns_servers.clone()
                };

                RawAdapter {
                    description: facts.description,
                    kind: facts.kind,
                    status: OperationalStatus::from_name(&facts.operstate),
                    speed: facts.speed,
                    unicast_addresses,
                    gateways: gateways.remove(&name).unwrap_or_default(),
                    dns_servers: dns,
                    mac_address: facts.mac_address,
                    name,
                }
            })
            .collect())
    }

    fn log_entries(&self, source: LogSource) -> Result<Vec<RawLogEntry>> {
        journal_entries(source)
    }

    fn computer_system(&self) -> Result<RawComputerSystem> {
        let system = System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::nothing().with_ram()),
        );

        Ok(RawComputerSystem {
            name: System::host_name(),
            total_physical_memory: Some(system.total_memory()),
        })
    }

    fn operating_system(&self) -> Result<RawOperatingSystem> {
        let system = System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::nothing().with_ram()),
        );

        let last_boot = DateTime::from_timestamp(System::boot_time() as i64, 0)
            .map(|utc| format_cim_datetime(utc.with_timezone(&Local).naive_local()));

        Ok(RawOperatingSystem {
            caption: System::long_os_version().or_else(System::name),
            free_physical_memory_kb: Some(system.available_memory() / 1024),
            install_date: root_creation_time(Path::new("/")),
            last_boot_up_time: last_boot,
        })
    }

    fn processors(&self) -> Result<Vec<RawProcessor>> {
        let system = System::new_with_specifics(
            RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing()),
        );

        Ok(system
            .cpus()
            .first()
            .map(|cpu| RawProcessor {
                name: Some(cpu.brand().to_string()),
            })
            .into_iter()
            .collect())
    }
}

/// Birth time of the root filesystem's top directory, the closest thing to an
/// install date most distributions record
fn root_creation_time(root: &Path) -> Option<String> {
    let created = fs::metadata(root).and_then(|m| m.created()).ok()?;
    let local: DateTime<Local> = created.into();
    Some(format_cim_datetime(local.naive_local()))
}

fn ipv4_mask(prefix: u8) -> std::net::Ipv4Addr {
    let bits = match prefix {
        0 => 0,
        p if p >= 32 => u32::MAX,
        p => u32::MAX << (32 - u32::from(p)),
    };
    std::net::Ipv4Addr::from(bits)
}
