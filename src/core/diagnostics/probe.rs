//! Capability layer consumed by the collectors.
//!
//! A `SystemProbe` returns raw, platform-shaped records. Collectors never talk to
//! WMI, sysfs or journald directly; they only organize and correlate what a probe
//! hands back. Every method is independently failable.

use std::net::{IpAddr, Ipv4Addr};

use super::types::{AdapterKind, LogSource, OperationalStatus, Severity};
use crate::error::Result;

/// One physical storage device as enumerated by the platform
#[derive(Debug, Clone, Default)]
pub struct RawDisk {
    pub device_id: Option<String>,
    pub model: Option<String>,
    pub interface_type: Option<String>,
    pub size: Option<u64>,
    pub status: Option<String>,
}

/// One mounted, fixed logical volume
#[derive(Debug, Clone, Default)]
pub struct RawVolume {
    /// Drive letter ("C:") or mount point ("/home")
    pub device_id: String,
    /// Partition identifier resolved by the platform, when it can associate one
    pub partition_id: Option<String>,
    pub size: Option<u64>,
    pub free_space: Option<u64>,
}

impl RawVolume {
    /// Identifier used to correlate this volume with a partition stub.
    pub fn match_key(&self) -> &str {
        self.partition_id.as_deref().unwrap_or(&self.device_id)
    }
}

#[derive(Debug, Clone)]
pub struct RawUnicastAddress {
    pub address: IpAddr,
    /// IPv4 mask; always `None` for IPv6 addresses
    pub ipv4_mask: Option<Ipv4Addr>,
}

/// One network interface with its IP properties
#[derive(Debug, Clone)]
pub struct RawAdapter {
    pub name: String,
    pub description: String,
    pub kind: AdapterKind,
    pub status: OperationalStatus,
    /// Bits per second; some platforms report -1 for "unknown"
    pub speed: i64,
    pub unicast_addresses: Vec<RawUnicastAddress>,
    pub gateways: Vec<IpAddr>,
    pub dns_servers: Vec<IpAddr>,
    pub mac_address: Vec<u8>,
}

/// One event log entry. `level` is `None` for entries that are neither errors nor warnings.
#[derive(Debug, Clone)]
pub struct RawLogEntry {
    pub event_id: i64,
    pub source: String,
    pub message: String,
    pub time_generated: chrono::NaiveDateTime,
    pub level: Option<Severity>,
}

#[derive(Debug, Clone, Default)]
pub struct RawComputerSystem {
    pub name: Option<String>,
    pub total_physical_memory: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct RawOperatingSystem {
    pub caption: Option<String>,
    /// Free physical memory in kilobytes
    pub free_physical_memory_kb: Option<u64>,
    /// CIM datetime, e.g. `20230101120000.000000+060`
    pub install_date: Option<String>,
    /// CIM datetime of the last boot
    pub last_boot_up_time: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RawProcessor {
    pub name: Option<String>,
}

/// Platform capability layer.
///
/// Implementations query the operating system and return records in enumeration
/// order. They do not filter, merge or sort beyond what the method documents.
pub trait SystemProbe: Send + Sync {
    /// Enumerate physical disks.
    fn physical_disks(&self) -> Result<Vec<RawDisk>>;

    /// Partition stub names associated with the disk `device_id`, in association order.
    fn partition_links(&self, device_id: &str) -> Result<Vec<String>>;

    /// Fixed, mounted logical volumes.
    fn logical_volumes(&self) -> Result<Vec<RawVolume>>;

    fn network_adapters(&self) -> Result<Vec<RawAdapter>>;

    /// Entries of one event source, in the source's enumeration order.
    fn log_entries(&self, source: LogSource) -> Result<Vec<RawLogEntry>>;

    fn computer_system(&self) -> Result<RawComputerSystem>;

    fn operating_system(&self) -> Result<RawOperatingSystem>;

    fn processors(&self) -> Result<Vec<RawProcessor>>;
}
