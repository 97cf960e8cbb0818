use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::ui::formatters::{format_age, format_bits_per_sec, format_bytes, format_uptime};

/// Severity level of a diagnostic event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "Error"),
            Severity::Warning => write!(f, "Warning"),
        }
    }
}

/// The two event sources that are merged by the event collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogSource {
    System,
    Application,
}

impl LogSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogSource::System => "System",
            LogSource::Application => "Application",
        }
    }
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interface type of a network adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdapterKind {
    Ethernet,
    Wireless80211,
    Loopback,
    Tunnel,
    Ppp,
    Other,
}

impl AdapterKind {
    /// Parse the interface type names used by Windows (`NetworkInterfaceType`).
    /// Only the plain `Ethernet` type counts as Ethernet; the legacy
    /// `FastEthernetT`/`GigabitEthernet` style names are `Other`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Ethernet" => AdapterKind::Ethernet,
            "Wireless80211" => AdapterKind::Wireless80211,
            "Loopback" => AdapterKind::Loopback,
            "Tunnel" => AdapterKind::Tunnel,
            "Ppp" => AdapterKind::Ppp,
            _ => AdapterKind::Other,
        }
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterKind::Ethernet => write!(f, "Ethernet"),
            AdapterKind::Wireless80211 => write!(f, "Wireless80211"),
            AdapterKind::Loopback => write!(f, "Loopback"),
            AdapterKind::Tunnel => write!(f, "Tunnel"),
            AdapterKind::Ppp => write!(f, "Ppp"),
            AdapterKind::Other => write!(f, "Other"),
        }
    }
}

/// Operational status of a network adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationalStatus {
    Up,
    Down,
    Testing,
    Dormant,
    NotPresent,
    LowerLayerDown,
    Unknown,
}

impl OperationalStatus {
    /// Parse both Windows (`OperationalStatus`) and Linux (`operstate`) spellings
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "up" => OperationalStatus::Up,
            "down" => OperationalStatus::Down,
            "testing" => OperationalStatus::Testing,
            "dormant" => OperationalStatus::Dormant,
            "notpresent" => OperationalStatus::NotPresent,
            "lowerlayerdown" => OperationalStatus::LowerLayerDown,
            _ => OperationalStatus::Unknown,
        }
    }
}

impl fmt::Display for OperationalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationalStatus::Up => write!(f, "Up"),
            OperationalStatus::Down => write!(f, "Down"),
            OperationalStatus::Testing => write!(f, "Testing"),
            OperationalStatus::Dormant => write!(f, "Dormant"),
            OperationalStatus::NotPresent => write!(f, "NotPresent"),
            OperationalStatus::LowerLayerDown => write!(f, "LowerLayerDown"),
            OperationalStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One physical storage device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicalDisk {
    pub device_id: String,
    pub model: String,
    pub interface_type: String,
    pub size: u64,
    pub status: String,
    pub partitions: Vec<Partition>,
}

impl fmt::Display for PhysicalDisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Disk: {}", self.model)?;
        writeln!(f, "Device ID: {}", self.device_id)?;
        writeln!(f, "Interface: {}", self.interface_type)?;
        writeln!(f, "Size: {}", format_bytes(self.size))?;
        writeln!(f, "Status: {}", self.status)?;

        if !self.partitions.is_empty() {
            writeln!(f, "Partitions:")?;
            for partition in &self.partitions {
                writeln!(f, "  {}", partition)?;
            }
        }

        Ok(())
    }
}

/// One partition of a physical disk.
///
/// Starts as a name-only stub; drive letter, size and free space are filled in
/// once when a logical volume is matched to it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Partition {
    pub name: String,
    pub drive_letter: Option<String>,
    pub size: u64,
    pub free_space: u64,
}

impl Partition {
    pub fn stub(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn free_space_percentage(&self) -> f64 {
        if self.size == 0 {
            return 0.0;
        }
        self.free_space as f64 / self.size as f64 * 100.0
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.drive_letter {
            None => write!(f, "Partition: {}", self.name),
            Some(letter) => write!(
                f,
                "Drive {} - Size: {}, Free: {} ({:.2}%)",
                letter,
                format_bytes(self.size),
                format_bytes(self.free_space),
                self.free_space_percentage()
            ),
        }
    }
}

/// One network interface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkAdapter {
    pub name: String,
    pub description: String,
    pub kind: AdapterKind,
    pub status: OperationalStatus,
    /// Bits per second
    pub speed: u64,
    pub ipv4_address: Option<Ipv4Addr>,
    pub subnet_mask: Option<Ipv4Addr>,
    pub ipv6_address: Option<Ipv6Addr>,
    pub gateway: Option<IpAddr>,
    pub mac_address: String,
    pub dns_servers: Vec<IpAddr>,
}

impl NetworkAdapter {
    pub fn formatted_speed(&self) -> String {
        format_bits_per_sec(self.speed)
    }

    /// Down means "not Up" on a physical Ethernet or Wi-Fi adapter.
    /// Loopback, tunnel and other virtual types are never reported down.
    pub fn is_down(&self) -> bool {
        self.status != OperationalStatus::Up
            && matches!(self.kind, AdapterKind::Ethernet | AdapterKind::Wireless80211)
    }
}

impl fmt::Display for NetworkAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Interface: {}", self.name)?;
        writeln!(f, "Description: {}", self.description)?;
        writeln!(f, "Type: {}", self.kind)?;
        writeln!(f, "Status: {}", self.status)?;
        writeln!(f, "Speed: {}", self.formatted_speed())?;
        writeln!(f, "MAC Address: {}", self.mac_address)?;

        if let Some(ipv4) = &self.ipv4_address {
            writeln!(f, "IPv4 Address: {}", ipv4)?;
        }
        if let Some(mask) = &self.subnet_mask {
            writeln!(f, "Subnet Mask: {}", mask)?;
        }
        if let Some(ipv6) = &self.ipv6_address {
            writeln!(f, "IPv6 Address: {}", ipv6)?;
        }
        if let Some(gateway) = &self.gateway {
            writeln!(f, "Gateway: {}", gateway)?;
        }

        if !self.dns_servers.is_empty() {
            writeln!(f, "DNS Servers:")?;
            for dns in &self.dns_servers {
                writeln!(f, "  {}", dns)?;
            }
        }

        Ok(())
    }
}

/// One entry from an event source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticEvent {
    pub event_id: i64,
    pub source: String,
    pub log_name: LogSource,
    pub message: String,
    pub time_generated: NaiveDateTime,
    pub level: Severity,
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Event ID: {}", self.event_id)?;
        writeln!(f, "Source: {}", self.source)?;
        writeln!(f, "Log: {}", self.log_name)?;
        writeln!(f, "Level: {}", self.level)?;
        writeln!(f, "Time: {}", self.time_generated.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "Message: {}", self.message)
    }
}

/// Snapshot of the machine identity. Uptime is computed at collection time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostIdentity {
    pub computer_name: String,
    pub operating_system: String,
    pub total_physical_memory: u64,
    pub available_physical_memory: u64,
    pub processor: String,
    pub install_date: Option<NaiveDateTime>,
    pub uptime: Duration,
}

impl HostIdentity {
    pub fn memory_usage_percentage(&self) -> f64 {
        if self.total_physical_memory == 0 {
            return 0.0;
        }
        let used = self
            .total_physical_memory
            .saturating_sub(self.available_physical_memory);
        used as f64 / self.total_physical_memory as f64 * 100.0
    }

    /// Time elapsed since installation, zero when the install date is unknown
    pub fn system_age(&self, now: NaiveDateTime) -> Duration {
        self.install_date
            .and_then(|installed| (now - installed).to_std().ok())
            .unwrap_or_default()
    }

    pub fn formatted_system_age(&self, now: NaiveDateTime) -> String {
        format_age(self.system_age(now))
    }

    pub fn formatted_uptime(&self) -> String {
        format_uptime(self.uptime)
    }

    pub fn formatted_install_date(&self) -> String {
        match self.install_date {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => "Unknown".to_string(),
        }
    }
}

impl fmt::Display for HostIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let now = Local::now().naive_local();

        writeln!(f, "Computer Name: {}", self.computer_name)?;
        writeln!(f, "Operating System: {}", self.operating_system)?;
        writeln!(f, "Processor: {}", self.processor)?;
        writeln!(f, "Total Memory: {}", format_bytes(self.total_physical_memory))?;
        writeln!(
            f,
            "Available Memory: {} ({:.2}% free)",
            format_bytes(self.available_physical_memory),
            100.0 - self.memory_usage_percentage()
        )?;
        writeln!(f, "Installation Date: {}", self.formatted_install_date())?;
        writeln!(f, "System Age: {}", self.formatted_system_age(now))?;
        writeln!(f, "Uptime: {}", self.formatted_uptime())
    }
}

/// Result of one imaging run. Never an error: failures are described in `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagingOutcome {
    pub success: bool,
    pub message: String,
}

impl ImagingOutcome {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
