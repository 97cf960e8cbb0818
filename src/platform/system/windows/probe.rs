//! `SystemProbe` backed by WMI, with PowerShell for adapter IP properties.
//!
//! WMI connections are bound to the calling thread's COM apartment, so each
//! method opens its own connection instead of the probe holding one.

use log::debug;
use serde::Deserialize;

use super::core::{connect, object_path_key, wmi_query, wql_quote};
use super::network::get_network_adapters;
use crate::core::diagnostics::host::parse_cim_datetime;
use crate::core::diagnostics::probe::{
    RawAdapter, RawComputerSystem, RawDisk, RawLogEntry, RawOperatingSystem, RawProcessor,
    RawVolume, SystemProbe,
};
use crate::core::diagnostics::{LogSource, Severity};
use crate::error::Result;

/// `Win32_LogicalDisk.DriveType` of local fixed disks
const FIXED_DRIVE_TYPE: u32 = 3;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct Win32DiskDrive {
    #[serde(rename = "DeviceID")]
    device_id: Option<String>,
    model: Option<String>,
    interface_type: Option<String>,
    size: Option<u64>,
    status: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct Win32DiskPartition {
    #[serde(rename = "DeviceID")]
    device_id: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct Win32LogicalDisk {
    #[serde(rename = "DeviceID")]
    device_id: String,
    size: Option<u64>,
    free_space: Option<u64>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct Win32LogicalDiskToPartition {
    antecedent: String,
    dependent: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct Win32NTLogEvent {
    event_code: Option<u32>,
    source_name: Option<String>,
    message: Option<String>,
    time_generated: Option<String>,
    event_type: Option<u8>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct Win32ComputerSystem {
    name: Option<String>,
    total_physical_memory: Option<u64>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct Win32OperatingSystem {
    caption: Option<String>,
    free_physical_memory: Option<u64>,
    install_date: Option<String>,
    last_boot_up_time: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct Win32Processor {
    name: Option<String>,
}

#[derive(Debug, Default)]
pub struct WmiProbe;

impl WmiProbe {
    pub fn new() -> Self {
        Self
    }
}

/// `Win32_NTLogEvent.EventType`: 1 = error, 2 = warning
fn severity_from_event_type(event_type: Option<u8>) -> Option<Severity> {
    match event_type {
        Some(1) => Some(Severity::Error),
        Some(2) => Some(Severity::Warning),
        _ => None,
    }
}

impl SystemProbe for WmiProbe {
    fn physical_disks(&self) -> Result<Vec<RawDisk>> {
        let wmi = connect()?;
        let drives: Vec<Win32DiskDrive> = wmi_query(
            &wmi,
            "SELECT DeviceID, Model, InterfaceType, Size, Status FROM Win32_DiskDrive",
        )?;

        Ok(drives
            .into_iter()
            .map(|d| RawDisk {
                device_id: d.device_id,
                model: d.model,
                interface_type: d.interface_type,
                size: d.size,
                status: d.status,
            })
            .collect())
    }

    fn partition_links(&self, device_id: &str) -> Result<Vec<String>> {
        let wmi = connect()?;
        let query = format!(
            "ASSOCIATORS OF {{Win32_DiskDrive.DeviceID={}}} WHERE AssocClass = Win32_DiskDriveToDiskPartition",
            wql_quote(device_id)
        );
        let partitions: Vec<Win32DiskPartition> = wmi_query(&wmi, &query)?;
        Ok(partitions.into_iter().map(|p| p.device_id).collect())
    }

    fn logical_volumes(&self) -> Result<Vec<RawVolume>> {
        let wmi = connect()?;
        let disks: Vec<Win32LogicalDisk> = wmi_query(
            &wmi,
            &format!(
                "SELECT DeviceID, Size, FreeSpace FROM Win32_LogicalDisk WHERE DriveType = {}",
                FIXED_DRIVE_TYPE
            ),
        )?;
        let links: Vec<Win32LogicalDiskToPartition> =
            wmi_query(&wmi, "SELECT Antecedent, Dependent FROM Win32_LogicalDiskToPartition")?;

        Ok(disks
            .into_iter()
            .map(|disk| {
                let partition_id = links
                    .iter()
                    .find(|link| object_path_key(&link.dependent) == Some(disk.device_id.as_str()))
                    .and_then(|link| object_path_key(&link.antecedent))
                    .map(str::to_string);

                RawVolume {
                    device_id: disk.device_id,
                    partition_id,
                    size: disk.size,
                    free_space: disk.free_space,
                }
            })
            .collect())
    }

    fn network_adapters(&self) -> Result<Vec<RawAdapter>> {
        get_network_adapters()
    }

    fn log_entries(&self, source: LogSource) -> Result<Vec<RawLogEntry>> {
        let wmi = connect()?;
        let query = format!(
            "SELECT EventCode, SourceName, Message, TimeGenerated, EventType FROM Win32_NTLogEvent \
             WHERE Logfile = {} AND (EventType = 1 OR EventType = 2)",
            wql_quote(source.as_str())
        );
        let events: Vec<Win32NTLogEvent> = wmi_query(&wmi, &query)?;

        Ok(events
            .into_iter()
            .filter_map(|event| {
                let Some(time_generated) = event.time_generated.as_deref().and_then(parse_cim_datetime)
                else {
                    debug!("Skipping {} event without a readable timestamp", source);
                    return None;
                };
                Some(RawLogEntry {
                    event_id: event.event_code.map(i64::from).unwrap_or(0),
                    source: event.source_name.unwrap_or_default(),
                    message: event.message.unwrap_or_default().trim().to_string(),
                    time_generated,
                    level: severity_from_event_type(event.event_type),
                })
            })
            .collect())
    }

    fn computer_system(&self) -> Result<RawComputerSystem> {
        let wmi = connect()?;
        let systems: Vec<Win32ComputerSystem> =
            wmi_query(&wmi, "SELECT Name, TotalPhysicalMemory FROM Win32_ComputerSystem")?;

        Ok(systems
            .into_iter()
            .next()
            .map(|s| RawComputerSystem {
                name: s.name,
                total_physical_memory: s.total_physical_memory,
            })
            .unwrap_or_default())
    }

    fn operating_system(&self) -> Result<RawOperatingSystem> {
        let wmi = connect()?;
        let systems: Vec<Win32OperatingSystem> = wmi_query(
            &wmi,
            "SELECT Caption, FreePhysicalMemory, InstallDate, LastBootUpTime FROM Win32_OperatingSystem",
        )?;

        Ok(systems
            .into_iter()
            .next()
            .map(|os| RawOperatingSystem {
                caption: os.caption,
                free_physical_memory_kb: os.free_physical_memory,
                install_date: os.install_date,
                last_boot_up_time: os.last_boot_up_time,
            })
            .unwrap_or_default())
    }

    fn processors(&self) -> Result<Vec<RawProcessor>> {
        let wmi = connect()?;
        let processors: Vec<Win32Processor> = wmi_query(&wmi, "SELECT Name FROM Win32_Processor")?;
        Ok(processors
            .into_iter()
            .map(|p| RawProcessor { name: p.name })
            .collect())
    }
}
