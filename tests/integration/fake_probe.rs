// In-memory SystemProbe used by the collector tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};
use scantool::core::diagnostics::probe::{
    RawAdapter, RawComputerSystem, RawDisk, RawLogEntry, RawOperatingSystem, RawProcessor,
    RawUnicastAddress, RawVolume, SystemProbe,
};
use scantool::core::diagnostics::{AdapterKind, LogSource, OperationalStatus, Severity};
use scantool::{DiagError, Result};

#[derive(Default)]
pub struct FakeProbe {
    pub disks: Vec<RawDisk>,
    pub partitions: HashMap<String, Vec<String>>,
    pub volumes: Vec<RawVolume>,
    adapters: Mutex<Vec<RawAdapter>>,
    pub system_log: Vec<RawLogEntry>,
    pub application_log: Vec<RawLogEntry>,
    pub computer: RawComputerSystem,
    pub os: RawOperatingSystem,
    pub processors: Vec<RawProcessor>,
    failing: Mutex<HashSet<&'static str>>,
}

impl FakeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace what later `network_adapters` calls return
    pub fn set_adapters(&self, adapters: Vec<RawAdapter>) {
        *self.adapters.lock().unwrap() = adapters;
    }

    /// Make `method` fail until `recover` is called
    pub fn fail(&self, method: &'static str) {
        self.failing.lock().unwrap().insert(method);
    }

    pub fn recover(&self, method: &'static str) {
        self.failing.lock().unwrap().remove(method);
    }

    fn check(&self, method: &'static str) -> Result<()> {
        if self.failing.lock().unwrap().contains(method) {
            return Err(DiagError::probe(format!("{} unavailable", method)));
        }
        Ok(())
    }
}

impl SystemProbe for FakeProbe {
    fn physical_disks(&self) -> Result<Vec<RawDisk>> {
        self.check("physical_disks")?;
        Ok(self.disks.clone())
    }

    fn partition_links(&self, device_id: &str) -> Result<Vec<String>> {
        self.check("partition_links")?;
        Ok(self.partitions.get(device_id).cloned().unwrap_or_default())
    }

    fn logical_volumes(&self) -> Result<Vec<RawVolume>> {
        self.check("logical_volumes")?;
        Ok(self.volumes.clone())
    }

    fn network_adapters(&self) -> Result<Vec<RawAdapter>> {
        self.check("network_adapters")?;
        Ok(self.adapters.lock().unwrap().clone())
    }

    fn log_entries(&self, source: LogSource) -> Result<Vec<RawLogEntry>> {
        match source {
            LogSource::System => {
                self.check("system_log")?;
                Ok(self.system_log.clone())
            }
            LogSource::Application => {
                self.check("application_log")?;
                Ok(self.application_log.clone())
            }
        }
    }

    fn computer_system(&self) -> Result<RawComputerSystem> {
        self.check("computer_system")?;
        Ok(self.computer.clone())
    }

    fn operating_system(&self) -> Result<RawOperatingSystem> {
        self.check("operating_system")?;
        Ok(self.os.clone())
    }

    fn processors(&self) -> Result<Vec<RawProcessor>> {
        self.check("processors")?;
        Ok(self.processors.clone())
    }
}

pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .unwrap()
}

pub fn log_entry(id: i64, minute: u32, level: Severity) -> RawLogEntry {
    RawLogEntry {
        event_id: id,
        source: format!("Source{}", id),
        message: format!("Event {}", id),
        time_generated: at(12, minute),
        level: Some(level),
    }
}

pub fn disk(device_id: &str, model: &str) -> RawDisk {
    RawDisk {
        device_id: Some(device_id.to_string()),
        model: Some(model.to_string()),
        interface_type: Some("SCSI".to_string()),
        size: Some(500_000_000_000),
        status: Some("OK".to_string()),
    }
}

pub fn volume(device_id: &str, size: u64, free: u64) -> RawVolume {
    RawVolume {
        device_id: device_id.to_string(),
        partition_id: None,
        size: Some(size),
        free_space: Some(free),
    }
}

pub fn adapter(name: &str, kind: AdapterKind, status: OperationalStatus) -> RawAdapter {
    RawAdapter {
        name: name.to_string(),
        description: format!("{} adapter", name),
        kind,
        status,
        speed: 100_000_000,
        unicast_addresses: vec![RawUnicastAddress {
            address: "192.168.1.20".parse::<IpAddr>().unwrap(),
            ipv4_mask: Some("255.255.255.0".parse().unwrap()),
        }],
        gateways: vec!["192.168.1.1".parse().unwrap()],
        dns_servers: vec!["1.1.1.1".parse().unwrap()],
        mac_address: vec![0xde, 0xad, 0xbe, 0xef, 0x00, 0x01],
    }
}
