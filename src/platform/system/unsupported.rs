//! Probe for hosts without a WMI or sysfs/journald backend. Every query fails
//! with a probe error naming the platform.

use crate::core::diagnostics::probe::{
    RawAdapter, RawComputerSystem, RawDisk, RawLogEntry, RawOperatingSystem, RawProcessor,
    RawVolume, SystemProbe,
};
use crate::core::diagnostics::LogSource;
use crate::error::{DiagError, Result};

#[derive(Debug, Default)]
pub struct UnsupportedProbe;

impl UnsupportedProbe {
    pub fn new() -> Self {
        Self
    }

    fn unsupported<T>(&self, what: &str) -> Result<T> {
        Err(DiagError::probe(format!(
            "{} is not supported on {}",
            what,
            std::env::consts::OS
        )))
    }
}

impl SystemProbe for UnsupportedProbe {
    fn physical_disks(&self) -> Result<Vec<RawDisk>> {
        self.unsupported("Disk enumeration")
    }

    fn partition_links(&self, _device_id: &str) -> Result<Vec<String>> {
        self.unsupported("Partition enumeration")
    }

    fn logical_volumes(&self) -> Result<Vec<RawVolume>> {
        self.unsupported("Volume enumeration")
    }

    fn network_adapters(&self) -> Result<Vec<RawAdapter>> {
        self.unsupported("Network adapter enumeration")
    }

    fn log_entries(&self, source: LogSource) -> Result<Vec<RawLogEntry>> {
        self.unsupported(&format!("Reading the {} event log", source))
    }

    fn computer_system(&self) -> Result<RawComputerSystem> {
        self.unsupported("Computer system query")
    }

    fn operating_system(&self) -> Result<RawOperatingSystem> {
        self.unsupported("Operating system query")
    }

    fn processors(&self) -> Result<Vec<RawProcessor>> {
        self.unsupported("Processor query")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_query_names_the_platform() {
        let probe = UnsupportedProbe::new();
        let err = probe.physical_disks().unwrap_err();
        assert!(err.to_string().contains(std::env::consts::OS));
        assert!(probe.log_entries(LogSource::System).is_err());
        assert!(probe.network_adapters().is_err());
    }
}
