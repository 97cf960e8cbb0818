//! Physical disk enumeration and logical-volume correlation.

use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use super::probe::{RawDisk, RawVolume, SystemProbe};
use super::types::{Partition, PhysicalDisk};
use crate::error::{DiagError, Result};

const UNKNOWN: &str = "Unknown";

/// How a logical volume identifier is compared with partition stub names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStrategy {
    /// Volume identifier appears anywhere in the partition name. First match wins,
    /// so partitions whose names share the identifier can be mismatched.
    #[default]
    Substring,
    /// Partition name ends with the identifier, optionally followed by a closing
    /// quote as in WMI association paths (`...DeviceID="Disk #0, Partition #1"`).
    ExactSuffix,
}

impl MatchStrategy {
    fn matches(&self, partition_name: &str, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        match self {
            MatchStrategy::Substring => partition_name.contains(key),
            MatchStrategy::ExactSuffix => {
                let trimmed = partition_name.strip_suffix('"').unwrap_or(partition_name);
                trimmed.ends_with(key)
            }
        }
    }
}

/// Collect physical disks with their partitions, using substring matching
pub fn collect_disk_health(probe: &dyn SystemProbe) -> Result<Vec<PhysicalDisk>> {
    collect_disk_health_with(probe, MatchStrategy::default())
}

/// Collect physical disks with their partitions.
///
/// Any enumeration failure aborts the whole call; no partial list is returned.
pub fn collect_disk_health_with(
    probe: &dyn SystemProbe,
    strategy: MatchStrategy,
) -> Result<Vec<PhysicalDisk>> {
    info!("Getting disk health information");

    enumerate(probe, strategy).map_err(|e| {
        error!("Error getting disk health information: {}", e);
        DiagError::collection("disk health information", e)
    })
}

fn enumerate(probe: &dyn SystemProbe, strategy: MatchStrategy) -> Result<Vec<PhysicalDisk>> {
    let mut disks = Vec::new();

    for raw in probe.physical_disks()? {
        let mut disk = disk_from_raw(raw);
        for name in probe.partition_links(&disk.device_id)? {
            disk.partitions.push(Partition::stub(name));
        }
        disks.push(disk);
    }

    let volumes = probe.logical_volumes()?;
    merge_volumes(&mut disks, &volumes, strategy);

    Ok(disks)
}

fn disk_from_raw(raw: RawDisk) -> PhysicalDisk {
    PhysicalDisk {
        device_id: raw.device_id.unwrap_or_else(|| UNKNOWN.to_string()),
        model: raw.model.unwrap_or_else(|| UNKNOWN.to_string()),
        interface_type: raw.interface_type.unwrap_or_else(|| UNKNOWN.to_string()),
        size: raw.size.unwrap_or(0),
        status: raw.status.unwrap_or_else(|| UNKNOWN.to_string()),
        partitions: Vec::new(),
    }
}

/// Fill drive letter, size and free space of the first partition (disk order,
/// then partition order) whose name matches each volume.
pub fn merge_volumes(disks: &mut [PhysicalDisk], volumes: &[RawVolume], strategy: MatchStrategy) {
    for volume in volumes {
        let key = volume.match_key();
        let target = disks
            .iter_mut()
            .flat_map(|disk| disk.partitions.iter_mut())
            .find(|partition| strategy.matches(&partition.name, key));

        match target {
            Some(partition) => {
                let size = volume.size.unwrap_or(0);
                partition.drive_letter = Some(volume.device_id.clone());
                partition.size = size;
                // free <= size whenever size is known
                partition.free_space = if size > 0 {
                    volume.free_space.unwrap_or(0).min(size)
                } else {
                    volume.free_space.unwrap_or(0)
                };
            }
            None => debug!("No partition matched volume {}", volume.device_id),
        }
    }
}
