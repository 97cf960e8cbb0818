use scantool::core::diagnostics::probe::RawVolume;
use scantool::core::diagnostics::{collect_disk_health, collect_disk_health_with, MatchStrategy};
use scantool::DiagError;

use super::fake_probe::{disk, volume, FakeProbe};

fn single_disk_probe(partition: &str) -> FakeProbe {
    let mut probe = FakeProbe::new();
    probe.disks = vec![disk(r"\\.\PHYSICALDRIVE0", "Samsung SSD 970")];
    probe
        .partitions
        .insert(r"\\.\PHYSICALDRIVE0".to_string(), vec![partition.to_string()]);
    probe
}

#[test]
fn test_volume_merges_into_matching_partition() {
    let mut probe = single_disk_probe(r#"Disk #0, Partition #0 -> LogicalDisk.DeviceID="C:""#);
    probe.volumes = vec![volume("C:", 1000, 400)];

    let disks = collect_disk_health(&probe).unwrap();

    assert_eq!(disks.len(), 1);
    let partition = &disks[0].partitions[0];
    assert_eq!(partition.drive_letter.as_deref(), Some("C:"));
    assert_eq!(partition.size, 1000);
    assert_eq!(partition.free_space, 400);
    assert!(partition.free_space <= partition.size);
}

#[test]
fn test_disk_fields_and_partition_order() {
    let mut probe = FakeProbe::new();
    probe.disks = vec![disk("disk0", "First"), disk("disk1", "Second")];
    probe.partitions.insert(
        "disk0".to_string(),
        vec!["Disk #0, Partition #0".to_string(), "Disk #0, Partition #1".to_string()],
    );

    let disks = collect_disk_health(&probe).unwrap();

    assert_eq!(disks[0].model, "First");
    assert_eq!(disks[0].size, 500_000_000_000);
    assert_eq!(disks[0].partitions.len(), 2);
    assert_eq!(disks[0].partitions[1].name, "Disk #0, Partition #1");
    assert!(disks[0].partitions.iter().all(|p| p.drive_letter.is_none()));
    assert!(disks[1].partitions.is_empty());
}

#[test]
fn test_resolved_partition_id_is_used_for_matching() {
    let mut probe = FakeProbe::new();
    probe.disks = vec![disk("disk0", "Disk")];
    probe.partitions.insert(
        "disk0".to_string(),
        vec!["Disk #0, Partition #0".to_string(), "Disk #0, Partition #1".to_string()],
    );
    probe.volumes = vec![RawVolume {
        device_id: "D:".to_string(),
        partition_id: Some("Disk #0, Partition #1".to_string()),
        size: Some(2048),
        free_space: Some(1024),
    }];

    let disks = collect_disk_health(&probe).unwrap();
    assert!(disks[0].partitions[0].drive_letter.is_none());
    assert_eq!(disks[0].partitions[1].drive_letter.as_deref(), Some("D:"));
}

#[test]
fn test_exact_suffix_strategy_avoids_prefix_collision() {
    let mut probe = FakeProbe::new();
    probe.disks = vec![disk("disk0", "Disk")];
    probe.partitions.insert(
        "disk0".to_string(),
        vec!["/dev/sda10".to_string(), "/dev/sda1".to_string()],
    );
    probe.volumes = vec![RawVolume {
        device_id: "/".to_string(),
        partition_id: Some("/dev/sda1".to_string()),
        size: Some(100),
        free_space: Some(50),
    }];

    let substring = collect_disk_health(&probe).unwrap();
    assert_eq!(substring[0].partitions[0].drive_letter.as_deref(), Some("/"));

    let exact = collect_disk_health_with(&probe, MatchStrategy::ExactSuffix).unwrap();
    assert!(exact[0].partitions[0].drive_letter.is_none());
    assert_eq!(exact[0].partitions[1].drive_letter.as_deref(), Some("/"));
}

#[test]
fn test_partition_failure_fails_whole_call() {
    let probe = single_disk_probe("Disk #0, Partition #0");
    probe.fail("partition_links");

    let err = collect_disk_health(&probe).unwrap_err();
    assert!(matches!(err, DiagError::Collection { what: "disk health information", .. }));
    assert!(err.to_string().contains("partition_links unavailable"));
}

#[test]
fn test_volume_failure_fails_whole_call() {
    let probe = single_disk_probe("Disk #0, Partition #0");
    probe.fail("logical_volumes");

    assert!(collect_disk_health(&probe).is_err());

    probe.recover("logical_volumes");
    assert_eq!(collect_disk_health(&probe).unwrap().len(), 1);
}
