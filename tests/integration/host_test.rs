use std::time::Duration;

use scantool::core::diagnostics::probe::{RawComputerSystem, RawOperatingSystem, RawProcessor};
use scantool::core::diagnostics::{collect_identity_at, HostIdentity};
use scantool::DiagError;

use super::fake_probe::{at, FakeProbe};

const GIB: u64 = 1024 * 1024 * 1024;

fn workstation() -> FakeProbe {
    let mut probe = FakeProbe::new();
    probe.computer = RawComputerSystem {
        name: Some("WORKSTATION-01".to_string()),
        total_physical_memory: Some(16 * GIB),
    };
    probe.os = RawOperatingSystem {
        caption: Some("Microsoft Windows 11 Pro".to_string()),
        free_physical_memory_kb: Some(4 * 1024 * 1024),
        install_date: Some("20230115093000.000000+060".to_string()),
        last_boot_up_time: Some("20240301080000.000000+060".to_string()),
    };
    probe.processors = vec![RawProcessor {
        name: Some("  Intel(R) Core(TM) i7-10700 CPU @ 2.90GHz ".to_string()),
    }];
    probe
}

fn identity(probe: &FakeProbe) -> HostIdentity {
    collect_identity_at(probe, at(12, 30)).unwrap()
}

#[test]
fn test_identity_fields() {
    let host = identity(&workstation());

    assert_eq!(host.computer_name, "WORKSTATION-01");
    assert_eq!(host.operating_system, "Microsoft Windows 11 Pro");
    assert_eq!(host.processor, "Intel(R) Core(TM) i7-10700 CPU @ 2.90GHz");
    assert_eq!(host.total_physical_memory, 16 * GIB);
    assert_eq!(host.available_physical_memory, 4 * GIB);
    assert_eq!(host.formatted_install_date(), "2023-01-15");
}

#[test]
fn test_uptime_is_measured_from_last_boot() {
    let host = identity(&workstation());
    assert_eq!(host.uptime, Duration::from_secs(4 * 3600 + 30 * 60));
    assert_eq!(host.formatted_uptime(), "0 days, 4 hours, 30 minutes, 0 seconds");
}

#[test]
fn test_system_age_counts_from_install_date() {
    let host = identity(&workstation());
    let age = host.system_age(at(12, 30));
    assert!(age > Duration::from_secs(400 * 86_400));
    assert!(host.formatted_system_age(at(12, 30)).starts_with("411 days"));
}

#[test]
fn test_available_memory_never_exceeds_total() {
    let mut probe = workstation();
    probe.os.free_physical_memory_kb = Some(64 * 1024 * 1024);

    let host = identity(&probe);
    assert!(host.available_physical_memory <= host.total_physical_memory);
}

#[test]
fn test_missing_facts_fall_back_to_unknown() {
    let mut probe = FakeProbe::new();
    probe.os.install_date = Some("not a date".to_string());

    let host = identity(&probe);
    assert_eq!(host.computer_name, "Unknown");
    assert_eq!(host.processor, "Unknown");
    assert_eq!(host.total_physical_memory, 0);
    assert!(host.install_date.is_none());
    assert_eq!(host.uptime, Duration::ZERO);
}

#[test]
fn test_probe_failure_is_wrapped() {
    let probe = workstation();
    probe.fail("operating_system");

    let err = collect_identity_at(&probe, at(12, 30)).unwrap_err();
    assert!(matches!(err, DiagError::Collection { what: "system information", .. }));
}
