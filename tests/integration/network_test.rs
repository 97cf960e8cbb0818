use scantool::core::diagnostics::{collect_network, AdapterKind, NetworkCollector, OperationalStatus};

use super::fake_probe::{adapter, FakeProbe};

fn office_probe() -> FakeProbe {
    let probe = FakeProbe::new();
    probe.set_adapters(vec![
        adapter("Ethernet", AdapterKind::Ethernet, OperationalStatus::Up),
        adapter("Wi-Fi", AdapterKind::Wireless80211, OperationalStatus::Down),
        adapter("Loopback Pseudo-Interface 1", AdapterKind::Loopback, OperationalStatus::Down),
        adapter("Ethernet 2", AdapterKind::Ethernet, OperationalStatus::Dormant),
    ]);
    probe
}

#[test]
fn test_down_list_skips_loopback() {
    let snapshot = collect_network(&office_probe()).unwrap();

    assert_eq!(snapshot.adapters.len(), 4);
    assert_eq!(snapshot.down, vec!["Wi-Fi".to_string(), "Ethernet 2".to_string()]);
}

#[test]
fn test_adapter_properties_are_flattened() {
    let snapshot = collect_network(&office_probe()).unwrap();
    let ethernet = &snapshot.adapters[0];

    assert_eq!(ethernet.ipv4_address, Some("192.168.1.20".parse().unwrap()));
    assert_eq!(ethernet.subnet_mask, Some("255.255.255.0".parse().unwrap()));
    assert_eq!(ethernet.gateway, Some("192.168.1.1".parse().unwrap()));
    assert_eq!(ethernet.mac_address, "DE-AD-BE-EF-00-01");
    assert_eq!(ethernet.speed, 100_000_000);
}

#[test]
fn test_collector_remembers_last_successful_down_list() {
    let probe = office_probe();
    let mut collector = NetworkCollector::new(&probe);

    assert!(collector.down_interfaces().is_empty());

    collector.collect_interfaces().unwrap();
    assert_eq!(collector.down_interfaces().len(), 2);

    probe.fail("network_adapters");
    let err = collector.collect_interfaces().unwrap_err();
    assert!(err.to_string().contains("network interface information"));
    assert_eq!(collector.down_interfaces(), ["Wi-Fi", "Ethernet 2"]);
}

#[test]
fn test_collector_replaces_down_list_on_success() {
    let probe = office_probe();
    let mut collector = NetworkCollector::new(&probe);

    collector.collect_interfaces().unwrap();
    assert_eq!(collector.down_interfaces(), ["Wi-Fi", "Ethernet 2"]);

    probe.set_adapters(vec![
        adapter("Ethernet", AdapterKind::Ethernet, OperationalStatus::Down),
        adapter("Wi-Fi", AdapterKind::Wireless80211, OperationalStatus::Up),
    ]);
    collector.collect_interfaces().unwrap();
    assert_eq!(collector.down_interfaces(), ["Ethernet"]);

    probe.set_adapters(vec![adapter("Ethernet", AdapterKind::Ethernet, OperationalStatus::Up)]);
    collector.collect_interfaces().unwrap();
    assert!(collector.down_interfaces().is_empty());
}

#[test]
fn test_only_plain_ethernet_and_wifi_are_reported_down() {
    let probe = FakeProbe::new();
    probe.set_adapters(vec![
        adapter("gig", AdapterKind::from_name("GigabitEthernet"), OperationalStatus::Down),
        adapter("eth", AdapterKind::from_name("Ethernet"), OperationalStatus::Down),
    ]);

    let snapshot = collect_network(&probe).unwrap();
    assert_eq!(snapshot.down, vec!["eth".to_string()]);
    assert_eq!(snapshot.adapters[0].kind.to_string(), "Other");
}
