//! Network adapter collection and up/down classification.

use std::net::IpAddr;

use log::{error, info};
use serde::Serialize;

use super::probe::{RawAdapter, SystemProbe};
use super::types::NetworkAdapter;
use crate::error::{DiagError, Result};

/// Adapters plus the names of the ones classified as down
#[derive(Debug, Clone, Default, Serialize)]
pub struct NetworkSnapshot {
    pub adapters: Vec<NetworkAdapter>,
    pub down: Vec<String>,
}

/// Collect adapters and the down list in one call
pub fn collect_network(probe: &dyn SystemProbe) -> Result<NetworkSnapshot> {
    info!("Getting network interface information");

    let raw = probe.network_adapters().map_err(|e| {
        error!("Error getting network interface information: {}", e);
        DiagError::collection("network interface information", e)
    })?;

    let adapters: Vec<NetworkAdapter> = raw.into_iter().map(adapter_from_raw).collect();
    let down = adapters
        .iter()
        .filter(|adapter| adapter.is_down())
        .map(|adapter| adapter.name.clone())
        .collect();

    Ok(NetworkSnapshot { adapters, down })
}

/// Per-session network collector.
///
/// Remembers the down interfaces of the last successful collection. A failed
/// collection leaves the previous list untouched.
pub struct NetworkCollector<'a> {
    probe: &'a dyn SystemProbe,
    down_interfaces: Vec<String>,
}

impl<'a> NetworkCollector<'a> {
    pub fn new(probe: &'a dyn SystemProbe) -> Self {
        Self {
            probe,
            down_interfaces: Vec::new(),
        }
    }

    pub fn collect_interfaces(&mut self) -> Result<Vec<NetworkAdapter>> {
        let snapshot = collect_network(self.probe)?;
        self.down_interfaces = snapshot.down;
        Ok(snapshot.adapters)
    }

    pub fn down_interfaces(&self) -> &[String] {
        &self.down_interfaces
    }
}

fn adapter_from_raw(raw: RawAdapter) -> NetworkAdapter {
    let mut ipv4_address = None;
    let mut subnet_mask = None;
    let mut ipv6_address = None;

    for unicast in &raw.unicast_addresses {
        match unicast.address {
            IpAddr::V4(v4) if ipv4_address.is_none() => {
                ipv4_address = Some(v4);
                subnet_mask = unicast.ipv4_mask;
            }
            IpAddr::V6(v6) if ipv6_address.is_none() => ipv6_address = Some(v6),
            _ => {}
        }
    }

    NetworkAdapter {
        mac_address: format_mac(&raw.mac_address),
        gateway: raw.gateways.first().copied(),
        speed: raw.speed.max(0) as u64,
        name: raw.name,
        description: raw.description,
        kind: raw.kind,
        status: raw.status,
        ipv4_address,
        subnet_mask,
        ipv6_address,
        dns_servers: raw.dns_servers,
    }
}

/// Uppercase hex octets joined by '-', e.g. `00-11-22-AA-BB-CC`
pub fn format_mac(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join("-")
}
