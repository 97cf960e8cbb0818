use std::net::{IpAddr, Ipv4Addr};

use log::debug;
use serde::Deserialize;

use super::core::run_powershell_json;
use crate::core::diagnostics::probe::{RawAdapter, RawUnicastAddress};
use crate::core::diagnostics::{AdapterKind, OperationalStatus};
use crate::error::Result;

/// Projects every .NET `NetworkInterface` (loopback and tunnels included) with
/// its IP properties.
const ADAPTER_QUERY: &str = r#"[System.Net.NetworkInformation.NetworkInterface]::GetAllNetworkInterfaces() | ForEach-Object {
  $props = $_.GetIPProperties()
  [PSCustomObject]@{
    Name = $_.Name
    Description = $_.Description
    Type = $_.NetworkInterfaceType.ToString()
    Status = $_.OperationalStatus.ToString()
    Speed = $_.Speed
    Unicast = @($props.UnicastAddresses | ForEach-Object {
      [PSCustomObject]@{ Address = $_.Address.ToString(); Mask = if ($_.IPv4Mask) { $_.IPv4Mask.ToString() } else { $null } }
    })
    Gateways = @($props.GatewayAddresses | ForEach-Object { $_.Address.ToString() })
    Dns = @($props.DnsAddresses | ForEach-Object { $_.ToString() })
    Mac = $_.GetPhysicalAddress().ToString()
  }
} | ConvertTo-Json -Depth 4"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AdapterPs {
    name: Option<String>,
    description: Option<String>,
    #[serde(rename = "Type")]
    kind: Option<String>,
    status: Option<String>,
    speed: Option<i64>,
    #[serde(default)]
    unicast: Vec<UnicastPs>,
    #[serde(default)]
    gateways: Vec<String>,
    #[serde(default)]
    dns: Vec<String>,
    mac: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UnicastPs {
    address: String,
    mask: Option<String>,
}

pub fn get_network_adapters() -> Result<Vec<RawAdapter>> {
    let adapters: Vec<AdapterPs> = run_powershell_json(ADAPTER_QUERY)?;
    Ok(adapters.into_iter().map(adapter_from_ps).collect())
}

fn adapter_from_ps(adapter: AdapterPs) -> RawAdapter {
    let unicast_addresses = adapter
        .unicast
        .iter()
        .filter_map(|unicast| {
            let address = parse_ip(&unicast.address)?;
            let ipv4_mask = match address {
                IpAddr::V4(_) => unicast
                    .mask
                    .as_deref()
                    .and_then(|mask| mask.parse::<Ipv4Addr>().ok()),
                IpAddr::V6(_) => None,
            };
            Some(RawUnicastAddress { address, ipv4_mask })
        })
        .collect();

    RawAdapter {
        name: adapter.name.unwrap_or_default(),
        description: adapter.description.unwrap_or_default(),
        kind: adapter
            .kind
            .as_deref()
            .map(AdapterKind::from_name)
            .unwrap_or(AdapterKind::Other),
        status: adapter
            .status
            .as_deref()
            .map(OperationalStatus::from_name)
            .unwrap_or(OperationalStatus::Unknown),
        speed: adapter.speed.unwrap_or(0),
        unicast_addresses,
        gateways: adapter.gateways.iter().filter_map(|g| parse_ip(g)).collect(),
        dns_servers: adapter.dns.iter().filter_map(|d| parse_ip(d)).collect(),
        mac_address: adapter.mac.as_deref().map(parse_hex_mac).unwrap_or_default(),
    }
}

/// Parse an address as printed by .NET, dropping any `%scope` suffix
fn parse_ip(text: &str) -> Option<IpAddr> {
    let bare = text.split('%').next().unwrap_or(text).trim();
    match bare.parse() {
        Ok(ip) => Some(ip),
        Err(_) => {
            debug!("Skipping unparsable address '{}'", text);
            None
        }
    }
}

/// `001122AABBCC` to bytes; malformed input yields no bytes
fn parse_hex_mac(text: &str) -> Vec<u8> {
    let text = text.trim();
    if text.len() % 2 != 0 {
        return Vec::new();
    }
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16))
        .collect::<std::result::Result<Vec<_>, _>>()
        .unwrap_or_default()
}
