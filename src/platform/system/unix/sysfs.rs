//! Readers for `/sys/block`, `/sys/class/net`, `/proc/net/route` and
//! `/etc/resolv.conf`. Every function takes its root so tests can point it at a
//! temporary tree.

use std::fs;
use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

use crate::core::diagnostics::probe::RawDisk;
use crate::core::diagnostics::AdapterKind;

/// Block devices that are not physical disks
const VIRTUAL_BLOCK_PREFIXES: [&str; 7] = ["loop", "ram", "zram", "dm-", "sr", "fd", "md"];

/// Bytes per sector in `/sys/block/<dev>/size`, independent of the device's real sector size
const SYSFS_SECTOR_SIZE: u64 = 512;

// ARPHRD_* link types from if_arp.h
const ARPHRD_ETHER: u32 = 1;
const ARPHRD_PPP: u32 = 512;
const ARPHRD_TUNNEL: u32 = 768;
const ARPHRD_TUNNEL6: u32 = 769;
const ARPHRD_LOOPBACK: u32 = 772;
const ARPHRD_SIT: u32 = 776;
const ARPHRD_IPGRE: u32 = 778;
const ARPHRD_NONE: u32 = 65534;

pub fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn sorted_entries(dir: &Path) -> io::Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(names)
}

/// Physical block device names under `sys_block`, sorted
pub fn block_devices(sys_block: &Path) -> io::Result<Vec<String>> {
    Ok(sorted_entries(sys_block)?
        .into_iter()
        .filter(|name| !VIRTUAL_BLOCK_PREFIXES.iter().any(|p| name.starts_with(p)))
        .collect())
}

pub fn disk_from_sysfs(sys_block: &Path, name: &str) -> RawDisk {
    let dev = sys_block.join(name);

    let status = read_trimmed(&dev.join("device").join("state")).map(|state| match state.as_str() {
        "running" | "live" => "OK".to_string(),
        _ => state,
    });

    RawDisk {
        device_id: Some(format!("/dev/{}", name)),
        model: read_trimmed(&dev.join("device").join("model")),
        interface_type: interface_from_name(name).map(str::to_string),
        size: read_trimmed(&dev.join("size"))
            .and_then(|s| s.parse::<u64>().ok())
            .map(|sectors| sectors.saturating_mul(SYSFS_SECTOR_SIZE)),
        status,
    }
}

fn interface_from_name(name: &str) -> Option<&'static str> {
    if name.starts_with("nvme") {
        Some("NVMe")
    } else if name.starts_with("sd") {
        Some("SCSI")
    } else if name.starts_with("hd") {
        Some("IDE")
    } else if name.starts_with("vd") || name.starts_with("xvd") {
        Some("Virtual")
    } else if name.starts_with("mmcblk") {
        Some("MMC")
    } else {
        None
    }
}

/// Partitions of `disk` as `/dev/<part>` paths, ordered by partition number
pub fn partitions(sys_block: &Path, disk: &str) -> io::Result<Vec<String>> {
    let dev = sys_block.join(disk);
    let mut parts: Vec<(u32, String)> = sorted_entries(&dev)?
        .into_iter()
        .filter(|name| name.starts_with(disk))
        .filter_map(|name| {
            let number = read_trimmed(&dev.join(&name).join("partition"))?
                .parse::<u32>()
                .ok()?;
            Some((number, format!("/dev/{}", name)))
        })
        .collect();
    parts.sort();
    Ok(parts.into_iter().map(|(_, name)| name).collect())
}

/// Link-level facts for one interface under `/sys/class/net`
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceFacts {
    pub kind: AdapterKind,
    pub operstate: String,
    /// Bits per second, or -1 when the kernel does not report a speed
    pub speed: i64,
    pub description: String,
    pub mac_address: Vec<u8>,
}

pub fn interface_facts(sys_class_net: &Path, name: &str) -> InterfaceFacts {
    let dir = sys_class_net.join(name);
    let wireless = dir.join("wireless").exists() || dir.join("phy80211").exists();
    let kind = read_trimmed(&dir.join("type"))
        .and_then(|t| t.parse::<u32>().ok())
        .map(|code| kind_from_link_type(code, wireless))
        .unwrap_or(AdapterKind::Other);

    // speed is in Mb/s; -1 or an unreadable file both mean unknown
    let speed = read_trimmed(&dir.join("speed"))
        .and_then(|s| s.parse::<i64>().ok())
        .filter(|mbps| *mbps > 0)
        .map(|mbps| mbps * 1_000_000)
        .unwrap_or(-1);

    let description = fs::read_link(dir.join("device").join("driver"))
        .ok()
        .and_then(|driver| driver.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| name.to_string());

    InterfaceFacts {
        kind,
        operstate: read_trimmed(&dir.join("operstate")).unwrap_or_else(|| "unknown".to_string()),
        speed,
        description,
        mac_address: read_trimmed(&dir.join("address"))
            .map(|mac| parse_colon_mac(&mac))
            .unwrap_or_default(),
    }
}

pub fn kind_from_link_type(code: u32, wireless: bool) -> AdapterKind {
    match code {
        ARPHRD_ETHER if wireless => AdapterKind::Wireless80211,
        ARPHRD_ETHER => AdapterKind::Ethernet,
        ARPHRD_LOOPBACK => AdapterKind::Loopback,
        ARPHRD_PPP => AdapterKind::Ppp,
        ARPHRD_TUNNEL | ARPHRD_TUNNEL6 | ARPHRD_SIT | ARPHRD_IPGRE | ARPHRD_NONE => {
            AdapterKind::Tunnel
        }
        _ => AdapterKind::Other,
    }
}

/// `aa:bb:cc:dd:ee:ff` to bytes. An all-zero address counts as none.
pub fn parse_colon_mac(text: &str) -> Vec<u8> {
    let bytes: Vec<u8> = text
        .split(':')
        .map(|octet| u8::from_str_radix(octet, 16))
        .collect::<std::result::Result<_, _>>()
        .unwrap_or_default();

    if bytes.iter().all(|b| *b == 0) {
        Vec::new()
    } else {
        bytes
    }
}

/// Default IPv4 routes from `/proc/net/route` as `(interface, gateway)` pairs, in file order
pub fn parse_default_gateways(route_table: &str) -> Vec<(String, Ipv4Addr)> {
    route_table
        .lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let (iface, destination, gateway) = (fields.first()?, fields.get(1)?, fields.get(2)?);
            if *destination != "00000000" {
                return None;
            }
            // Stored as a little-endian hex u32
            let raw = u32::from_str_radix(gateway, 16).ok()?;
            let addr = Ipv4Addr::from(raw.to_le_bytes());
            (!addr.is_unspecified()).then(|| (iface.to_string(), addr))
        })
        .collect()
}

/// `nameserver` entries of a resolv.conf, in order
pub fn parse_nameservers(resolv_conf: &str) -> Vec<IpAddr> {
    resolv_conf
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            match parts.next() {
                Some("nameserver") => parts.next()?.split('%').next()?.parse().ok(),
                _ => None,
            }
        })
        .collect()
}
