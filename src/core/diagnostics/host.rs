use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use log::{error, info};

use super::probe::SystemProbe;
use super::types::HostIdentity;
use crate::error::{DiagError, Result};

const UNKNOWN: &str = "Unknown";

/// Length of the `yyyyMMddHHmmss` prefix of a CIM datetime string
const CIM_PREFIX_LEN: usize = 14;

pub fn collect_identity(probe: &dyn SystemProbe) -> Result<HostIdentity> {
    collect_identity_at(probe, Local::now().naive_local())
}

/// Collect the host identity, computing uptime relative to `now`.
pub fn collect_identity_at(probe: &dyn SystemProbe, now: NaiveDateTime) -> Result<HostIdentity> {
    info!("Getting system information");

    gather(probe, now).map_err(|e| {
        error!("Error getting system information: {}", e);
        DiagError::collection("system information", e)
    })
}

fn gather(probe: &dyn SystemProbe, now: NaiveDateTime) -> Result<HostIdentity> {
    let computer = probe.computer_system()?;
    let os = probe.operating_system()?;
    let processor = probe
        .processors()?
        .into_iter()
        .next()
        .and_then(|p| p.name)
        .map(|name| name.trim().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string());

    let total_physical_memory = computer.total_physical_memory.unwrap_or(0);
    let available_physical_memory = os
        .free_physical_memory_kb
        .map(|kb| kb.saturating_mul(1024))
        .unwrap_or(0)
        .min(total_physical_memory);

    let install_date = os.install_date.as_deref().and_then(parse_cim_datetime);
    let uptime = os
        .last_boot_up_time
        .as_deref()
        .and_then(parse_cim_datetime)
        .and_then(|boot| (now - boot).to_std().ok())
        .unwrap_or(Duration::ZERO);

    Ok(HostIdentity {
        computer_name: computer.name.unwrap_or_else(|| UNKNOWN.to_string()),
        operating_system: os.caption.unwrap_or_else(|| UNKNOWN.to_string()),
        total_physical_memory,
        available_physical_memory,
        processor,
        install_date,
        uptime,
    })
}

/// Parse the leading `yyyyMMddHHmmss` of a CIM datetime such as
/// `20230101120000.000000+060`. Returns `None` for short or malformed input.
pub fn parse_cim_datetime(value: &str) -> Option<NaiveDateTime> {
    let prefix = value.get(..CIM_PREFIX_LEN)?;
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDateTime::parse_from_str(prefix, "%Y%m%d%H%M%S").ok()
}

/// Render a timestamp in the CIM prefix encoding understood by [`parse_cim_datetime`]
pub fn format_cim_datetime(value: NaiveDateTime) -> String {
    value.format("%Y%m%d%H%M%S.000000+000").to_string()
}
