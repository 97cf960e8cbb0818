use serde::de::DeserializeOwned;
use serde::Deserialize;
use wmi::WMIConnection;

use crate::error::{DiagError, Result};

/// PowerShell's `ConvertTo-Json` emits a bare object for one result and an
/// array for several
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Run a PowerShell pipeline ending in `ConvertTo-Json` and collect its rows.
/// Empty output means no rows.
pub fn run_powershell_json<T: DeserializeOwned>(command: &str) -> Result<Vec<T>> {
    use std::process::Command;
    let output = Command::new("powershell")
        .args(["-NoProfile", "-NonInteractive", "-Command", command])
        .output()
        .map_err(|e| DiagError::probe(format!("PowerShell execution failed: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DiagError::probe(format!(
            "PowerShell exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }

    let rows: OneOrMany<T> = serde_json::from_str(&stdout)
        .map_err(|e| DiagError::probe(format!("JSON parsing failed: {e}. Output: {stdout}")))?;

    Ok(match rows {
        OneOrMany::Many(rows) => rows,
        OneOrMany::One(row) => vec![row],
    })
}

pub fn connect() -> Result<WMIConnection> {
    WMIConnection::new().map_err(|e| DiagError::probe(format!("Failed to connect to WMI: {}", e)))
}

pub fn wmi_query<T: DeserializeOwned>(connection: &WMIConnection, query: &str) -> Result<Vec<T>> {
    connection
        .raw_query(query)
        .map_err(|e| DiagError::probe(format!("WMI query failed ({}): {}", query, e)))
}

/// Quote a value for use inside a single-quoted WQL string literal
pub fn wql_quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Value of the `Key="..."` part of a WMI object path, e.g.
/// `\\HOST\root\cimv2:Win32_DiskPartition.DeviceID="Disk #0, Partition #1"`
pub fn object_path_key(path: &str) -> Option<&str> {
    let start = path.find("=\"")? + 2;
    let rest = &path[start..];
    Some(rest.strip_suffix('"').unwrap_or(rest))
}
