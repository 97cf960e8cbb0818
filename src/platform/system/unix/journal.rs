//! Error and warning entries from the systemd journal via `journalctl -o json`.

use std::process::Command;

use chrono::{DateTime, Local, NaiveDateTime};
use serde_json::Value;

use crate::core::diagnostics::probe::RawLogEntry;
use crate::core::diagnostics::{LogSource, Severity};
use crate::error::{DiagError, Result};

/// Newest entries read per source
const JOURNAL_SCAN_LIMIT: usize = 1000;

// syslog priorities: 0 emerg .. 3 err are errors, 4 is warning
const PRIORITY_ERR: u8 = 3;
const PRIORITY_WARNING: u8 = 4;

/// Run journalctl for `source` and parse its output, newest first
pub fn journal_entries(source: LogSource) -> Result<Vec<RawLogEntry>> {
    let scope = match source {
        LogSource::System => "--system",
        LogSource::Application => "--user",
    };
    let limit = JOURNAL_SCAN_LIMIT.to_string();

    let output = Command::new("journalctl")
        .args([scope, "-o", "json", "-r", "-n", &limit, "-p", "warning", "--no-pager"])
        .output()
        .map_err(|e| DiagError::probe(format!("Failed to run journalctl: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DiagError::probe(format!(
            "journalctl exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter_map(parse_journal_line)
        .collect())
}

/// One `journalctl -o json` line. Lines without a timestamp are dropped.
pub fn parse_journal_line(line: &str) -> Option<RawLogEntry> {
    let record: Value = serde_json::from_str(line).ok()?;

    let micros = field_text(&record, "__REALTIME_TIMESTAMP")?.parse::<i64>().ok()?;
    let time_generated = local_from_micros(micros)?;

    let level = field_text(&record, "PRIORITY")
        .and_then(|p| p.parse::<u8>().ok())
        .and_then(severity_from_priority);

    let source = field_text(&record, "SYSLOG_IDENTIFIER")
        .or_else(|| field_text(&record, "_COMM"))
        .unwrap_or_else(|| "journal".to_string());

    // The journal has no numeric event ids; ERRNO is the closest stable number
    let event_id = field_text(&record, "ERRNO")
        .and_then(|e| e.parse::<i64>().ok())
        .unwrap_or(0);

    Some(RawLogEntry {
        event_id,
        source,
        message: field_text(&record, "MESSAGE").unwrap_or_default(),
        time_generated,
        level,
    })
}

fn severity_from_priority(priority: u8) -> Option<Severity> {
    match priority {
        0..=PRIORITY_ERR => Some(Severity::Error),
        PRIORITY_WARNING => Some(Severity::Warning),
        _ => None,
    }
}

/// Journal fields are strings, except binary-safe ones which arrive as byte arrays
fn field_text(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Array(bytes) => {
            let bytes: Vec<u8> = bytes
                .iter()
                .filter_map(|b| b.as_u64().and_then(|b| u8::try_from(b).ok()))
                .collect();
            Some(String::from_utf8_lossy(&bytes).into_owned())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn local_from_micros(micros: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_micros(micros).map(|utc| utc.with_timezone(&Local).naive_local())
}
