//! Merged error/warning stream from the System and Application event sources.

use log::{error, info};

use super::probe::{RawLogEntry, SystemProbe};
use super::types::{DiagnosticEvent, LogSource, Severity};
use crate::error::{DiagError, Result};

/// Collect events of exactly `severity` from both sources, newest first.
///
/// The System source is read until the result holds `max_count / 2` events. The
/// Application source is then read until the *total* reaches `max_count`, so it
/// gets whatever budget System left over plus System's unused half.
pub fn collect_events(
    probe: &dyn SystemProbe,
    severity: Severity,
    max_count: usize,
) -> Result<Vec<DiagnosticEvent>> {
    info!("Getting system {}s (max: {})", severity.to_string().to_lowercase(), max_count);

    let what = match severity {
        Severity::Error => "system errors",
        Severity::Warning => "system warnings",
    };

    gather(probe, severity, max_count).map_err(|e| {
        error!("Error getting {}: {}", what, e);
        DiagError::collection(what, e)
    })
}

fn gather(
    probe: &dyn SystemProbe,
    severity: Severity,
    max_count: usize,
) -> Result<Vec<DiagnosticEvent>> {
    let mut events = Vec::new();

    let system = probe.log_entries(LogSource::System)?;
    take_matching(&mut events, system, LogSource::System, severity, max_count / 2);

    let application = probe.log_entries(LogSource::Application)?;
    take_matching(&mut events, application, LogSource::Application, severity, max_count);

    // Stable: equal timestamps keep System entries ahead of Application ones
    events.sort_by(|a, b| b.time_generated.cmp(&a.time_generated));

    Ok(events)
}

/// Append entries of `severity` until `events` holds `limit` items in total.
fn take_matching(
    events: &mut Vec<DiagnosticEvent>,
    entries: Vec<RawLogEntry>,
    log_name: LogSource,
    severity: Severity,
    limit: usize,
) {
    for entry in entries {
        if events.len() >= limit {
            break;
        }
        if entry.level != Some(severity) {
            continue;
        }
        events.push(DiagnosticEvent {
            event_id: entry.event_id,
            source: entry.source,
            log_name,
            message: entry.message,
            time_generated: entry.time_generated,
            level: severity,
        });
    }
}
