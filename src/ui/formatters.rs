use std::time::Duration;

const KB: f64 = 1024.0;
const MB: f64 = KB * 1024.0;
const GB: f64 = MB * 1024.0;
const TB: f64 = GB * 1024.0;

/// Format a byte count in human-readable form (B, KB, MB, GB, TB), 1024 based
pub fn format_bytes(size: u64) -> String {
    let value = size as f64;
    if size < 1024 {
        format!("{} B", size)
    } else if value < MB {
        format!("{:.2} KB", value / KB)
    } else if value < GB {
        format!("{:.2} MB", value / MB)
    } else if value < TB {
        format!("{:.2} GB", value / GB)
    } else {
        format!("{:.2} TB", value / TB)
    }
}

/// Format a link speed in bits per second (bps, Kbps, Mbps, Gbps), 1000 based
pub fn format_bits_per_sec(speed: u64) -> String {
    let value = speed as f64;
    if speed < 1000 {
        format!("{} bps", speed)
    } else if speed < 1_000_000 {
        format!("{:.2} Kbps", value / 1e3)
    } else if speed < 1_000_000_000 {
        format!("{:.2} Mbps", value / 1e6)
    } else {
        format!("{:.2} Gbps", value / 1e9)
    }
}

fn split_duration(duration: Duration) -> (u64, u64, u64, u64) {
    let secs = duration.as_secs();
    (secs / 86_400, (secs % 86_400) / 3600, (secs % 3600) / 60, secs % 60)
}

/// "D days, H hours, M minutes, S seconds"
pub fn format_uptime(duration: Duration) -> String {
    let (days, hours, minutes, seconds) = split_duration(duration);
    format!(
        "{} days, {} hours, {} minutes, {} seconds",
        days, hours, minutes, seconds
    )
}

/// "D days, H hours, M minutes"
pub fn format_age(duration: Duration) -> String {
    let (days, hours, minutes, _) = split_duration(duration);
    format!("{} days, {} hours, {} minutes", days, hours, minutes)
}
