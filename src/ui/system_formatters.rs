use chrono::NaiveDateTime;
use colored::*;

use crate::core::diagnostics::{
    DiagnosticEvent, HostIdentity, ImagingOutcome, NetworkAdapter, NetworkSnapshot,
    OperationalStatus, Partition, PhysicalDisk, Severity,
};
use crate::ui::formatters::format_bytes;

/// Free space at or below this share of a partition is shown in red
const LOW_FREE_PERCENT: f64 = 10.0;
/// Free space at or below this share is shown in yellow
const WARN_FREE_PERCENT: f64 = 20.0;

fn print_title(title: &str) {
    println!("\n{}", title.bold().bright_cyan());
    println!("{}", "=".repeat(60));
}

fn print_section_header(title: &str) {
    println!("\n{}", title.bold().green());
    println!("{}", "-".repeat(title.len()));
}

pub fn print_disk_report(disks: &[PhysicalDisk]) {
    print_title("DISK HEALTH");

    if disks.is_empty() {
        println!("  {}", "No physical disks found.".yellow());
        return;
    }

    for disk in disks {
        print_section_header(&format!("Disk: {}", disk.model));
        println!("  Device ID: {}", disk.device_id);
        println!("  Interface: {}", disk.interface_type);
        println!("  Size: {}", format_bytes(disk.size));
        println!("  Status: {}", colored_disk_status(&disk.status));

        if disk.partitions.is_empty() {
            continue;
        }
        println!("  Partitions:");
        for partition in &disk.partitions {
            print_partition(partition);
        }
    }
    println!();
}

fn colored_disk_status(status: &str) -> ColoredString {
    match status {
        "OK" => status.green(),
        "Unknown" => status.dimmed(),
        _ => status.yellow().bold(),
    }
}

fn print_partition(partition: &Partition) {
    let Some(letter) = &partition.drive_letter else {
        println!("    {}", format!("Partition: {}", partition.name).dimmed());
        return;
    };

    let percent = partition.free_space_percentage();
    let free = format!("{} ({:.2}%)", format_bytes(partition.free_space), percent);
    let free = if percent <= LOW_FREE_PERCENT {
        free.red().bold()
    } else if percent <= WARN_FREE_PERCENT {
        free.yellow()
    } else {
        free.green()
    };

    println!(
        "    Drive {} - Size: {}, Free: {}",
        letter.bold(),
        format_bytes(partition.size),
        free
    );
}

pub fn print_network_report(snapshot: &NetworkSnapshot) {
    print_title("NETWORK INTERFACES");

    for adapter in &snapshot.adapters {
        print_adapter(adapter);
    }

    if !snapshot.down.is_empty() {
        print_section_header("Interfaces Down (Check these):");
        for name in &snapshot.down {
            println!("  {} {}", "-".red(), name.red().bold());
        }
    }
    println!();
}

fn print_adapter(adapter: &NetworkAdapter) {
    print_section_header(&format!("Interface: {}", adapter.name));
    println!("  Description: {}", adapter.description);
    println!("  Type: {}", adapter.kind);

    let status = adapter.status.to_string();
    let status = match adapter.status {
        OperationalStatus::Up => status.green(),
        _ if adapter.is_down() => status.red().bold(),
        _ => status.yellow(),
    };
    println!("  Status: {}", status);
    println!("  Speed: {}", adapter.formatted_speed());
    if !adapter.mac_address.is_empty() {
        println!("  MAC Address: {}", adapter.mac_address);
    }

    if let Some(ipv4) = &adapter.ipv4_address {
        println!("  IPv4 Address: {}", ipv4);
    }
    if let Some(mask) = &adapter.subnet_mask {
        println!("  Subnet Mask: {}", mask);
    }
    if let Some(ipv6) = &adapter.ipv6_address {
        println!("  IPv6 Address: {}", ipv6);
    }
    if let Some(gateway) = &adapter.gateway {
        println!("  Gateway: {}", gateway);
    }
    if !adapter.dns_servers.is_empty() {
        println!("  DNS Servers:");
        for dns in &adapter.dns_servers {
            println!("    {}", dns);
        }
    }
}

pub fn print_event_report(severity: Severity, events: &[DiagnosticEvent]) {
    let noun = match severity {
        Severity::Error => "errors",
        Severity::Warning => "warnings",
    };
    print_title(&format!("SYSTEM {}", noun.to_uppercase()));

    if events.is_empty() {
        println!("  {}", format!("No system {} found.", noun).green());
        return;
    }

    println!("  Found {} system {}:", events.len().to_string().bold(), noun);

    for event in events {
        let heading = format!("[{}] Event {} - {}", event.log_name, event.event_id, event.source);
        let heading = match severity {
            Severity::Error => heading.red().bold(),
            Severity::Warning => heading.yellow().bold(),
        };
        println!("\n  {}", heading);
        println!(
            "  {}",
            event.time_generated.format("%Y-%m-%d %H:%M:%S").to_string().dimmed()
        );
        for line in event.message.lines().filter(|l| !l.trim().is_empty()) {
            println!("    {}", line.trim_end());
        }
    }
    println!();
}

pub fn print_system_age(host: &HostIdentity, now: NaiveDateTime) {
    print_title("SYSTEM AGE");
    println!("  Computer Name: {}", host.computer_name.bold());
    println!("  Operating System: {}", host.operating_system);
    println!("  Installation Date: {}", host.formatted_install_date());
    println!("  System Age: {}", host.formatted_system_age(now).bold());
    println!();
}

pub fn print_uptime(host: &HostIdentity) {
    print_title("SYSTEM UPTIME");
    println!("  Uptime: {}", host.formatted_uptime().bold());
    println!();
}

pub fn print_host_info(host: &HostIdentity, now: NaiveDateTime) {
    print_title("SYSTEM INFORMATION");
    println!("  Computer Name: {}", host.computer_name.bold());
    println!("  Operating System: {}", host.operating_system);
    println!("  Processor: {}", host.processor);

    print_section_header("Memory");
    let usage = host.memory_usage_percentage();
    let usage_text = format!("{:.2}%", usage);
    let usage_text = if usage >= 90.0 {
        usage_text.red().bold()
    } else if usage >= 75.0 {
        usage_text.yellow()
    } else {
        usage_text.green()
    };
    println!("  Total: {}", format_bytes(host.total_physical_memory));
    println!("  Available: {}", format_bytes(host.available_physical_memory));
    println!("  Usage: {}", usage_text);

    print_section_header("Lifetime");
    println!("  Installation Date: {}", host.formatted_install_date());
    println!("  System Age: {}", host.formatted_system_age(now));
    println!("  Uptime: {}", host.formatted_uptime());
    println!();
}

pub fn print_imaging_outcome(outcome: &ImagingOutcome) {
    print_title("DISK IMAGE");
    if outcome.success {
        println!("  {}", outcome.message.green().bold());
    } else {
        println!("  {}", outcome.message.red().bold());
    }
    println!();
}

pub fn print_explanation(subject: &str, explanation: &str) {
    print_section_header(&format!("AI Analysis: {}", subject));
    for line in explanation.lines() {
        println!("  {}", line);
    }
    println!();
}
