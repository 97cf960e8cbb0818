// Colored one-line status messages

use colored::Colorize;

pub fn warn(message: &str) {
    println!("{}", format!("Warning: {}", message).yellow().bold());
}

pub fn success(message: &str) {
    println!("{}", message.green().bold());
}

/// Printed to stderr
pub fn error(message: &str) {
    eprintln!("{}", message.red().bold());
}

/// Progress line shown before a collector runs
pub fn progress(message: &str) {
    println!("{}", format!("{}...", message).dimmed());
}
