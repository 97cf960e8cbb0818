// UI and formatting module

pub mod formatters;
pub mod messages;
pub mod system_formatters;

// Re-export commonly used items for cleaner imports
pub use formatters::{format_age, format_bits_per_sec, format_bytes, format_uptime};
pub use messages::{error, progress, success, warn};
