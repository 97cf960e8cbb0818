// Per-platform SystemProbe implementations

#[cfg(target_os = "linux")]
pub mod unix;
#[cfg(not(any(windows, target_os = "linux")))]
pub mod unsupported;
#[cfg(windows)]
pub mod windows;
