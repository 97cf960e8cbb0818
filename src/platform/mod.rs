// Platform-specific code module

pub mod system;

use crate::core::diagnostics::SystemProbe;

/// Probe for the platform this binary was built for
pub fn get_system_probe() -> Box<dyn SystemProbe> {
    #[cfg(windows)]
    {
        Box::new(system::windows::WmiProbe::new())
    }

    #[cfg(target_os = "linux")]
    {
        Box::new(system::unix::SysinfoProbe::new())
    }

    #[cfg(not(any(windows, target_os = "linux")))]
    {
        Box::new(system::unsupported::UnsupportedProbe::new())
    }
}
