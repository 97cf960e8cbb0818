// Linux capability layer

pub mod journal;
pub mod probe;
pub mod sysfs;

pub use probe::SysinfoProbe;
