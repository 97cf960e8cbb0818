// Windows capability layer

pub mod core;
pub mod network;
pub mod probe;

pub use probe::WmiProbe;
