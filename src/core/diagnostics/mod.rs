pub mod events;
pub mod host;
pub mod network;
pub mod probe;
pub mod storage;
pub mod types;

pub use events::collect_events;
pub use host::{collect_identity, collect_identity_at};
pub use network::{collect_network, NetworkCollector, NetworkSnapshot};
pub use probe::SystemProbe;
pub use storage::{collect_disk_health, collect_disk_health_with, MatchStrategy};
pub use types::*;
