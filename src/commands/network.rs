use anyhow::Result;

use super::Session;
use crate::core::diagnostics::{NetworkCollector, NetworkSnapshot};
use crate::ui::{self, system_formatters};

pub async fn execute(session: &Session) -> Result<()> {
    if !session.json {
        ui::progress("Checking network interfaces");
    }

    let snapshot = session
        .collect(|probe| {
            let mut collector = NetworkCollector::new(probe);
            let adapters = collector.collect_interfaces()?;
            Ok(NetworkSnapshot {
                adapters,
                down: collector.down_interfaces().to_vec(),
            })
        })
        .await?;

    if session.json {
        return session.print_json(&snapshot);
    }

    system_formatters::print_network_report(&snapshot);
    Ok(())
}
