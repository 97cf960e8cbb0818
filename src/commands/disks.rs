use anyhow::Result;

use super::Session;
use crate::core::diagnostics::collect_disk_health;
use crate::ui::{self, system_formatters};

pub async fn execute(session: &Session) -> Result<()> {
    if !session.json {
        ui::progress("Checking disk health");
    }

    let disks = session.collect(collect_disk_health).await?;

    if session.json {
        return session.print_json(&disks);
    }

    system_formatters::print_disk_report(&disks);
    Ok(())
}
