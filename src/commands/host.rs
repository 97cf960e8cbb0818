use anyhow::Result;
use chrono::Local;
use serde_json::json;

use super::Session;
use crate::core::diagnostics::collect_identity;
use crate::ui::system_formatters;

pub async fn execute_age(session: &Session) -> Result<()> {
    let host = session.collect(collect_identity).await?;
    let now = Local::now().naive_local();

    if session.json {
        return session.print_json(&json!({
            "computer_name": host.computer_name,
            "operating_system": host.operating_system,
            "install_date": host.install_date,
            "system_age_secs": host.system_age(now).as_secs(),
            "system_age": host.formatted_system_age(now),
        }));
    }

    system_formatters::print_system_age(&host, now);
    Ok(())
}

pub async fn execute_uptime(session: &Session) -> Result<()> {
    let host = session.collect(collect_identity).await?;

    if session.json {
        return session.print_json(&json!({
            "computer_name": host.computer_name,
            "uptime_secs": host.uptime.as_secs(),
            "uptime": host.formatted_uptime(),
        }));
    }

    system_formatters::print_uptime(&host);
    Ok(())
}

pub async fn execute_info(session: &Session) -> Result<()> {
    let host = session.collect(collect_identity).await?;

    if session.json {
        return session.print_json(&host);
    }

    system_formatters::print_host_info(&host, Local::now().naive_local());
    Ok(())
}
