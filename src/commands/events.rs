use anyhow::Result;
use clap::ArgMatches;
use serde_json::json;

use super::Session;
use crate::core::diagnostics::{collect_events, Severity};
use crate::core::EventIdentity;
use crate::ui::{self, system_formatters};

pub async fn execute(matches: &ArgMatches, session: &Session, severity: Severity) -> Result<()> {
    let max_count = matches
        .get_one::<usize>("max")
        .copied()
        .unwrap_or(session.config.max_events);
    let explain = matches.get_flag("explain");

    if !session.json {
        ui::progress(&format!("Checking system {}s", severity.to_string().to_lowercase()));
    }

    let events = session
        .collect(move |probe| collect_events(probe, severity, max_count))
        .await?;

    // Events are newest first, so the first one is the most recent
    let explanation = match events.first() {
        Some(newest) if explain => {
            let identity = EventIdentity::from(newest);
            let text = session.explainer().explain_event(&identity).await;
            Some((identity, text))
        }
        _ => None,
    };

    if session.json {
        return session.print_json(&json!({
            "severity": severity,
            "events": events,
            "explanation": explanation.as_ref().map(|(_, text)| text),
        }));
    }

    system_formatters::print_event_report(severity, &events);
    if let Some((identity, text)) = explanation {
        system_formatters::print_explanation(
            &format!("Event {} from {}", identity.id, identity.source),
            &text,
        );
    }

    Ok(())
}
