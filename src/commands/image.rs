use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::ArgMatches;
use serde_json::json;

use super::Session;
use crate::core::ImagingOrchestrator;
use crate::ui::{self, system_formatters};

pub async fn execute(matches: &ArgMatches, session: &Session) -> Result<()> {
    let tool = matches
        .get_one::<PathBuf>("tool")
        .cloned()
        .unwrap_or_else(|| session.config.imaging_tool());
    let output_dir = matches
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| session.config.output_directory());
    let timeout = matches
        .get_one::<u64>("timeout")
        .map(|secs| Duration::from_secs(*secs))
        .or_else(|| session.config.imaging_timeout());

    let mut orchestrator = ImagingOrchestrator::new();
    if let Some(limit) = timeout.filter(|t| !t.is_zero()) {
        orchestrator = orchestrator.with_deadline(limit);
    }

    if !session.json {
        ui::progress(&format!("Creating disk image with {}", tool.display()));
    }

    let outcome = orchestrator.create_disk_image(&tool, &output_dir).await;

    let explanation = if !outcome.success && session.explainer().is_available() {
        Some(session.explainer().explain_text(&outcome.message).await)
    } else {
        None
    };

    if session.json {
        return session.print_json(&json!({
            "success": outcome.success,
            "message": outcome.message,
            "explanation": explanation,
        }));
    }

    system_formatters::print_imaging_outcome(&outcome);
    if let Some(text) = explanation {
        system_formatters::print_explanation("Disk image failure", &text);
    }

    Ok(())
}
