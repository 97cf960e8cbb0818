use anyhow::{Context, Result};
use clap::ArgMatches;
use serde_json::json;

use super::Session;
use crate::core::GATEWAY_UNAVAILABLE;
use crate::ui::{self, system_formatters};

pub async fn execute(matches: &ArgMatches, session: &Session) -> Result<()> {
    let text = matches
        .get_many::<String>("text")
        .context("Text to explain is required")?
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    let explanation = session.explainer().explain_text(&text).await;

    if session.json {
        return session.print_json(&json!({
            "input": text,
            "explanation": explanation,
        }));
    }

    if explanation == GATEWAY_UNAVAILABLE {
        ui::warn(&explanation);
        return Ok(());
    }

    system_formatters::print_explanation("Explanation", &explanation);
    Ok(())
}
