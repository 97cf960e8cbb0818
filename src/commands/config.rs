use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::explain::API_KEY_VARS;
use crate::core::Config;
use crate::ui;

pub fn execute(matches: &ArgMatches, json: bool) -> Result<()> {
    match matches.subcommand() {
        Some(("show", _)) => show(json),
        Some(("set-tool", sub_matches)) => update(|config| {
            let path = required_path(sub_matches)?;
            if !path.is_file() {
                ui::warn(&format!("Imaging tool '{}' does not exist yet", path.display()));
            }
            config.set_imaging_tool_path(path);
            Ok("Imaging tool path updated")
        }),
        Some(("set-output", sub_matches)) => update(|config| {
            config.set_output_dir(required_path(sub_matches)?);
            Ok("Output directory updated")
        }),
        Some(("set-max-events", sub_matches)) => update(|config| {
            let max = *sub_matches
                .get_one::<usize>("count")
                .context("Event count is required")?;
            config.set_max_events(max)?;
            Ok("Maximum events updated")
        }),
        Some(("set-timeout", sub_matches)) => update(|config| {
            let secs = *sub_matches
                .get_one::<u64>("seconds")
                .context("Timeout in seconds is required")?;
            config.set_imaging_timeout_secs(secs);
            Ok(if secs == 0 {
                "Imaging timeout cleared"
            } else {
                "Imaging timeout updated"
            })
        }),
        _ => {
            println!("Use 'scantool config --help' for more information.");
            Ok(())
        }
    }
}

fn required_path(matches: &ArgMatches) -> Result<PathBuf> {
    matches
        .get_one::<PathBuf>("path")
        .cloned()
        .context("Path argument is required")
}

/// Load, modify and save the config
fn update<F>(change: F) -> Result<()>
where
    F: FnOnce(&mut Config) -> Result<&'static str>,
{
    let mut config = Config::load().context("Failed to load config")?;
    let message = change(&mut config)?;
    config.save().context("Failed to save config")?;
    ui::success(message);
    Ok(())
}

fn show(json: bool) -> Result<()> {
    let config = Config::load().context("Failed to load config")?;
    let key_present = API_KEY_VARS
        .iter()
        .any(|var| std::env::var(var).map(|v| !v.trim().is_empty()).unwrap_or(false));

    if json {
        let rendered = serde_json::to_string_pretty(&serde_json::json!({
            "config_path": Config::get_config_path()?,
            "imaging_tool_path": config.imaging_tool(),
            "output_dir": config.output_directory(),
            "max_events": config.max_events,
            "imaging_timeout_secs": config.imaging_timeout_secs,
            "gateway_url": config.gateway_url(),
            "gateway_model": config.gateway_model(),
            "gateway_key_present": key_present,
        }))?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("\n{}", "CONFIGURATION".bold().bright_cyan());
    println!("{}", "=".repeat(60));
    println!("  Config file: {}", Config::get_config_path()?.display());
    println!("  Imaging tool: {}", config.imaging_tool().display());
    println!("  Output directory: {}", config.output_directory().display());
    println!("  Max events: {}", config.max_events);
    match config.imaging_timeout_secs {
        Some(secs) => println!("  Imaging timeout: {}s", secs),
        None => println!("  Imaging timeout: {}", "none".dimmed()),
    }
    println!("  Gateway URL: {}", config.gateway_url());
    println!("  Gateway model: {}", config.gateway_model());
    if key_present {
        println!("  Gateway API key: {}", "set".green());
    } else {
        println!(
            "  Gateway API key: {} (set {})",
            "missing".yellow(),
            API_KEY_VARS.join(" or ")
        );
    }
    println!();
    Ok(())
}
