use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::warn;

use scantool::commands::{self, Session};
use scantool::core::diagnostics::Severity;
use scantool::core::{Config, Explainer, OpenAiGateway};
use scantool::platform::get_system_probe;
use scantool::ui::{self, system_formatters};
use scantool::DiagError;

fn event_command(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(
            Arg::new("max")
                .short('m')
                .long("max")
                .value_name("N")
                .help("Maximum number of events to report (defaults to the configured value)")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("explain")
                .short('e')
                .long("explain")
                .help("Ask the explanation gateway about the newest event")
                .action(ArgAction::SetTrue),
        )
}

fn path_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .help(help)
        .required(true)
        .index(1)
        .value_parser(value_parser!(PathBuf))
}

fn build_cli() -> Command {
    Command::new("scantool")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Collects disk, network, event log and host diagnostics")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .help("Print reports as JSON")
                .action(ArgAction::SetTrue),
        )
        .subcommand(Command::new("disks").about("Show physical disks, partitions and free space"))
        .subcommand(
            Command::new("network").about("Show network interfaces and the ones that are down"),
        )
        .subcommand(event_command("errors", "Show recent error events"))
        .subcommand(event_command("warnings", "Show recent warning events"))
        .subcommand(Command::new("age").about("Show installation date and system age"))
        .subcommand(Command::new("uptime").about("Show time since last boot"))
        .subcommand(Command::new("info").about("Show the full host identity report"))
        .subcommand(
            Command::new("image")
                .about("Create a disk image with the external imaging tool")
                .arg(
                    Arg::new("tool")
                        .short('t')
                        .long("tool")
                        .value_name("PATH")
                        .help("Imaging executable (defaults to the configured path)")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("DIR")
                        .help("Output directory (defaults to the configured directory)")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("timeout")
                        .long("timeout")
                        .value_name("SECS")
                        .help("Kill the tool after this many seconds (0 waits indefinitely)")
                        .value_parser(value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("explain")
                .about("Ask the explanation gateway about an error message")
                .arg(
                    Arg::new("text")
                        .help("Text to explain")
                        .required(true)
                        .num_args(1..)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change configuration (use 'scantool config --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show").about("Show the current configuration"))
                .subcommand(
                    Command::new("set-tool")
                        .about("Set the imaging executable path")
                        .arg(path_arg("path", "Path to the imaging executable")),
                )
                .subcommand(
                    Command::new("set-output")
                        .about("Set the imaging output directory")
                        .arg(path_arg("path", "Directory for disk images")),
                )
                .subcommand(
                    Command::new("set-max-events")
                        .about("Set the default number of events per query")
                        .arg(
                            Arg::new("count")
                                .required(true)
                                .index(1)
                                .value_parser(value_parser!(usize)),
                        ),
                )
                .subcommand(
                    Command::new("set-timeout")
                        .about("Set the imaging timeout in seconds (0 clears it)")
                        .arg(
                            Arg::new("seconds")
                                .required(true)
                                .index(1)
                                .value_parser(value_parser!(u64)),
                        ),
                ),
        )
}

fn main() -> ExitCode {
    scantool::init_logging();

    let matches = build_cli().get_matches();
    let json = matches.get_flag("json");

    // Config commands never touch the probe or the gateway
    if let Some(("config", sub_matches)) = matches.subcommand() {
        return match commands::config::execute(sub_matches, json) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                ui::error(&format!("Error: {:#}", e));
                ExitCode::FAILURE
            }
        };
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("scantool-worker")
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            ui::error(&format!("Error: failed to start async runtime: {}", e));
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(async {
        let session = build_session(json);

        match dispatch(&matches, &session).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                report_failure(&session, &e).await;
                ExitCode::FAILURE
            }
        }
    })
}

fn build_session(json: bool) -> Session {
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Using default configuration: {}", e);
        Config::default()
    });

    let gateway = OpenAiGateway::from_env(config.gateway_url(), config.gateway_model());
    let probe = Arc::from(get_system_probe());

    Session::new(config, json, probe, Explainer::new(Box::new(gateway)))
}

async fn dispatch(matches: &ArgMatches, session: &Session) -> Result<()> {
    match matches.subcommand() {
        Some(("disks", _)) => commands::disks::execute(session).await,
        Some(("network", _)) => commands::network::execute(session).await,
        Some(("errors", sub_matches)) => {
            commands::events::execute(sub_matches, session, Severity::Error).await
        }
        Some(("warnings", sub_matches)) => {
            commands::events::execute(sub_matches, session, Severity::Warning).await
        }
        Some(("age", _)) => commands::host::execute_age(session).await,
        Some(("uptime", _)) => commands::host::execute_uptime(session).await,
        Some(("info", _)) => commands::host::execute_info(session).await,
        Some(("image", sub_matches)) => commands::image::execute(sub_matches, session).await,
        Some(("explain", sub_matches)) => commands::explain::execute(sub_matches, session).await,
        _ => {
            println!("Use 'scantool --help' for more information.");
            Ok(())
        }
    }
}

/// Print a failed command in red and, for collector failures, ask the gateway
/// what the underlying error means
async fn report_failure(session: &Session, error: &anyhow::Error) {
    let collection_failure = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<DiagError>())
        .filter(|cause| matches!(cause, DiagError::Collection { .. }));

    ui::error(&format!("Error: {:#}", error));

    if let Some(failure) = collection_failure {
        if session.explainer().is_available() {
            let explanation = session.explainer().explain_text(&failure.to_string()).await;
            system_formatters::print_explanation("Collector failure", &explanation);
        }
    }
}
