//! CLI entrypoint for parley
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use parley_application::{ModelSettings, SendMessageInput};
use parley_infrastructure::{AppContext, ConfigLoader, FileConfig};
use parley_presentation::{Cli, Command, ConsoleFormatter, SendArgs, Spinner};
use std::io::IsTerminal;
use std::path::Path;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref());

    if cli.show_config {
        print!(
            "{}",
            ConsoleFormatter::format_config_sources(&ConfigLoader::config_sources(
                cli.config.as_deref()
            ))
        );
        return Ok(());
    }

    let Some(command) = cli.command else {
        bail!("No command given. Try `parley send \"your message\"` or `parley --help`.");
    };

    let config = load_config(cli.config.as_deref(), cli.no_config)?;
    for issue in config.validate().iter().filter(|i| !i.is_error()) {
        eprintln!("{} {}", "warning:".yellow().bold(), issue);
    }

    info!("Starting parley");
    let ctx = AppContext::build(config)
        .await
        .context("Failed to initialize parley")?;

    match command {
        Command::Send(args) => send(&ctx, args).await,
        Command::Show { id, json } => {
            let summary = ctx.get_conversation().execute(id).await?;
            if json {
                println!("{}", ConsoleFormatter::format_json(&summary));
            } else {
                print!("{}", ConsoleFormatter::format_summary(&summary));
            }
            Ok(())
        }
        Command::Models { json } => {
            let models = ctx.list_models().execute()?;
            if json {
                println!("{}", ConsoleFormatter::format_json(&models));
            } else {
                print!("{}", ConsoleFormatter::format_models(&models));
            }
            Ok(())
        }
        Command::Archive { id } => {
            ctx.update_status().archive(id).await?;
            println!("{} conversation {}", "Archived".green(), id);
            Ok(())
        }
        Command::Delete { id } => {
            ctx.update_status().delete(id).await?;
            println!("{} conversation {}", "Deleted".green(), id);
            Ok(())
        }
    }
}

async fn send(ctx: &AppContext, args: SendArgs) -> Result<()> {
    let mut input = SendMessageInput::new(args.text)
        .with_auto_route(ctx.config().routing.auto_route && !args.no_route);
    if let Some(id) = args.conversation {
        input = input.with_conversation_id(id);
    }
    if let Some(model) = args.model {
        input = input.with_model(model);
    }
    if let Some(temperature) = args.temperature {
        input = input.with_settings(ModelSettings::default().with_temperature(temperature));
    }

    let spinner = Spinner::start("Thinking...", !args.json && std::io::stderr().is_terminal());
    let result = ctx.send_message().execute(input).await;
    spinner.finish();

    let output = result?;
    if args.json {
        println!("{}", ConsoleFormatter::format_json(&output));
    } else {
        print!("{}", ConsoleFormatter::format_reply(&output));
    }
    Ok(())
}

fn load_config(path: Option<&Path>, no_config: bool) -> Result<FileConfig> {
    if no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    ConfigLoader::load(path).context("Failed to load configuration")
}

/// Initialize logging based on verbosity level.
///
/// `RUST_LOG` overrides the `-v` mapping. With a log directory, a daily
/// rolling file receives the same events as stderr.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "parley.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}
