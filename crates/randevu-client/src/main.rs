//! randevu CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use randevu_client::cli::{Cli, Command, ConfigAction};
use randevu_client::commands::{classify, config, schedule};
use randevu_client::config::ClientConfig;
use randevu_client::error::ClientResult;
use randevu_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path)?,
        None => ClientConfig::load()?,
    };

    init_tracing(TracingConfig::cli(cli.debug || config.debug))?;

    match cli.command {
        Command::Schedule {
            from,
            days,
            events_file,
            lang,
            pretty,
        } => {
            let options = schedule::ScheduleOptions {
                from,
                days,
                events_file,
                language: lang,
                pretty,
            };
            schedule::run(&config, options).await
        }
        Command::Classify {
            title,
            color,
            minutes,
        } => classify::run(&config, &title, color.as_deref(), minutes),
        Command::Config { action } => match action {
            ConfigAction::Dump => config::dump(&config, cli.config.as_deref()),
            ConfigAction::Validate => config::validate(&config),
            ConfigAction::Path => config::path(&config, cli.config.as_deref()),
        },
    }
}
