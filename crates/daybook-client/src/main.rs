//! daybook CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use daybook_core::{TracingConfig, init_tracing};

use daybook_client::cli::{Cli, Command, ConfigAction};
use daybook_client::commands;
use daybook_client::config::ClientConfig;
use daybook_client::error::ClientResult;

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
    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let config = if cli.config.is_some() {
        ClientConfig::load_from(&config_path)?
    } else {
        ClientConfig::load()?
    };

    let tracing_config = if cli.debug || config.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli()
    };
    init_tracing(tracing_config)?;

    match cli.command {
        Some(Command::Config { ref action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&config_path),
        },
        None => commands::show::run(&cli, &config).await,
    }
}
