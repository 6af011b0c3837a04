use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use tracing::info;

mod cli;
mod commands;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        let mut cmd = Cli::command();
        cmd.print_help().context("Failed to print help")?;
        println!();
        return Ok(ExitCode::SUCCESS);
    };

    // Config commands work even when the configuration itself is broken
    if let Commands::Config { config_cmd } = &command {
        gauntlet_logging::init_simple_tracing(cli.log_level.as_deref().unwrap_or("warn"))?;
        commands::config::handle(config_cmd, cli.config.as_deref())?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = commands::load_config(cli.config.as_deref())?;
    commands::init_logging(&config, cli.log_level.as_deref())?;
    info!("Gauntlet {} starting", env!("CARGO_PKG_VERSION"));

    match command {
        Commands::Run(args) => commands::run::execute(config, args).await,
        Commands::Probe => commands::probe::execute(config).await,
        Commands::Config { .. } => Ok(ExitCode::SUCCESS),
    }
}
