mod bot;
mod cli;
mod commands;
mod input;
mod paths;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("notefall=info".parse()?))
        .init();

    let cli = Cli::parse();
    let paths = paths::DataPaths::resolve(cli.data_dir.as_deref())?;

    match cli.command {
        Command::Play(args) => commands::play::run(&paths, cli.config.as_deref(), cli.endpoint.as_deref(), &args),
        Command::Leaderboard { query } => commands::leaderboard::run(cli.endpoint.as_deref(), &query),
        Command::Submit => commands::submit::run(&paths, cli.endpoint.as_deref()),
        Command::Sync => commands::sync::run(&paths, cli.endpoint.as_deref()),
        Command::Profile { action } => commands::profile::run(&paths, &action),
        Command::Export { format, output } => {
            commands::export::run(&paths, format, output.as_deref())
        }
    }
}
