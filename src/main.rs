//! chatlens - CLI entry point

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chatlens::cli::{Cli, Commands, ConfigCommands};

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "chatlens=debug" } else { "chatlens=warn" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Analyze {
            kind,
            file,
            json,
            request,
        } => {
            let code = commands::analyze::handle(config_path, &kind, file.as_deref(), json, request)?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Commands::Prepare { kind, file, output } => {
            commands::prepare::handle(config_path, &kind, file.as_deref(), output.as_deref())
        }
        Commands::Kinds => commands::kinds::handle(config_path),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(config_path),
            ConfigCommands::Path => commands::config::handle_path(config_path),
        },
        Commands::Completions { shell } => commands::completions::handle::<Cli>(shell),
    }
}
