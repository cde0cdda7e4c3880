mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            source,
            output,
            category,
            overrides,
        } => {
            commands::generate::handle(
                source.as_deref(),
                output.as_deref(),
                &category,
                overrides.as_deref(),
            )?;
        }

        Commands::Configure {
            source,
            output,
            overrides,
            show,
        } => {
            commands::configure::handle(
                source.as_deref(),
                output.as_deref(),
                overrides.as_deref(),
                show,
            )?;
        }

        Commands::Lookup {
            key,
            suffix,
            source,
        } => {
            commands::lookup::handle(&key, suffix, source.as_deref())?;
        }

        Commands::Recipe {
            name,
            category,
            source,
        } => {
            commands::recipe::handle(&name, &category, source.as_deref())?;
        }

        Commands::Usage { name, source } => {
            commands::usage::handle(&name, source.as_deref())?;
        }
    }

    Ok(())
}
