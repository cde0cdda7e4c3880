//! Persist default paths so generate runs need no arguments.

use std::path::Path;

use anyhow::Result;

use crate::config::Config;

pub fn handle(
    source: Option<&Path>,
    output: Option<&Path>,
    overrides: Option<&Path>,
    show: bool,
) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        println!("Config file: {}", Config::config_path()?.display());
        print_path("source", config.source_dir.as_deref());
        print_path("output", config.output_dir.as_deref());
        print_path("overrides", config.unlock_overrides.as_deref());
        return Ok(());
    }

    let mut changed = false;
    if let Some(source) = source {
        config.source_dir = Some(source.to_path_buf());
        changed = true;
    }
    if let Some(output) = output {
        config.output_dir = Some(output.to_path_buf());
        changed = true;
    }
    if let Some(overrides) = overrides {
        config.unlock_overrides = Some(overrides.to_path_buf());
        changed = true;
    }

    if changed {
        config.save()?;
        println!("Saved configuration to {}", Config::config_path()?.display());
    } else {
        println!("Nothing to save; pass --source, --output, or --overrides");
    }

    Ok(())
}

fn print_path(label: &str, path: Option<&Path>) {
    match path {
        Some(path) => println!("  {label}: {}", path.display()),
        None => println!("  {label}: (not set)"),
    }
}
