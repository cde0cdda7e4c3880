//! String catalog probes, for chasing key-convention drift by hand.

use std::path::Path;

use anyhow::{Context, Result};
use morwiki::StringCatalog;

use crate::config::Config;

pub fn handle(key: &str, suffix: bool, source: Option<&Path>) -> Result<()> {
    let config = Config::load()?;
    let source_dir = config.resolve_source(source)?;
    let strings_dir = find_strings(&source_dir)?;

    let (catalog, _) = StringCatalog::load_dir(&strings_dir)
        .with_context(|| format!("Failed to load string tables from {}", strings_dir.display()))?;
    println!("Catalog: {} strings", catalog.len());

    if suffix {
        let matches = catalog.suffix_matches(key);
        if matches.is_empty() {
            println!("No keys end with {key:?}");
        } else {
            for (k, text) in matches {
                println!("  {k} = {text:?}");
            }
        }
        return Ok(());
    }

    match catalog.lookup(key) {
        Some(text) => println!("  {key} = {text:?}"),
        None => {
            println!("  {key}: not found");
            // Show what a fallback chain would find.
            if let Some(text) = catalog.find_by_suffix(key) {
                println!("  (suffix search would resolve to {text:?})");
            }
        }
    }

    Ok(())
}

fn find_strings(source_dir: &Path) -> Result<std::path::PathBuf> {
    for name in ["strings", "StringTables"] {
        let dir = source_dir.join(name);
        if dir.is_dir() {
            return Ok(dir);
        }
    }
    anyhow::bail!("No string table directory under {}", source_dir.display())
}
