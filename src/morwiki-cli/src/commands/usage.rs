//! "Used in" listing for one material, from the cross-category index.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use morwiki::pipeline::{self, PipelineConfig};
use morwiki::GameData;

use crate::config::Config;

pub fn handle(name: &str, source: Option<&Path>) -> Result<()> {
    let config = Config::load()?;
    let source_dir = config.resolve_source(source)?;

    let pipeline_config = PipelineConfig::new(&source_dir);
    let run = pipeline::run(&pipeline_config, GameData::standard())
        .with_context(|| format!("Failed to load tables from {}", source_dir.display()))?;

    for failure in &run.failures {
        println!("  {} skipped: {}", failure.category, failure.error);
    }

    let consumers = run.usage.consumers(name);
    if consumers.is_empty() {
        println!("{name}: not used in any recipe");
        return Ok(());
    }

    println!("{name} is used in {} recipes:", consumers.len());
    let mut by_category: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for consumer in consumers {
        by_category
            .entry(consumer.category.key())
            .or_default()
            .push(consumer.display_name.as_str());
    }
    for (category, mut names) in by_category {
        names.sort_unstable();
        println!("  {category}:");
        for display_name in names {
            println!("    {display_name}");
        }
    }

    Ok(())
}
