//! Show the recipe join for one entity, strategy and all. The join
//! fallbacks exist because the data is inconsistent; this is the tool for
//! checking which convention a given row actually matched.

use std::path::Path;

use anyhow::{Context, Result};
use morwiki::pipeline::{self, PipelineConfig};
use morwiki::{Category, GameData};

use crate::config::Config;

pub fn handle(name: &str, category: &str, source: Option<&Path>) -> Result<()> {
    let config = Config::load()?;
    let source_dir = config.resolve_source(source)?;
    let category: Category = category
        .parse()
        .map_err(|err: String| anyhow::anyhow!(err))?;

    let mut pipeline_config = PipelineConfig::new(&source_dir);
    pipeline_config.categories = vec![category];
    let run = pipeline::run(&pipeline_config, GameData::standard())
        .with_context(|| format!("Failed to load tables from {}", source_dir.display()))?;

    if let Some(failure) = run.failures.first() {
        anyhow::bail!("{} failed to load: {}", failure.category, failure.error);
    }

    let result = run
        .categories
        .first()
        .context("Category produced no output")?;
    let entity = result
        .entities
        .iter()
        .find(|e| e.internal_name == name || e.display_name == name);

    let Some(entity) = entity else {
        if let Some(excluded) = result
            .excluded
            .iter()
            .find(|e| e.internal_name == name)
        {
            println!("{name}: excluded ({})", excluded.reason);
            return Ok(());
        }
        println!("{name}: no such {category} row");
        return Ok(());
    };

    println!("{} ({})", entity.display_name, entity.internal_name);
    match &entity.recipe {
        None => println!("  Not craftable (no recipe joined)"),
        Some(recipe) => {
            println!("  Recipe: {}", recipe.recipe_name);
            if recipe.craft_time > 0.0 {
                println!("  Time: {}s", recipe.craft_time);
            }
            if !recipe.stations.is_empty() {
                println!("  Stations: {}", recipe.stations.join(", "));
            }
            for material in &recipe.materials {
                println!("  Material: {} x{}", material.name, material.count);
            }
            if let Some(sized) = &recipe.size_materials {
                for material in sized {
                    println!(
                        "  Material: {} ({}/{}/{})",
                        material.name, material.small, material.medium, material.massive
                    );
                }
            }
            println!(
                "  Campaign unlock: {:?} ({} fragments)",
                recipe.campaign.kind, recipe.campaign.fragments
            );
            println!(
                "  Sandbox unlock: {:?} ({} fragments)",
                recipe.sandbox.kind, recipe.sandbox.fragments
            );
        }
    }

    Ok(())
}
