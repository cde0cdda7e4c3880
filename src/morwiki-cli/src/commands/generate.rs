//! The main batch run: resolve every table, write wiki data documents
//! plus the audit logs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use morwiki::pipeline::{self, PipelineConfig, RunOutput};
use morwiki::{Category, GameData};

use crate::config::Config;

pub fn handle(
    source: Option<&Path>,
    output: Option<&Path>,
    categories: &[String],
    overrides: Option<&Path>,
) -> Result<()> {
    let config = Config::load()?;
    let source_dir = config.resolve_source(source)?;
    let output_dir = config.resolve_output(output);

    let mut pipeline_config = PipelineConfig::new(&source_dir);
    if !categories.is_empty() {
        pipeline_config.categories = parse_categories(categories)?;
    }
    pipeline_config.unlock_overrides = config.resolve_overrides(overrides);

    println!("Loading tables from {}...", source_dir.display());
    let run = pipeline::run(&pipeline_config, GameData::standard())
        .with_context(|| format!("Failed to load tables from {}", source_dir.display()))?;

    for report in &run.string_reports {
        println!("  {}: {} strings", report.file, report.strings);
    }
    println!("  Catalog: {} strings total", run.catalog_size);
    for warning in &run.warnings {
        println!("  Warning: {warning}");
    }
    for failure in &run.failures {
        println!("  {} failed: {}", failure.category, failure.error);
    }

    write_output(&run, &output_dir)?;

    println!();
    for result in &run.categories {
        println!(
            "{}: {} entities, {} excluded",
            result.category,
            result.entities.len(),
            result.excluded.len()
        );
    }
    println!("Usage index: {} materials", run.usage.len());
    println!("Wrote wiki data to {}", output_dir.display());

    Ok(())
}

fn parse_categories(names: &[String]) -> Result<Vec<Category>> {
    names
        .iter()
        .map(|name| {
            name.parse::<Category>()
                .map_err(|err| anyhow::anyhow!(err))
        })
        .collect()
}

fn write_output(run: &RunOutput, output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let total: u64 = run.categories.iter().map(|c| c.entities.len() as u64).sum();
    let progress = ProgressBar::new(total);

    for result in &run.categories {
        let category_dir = output_dir.join(result.category.key());
        fs::create_dir_all(&category_dir)
            .with_context(|| format!("Failed to create {}", category_dir.display()))?;

        for entity in &result.entities {
            let file = category_dir.join(format!("{}.json", sanitize_filename(&entity.display_name)));
            let doc = serde_json::to_string_pretty(entity)
                .context("Failed to serialize entity")?;
            fs::write(&file, doc)
                .with_context(|| format!("Failed to write {}", file.display()))?;
            progress.inc(1);
        }

        if !result.excluded.is_empty() {
            write_exclusion_log(result.category.key(), &result.excluded, output_dir)?;
        }
    }
    progress.finish_and_clear();

    let usage_file = output_dir.join("usage_index.json");
    let usage_doc =
        serde_json::to_string_pretty(&run.usage).context("Failed to serialize usage index")?;
    fs::write(&usage_file, usage_doc)
        .with_context(|| format!("Failed to write {}", usage_file.display()))?;

    Ok(())
}

fn write_exclusion_log(
    category: &str,
    excluded: &[morwiki::Exclusion],
    output_dir: &Path,
) -> Result<()> {
    let path: PathBuf = output_dir.join(format!("excluded_{category}.txt"));
    let mut log = String::new();
    log.push_str(&format!("Excluded {category}\n"));
    log.push_str(&"=".repeat(60));
    log.push_str(&format!("\nTotal excluded: {}\n\n", excluded.len()));
    for exclusion in excluded {
        log.push_str(&format!("- {}", exclusion.internal_name));
        if let Some(display) = &exclusion.display_name {
            log.push_str(&format!(" ({display})"));
        }
        log.push_str(&format!(" - Reason: {}\n", exclusion.reason));
    }
    fs::write(&path, log).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Display names become file names; strip the characters filesystems
/// reject.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_invalid_characters() {
        assert_eq!(sanitize_filename("King's Brew"), "King's Brew");
        assert_eq!(sanitize_filename("Oak/Bench: Large"), "Oak_Bench_ Large");
    }

    #[test]
    fn parse_categories_rejects_unknown_names() {
        assert!(parse_categories(&["items".to_string()]).is_ok());
        assert!(parse_categories(&["gadgets".to_string()]).is_err());
    }

    #[test]
    fn exclusion_log_lists_reasons() {
        use morwiki::{Exclusion, ExclusionReason};

        let dir = tempfile::tempdir().unwrap();
        let excluded = vec![
            Exclusion {
                internal_name: "Foo".to_string(),
                display_name: Some("Foo Display".to_string()),
                reason: ExclusionReason::Superseded,
            },
            Exclusion {
                internal_name: "Bar".to_string(),
                display_name: None,
                reason: ExclusionReason::NoDisplayName,
            },
        ];

        write_exclusion_log("constructions", &excluded, dir.path()).unwrap();

        let log = fs::read_to_string(dir.path().join("excluded_constructions.txt")).unwrap();
        assert!(log.contains("Total excluded: 2"));
        assert!(log.contains("- Foo (Foo Display) - Reason: superseded"));
        assert!(log.contains("- Bar - Reason: no display name"));
    }
}
