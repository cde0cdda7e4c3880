//! Batch pipeline: load everything, resolve every record, deduplicate,
//! index.
//!
//! All file reads happen in the loading phase; the catalog and recipe
//! indexes are frozen before the first record resolves. Deduplication
//! needs a full table and the usage index needs every category, so both
//! run behind full barriers. A category whose tables fail to load is
//! reported and skipped; the others continue.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::dedup::dedupe;
use crate::entity::{Category, Entity, Exclusion};
use crate::gamedata::GameData;
use crate::provenance::load_entitlements;
use crate::recipe::RecipeIndex;
use crate::resolve::Resolver;
use crate::strings::{MergeReport, StringCatalog};
use crate::tables::{find_table_file, read_json, LoadError, TableDocument};
use crate::usage::UsageIndex;

/// Directory names string tables have shipped under.
const STRINGS_DIRS: [&str; 2] = ["strings", "StringTables"];

const ENTITLEMENTS_FILE: &str = "DT_Entitlements.json";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub source_dir: PathBuf,
    pub categories: Vec<Category>,
    /// Optional display-name keyed unlock-text overrides, applied last.
    pub unlock_overrides: Option<PathBuf>,
}

impl PipelineConfig {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        PipelineConfig {
            source_dir: source_dir.into(),
            categories: Category::ALL.to_vec(),
            unlock_overrides: None,
        }
    }
}

/// Hand-maintained unlock text for one display name.
#[derive(Debug, Clone, Deserialize)]
pub struct UnlockOverride {
    pub campaign: String,
    pub sandbox: String,
}

#[derive(Debug)]
pub struct CategoryResult {
    pub category: Category,
    pub entities: Vec<Entity>,
    pub excluded: Vec<Exclusion>,
}

#[derive(Debug)]
pub struct CategoryFailure {
    pub category: Category,
    pub error: LoadError,
}

#[derive(Debug)]
pub struct RunOutput {
    pub string_reports: Vec<MergeReport>,
    pub catalog_size: usize,
    pub categories: Vec<CategoryResult>,
    pub failures: Vec<CategoryFailure>,
    pub warnings: Vec<String>,
    pub usage: UsageIndex,
}

/// Run the pipeline. Only a missing string catalog is fatal to the run;
/// table failures abort their own category.
pub fn run(config: &PipelineConfig, game: &GameData) -> Result<RunOutput, LoadError> {
    let strings_dir = find_strings_dir(&config.source_dir)?;
    let (catalog, string_reports) = StringCatalog::load_dir(&strings_dir)?;

    let mut warnings = Vec::new();

    // The entitlement table only exists in exports that include DLC data.
    let entitlements = match find_table_file(&config.source_dir, ENTITLEMENTS_FILE)
        .and_then(|path| TableDocument::load(&path))
    {
        Ok(doc) => load_entitlements(&doc),
        Err(err) => {
            warnings.push(format!("entitlement table unavailable: {err}"));
            HashMap::new()
        }
    };

    let overrides = match &config.unlock_overrides {
        Some(path) => match load_unlock_overrides(path) {
            Ok(map) => map,
            Err(err) => {
                warnings.push(format!("unlock overrides unavailable: {err}"));
                HashMap::new()
            }
        },
        None => HashMap::new(),
    };

    // Recipe tables are shared between categories; load each file once.
    let mut recipe_cache: HashMap<&'static str, Result<RecipeIndex, ()>> = HashMap::new();

    let mut categories = Vec::new();
    let mut failures = Vec::new();

    for &category in &config.categories {
        match run_category(
            category,
            config,
            &catalog,
            &entitlements,
            &mut recipe_cache,
            game,
        ) {
            Ok(mut result) => {
                apply_unlock_overrides(&mut result.entities, &overrides);
                categories.push(result);
            }
            Err(error) => failures.push(CategoryFailure { category, error }),
        }
    }

    let usage = UsageIndex::build(categories.iter().map(|c| c.entities.as_slice()));

    Ok(RunOutput {
        string_reports,
        catalog_size: catalog.len(),
        categories,
        failures,
        warnings,
        usage,
    })
}

fn run_category(
    category: Category,
    config: &PipelineConfig,
    catalog: &StringCatalog,
    entitlements: &HashMap<String, String>,
    recipe_cache: &mut HashMap<&'static str, Result<RecipeIndex, ()>>,
    game: &GameData,
) -> Result<CategoryResult, LoadError> {
    let spec = category.spec();

    let recipes = match spec.recipe_file {
        Some(file) => {
            if !recipe_cache.contains_key(file) {
                let loaded = find_table_file(&config.source_dir, file)
                    .and_then(|path| TableDocument::load(&path));
                match loaded {
                    Ok(doc) => {
                        recipe_cache.insert(file, Ok(RecipeIndex::from_table(&doc)));
                    }
                    Err(err) => {
                        recipe_cache.insert(file, Err(()));
                        return Err(err);
                    }
                }
            }
            match recipe_cache.get(file) {
                Some(Ok(index)) => Some(index),
                _ => {
                    return Err(LoadError::Missing {
                        dir: config.source_dir.clone(),
                        file: file.to_string(),
                    })
                }
            }
        }
        None => None,
    };

    let resolver = Resolver {
        catalog,
        game,
        entitlements,
        recipes,
    };

    let mut entities = Vec::new();
    let mut excluded = Vec::new();

    for &data_file in spec.data_files {
        let path = find_table_file(&config.source_dir, data_file)?;
        let doc = TableDocument::load(&path)?;
        for record in &doc.rows {
            match resolver.resolve_record(&spec, data_file, record, &doc.imports) {
                Ok(entity) => entities.push(entity),
                Err(exclusion) => excluded.push(exclusion),
            }
        }
    }

    // Dedup is a second pass over the complete record set, never
    // interleaved with per-record resolution.
    let outcome = dedupe(entities, spec.allow_recipeless, game);
    excluded.extend(outcome.excluded);

    Ok(CategoryResult {
        category,
        entities: outcome.canonical,
        excluded,
    })
}

fn apply_unlock_overrides(
    entities: &mut [Entity],
    overrides: &HashMap<String, UnlockOverride>,
) {
    for entity in entities {
        if let Some(unlock) = overrides.get(&entity.display_name) {
            entity.campaign_unlock_override = Some(unlock.campaign.clone());
            entity.sandbox_unlock_override = Some(unlock.sandbox.clone());
        }
    }
}

fn load_unlock_overrides(path: &Path) -> Result<HashMap<String, UnlockOverride>, LoadError> {
    let doc = read_json(path)?;
    serde_json::from_value(doc).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn find_strings_dir(source_dir: &Path) -> Result<PathBuf, LoadError> {
    for name in STRINGS_DIRS {
        let dir = source_dir.join(name);
        if dir.is_dir() {
            return Ok(dir);
        }
    }
    for entry in walkdir::WalkDir::new(source_dir)
        .into_iter()
        .filter_map(Result::ok)
    {
        if entry.file_type().is_dir()
            && STRINGS_DIRS
                .iter()
                .any(|name| entry.file_name().to_str() == Some(*name))
        {
            return Ok(entry.into_path());
        }
    }
    Err(LoadError::Missing {
        dir: source_dir.to_path_buf(),
        file: "strings/".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn write_json(path: &Path, value: serde_json::Value) {
        fs::write(path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
    }

    fn string_table(pairs: &[(&str, &str)]) -> serde_json::Value {
        let pairs: Vec<serde_json::Value> =
            pairs.iter().map(|(k, v)| json!([k, v])).collect();
        json!({"Exports": [{"Table": {"Value": pairs}}]})
    }

    fn data_table(rows: serde_json::Value) -> serde_json::Value {
        json!({"Exports": [{"Table": {"Data": rows}}]})
    }

    /// A minimal source tree: one construction with a recipe, one without,
    /// plus a V2 collision pair.
    fn write_source(dir: &Path) {
        let strings = dir.join("strings");
        fs::create_dir_all(&strings).unwrap();
        write_json(
            &strings.join("ui.json"),
            string_table(&[
                ("Constructions.Bench.Name", "Oak Bench"),
                ("Constructions.Arch.Name", "Old Arch"),
                ("Constructions.Lamp.Name", "Lamp"),
                ("Items.Items.Wood.Name", "Wood Scraps"),
            ]),
        );

        write_json(
            &dir.join("DT_Constructions.json"),
            data_table(json!([
                {"Name": "Bench", "Value": [
                    {"Name": "DisplayName", "Value": "Constructions.Bench.Name"}
                ]},
                {"Name": "Arch", "Value": [
                    {"Name": "DisplayName", "Value": "Constructions.Arch.Name"}
                ]},
                {"Name": "Lamp", "Value": [
                    {"Name": "DisplayName", "Value": "Constructions.Lamp.Name"}
                ]},
                {"Name": "Lamp_V2", "Value": [
                    {"Name": "DisplayName", "Value": "Constructions.Lamp.Name"}
                ]}
            ])),
        );

        let material = json!({"Name": "0", "Value": [
            {"Name": "MaterialHandle", "Value": [{"Name": "RowName", "Value": "Item.Wood"}]},
            {"Name": "Count", "Value": 3}
        ]});
        write_json(
            &dir.join("DT_ConstructionRecipes.json"),
            data_table(json!([
                {"Name": "Bench", "Value": [
                    {"Name": "DefaultRequiredMaterials", "Value": [material]},
                    {"Name": "DefaultUnlocks", "Value": [
                        {"Name": "UnlockType", "Value": "EMorRecipeUnlockType::FragmentCollection"},
                        {"Name": "NumFragments", "Value": 3}
                    ]}
                ]},
                {"Name": "Lamp_V2", "Value": [
                    {"Name": "DefaultRequiredMaterials", "Value": [material]}
                ]}
            ])),
        );
    }

    #[test]
    fn end_to_end_single_category() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path());

        let mut config = PipelineConfig::new(dir.path());
        config.categories = vec![Category::Constructions];
        let output = run(&config, GameData::standard()).unwrap();

        assert!(output.failures.is_empty());
        let result = &output.categories[0];
        let mut kept: Vec<&str> = result
            .entities
            .iter()
            .map(|e| e.internal_name.as_str())
            .collect();
        kept.sort_unstable();
        // Bench has a recipe; Lamp_V2 supersedes Lamp; Arch drops.
        assert_eq!(kept, vec!["Bench", "Lamp_V2"]);
        assert_eq!(result.excluded.len(), 2);

        let bench = result
            .entities
            .iter()
            .find(|e| e.internal_name == "Bench")
            .unwrap();
        let recipe = bench.recipe.as_ref().unwrap();
        assert_eq!(recipe.materials[0].name, "Wood Scraps");
        assert_eq!(recipe.campaign.fragments, 3);

        // Bench and the surviving lamp both consume wood.
        assert_eq!(output.usage.consumers("Wood Scraps").len(), 2);
    }

    #[test]
    fn missing_category_table_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path());

        let mut config = PipelineConfig::new(dir.path());
        config.categories = vec![Category::Weapons, Category::Constructions];
        let output = run(&config, GameData::standard()).unwrap();

        // Weapons has no tables in this tree; constructions still ran.
        assert_eq!(output.failures.len(), 1);
        assert_eq!(output.failures[0].category, Category::Weapons);
        assert_eq!(output.categories.len(), 1);
        assert_eq!(output.categories[0].category, Category::Constructions);
    }

    #[test]
    fn unlock_overrides_apply_after_dedup() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path());
        let overrides = dir.path().join("unlock_overrides.json");
        write_json(
            &overrides,
            json!({"Oak Bench": {
                "campaign": "Found in the Westgate",
                "sandbox": "Available from the start"
            }}),
        );

        let mut config = PipelineConfig::new(dir.path());
        config.categories = vec![Category::Constructions];
        config.unlock_overrides = Some(overrides);
        let output = run(&config, GameData::standard()).unwrap();

        let bench = output.categories[0]
            .entities
            .iter()
            .find(|e| e.display_name == "Oak Bench")
            .unwrap();
        assert_eq!(
            bench.campaign_unlock_override.as_deref(),
            Some("Found in the Westgate")
        );
        assert_eq!(
            bench.sandbox_unlock_override.as_deref(),
            Some("Available from the start")
        );
    }

    #[test]
    fn missing_strings_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::new(dir.path());
        assert!(run(&config, GameData::standard()).is_err());
    }
}
