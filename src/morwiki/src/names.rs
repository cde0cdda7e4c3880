//! Display-name resolution.
//!
//! Internal row names and string-table keys follow several competing
//! conventions, so resolution is an ordered chain of fallbacks that stops
//! at the first hit. Later steps must never override an earlier success.

use crate::gamedata::GameData;
use crate::property::{text_ref, RawRecord, TextRef};
use crate::strings::StringCatalog;

/// Resolve a record's display name.
///
/// Order: the `DisplayName` property (direct key, text reference, or
/// inline literal), then `_`-prefixed fallback keys, then
/// `CraftingStation_` fallback keys. A resolved name for a
/// material-variant row gets its variant word prepended. `None` means the
/// record has no presentable name and must be excluded, not blank-named.
pub fn resolve_display_name(
    record: &RawRecord,
    catalog: &StringCatalog,
    game: &GameData,
) -> Option<String> {
    let name = &record.name;
    let mut display = resolve_text(record, "DisplayName", catalog);

    if display.is_none() {
        if let Some(stripped) = name.strip_prefix('_') {
            display = first_hit(
                catalog,
                &[
                    format!("{stripped}.Name"),
                    format!("Constructions.{stripped}.Name"),
                ],
            );
        }
    }

    if display.is_none() {
        if let Some(stripped) = name.strip_prefix("CraftingStation_") {
            display = first_hit(
                catalog,
                &[
                    format!("{stripped}.Name"),
                    format!("Constructions.{stripped}"),
                    format!("Constructions.{stripped}.Name"),
                ],
            );
        }
    }

    // Bracketed and underscore-prefixed rows are excluded downstream;
    // prefixing them here would only churn the audit log.
    match display {
        Some(found) if !name.starts_with('[') && !name.starts_with('_') => {
            Some(apply_material_prefix(found, name, game))
        }
        other => other,
    }
}

/// Resolve a text-valued property (`DisplayName`, `Description`) through
/// the catalog.
///
/// Direct keys that miss are retried as a whole-catalog suffix probe on
/// the key's last two segments, which bridges rows whose keys dropped or
/// gained a table prefix between versions.
pub fn resolve_text(record: &RawRecord, property: &str, catalog: &StringCatalog) -> Option<String> {
    let entry = record.property_entry(property)?;
    match text_ref(entry)? {
        TextRef::Literal(text) => Some(text.to_string()),
        TextRef::TableKey(key) => {
            if let Some(text) = catalog.lookup(key) {
                return Some(text.to_string());
            }
            let segments: Vec<&str> = key.split('.').collect();
            if segments.len() >= 2 {
                let suffix = segments[segments.len() - 2..].join(".");
                return catalog.find_by_suffix(&suffix).map(String::from);
            }
            None
        }
    }
}

/// Prepend the material-variant word unless the resolved name already
/// carries it. "Fair Pond" stays "Fair Pond" for a `_WhiteMarble` row;
/// double-prefixing is never valid.
pub fn apply_material_prefix(display: String, internal_name: &str, game: &GameData) -> String {
    let Some(word) = game.material_variant_word(internal_name) else {
        return display;
    };
    if display.to_lowercase().contains(&word.to_lowercase()) {
        return display;
    }
    format!("{word} {display}")
}

fn first_hit(catalog: &StringCatalog, keys: &[String]) -> Option<String> {
    keys.iter()
        .find_map(|key| catalog.lookup(key))
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(name: &str, display_key: Option<&str>) -> RawRecord {
        let props = match display_key {
            Some(key) => json!([{"Name": "DisplayName", "Value": key}]),
            None => json!([]),
        };
        RawRecord::new(name, props)
    }

    #[test]
    fn direct_catalog_hit_wins() {
        let mut catalog = StringCatalog::new();
        catalog.insert("Constructions.BenchOak.Name", "Oak Bench");
        let rec = record("Bench_Oak", Some("Constructions.BenchOak.Name"));

        let name = resolve_display_name(&rec, &catalog, GameData::standard());
        assert_eq!(name.as_deref(), Some("Oak Bench"));
    }

    #[test]
    fn direct_miss_falls_back_to_suffix_probe() {
        let mut catalog = StringCatalog::new();
        catalog.insert("Items.Items.Scrap.Name", "Metal Fragments");
        let rec = record("Scrap", Some("Legacy.Scrap.Name"));

        let name = resolve_display_name(&rec, &catalog, GameData::standard());
        assert_eq!(name.as_deref(), Some("Metal Fragments"));
    }

    #[test]
    fn underscore_prefix_probes_derived_keys() {
        let mut catalog = StringCatalog::new();
        catalog.insert("Constructions.Hearth.Name", "Hearth");
        let rec = record("_Hearth", None);

        let name = resolve_display_name(&rec, &catalog, GameData::standard());
        assert_eq!(name.as_deref(), Some("Hearth"));
    }

    #[test]
    fn station_prefix_probes_bare_variant() {
        let mut catalog = StringCatalog::new();
        catalog.insert("Constructions.Workbench", "Workbench");
        let rec = record("CraftingStation_Workbench", None);

        let name = resolve_display_name(&rec, &catalog, GameData::standard());
        assert_eq!(name.as_deref(), Some("Workbench"));
    }

    #[test]
    fn fallback_never_overrides_direct_hit() {
        let mut catalog = StringCatalog::new();
        catalog.insert("Constructions.Workbench.Name", "Direct Hit");
        catalog.insert("Workbench.Name", "Fallback");
        let rec = record(
            "CraftingStation_Workbench",
            Some("Constructions.Workbench.Name"),
        );

        let name = resolve_display_name(&rec, &catalog, GameData::standard());
        assert_eq!(name.as_deref(), Some("Direct Hit"));
    }

    #[test]
    fn unresolvable_name_is_none() {
        let catalog = StringCatalog::new();
        let rec = record("Mystery", Some("Nothing.Here"));
        assert_eq!(
            resolve_display_name(&rec, &catalog, GameData::standard()),
            None
        );
    }

    #[test]
    fn material_variant_prefixes_once() {
        let game = GameData::standard();
        assert_eq!(
            apply_material_prefix("Pond".into(), "Pond_WhiteMarble", game),
            "Fair Pond"
        );
        // Already-present word, any case, must not double up.
        assert_eq!(
            apply_material_prefix("Fair Pond".into(), "Pond_WhiteMarble", game),
            "Fair Pond"
        );
        assert_eq!(
            apply_material_prefix("fair pond".into(), "Pond_WhiteMarble", game),
            "fair pond"
        );
        assert_eq!(
            apply_material_prefix("Column".into(), "Column_RedSandstone", game),
            "Crimson Column"
        );
    }

    #[test]
    fn culture_invariant_literal_skips_catalog() {
        let catalog = StringCatalog::new();
        let rec = RawRecord::new(
            "Special",
            json!([{
                "Name": "DisplayName",
                "HistoryType": "Base",
                "CultureInvariantString": "Inline Name",
                "Value": "unused"
            }]),
        );
        let name = resolve_display_name(&rec, &catalog, GameData::standard());
        assert_eq!(name.as_deref(), Some("Inline Name"));
    }
}
