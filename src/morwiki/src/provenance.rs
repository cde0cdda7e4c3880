//! DLC ownership and building-set classification.
//!
//! Two signal sources exist for DLC: the entitlement table (authoritative
//! when a row is listed) and asset-path scanning (fallback). Set
//! membership is an ordered rule scan where the first match wins; rule
//! order encodes priority between overlapping patterns.

use std::collections::HashMap;

use serde::Serialize;

use crate::gamedata::GameData;
use crate::property::{self, RawRecord};
use crate::tables::TableDocument;

/// Where an entity comes from: base game, a DLC, and/or a purchasable
/// building set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Provenance {
    /// Short DLC key (`Beorn`, `DurinsFolk`, ...), absent for base game.
    pub dlc: Option<String>,
    /// Storefront title for the DLC.
    pub dlc_title: Option<String>,
    pub set_name: Option<String>,
}

/// Entitlement table: each DLC row lists the construction rows it grants.
/// Returns `construction internal name -> short DLC key`.
pub fn load_entitlements(doc: &TableDocument) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for row in &doc.rows {
        let Some(constructions) = row.property("Constructions") else {
            continue;
        };
        for name in property::row_names(constructions) {
            map.insert(name, row.name.clone());
        }
    }
    map
}

/// Classify one record.
///
/// DLC priority: entitlement entry, then asset paths. A `/DLC/{pack}/`
/// path segment names the pack directly; otherwise the known fragments
/// are scanned anywhere in the path (some packs ship assets outside the
/// DLC directory).
pub fn classify(
    internal_name: &str,
    display_name: Option<&str>,
    asset_paths: &[Option<&str>],
    entitlements: &HashMap<String, String>,
    game: &GameData,
) -> Provenance {
    let dlc = entitlements
        .get(internal_name)
        .cloned()
        .or_else(|| dlc_from_paths(asset_paths, game));
    let dlc_title = dlc
        .as_deref()
        .and_then(|key| game.dlc_title(key))
        .map(String::from);
    let set_name = determine_set(internal_name, display_name, dlc.as_deref(), game);

    Provenance {
        dlc,
        dlc_title,
        set_name,
    }
}

fn dlc_from_paths(asset_paths: &[Option<&str>], game: &GameData) -> Option<String> {
    for path in asset_paths.iter().flatten() {
        if let Some(rest) = path.split("/DLC/").nth(1) {
            let pack = rest.split('/').next().unwrap_or(rest);
            if let Some(key) = game.dlc_from_fragment(pack) {
                return Some(key.to_string());
            }
            // Unknown pack directories still mark the entity as DLC.
            if !pack.is_empty() {
                return Some(pack.to_string());
            }
        }
        if let Some(key) = game.dlc_from_fragment(path) {
            return Some(key.to_string());
        }
    }
    None
}

/// First matching set rule wins; later rules are never evaluated.
pub fn determine_set(
    internal_name: &str,
    display_name: Option<&str>,
    dlc: Option<&str>,
    game: &GameData,
) -> Option<String> {
    for rule in &game.set_rules {
        let mut matched = false;

        if let Some(pattern) = &rule.pattern {
            if contains_pattern(internal_name, display_name, pattern) {
                let excluded = rule
                    .exclude
                    .iter()
                    .any(|ex| contains_pattern(internal_name, display_name, ex));
                if !excluded {
                    matched = true;
                }
            }
        }

        if let Some(rule_dlc) = &rule.dlc {
            if dlc == Some(rule_dlc.as_str()) {
                matched = true;
            }
        }

        if matched {
            return Some(rule.name.clone());
        }
    }
    None
}

fn contains_pattern(internal_name: &str, display_name: Option<&str>, pattern: &str) -> bool {
    internal_name.contains(pattern) || display_name.is_some_and(|d| d.contains(pattern))
}

/// Actor and icon paths of a record, the usual DLC evidence.
pub fn record_asset_paths(record: &RawRecord) -> (Option<String>, Option<String>) {
    (
        record.asset_path("Actor").map(String::from),
        record.asset_path("Icon").map(String::from),
    )
}
