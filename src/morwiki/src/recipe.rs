//! Recipe records, the naming-variant index, and the join fallbacks.
//!
//! Recipe rows key themselves inconsistently: by the entity they produce,
//! by their own row name, by a category-prefixed result handle, or by a
//! size-suffixed family of rows. One [`RecipeRecord`] is therefore indexed
//! under every naming variant it answers to, and joining tries an ordered
//! list of key constructions until one hits.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::gamedata::GameData;
use crate::property::{self, row_name, row_names, strip_enum_prefix, RawRecord};
use crate::strings::StringCatalog;
use crate::tables::TableDocument;

/// How a recipe becomes available to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnlockKind {
    Manual,
    CollectFragments,
    DiscoverDependencies,
    #[default]
    Unknown,
}

impl UnlockKind {
    /// Parse the wire enum (`EMorRecipeUnlockType::FragmentCollection`);
    /// unrecognized values degrade to `Unknown` rather than erroring.
    pub fn parse(wire: &str) -> Self {
        match strip_enum_prefix(wire) {
            "Manual" => UnlockKind::Manual,
            "FragmentCollection" | "CollectFragments" => UnlockKind::CollectFragments,
            "DiscoverDependencies" => UnlockKind::DiscoverDependencies,
            _ => UnlockKind::Unknown,
        }
    }

    pub fn is_known(self) -> bool {
        self != UnlockKind::Unknown
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UnlockSpec {
    pub kind: UnlockKind,
    pub fragments: u32,
    pub required_items: Vec<String>,
    pub required_constructions: Vec<String>,
    pub required_fragments: Vec<String>,
}

impl UnlockSpec {
    /// Parse a `DefaultUnlocks` / `SandboxUnlocks` struct value.
    fn from_value(value: &Value) -> Self {
        let mut spec = UnlockSpec::default();
        if let Some(kind) = property::value_in(value, "UnlockType").and_then(Value::as_str) {
            spec.kind = UnlockKind::parse(kind);
        }
        if let Some(count) = property::value_in(value, "NumFragments").and_then(Value::as_u64) {
            spec.fragments = count as u32;
        }
        if let Some(items) = property::value_in(value, "UnlockRequiredItems") {
            spec.required_items = row_names(items);
        }
        if let Some(constructions) = property::value_in(value, "UnlockRequiredConstructions") {
            spec.required_constructions = row_names(constructions);
        }
        if let Some(fragments) = property::value_in(value, "UnlockRequiredFragments") {
            spec.required_fragments = row_names(fragments);
        }
        spec
    }
}

/// One recipe row, extracted from either recipe table.
#[derive(Debug, Clone, Default)]
pub struct RecipeRecord {
    pub recipe_name: String,
    /// Entity the recipe produces, when the row says so explicitly
    /// (`ResultItemHandle` / `ResultConstructionHandle`).
    pub result_key: Option<String>,
    pub result_count: u32,
    pub craft_time: f64,
    pub tier: u32,
    /// Raw station keys, in row order.
    pub stations: Vec<String>,
    /// Raw `(material key, count)` pairs, in row order.
    pub materials: Vec<(String, u32)>,
    pub sandbox_materials: Vec<(String, u32)>,
    pub campaign: UnlockSpec,
    pub sandbox: UnlockSpec,
    pub has_sandbox_override: bool,
    // Construction-recipe placement data.
    pub build_process: Option<String>,
    pub location_requirement: Option<String>,
    pub placement_type: Option<String>,
    pub monument_type: Option<String>,
    pub on_wall: Option<bool>,
    pub on_floor: Option<bool>,
    pub on_water: Option<bool>,
}

impl RecipeRecord {
    pub fn from_record(record: &RawRecord) -> Self {
        let mut recipe = RecipeRecord {
            recipe_name: record.name.clone(),
            result_count: 1,
            ..RecipeRecord::default()
        };

        recipe.result_key = record
            .property("ResultItemHandle")
            .or_else(|| record.property("ResultConstructionHandle"))
            .and_then(row_name)
            .map(String::from);
        if let Some(count) = record.u32_property("ResultItemCount") {
            recipe.result_count = count;
        }
        // Older exports used CraftTime; newer ones CraftTimeSeconds.
        recipe.craft_time = record
            .f64_property("CraftTimeSeconds")
            .or_else(|| record.f64_property("CraftTime"))
            .unwrap_or(0.0);
        recipe.tier = parse_tier(record);
        recipe.stations = parse_stations(record);
        recipe.materials = parse_materials(record.property("DefaultRequiredMaterials"));
        if recipe.materials.is_empty() {
            recipe.materials = parse_materials(record.property("CraftingMaterials"));
        }
        recipe.sandbox_materials = parse_materials(record.property("SandboxRequiredMaterials"));

        if let Some(unlocks) = record.property("DefaultUnlocks") {
            recipe.campaign = UnlockSpec::from_value(unlocks);
        }
        if let Some(unlocks) = record.property("SandboxUnlocks") {
            recipe.sandbox = UnlockSpec::from_value(unlocks);
        }
        // Legacy flat layout kept the unlock type at the top level.
        if !recipe.campaign.kind.is_known() {
            if let Some(kind) = record.str_property("UnlockType") {
                recipe.campaign.kind = UnlockKind::parse(kind);
            }
            if let Some(count) = record.u32_property("FragmentsRequired") {
                recipe.campaign.fragments = count;
            }
        }
        recipe.has_sandbox_override = record
            .bool_property("bHasSandboxUnlockOverride")
            .unwrap_or(false);

        recipe.build_process = record.enum_property("BuildProcess").map(String::from);
        recipe.location_requirement = record
            .enum_property("LocationRequirement")
            .map(String::from);
        recipe.placement_type = record.enum_property("PlacementType").map(String::from);
        recipe.monument_type = record.enum_property("MonumentType").map(String::from);
        recipe.on_wall = record.bool_property("bOnWall");
        recipe.on_floor = record.bool_property("bOnFloor");
        recipe.on_water = record.bool_property("bPlaceOnWater");

        recipe.inherit_sandbox_from_campaign();
        recipe
    }

    /// Sandbox inherits campaign when absent: recipes without a sandbox
    /// override, or whose sandbox kind stayed `Unknown` while campaign's
    /// is known, take campaign's kind and fragment count. Required-item
    /// lists are left alone; an empty sandbox list already falls back to
    /// campaign at render time.
    fn inherit_sandbox_from_campaign(&mut self) {
        if !self.campaign.kind.is_known() {
            return;
        }
        if !self.has_sandbox_override || !self.sandbox.kind.is_known() {
            self.sandbox.kind = self.campaign.kind;
            self.sandbox.fragments = self.campaign.fragments;
        }
    }

    /// Key the record answers to under every naming convention: result
    /// handle, row name, lowercase, and normalized forms.
    fn index_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        let mut push = |key: String| {
            if !key.is_empty() && !keys.contains(&key) {
                keys.push(key);
            }
        };
        for base in [Some(&self.recipe_name), self.result_key.as_ref()]
            .into_iter()
            .flatten()
        {
            push(base.clone());
            push(base.to_lowercase());
            push(normalize_key(base));
        }
        keys
    }
}

fn parse_tier(record: &RawRecord) -> u32 {
    match record.property("Tier") {
        Some(Value::String(text)) => text
            .trim_start_matches("Tier")
            .parse()
            .unwrap_or(0),
        Some(value) => value.as_u64().unwrap_or(0) as u32,
        None => 0,
    }
}

/// Station handles live under `CraftingStations` (item recipes) or
/// `DefaultRequiredConstructions` (older construction recipes); each entry
/// is a handle struct with a `RowName`, legacy rows used a bare `Row`.
fn parse_stations(record: &RawRecord) -> Vec<String> {
    let value = record
        .property("CraftingStations")
        .or_else(|| record.property("DefaultRequiredConstructions"));
    let Some(entries) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let props = entry.get("Value")?;
            property::value_in(props, "RowName")
                .or_else(|| property::value_in(props, "Row"))
                .and_then(Value::as_str)
                .map(String::from)
        })
        .collect()
}

/// Material entries carry a `MaterialHandle` (with `RowName`) or a legacy
/// bare `Row`, plus a `Count`. Rune rows embed the same shape directly in
/// their record, so the resolver reuses this parser.
pub(crate) fn parse_materials(value: Option<&Value>) -> Vec<(String, u32)> {
    let Some(entries) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let props = entry.get("Value")?;
            let key = property::value_in(props, "MaterialHandle")
                .and_then(row_name)
                .or_else(|| property::value_in(props, "Row").and_then(Value::as_str))?;
            let count = property::value_in(props, "Count")
                .and_then(Value::as_u64)
                .unwrap_or(1) as u32;
            Some((key.to_string(), count))
        })
        .collect()
}

/// Lowercased key with `_`, spaces, and hyphens stripped; the loosest
/// naming convention item recipes are matched under.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | ' ' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// All recipes of one table, reachable under every naming variant.
/// Built once, read-only afterwards. Variant collisions keep the
/// last-indexed record, matching the source tables' own override habit.
#[derive(Debug, Default)]
pub struct RecipeIndex {
    records: Vec<RecipeRecord>,
    by_key: HashMap<String, usize>,
}

impl RecipeIndex {
    pub fn from_table(doc: &TableDocument) -> Self {
        let mut index = RecipeIndex::default();
        for row in &doc.rows {
            index.insert(RecipeRecord::from_record(row));
        }
        index
    }

    pub fn insert(&mut self, recipe: RecipeRecord) {
        let idx = self.records.len();
        for key in recipe.index_keys() {
            self.by_key.insert(key, idx);
        }
        self.records.push(recipe);
    }

    pub fn get(&self, key: &str) -> Option<&RecipeRecord> {
        self.by_key.get(key).map(|&idx| &self.records[idx])
    }

    pub fn get_normalized(&self, name: &str) -> Option<&RecipeRecord> {
        self.get(&normalize_key(name))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecipeRecord> {
        self.records.iter()
    }
}

/// Key-construction scheme for joining an entity to its recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStrategy {
    /// `{prefix}.{internal name}`, the result-handle convention gear
    /// recipes use (`Weapon.`, `Tool.`, `Armor.`, `ThrowLight.`).
    Prefixed(&'static str),
    /// Exact row name, then its lowercase form.
    Exact,
    /// Normalized name, plus the ingot aliases item naming drifted
    /// through (`...SteelIngot` rows vs `...Ingot` recipes, `Alloy` vs
    /// `Metal`).
    Normalized,
    /// Size-suffixed recipe families (brews).
    Tiered,
}

/// A successful join: the base recipe, plus the size family for tiered
/// producers.
#[derive(Debug)]
pub struct RecipeJoin<'a> {
    pub recipe: &'a RecipeRecord,
    pub sizes: Option<SizeFamily<'a>>,
}

/// The Small/Medium/Massive rows of one tiered recipe.
#[derive(Debug)]
pub struct SizeFamily<'a> {
    pub small: Option<&'a RecipeRecord>,
    pub medium: Option<&'a RecipeRecord>,
    pub massive: Option<&'a RecipeRecord>,
}

pub const SIZE_SUFFIXES: [&str; 3] = ["Small", "Medium", "Massive"];

impl<'a> SizeFamily<'a> {
    fn probe(index: &'a RecipeIndex, base: &str) -> Option<Self> {
        let [small, medium, massive] =
            SIZE_SUFFIXES.map(|size| index.get_normalized(&format!("{base}_{size}")));
        if small.is_none() && medium.is_none() && massive.is_none() {
            return None;
        }
        Some(SizeFamily {
            small,
            medium,
            massive,
        })
    }

    fn any(&self) -> Option<&'a RecipeRecord> {
        self.small.or(self.medium).or(self.massive)
    }

    /// Combine the family's material lists into one per-size breakdown,
    /// keyed in first-appearance order.
    pub fn combined_materials(&self) -> Vec<(String, [u32; 3])> {
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, [u32; 3]> = HashMap::new();
        for (slot, recipe) in [self.small, self.medium, self.massive].into_iter().enumerate() {
            let Some(recipe) = recipe else { continue };
            for (key, count) in &recipe.materials {
                let entry = counts.entry(key.clone()).or_insert_with(|| {
                    order.push(key.clone());
                    [0; 3]
                });
                entry[slot] = *count;
            }
        }
        order
            .into_iter()
            .map(|key| {
                let counts = counts[&key];
                (key, counts)
            })
            .collect()
    }
}

/// Join an entity to its recipe. `None` is a normal outcome: the entity is
/// simply not craftable.
pub fn join_recipe<'a>(
    index: &'a RecipeIndex,
    internal_name: &str,
    strategy: JoinStrategy,
) -> Option<RecipeJoin<'a>> {
    match strategy {
        JoinStrategy::Prefixed(prefix) => index
            .get(&format!("{prefix}.{internal_name}"))
            .map(RecipeJoin::plain),
        JoinStrategy::Exact => index
            .get(internal_name)
            .or_else(|| index.get(&internal_name.to_lowercase()))
            .map(RecipeJoin::plain),
        JoinStrategy::Normalized => {
            let normalized = normalize_key(internal_name);
            index
                .get(&normalized)
                .or_else(|| ingot_alias(&normalized, "steel", "").and_then(|alt| index.get(&alt)))
                .or_else(|| {
                    ingot_alias(&normalized, "alloy", "metal").and_then(|alt| index.get(&alt))
                })
                .map(RecipeJoin::plain)
        }
        JoinStrategy::Tiered => join_tiered(index, internal_name),
    }
}

/// Tiered join: direct size probes first, then the separator-stripped
/// scheme (covered by normalized keys), then a fuzzy scan that recovers
/// the family's base name from any size-marked recipe containing the
/// entity's name. A plain-keyed recipe still wins if no family exists.
fn join_tiered<'a>(index: &'a RecipeIndex, internal_name: &str) -> Option<RecipeJoin<'a>> {
    if let Some(join) = SizeFamily::probe(index, internal_name).and_then(RecipeJoin::tiered) {
        return Some(join);
    }

    let normalized = normalize_key(internal_name);
    let fuzzy_base = index.iter().find_map(|recipe| {
        let candidate = normalize_key(&recipe.recipe_name);
        if !candidate.contains(&normalized) {
            return None;
        }
        SIZE_SUFFIXES.iter().find_map(|size| {
            candidate
                .strip_suffix(&size.to_lowercase())
                .map(|base| base.trim_end_matches(['_', ' ']).to_string())
        })
    });
    if let Some(base) = fuzzy_base {
        if let Some(join) = SizeFamily::probe(index, &base).and_then(RecipeJoin::tiered) {
            return Some(join);
        }
    }

    index
        .get(internal_name)
        .or_else(|| index.get_normalized(internal_name))
        .map(RecipeJoin::plain)
}

impl<'a> RecipeJoin<'a> {
    fn plain(recipe: &'a RecipeRecord) -> Self {
        RecipeJoin {
            recipe,
            sizes: None,
        }
    }

    fn tiered(sizes: SizeFamily<'a>) -> Option<Self> {
        let recipe = sizes.any()?;
        Some(RecipeJoin {
            recipe,
            sizes: Some(sizes),
        })
    }
}

/// Alias probe for ingot rows whose recipes dropped or renamed a word.
fn ingot_alias(normalized: &str, from: &str, to: &str) -> Option<String> {
    if normalized.contains(from) && normalized.contains("ingot") {
        Some(normalized.replace(from, to))
    } else {
        None
    }
}

static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("camel boundary regex"));

/// `QualityWood` -> `Quality Wood`.
pub fn camel_split(text: &str) -> String {
    CAMEL_BOUNDARY.replace_all(text, "$1 $2").into_owned()
}

/// Display name for a crafting-station key: explicit station table first,
/// then the raw key with its prefix stripped and camel-case split.
pub fn station_display_name(station_key: &str, catalog: &StringCatalog, game: &GameData) -> String {
    if let Some(string_key) = game.station_string_key(station_key) {
        if let Some(text) = catalog.lookup(string_key) {
            return text.to_string();
        }
    }
    let bare = station_key.trim_start_matches("CraftingStation_");
    camel_split(bare)
}

/// Display name for a material key, through the layered lookup: special
/// cases, reversed-prefix probes, the ordered key patterns, a whole-
/// catalog suffix search, then the cleaned-up key itself.
pub fn material_display_name(
    material_key: &str,
    catalog: &StringCatalog,
    game: &GameData,
) -> String {
    if let Some(name) = game.material_override(material_key) {
        return name.to_string();
    }

    // `Ore.Copper` keys its string as `CopperOre`; probe the reversal.
    if let Some((prefix, suffix)) = material_key.split_once('.') {
        let reversed = format!("{suffix}{prefix}");
        for pattern in [
            format!("Items.Ores.{reversed}.Name"),
            format!("Items.Items.{reversed}.Name"),
            format!("{prefix}s.{reversed}.Name"),
        ] {
            if let Some(text) = catalog.lookup(&pattern) {
                return text.to_string();
            }
        }
    }

    let patterns = [
        format!("Items.Items.{material_key}.Name"),
        format!("Items.Ores.{material_key}.Name"),
        format!("Consumable.{material_key}.Name"),
        format!("Category.Item.{material_key}"),
        format!("Item.{material_key}.Name"),
        material_key.to_string(),
    ];
    for pattern in &patterns {
        if let Some(text) = catalog.lookup(pattern) {
            return text.to_string();
        }
    }

    // Suffix search on the bare key, then on the longer patterns. Short
    // suffixes skip the scan; `.Iron.Name` would match the wrong rows.
    let bare = material_key.rsplit('.').next().unwrap_or(material_key);
    if let Some(text) = catalog.find_by_suffix(&format!(".{bare}.Name")) {
        return text.to_string();
    }
    for pattern in &patterns {
        let segments: Vec<&str> = pattern.split('.').collect();
        if segments.len() >= 3 {
            let suffix = segments[segments.len() - 2..].join(".");
            if let Some(text) = catalog.find_by_suffix(&suffix) {
                return text.to_string();
            }
        }
    }

    let cleaned = material_key
        .replace("Item.", "")
        .replace("Ore.", "")
        .replace('_', " ");
    camel_split(&cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recipe_row(name: &str, props: Value) -> RawRecord {
        RawRecord::new(name, props)
    }

    fn unlock_struct(kind: &str, fragments: u32) -> Value {
        json!([
            {"Name": "UnlockType", "Value": format!("EMorRecipeUnlockType::{kind}")},
            {"Name": "NumFragments", "Value": fragments}
        ])
    }

    fn material(key: &str, count: u32) -> Value {
        json!({"Name": "0", "Value": [
            {"Name": "MaterialHandle", "Value": [{"Name": "RowName", "Value": key}]},
            {"Name": "Count", "Value": count}
        ]})
    }

    #[test]
    fn extracts_recipe_fields() {
        let row = recipe_row(
            "Weapon.Sword_Iron",
            json!([
                {"Name": "ResultItemHandle", "Value": [{"Name": "RowName", "Value": "Sword_Iron"}]},
                {"Name": "CraftTimeSeconds", "Value": 12.0},
                {"Name": "Tier", "Value": "Tier3"},
                {"Name": "CraftingStations", "Value": [
                    {"Name": "0", "Value": [{"Name": "RowName", "Value": "CraftingStation_BasicForge"}]}
                ]},
                {"Name": "DefaultRequiredMaterials", "Value": [material("Item.IronIngot", 4)]},
                {"Name": "DefaultUnlocks", "Value": unlock_struct("FragmentCollection", 3)},
                {"Name": "bHasSandboxUnlockOverride", "Value": true},
                {"Name": "SandboxUnlocks", "Value": unlock_struct("DiscoverDependencies", 0)}
            ]),
        );
        let recipe = RecipeRecord::from_record(&row);

        assert_eq!(recipe.result_key.as_deref(), Some("Sword_Iron"));
        assert_eq!(recipe.craft_time, 12.0);
        assert_eq!(recipe.tier, 3);
        assert_eq!(recipe.stations, vec!["CraftingStation_BasicForge"]);
        assert_eq!(recipe.materials, vec![("Item.IronIngot".to_string(), 4)]);
        assert_eq!(recipe.campaign.kind, UnlockKind::CollectFragments);
        assert_eq!(recipe.campaign.fragments, 3);
        assert_eq!(recipe.sandbox.kind, UnlockKind::DiscoverDependencies);
    }

    #[test]
    fn sandbox_inherits_campaign_when_unknown() {
        let row = recipe_row(
            "Axe_Iron",
            json!([
                {"Name": "DefaultUnlocks", "Value": unlock_struct("FragmentCollection", 3)},
                {"Name": "bHasSandboxUnlockOverride", "Value": true},
                {"Name": "SandboxUnlocks", "Value": unlock_struct("Unknown", 0)}
            ]),
        );
        let recipe = RecipeRecord::from_record(&row);
        assert_eq!(recipe.sandbox.kind, UnlockKind::CollectFragments);
        assert_eq!(recipe.sandbox.fragments, 3);
    }

    #[test]
    fn sandbox_inherits_campaign_without_override() {
        let row = recipe_row(
            "Axe_Iron",
            json!([
                {"Name": "DefaultUnlocks", "Value": unlock_struct("Manual", 0)},
                {"Name": "bHasSandboxUnlockOverride", "Value": false},
                {"Name": "SandboxUnlocks", "Value": unlock_struct("FragmentCollection", 9)}
            ]),
        );
        let recipe = RecipeRecord::from_record(&row);
        assert_eq!(recipe.sandbox.kind, UnlockKind::Manual);
        assert_eq!(recipe.sandbox.fragments, 0);
    }

    #[test]
    fn sandbox_override_with_known_kind_is_kept() {
        let row = recipe_row(
            "Axe_Iron",
            json!([
                {"Name": "DefaultUnlocks", "Value": unlock_struct("Manual", 0)},
                {"Name": "bHasSandboxUnlockOverride", "Value": true},
                {"Name": "SandboxUnlocks", "Value": unlock_struct("FragmentCollection", 9)}
            ]),
        );
        let recipe = RecipeRecord::from_record(&row);
        assert_eq!(recipe.sandbox.kind, UnlockKind::CollectFragments);
        assert_eq!(recipe.sandbox.fragments, 9);
    }

    fn index_of(rows: Vec<RawRecord>) -> RecipeIndex {
        let mut index = RecipeIndex::default();
        for row in rows {
            index.insert(RecipeRecord::from_record(&row));
        }
        index
    }

    #[test]
    fn prefixed_join() {
        let index = index_of(vec![recipe_row(
            "Weapon.Sword_Iron",
            json!([{"Name": "CraftTimeSeconds", "Value": 5.0}]),
        )]);
        assert!(join_recipe(&index, "Sword_Iron", JoinStrategy::Prefixed("Weapon")).is_some());
        assert!(join_recipe(&index, "Axe_Iron", JoinStrategy::Prefixed("Weapon")).is_none());
    }

    #[test]
    fn exact_join_falls_back_to_lowercase() {
        let index = index_of(vec![recipe_row("bench_oak", json!([]))]);
        assert!(join_recipe(&index, "Bench_Oak", JoinStrategy::Exact).is_some());
    }

    #[test]
    fn exact_join_follows_result_handle() {
        // A recipe row named differently from the construction it builds
        // must be reachable under the result name.
        let index = index_of(vec![recipe_row(
            "Beorn_Roof_A",
            json!([{"Name": "ResultConstructionHandle",
                    "Value": [{"Name": "RowName", "Value": "BP_Beorn_RoofTile_A"}]}]),
        )]);
        assert!(join_recipe(&index, "BP_Beorn_RoofTile_A", JoinStrategy::Exact).is_some());
    }

    #[test]
    fn normalized_join_and_ingot_aliases() {
        let index = index_of(vec![
            recipe_row("Nogrod_Ingot", json!([])),
            recipe_row("StarMetalIngot", json!([])),
        ]);
        assert!(join_recipe(&index, "NogrodSteelIngot", JoinStrategy::Normalized).is_some());
        assert!(join_recipe(&index, "StarAlloyIngot", JoinStrategy::Normalized).is_some());
        assert!(join_recipe(&index, "VoidIngot", JoinStrategy::Normalized).is_none());
    }

    #[test]
    fn tiered_join_combines_sizes() {
        let index = index_of(vec![
            recipe_row(
                "Night_Brew_Small",
                json!([{"Name": "DefaultRequiredMaterials", "Value": [material("Item.Grabapple", 3)]}]),
            ),
            recipe_row(
                "Night_Brew_Medium",
                json!([{"Name": "DefaultRequiredMaterials", "Value": [material("Item.Grabapple", 6)]}]),
            ),
            recipe_row(
                "Night_Brew_Massive",
                json!([{"Name": "DefaultRequiredMaterials", "Value": [
                    material("Item.Grabapple", 9), material("Item.Hops", 2)
                ]}]),
            ),
        ]);

        let join = join_recipe(&index, "Night_Brew", JoinStrategy::Tiered).unwrap();
        let sizes = join.sizes.expect("tiered join");
        assert!(sizes.small.is_some() && sizes.medium.is_some() && sizes.massive.is_some());

        let combined = sizes.combined_materials();
        assert_eq!(
            combined,
            vec![
                ("Item.Grabapple".to_string(), [3, 6, 9]),
                ("Item.Hops".to_string(), [0, 0, 2]),
            ]
        );
    }

    #[test]
    fn tiered_join_fuzzy_recovers_base_name() {
        // Recipe family keyed without the brew's separators; the fuzzy
        // scan must find the family from the size-marked row.
        let index = index_of(vec![
            recipe_row("KingsBrew_Small", json!([])),
            recipe_row("KingsBrew_Medium", json!([])),
        ]);
        let join = join_recipe(&index, "Kings_Brew", JoinStrategy::Tiered).unwrap();
        let sizes = join.sizes.expect("tiered join");
        assert!(sizes.small.is_some());
        assert!(sizes.medium.is_some());
        assert!(sizes.massive.is_none());
    }

    #[test]
    fn tiered_join_without_recipes_is_none() {
        let index = index_of(vec![recipe_row("Ale_Small", json!([]))]);
        assert!(join_recipe(&index, "Night_Brew", JoinStrategy::Tiered).is_none());
    }

    #[test]
    fn station_display_uses_map_then_camel_split() {
        let mut catalog = StringCatalog::new();
        catalog.insert("Constructions.BasicForge", "Forge");
        let game = GameData::standard();

        assert_eq!(
            station_display_name("CraftingStation_BasicForge", &catalog, game),
            "Forge"
        );
        assert_eq!(
            station_display_name("CraftingStation_BoneCarver", &catalog, game),
            "Bone Carver"
        );
    }

    #[test]
    fn material_display_layers() {
        let mut catalog = StringCatalog::new();
        catalog.insert("Items.Ores.CopperOre.Name", "Copper Ore");
        catalog.insert("Items.Items.QualityWood.Name", "Elven Wood");
        catalog.insert("Deep.Nested.Ubasam.Name", "Ubasam Wood");
        let game = GameData::standard();

        // Special-case table.
        assert_eq!(
            material_display_name("Item.Scrap", &catalog, game),
            "Metal Fragments"
        );
        // Reversed-prefix probe: Ore.Copper -> CopperOre.
        assert_eq!(
            material_display_name("Ore.Copper", &catalog, game),
            "Copper Ore"
        );
        // Suffix search on the bare key segment.
        assert_eq!(
            material_display_name("Item.QualityWood", &catalog, game),
            "Elven Wood"
        );
        // Whole-catalog suffix search.
        assert_eq!(
            material_display_name("Item.Ubasam", &catalog, game),
            "Ubasam Wood"
        );
        // Cleaned-up fallback.
        assert_eq!(
            material_display_name("Item.RawMeat", &catalog, game),
            "Raw Meat"
        );
    }

    #[test]
    fn normalize_key_strips_separators() {
        assert_eq!(normalize_key("Night_Brew-X Y"), "nightbrewxy");
    }
}
