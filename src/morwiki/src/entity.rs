//! Canonical entity model and the per-category table wiring.

use serde::Serialize;

use crate::provenance::Provenance;
use crate::recipe::{JoinStrategy, UnlockSpec};

/// Source table categories the pipeline knows how to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Constructions,
    Items,
    Weapons,
    Armor,
    Tools,
    Brews,
    Consumables,
    Ores,
    Runes,
    Storage,
    TradeGoods,
}

impl Category {
    pub const ALL: &'static [Category] = &[
        Category::Constructions,
        Category::Items,
        Category::Weapons,
        Category::Armor,
        Category::Tools,
        Category::Brews,
        Category::Consumables,
        Category::Ores,
        Category::Runes,
        Category::Storage,
        Category::TradeGoods,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Constructions => "constructions",
            Self::Items => "items",
            Self::Weapons => "weapons",
            Self::Armor => "armor",
            Self::Tools => "tools",
            Self::Brews => "brews",
            Self::Consumables => "consumables",
            Self::Ores => "ores",
            Self::Runes => "runes",
            Self::Storage => "storage",
            Self::TradeGoods => "tradegoods",
        }
    }

    /// Table wiring for this category.
    pub fn spec(self) -> CategorySpec {
        match self {
            Self::Constructions => CategorySpec {
                category: self,
                data_files: &["DT_Constructions.json"],
                recipe_file: Some("DT_ConstructionRecipes.json"),
                join: Some(JoinStrategy::Exact),
                // Constructions without a recipe cannot be built; they are
                // unreachable leftovers, not found objects.
                allow_recipeless: false,
            },
            Self::Items => CategorySpec {
                category: self,
                data_files: &["DT_Items.json"],
                recipe_file: Some("DT_ItemRecipes.json"),
                join: Some(JoinStrategy::Normalized),
                allow_recipeless: true,
            },
            Self::Weapons => CategorySpec {
                category: self,
                data_files: &["DT_Weapons.json"],
                recipe_file: Some("DT_ItemRecipes.json"),
                join: Some(JoinStrategy::Prefixed("Weapon")),
                allow_recipeless: true,
            },
            Self::Armor => CategorySpec {
                category: self,
                data_files: &["DT_Armor.json"],
                recipe_file: Some("DT_ItemRecipes.json"),
                join: Some(JoinStrategy::Prefixed("Armor")),
                allow_recipeless: true,
            },
            Self::Tools => CategorySpec {
                category: self,
                data_files: &["DT_Tools.json", "DT_ThrowLights.json"],
                recipe_file: Some("DT_ItemRecipes.json"),
                join: Some(JoinStrategy::Prefixed("Tool")),
                allow_recipeless: true,
            },
            Self::Brews => CategorySpec {
                category: self,
                data_files: &["DT_Brews.json"],
                recipe_file: Some("DT_ItemRecipes.json"),
                join: Some(JoinStrategy::Tiered),
                allow_recipeless: true,
            },
            Self::Consumables => CategorySpec {
                category: self,
                data_files: &["DT_Consumables.json"],
                recipe_file: Some("DT_ItemRecipes.json"),
                join: Some(JoinStrategy::Exact),
                allow_recipeless: true,
            },
            Self::Ores => CategorySpec {
                category: self,
                data_files: &["DT_Ores.json"],
                recipe_file: Some("DT_ItemRecipes.json"),
                join: Some(JoinStrategy::Exact),
                allow_recipeless: true,
            },
            Self::Runes => CategorySpec {
                category: self,
                data_files: &["DT_Runes.json"],
                recipe_file: None,
                join: None,
                allow_recipeless: true,
            },
            Self::Storage => CategorySpec {
                category: self,
                data_files: &["DT_Storage.json"],
                recipe_file: Some("DT_ItemRecipes.json"),
                join: Some(JoinStrategy::Exact),
                allow_recipeless: true,
            },
            Self::TradeGoods => CategorySpec {
                category: self,
                data_files: &["DT_TradeGoods.json"],
                recipe_file: Some("DT_ItemRecipes.json"),
                join: Some(JoinStrategy::Exact),
                allow_recipeless: true,
            },
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.key() == s)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// Which tables feed a category and how its recipes join.
#[derive(Debug, Clone, Copy)]
pub struct CategorySpec {
    pub category: Category,
    /// Data table files merged into one record list (tools also pull
    /// throw-lights).
    pub data_files: &'static [&'static str],
    pub recipe_file: Option<&'static str>,
    pub join: Option<JoinStrategy>,
    /// Whether a recipe-less singleton survives deduplication. Found and
    /// gathered things legitimately have no recipe; buildables do not.
    pub allow_recipeless: bool,
}

impl CategorySpec {
    /// The prefixed join scheme for a record loaded from `data_file`.
    /// Tools and throw-lights share a category but key their recipes
    /// under different prefixes.
    pub fn join_for_file(&self, data_file: &str) -> Option<JoinStrategy> {
        if self.category == Category::Tools && data_file == "DT_ThrowLights.json" {
            return Some(JoinStrategy::Prefixed("ThrowLight"));
        }
        self.join
    }
}

/// A recipe after joining and display-name resolution.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolvedRecipe {
    pub recipe_name: String,
    pub craft_time: f64,
    pub tier: u32,
    /// Station display names, in recipe order.
    pub stations: Vec<String>,
    /// Material display names and counts, in recipe order.
    pub materials: Vec<Material>,
    /// Per-size breakdown for tiered (brew) recipes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_materials: Option<Vec<SizedMaterial>>,
    pub campaign: UnlockSpec,
    pub sandbox: UnlockSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Material {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizedMaterial {
    pub name: String,
    pub small: u32,
    pub medium: u32,
    pub massive: u32,
}

/// Category-specific attributes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryExtras {
    Construction(ConstructionInfo),
    Gear(GearStats),
    Edible(EdibleStats),
    Stockpile(StockpileInfo),
}

/// Placement and categorization data for buildables.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConstructionInfo {
    pub building_type: Option<String>,
    pub building_subtype: Option<String>,
    pub build_process: Option<String>,
    pub placement_type: Option<String>,
    pub location_requirement: Option<String>,
    pub monument_type: Option<String>,
    pub on_wall: Option<bool>,
    pub on_floor: Option<bool>,
    pub on_water: Option<bool>,
    pub sandbox_materials: Vec<Material>,
}

/// Combat and durability stats for weapons, armor, and tools.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GearStats {
    pub damage: f64,
    pub damage_type: Option<String>,
    pub speed: f64,
    pub durability: u32,
    pub tier: Option<String>,
    pub armor: f64,
    pub armor_penetration: f64,
    pub stamina_cost: f64,
    pub energy_cost: f64,
    pub block_damage_reduction: f64,
    pub hand_type: Option<String>,
    pub sub_type: Option<String>,
    pub repair_material: Option<String>,
    pub repair_cost: u32,
}

/// Restore stats and effects for brews and consumables.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EdibleStats {
    pub max_stack_size: Option<u32>,
    pub hunger_restore: Option<f64>,
    pub health_restore: Option<f64>,
    pub energy_restore: Option<f64>,
    pub use_effects: Vec<String>,
    pub item_type: Option<String>,
    pub subtypes: Vec<String>,
    pub notes: Vec<String>,
    pub stats: Vec<String>,
}

/// Inventory attributes for plain items, ores, runes, storage, and trade
/// goods.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StockpileInfo {
    pub max_stack_size: Option<u32>,
    pub slot_size: Option<u32>,
    pub base_trade_value: Option<f64>,
    pub portability: Option<String>,
    /// Materials embedded on the row itself (runes carry their costs
    /// inline instead of through a recipe table).
    pub inline_materials: Vec<Material>,
    pub item_types: Vec<String>,
    pub gathered: bool,
    pub crafting: bool,
    pub building: bool,
    pub brewing: bool,
    pub cooking: bool,
    pub farming: bool,
}

/// Canonical resolved record for one game object.
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    pub internal_name: String,
    pub display_name: String,
    pub category: Category,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub provenance: Provenance,
    /// Present exactly when a recipe joined; recipe-less entities are
    /// non-craftable, never carriers of empty recipe data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe: Option<ResolvedRecipe>,
    pub extras: CategoryExtras,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_unlock_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sandbox_unlock_override: Option<String>,
    /// Suffix label appended during deduplication, when any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disambiguation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_path: Option<String>,
}

/// Why a record was withheld from canonical output. Exclusions are normal
/// outcomes, kept for the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    NoDisplayName,
    NoRecipeData,
    /// A `_V2` sibling replaced this record.
    Superseded,
    /// Internal or display name matched a development-leftover filter.
    NameFilter(String),
    /// Display name still carries template placeholders.
    TemplatePlaceholder,
    Disabled,
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDisplayName => write!(f, "no display name"),
            Self::NoRecipeData => write!(f, "no recipe data"),
            Self::Superseded => write!(f, "superseded"),
            Self::NameFilter(pattern) => write!(f, "name matches '{pattern}'"),
            Self::TemplatePlaceholder => write!(f, "template placeholder in name"),
            Self::Disabled => write!(f, "disabled record"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Exclusion {
    pub internal_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub reason: ExclusionReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_key() {
        for &category in Category::ALL {
            let parsed: Category = category.key().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert!("gadgets".parse::<Category>().is_err());
    }

    #[test]
    fn category_specs_wire_recipe_tables() {
        let weapons = Category::Weapons.spec();
        assert_eq!(weapons.recipe_file, Some("DT_ItemRecipes.json"));
        assert!(matches!(
            weapons.join,
            Some(JoinStrategy::Prefixed("Weapon"))
        ));

        let runes = Category::Runes.spec();
        assert!(runes.recipe_file.is_none());
        assert!(runes.allow_recipeless);

        assert!(!Category::Constructions.spec().allow_recipeless);
    }

    #[test]
    fn throwlights_join_under_their_own_prefix() {
        let tools = Category::Tools.spec();
        assert!(matches!(
            tools.join_for_file("DT_Tools.json"),
            Some(JoinStrategy::Prefixed("Tool"))
        ));
        assert!(matches!(
            tools.join_for_file("DT_ThrowLights.json"),
            Some(JoinStrategy::Prefixed("ThrowLight"))
        ));
    }

    #[test]
    fn exclusion_reasons_format_for_audit_log() {
        assert_eq!(ExclusionReason::Superseded.to_string(), "superseded");
        assert_eq!(
            ExclusionReason::NameFilter("TEST".into()).to_string(),
            "name matches 'TEST'"
        );
    }
}
