//! Fixed lookup tables tuned to the shipped game data.
//!
//! These tables encode dataset quirks, not algorithms: which asset-path
//! fragments mean which DLC, how crafting-station keys map to construction
//! strings, which name collisions disambiguate how. They are carried as an
//! immutable [`GameData`] value passed into every resolver, so tests can
//! swap in small tables and updates track the dataset instead of code.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Short DLC key -> storefront title.
const DLC_TITLES: &[(&str, &str)] = &[
    ("Beorn", "The Beorn's Lodge Pack"),
    ("DurinsFolk", "Durin's Folk Expansion"),
    ("Ent", "The Ent-craft Pack"),
    ("Hobbit", "The Hobbit's Bounty Pack"),
    ("Holiday", "Yule-tide Pack"),
    ("LordOfMoria", "End Game Award"),
    ("OrcHunter", "The Orc Hunter Pack"),
    ("OriginCosmetics", "Return to Moria"),
    ("Rohan", "The Rohirrim Pack"),
];

/// Asset-path fragment -> short DLC key. Several fragments collapse onto
/// one DLC (Elven assets ship in Durin's Folk).
const DLC_PATH_FRAGMENTS: &[(&str, &str)] = &[
    ("BeornPack", "Beorn"),
    ("DurinsFolk", "DurinsFolk"),
    ("Elven", "DurinsFolk"),
    ("EntPack", "Ent"),
    ("HobbitPack", "Hobbit"),
    ("Holiday2025", "Holiday"),
    ("HolidayPack", "Holiday"),
    ("LordOfMoria", "LordOfMoria"),
    ("OrcHunterPack", "OrcHunter"),
    ("OriginCosmetics", "OriginCosmetics"),
    ("RohanPack", "Rohan"),
];

/// Crafting-station key -> construction string-table key. The station keys
/// and the construction strings drifted apart over patches; this map is the
/// reconciliation. Unmapped keys fall back to camel-case splitting.
const STATION_KEYS: &[(&str, &str)] = &[
    // Forges
    ("CraftingStation_BasicForge", "Constructions.BasicForge"),
    ("CraftingStation_AdvancedForge", "Constructions.ForgeAdvanced"),
    ("CraftingStation_FloodedForge", "Constructions.FloodedForge"),
    ("CraftingStation_DurinForge", "Constructions.DurinForge"),
    ("CraftingStation_MithrilForge", "Constructions.MithrilForge"),
    ("CraftingStation_NogrodForge", "Constructions.NogrodForge"),
    ("CraftingStation_LegendayElvishForge", "Constructions.LegendayElvishForge"),
    ("CraftingStation_ForgeUpgrade", "Constructions.ForgeUpgrade"),
    // Furnaces
    ("CraftingStation_BasicFurnace", "Constructions.BasicFurnace"),
    ("CraftingStation_AdvancedFurnace", "Constructions.FurnaceAdvanced"),
    ("CraftingStation_FloodedFurnace", "Constructions.FloodedFurnace.Name"),
    ("CraftingStation_LegendaryDurinsFurnace", "Constructions.LegendayElvishFurnace"),
    ("CraftingStation_LegendaryFloodedFurnace", "Constructions.FloodedFurnace.Name"),
    ("CraftingStation_LegendaryMithrilFurnace", "Constructions.LegendayElvishFurnace"),
    ("CraftingStation_LegendaryNogrodFurnace", "Constructions.LegendayElvishFurnace"),
    ("CraftingStation_LegendayElvishFurnace", "Constructions.LegendayElvishFurnace"),
    ("CraftingStation_FurnaceUpgrade", "Constructions.ForgeUpgrade"),
    // Hearths
    ("CraftingStation_Hearth", "Constructions.Hearth_Small.name"),
    ("CraftingStation_Hearth_SmallHearth", "Constructions.Hearth_Small.name"),
    ("CraftingStation_Hearth_MiniHearth", "Constructions.Hearth_Mini.Name"),
    ("CraftingStation_Hearth_MediumHearth", "Constructions.Hearth_MediumFireplace.Name"),
    ("CraftingStation_Hearth_LargeHearth", "Constructions.Hearth_LargeHearth.Name"),
    // Kitchen stations
    ("CraftingStation_Kitchen", "Constructions.Kitchen_Stove.Name"),
    ("CraftingStation_Kitchen_Stove", "Constructions.Kitchen_Stove.Name"),
    ("CraftingStation_Kitchen_Oven", "Constructions.Kitchen_Oven.Name"),
    ("CraftingStation_Kitchen_PitBBQ", "Constructions.Kitchen_PitBBQ.Name"),
    // Breweries
    ("Brewery_Base", "Constructions.BreweryUpgradeStation.Name"),
    ("Brewery_Small", "Constructions.BreweryUpgradeStation.Name"),
    ("Brewery_Massive", "Constructions.BreweryUpgradeStation.Name"),
    // Campfires
    ("CraftingStation_Campfire", "Constructions.Campfire"),
    ("CraftingStation_Campfire_Sandbox", "Constructions.Campfire"),
    // Other stations
    ("CraftingStation_Workbench", "Constructions.Workbench"),
    ("CraftingStation_MealTable", "Constructions.MealTable"),
    ("CraftingStation_FabricStation", "Constructions.FabricStation.Name"),
    ("CraftingStation_Mill", "Constructions.Mill.Name"),
    ("CraftingStation_PurificationStation", "Constructions.PurificationStation.Name"),
    ("CraftingStation_TintingStation", "Constructions.TintingStation.Name"),
];

/// Material keys whose display names follow no string-table convention.
const MATERIAL_NAMES: &[(&str, &str)] = &[("Item.Scrap", "Metal Fragments")];

/// Internal-name markers for material-variant constructions, with the word
/// the display name carries for that variant.
const MATERIAL_VARIANTS: &[(&str, &str)] =
    &[("_RedSandstone", "Crimson"), ("_WhiteMarble", "Fair")];

/// Substrings that mark development leftovers; records matching any of
/// these never reach output.
const NAME_FILTERS: &[&str] = &[
    "TEST",
    "Test",
    "DEV_",
    "BROKEN",
    "Broken",
    "DISABLED",
    "UNSHIPPABLE",
    "_Backup",
];

#[derive(Debug, Clone)]
pub struct SetRule {
    pub name: String,
    /// Substring that must appear in the internal or display name.
    pub pattern: Option<String>,
    /// Short DLC key the entity must resolve to.
    pub dlc: Option<String>,
    /// Substrings that veto a pattern match.
    pub exclude: Vec<String>,
}

impl SetRule {
    fn pattern(name: &str, pattern: &str, exclude: &[&str]) -> Self {
        SetRule {
            name: name.to_string(),
            pattern: Some(pattern.to_string()),
            dlc: None,
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn dlc(name: &str, dlc: &str) -> Self {
        SetRule {
            name: name.to_string(),
            pattern: None,
            dlc: Some(dlc.to_string()),
            exclude: Vec::new(),
        }
    }
}

/// How a disambiguation rule matches an internal name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    Prefix,
    Contains,
}

#[derive(Debug, Clone)]
pub struct DisambiguationRule {
    pub pattern: String,
    pub matcher: NameMatch,
    /// Parenthetical label appended to the display name.
    pub label: String,
}

impl DisambiguationRule {
    fn prefix(pattern: &str, label: &str) -> Self {
        DisambiguationRule {
            pattern: pattern.to_string(),
            matcher: NameMatch::Prefix,
            label: label.to_string(),
        }
    }

    fn contains(pattern: &str, label: &str) -> Self {
        DisambiguationRule {
            pattern: pattern.to_string(),
            matcher: NameMatch::Contains,
            label: label.to_string(),
        }
    }

    pub fn matches(&self, internal_name: &str) -> bool {
        match self.matcher {
            NameMatch::Prefix => internal_name.starts_with(&self.pattern),
            NameMatch::Contains => internal_name.contains(&self.pattern),
        }
    }
}

/// Flags a gameplay tag can switch on for an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagFlags {
    pub gathered: bool,
    pub crafting: bool,
    pub building: bool,
    pub brewing: bool,
    pub cooking: bool,
    pub farming: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TagRule {
    pub tag: String,
    pub type_name: Option<String>,
    pub subtype: Option<String>,
    pub notes: Vec<String>,
    pub stats: Vec<String>,
    pub flags: TagFlags,
}

struct TagRuleSpec {
    tag: &'static str,
    type_name: Option<&'static str>,
    subtype: Option<&'static str>,
    notes: &'static [&'static str],
    stats: &'static [&'static str],
    flags: TagFlags,
}

const NO_FLAGS: TagFlags = TagFlags {
    gathered: false,
    crafting: false,
    building: false,
    brewing: false,
    cooking: false,
    farming: false,
};

macro_rules! tag_rule {
    ($tag:expr, $type_name:expr, $subtype:expr, $notes:expr, $stats:expr, $flags:expr) => {
        TagRuleSpec {
            tag: $tag,
            type_name: $type_name,
            subtype: $subtype,
            notes: $notes,
            stats: $stats,
            flags: $flags,
        }
    };
}

/// Item-table tag semantics.
const ITEM_TAG_RULES: &[TagRuleSpec] = &[
    tag_rule!("Item.BasicGather", Some("Material"), None, &[], &[], TagFlags { gathered: true, crafting: true, ..NO_FLAGS }),
    tag_rule!("Item.Book", Some("Treasure"), None, &[], &[], TagFlags { gathered: true, crafting: true, ..NO_FLAGS }),
    tag_rule!("Item.BrewIngredient", Some("Ingredient"), None, &[], &[], TagFlags { brewing: true, ..NO_FLAGS }),
    tag_rule!("Item.Food.Spice", Some("Ingredient"), None, &[], &[], TagFlags { cooking: true, ..NO_FLAGS }),
    tag_rule!("Item.Food.Veg.Mushroom", Some("Fuel"), None, &[], &[], TagFlags { gathered: true, ..NO_FLAGS }),
    tag_rule!("Item.Key", Some("Key"), None, &[], &[], TagFlags { gathered: true, ..NO_FLAGS }),
    tag_rule!("Item.MemorialItem", Some("Treasure"), None, &[], &[], TagFlags { crafting: true, ..NO_FLAGS }),
    tag_rule!("Item.Mineral.Scrap", Some("Material"), None, &[], &[], TagFlags { gathered: true, ..NO_FLAGS }),
    tag_rule!("Item.Scroll", Some("Treasure"), None, &[], &[], TagFlags { gathered: true, crafting: true, ..NO_FLAGS }),
    tag_rule!("Item.Seed", Some("Seed"), None, &[], &[], TagFlags { farming: true, ..NO_FLAGS }),
    tag_rule!("Item.Treasure", Some("Treasure"), None, &[], &[], NO_FLAGS),
    tag_rule!("Item.Wood", Some("Material"), None, &[], &[], TagFlags { gathered: true, crafting: true, building: true, ..NO_FLAGS }),
    tag_rule!("UI.Fabric", Some("Material"), None, &[], &[], TagFlags { crafting: true, building: true, ..NO_FLAGS }),
    tag_rule!("UI.Figurine", Some("Muznakan Carving"), None, &[], &[], NO_FLAGS),
    tag_rule!("UI.Items", Some("Treasure"), None, &[], &[], TagFlags { gathered: true, ..NO_FLAGS }),
    tag_rule!("UI.Materials", Some("Material"), None, &[], &[], TagFlags { crafting: true, ..NO_FLAGS }),
    tag_rule!("UI.Metals", Some("Crafted Material"), None, &[], &[], TagFlags { crafting: true, ..NO_FLAGS }),
    tag_rule!("UI.Processed", Some("Crafted Material"), None, &[], &[], TagFlags { crafting: true, ..NO_FLAGS }),
    tag_rule!("UI.Purified", Some("Crafted Material"), None, &[], &[], TagFlags { crafting: true, ..NO_FLAGS }),
    tag_rule!("UI.Seed", Some("Seed"), None, &[], &[], TagFlags { farming: true, ..NO_FLAGS }),
    tag_rule!("UI.Tool", Some("Key"), None, &[], &[], NO_FLAGS),
];

/// Consumable-table tag semantics. Order matters: the first matching type
/// wins, and the more specific food tags precede the bare `Item.Food`.
const CONSUMABLE_TAG_RULES: &[TagRuleSpec] = &[
    tag_rule!("Item.Food.Cheese", Some("Food"), Some("Cheese"), &[], &[], NO_FLAGS),
    tag_rule!("Item.Food.Eggs", Some("Food"), Some("Eggs"), &[], &[], NO_FLAGS),
    tag_rule!("Item.Food.Fruit", Some("Food"), Some("Fruit"), &["Farming: Need Light"], &[], NO_FLAGS),
    tag_rule!("Item.Food.Honey", Some("Food"), Some("Honey"), &[], &[], NO_FLAGS),
    tag_rule!("Item.Food.Meat", Some("Food"), Some("Meat"), &[], &[], NO_FLAGS),
    tag_rule!("Item.Food.Spice", Some("Food"), Some("Spices"), &[], &[], NO_FLAGS),
    tag_rule!("Item.Food.Veg.Flower", Some("Food"), Some("Flower"), &["Farming: Need Light"], &[], NO_FLAGS),
    tag_rule!("Item.Food.Veg.Grain", Some("Food"), Some("Grain"), &["Farming: Need Light"], &[], NO_FLAGS),
    tag_rule!("Item.Food.Veg.Herb", Some("Food"), Some("Herbs"), &["Farming: Need Light"], &[], NO_FLAGS),
    tag_rule!("Item.Food.Veg.Mushroom", Some("Food"), Some("Mushrooms"), &["Farming: Need Darkness"], &[], NO_FLAGS),
    tag_rule!("Item.Food.Veg", Some("Food"), Some("Vegetables"), &["Farming: Need Light"], &[], NO_FLAGS),
    tag_rule!("Item.Food", Some("Food"), None, &[], &[], NO_FLAGS),
    tag_rule!("Item.Mineral.Ore", Some("Ore"), None, &[], &[], NO_FLAGS),
    tag_rule!("Item.BrewIngredient", None, None, &[], &["Brewing Ingredient"], NO_FLAGS),
    tag_rule!("UI.BreakfastMeal.Complex", Some("Meal"), Some("Breakfast"), &["Complexity: Complex", "Meal Time: Breakfast"], &[], NO_FLAGS),
    tag_rule!("UI.BreakfastMeal.Reasonable", Some("Meal"), Some("Breakfast"), &["Complexity: Reasonable", "Meal Time: Breakfast"], &[], NO_FLAGS),
    tag_rule!("UI.BreakfastMeal.Simple", Some("Meal"), Some("Breakfast"), &["Complexity: Simple", "Meal Time: Breakfast"], &[], NO_FLAGS),
    tag_rule!("UI.LunchMeal.Complex", Some("Meal"), Some("Lunch"), &["Complexity: Complex", "Meal Time: Lunch"], &[], NO_FLAGS),
    tag_rule!("UI.LunchMeal.Reasonable", Some("Meal"), Some("Lunch"), &["Complexity: Reasonable", "Meal Time: Lunch"], &[], NO_FLAGS),
    tag_rule!("UI.LunchMeal.Simple", Some("Meal"), Some("Lunch"), &["Complexity: Simple", "Meal Time: Lunch"], &[], NO_FLAGS),
    tag_rule!("UI.DinnerMeal.Complex", Some("Meal"), Some("Dinner"), &["Complexity: Complex", "Meal Time: Dinner"], &[], NO_FLAGS),
    tag_rule!("UI.DinnerMeal.Reasonable", Some("Meal"), Some("Dinner"), &["Complexity: Reasonable", "Meal Time: Dinner"], &[], NO_FLAGS),
    tag_rule!("UI.DinnerMeal.Simple", Some("Meal"), Some("Dinner"), &["Complexity: Simple", "Meal Time: Dinner"], &[], NO_FLAGS),
    tag_rule!("UI.Ration.Complex", Some("Ration"), None, &["Complexity: Complex"], &[], NO_FLAGS),
    tag_rule!("UI.Ration.Reasonable", Some("Ration"), None, &["Complexity: Reasonable"], &[], NO_FLAGS),
    tag_rule!("UI.Ration.Simple", Some("Ration"), None, &["Complexity: Simple"], &[], NO_FLAGS),
    tag_rule!("UI.Abahk", Some("\u{c2}bakh"), None, &[], &[], NO_FLAGS),
    tag_rule!("UI.Processed", None, Some("Crafted"), &[], &[], NO_FLAGS),
    tag_rule!("Item.Consumable.Meal", Some("Meal"), None, &[], &[], NO_FLAGS),
    tag_rule!("Item.Consumable.Ration", Some("Ration"), None, &[], &[], NO_FLAGS),
    tag_rule!("Item.Consumable.Potion", Some("Potion"), None, &[], &[], NO_FLAGS),
    tag_rule!("Item.Consumable.Ingredient", Some("Ingredient"), None, &[], &[], NO_FLAGS),
    tag_rule!("Item.Consumable", Some("Consumable"), None, &[], &[], NO_FLAGS),
];

/// Tags that carry no wiki-facing information.
const IGNORED_TAGS: &[&str] = &[
    "Item.Heavy",
    "Item.HeavyCarryTarget",
    "Item.Unstorable.HandsOnly",
    "Item.Unstorable.WorldOnly",
    "UI.Lore.Consumables",
    "UI.Premium",
    "UI.Tinted",
];

/// All dataset-tuned tables, bundled for injection into the resolvers.
#[derive(Debug, Clone)]
pub struct GameData {
    pub dlc_titles: HashMap<String, String>,
    pub dlc_path_fragments: Vec<(String, String)>,
    pub station_keys: HashMap<String, String>,
    pub material_names: HashMap<String, String>,
    pub material_variants: Vec<(String, String)>,
    pub set_rules: Vec<SetRule>,
    pub disambiguation: Vec<DisambiguationRule>,
    pub name_filters: Vec<String>,
    pub item_tags: Vec<TagRule>,
    pub consumable_tags: Vec<TagRule>,
    pub ignored_tags: Vec<String>,
}

static STANDARD: Lazy<GameData> = Lazy::new(GameData::build_standard);

impl GameData {
    /// The shipped-game tables. Built once, shared for the process.
    pub fn standard() -> &'static GameData {
        &STANDARD
    }

    fn build_standard() -> GameData {
        GameData {
            dlc_titles: pairs_to_map(DLC_TITLES),
            dlc_path_fragments: pairs_to_vec(DLC_PATH_FRAGMENTS),
            station_keys: pairs_to_map(STATION_KEYS),
            material_names: pairs_to_map(MATERIAL_NAMES),
            material_variants: pairs_to_vec(MATERIAL_VARIANTS),
            set_rules: vec![
                // Material-variant sets outrank the broader Ancient rule;
                // Ancient must veto the variant words it would otherwise
                // swallow.
                SetRule::pattern("Coastal Marble Set", "Fair", &[]),
                SetRule::pattern("Red Sandstone Set", "Crimson", &[]),
                SetRule::pattern("Ancient Set", "Ancient", &["Fair", "Crimson"]),
                SetRule::pattern("Imladris Furnishings Set", "Imladris", &[]),
                SetRule::dlc("Lodge Set", "Beorn"),
                SetRule::dlc("Ent-craft Set", "Ent"),
                SetRule::dlc("Orc Hunter Set", "OrcHunter"),
                SetRule::dlc("Rohirrim Set", "Rohan"),
                SetRule::dlc("Yule-tide Set", "Holiday"),
            ],
            disambiguation: vec![
                DisambiguationRule::prefix("Advanced_Column", "Advanced"),
                DisambiguationRule::prefix("Fortress_Column", "Fortress"),
                DisambiguationRule::prefix("Crude_", "Crude"),
                DisambiguationRule::prefix("Elder_", "Elder"),
                DisambiguationRule::prefix("Beorn_", "Beorn"),
                DisambiguationRule::prefix("DurinsTowerSet_", "Durin"),
                DisambiguationRule::contains("_Sandbox", "Sandbox"),
            ],
            name_filters: NAME_FILTERS.iter().map(|s| s.to_string()).collect(),
            item_tags: ITEM_TAG_RULES.iter().map(TagRule::from_spec).collect(),
            consumable_tags: CONSUMABLE_TAG_RULES.iter().map(TagRule::from_spec).collect(),
            ignored_tags: IGNORED_TAGS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Empty tables, for tests that inject their own rules.
    pub fn empty() -> GameData {
        GameData {
            dlc_titles: HashMap::new(),
            dlc_path_fragments: Vec::new(),
            station_keys: HashMap::new(),
            material_names: HashMap::new(),
            material_variants: Vec::new(),
            set_rules: Vec::new(),
            disambiguation: Vec::new(),
            name_filters: Vec::new(),
            item_tags: Vec::new(),
            consumable_tags: Vec::new(),
            ignored_tags: Vec::new(),
        }
    }

    pub fn dlc_title(&self, short_key: &str) -> Option<&str> {
        self.dlc_titles.get(short_key).map(String::as_str)
    }

    /// Short DLC key for the first known fragment found in `path`.
    pub fn dlc_from_fragment(&self, path: &str) -> Option<&str> {
        self.dlc_path_fragments
            .iter()
            .find(|(fragment, _)| path.contains(fragment.as_str()))
            .map(|(_, key)| key.as_str())
    }

    pub fn station_string_key(&self, station_key: &str) -> Option<&str> {
        self.station_keys.get(station_key).map(String::as_str)
    }

    pub fn material_override(&self, material_key: &str) -> Option<&str> {
        self.material_names.get(material_key).map(String::as_str)
    }

    /// Variant word for a material-variant internal name, e.g.
    /// `Table_WhiteMarble` -> `Fair`.
    pub fn material_variant_word(&self, internal_name: &str) -> Option<&str> {
        self.material_variants
            .iter()
            .find(|(marker, _)| internal_name.contains(marker.as_str()))
            .map(|(_, word)| word.as_str())
    }

    pub fn name_filter_hit(&self, name: &str) -> Option<&str> {
        self.name_filters
            .iter()
            .find(|filter| name.contains(filter.as_str()))
            .map(String::as_str)
    }

    pub fn is_ignored_tag(&self, tag: &str) -> bool {
        self.ignored_tags.iter().any(|t| t == tag)
    }
}

impl TagRule {
    fn from_spec(spec: &TagRuleSpec) -> TagRule {
        TagRule {
            tag: spec.tag.to_string(),
            type_name: spec.type_name.map(String::from),
            subtype: spec.subtype.map(String::from),
            notes: spec.notes.iter().map(|s| s.to_string()).collect(),
            stats: spec.stats.iter().map(|s| s.to_string()).collect(),
            flags: spec.flags,
        }
    }
}

fn pairs_to_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn pairs_to_vec(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
