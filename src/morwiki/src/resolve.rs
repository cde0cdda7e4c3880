//! Per-record resolution: one raw table row in, one entity (or an
//! exclusion) out.
//!
//! Every resolution here is pure given the catalog, recipe index, and
//! entitlement map, all of which are fully built and frozen before the
//! first record resolves. Records never see each other; cross-record
//! concerns (dedup, usage) run as later passes.

use std::collections::HashMap;

use serde_json::Value;

use crate::entity::{
    Category, CategoryExtras, CategorySpec, ConstructionInfo, EdibleStats, Entity, Exclusion,
    ExclusionReason, GearStats, Material, ResolvedRecipe, SizedMaterial, StockpileInfo,
};
use crate::gamedata::{GameData, TagRule};
use crate::names::{resolve_display_name, resolve_text};
use crate::property::{self, RawRecord};
use crate::provenance;
use crate::recipe::{
    join_recipe, material_display_name, station_display_name, RecipeIndex, RecipeJoin,
};
use crate::strings::StringCatalog;

/// Shared, read-only context for resolving one category's records.
pub struct Resolver<'a> {
    pub catalog: &'a StringCatalog,
    pub game: &'a GameData,
    pub entitlements: &'a HashMap<String, String>,
    pub recipes: Option<&'a RecipeIndex>,
}

impl Resolver<'_> {
    /// Resolve one record into an entity, or report why it is excluded.
    pub fn resolve_record(
        &self,
        spec: &CategorySpec,
        data_file: &str,
        record: &RawRecord,
        imports: &[String],
    ) -> Result<Entity, Exclusion> {
        let internal_name = record.name.clone();

        if let Some(pattern) = self.game.name_filter_hit(&internal_name) {
            return Err(exclusion(
                internal_name,
                None,
                ExclusionReason::NameFilter(pattern.to_string()),
            ));
        }

        let display_name = resolve_display_name(record, self.catalog, self.game);
        if let Some(reason) = self.name_exclusion(&internal_name, display_name.as_deref()) {
            return Err(exclusion(internal_name, display_name, reason));
        }
        let Some(display_name) = display_name else {
            return Err(exclusion(internal_name, None, ExclusionReason::NoDisplayName));
        };

        if record.enum_property("EnabledState") == Some("Disabled") {
            return Err(exclusion(
                internal_name,
                Some(display_name),
                ExclusionReason::Disabled,
            ));
        }

        let description = resolve_text(record, "Description", self.catalog);
        let tags = record.tag_list();
        let (actor_path, icon_path) = provenance::record_asset_paths(record);

        let prov = provenance::classify(
            &internal_name,
            Some(&display_name),
            &[actor_path.as_deref(), icon_path.as_deref()],
            self.entitlements,
            self.game,
        );

        let join = self
            .recipes
            .zip(spec.join_for_file(data_file))
            .and_then(|(index, strategy)| join_recipe(index, &internal_name, strategy));
        let recipe = join.as_ref().map(|join| self.resolve_recipe(join));

        let mut extras = self.extract_extras(spec.category, record, &tags, imports);
        if let (CategoryExtras::Construction(info), Some(join)) = (&mut extras, join.as_ref()) {
            self.fill_placement(info, join.recipe);
        }

        Ok(Entity {
            internal_name,
            display_name,
            category: spec.category,
            description,
            tags,
            provenance: prov,
            recipe,
            extras,
            campaign_unlock_override: None,
            sandbox_unlock_override: None,
            disambiguation: None,
            actor_path,
            icon_path,
        })
    }

    /// Structural name rules: rows and display names that mark internal
    /// scaffolding rather than shippable objects.
    fn name_exclusion(
        &self,
        internal_name: &str,
        display_name: Option<&str>,
    ) -> Option<ExclusionReason> {
        if internal_name.starts_with('[') {
            return Some(ExclusionReason::NameFilter("[".into()));
        }
        if internal_name.starts_with("_Beorn") {
            return Some(ExclusionReason::NameFilter("_Beorn".into()));
        }
        let display = display_name?;
        if display.starts_with('[') || display.starts_with('_') || display.starts_with('*') {
            return Some(ExclusionReason::NameFilter(
                display.chars().next().unwrap_or('_').to_string(),
            ));
        }
        if display.contains('{') || display.contains('}') {
            return Some(ExclusionReason::TemplatePlaceholder);
        }
        if let Some(pattern) = self.game.name_filter_hit(display) {
            return Some(ExclusionReason::NameFilter(pattern.to_string()));
        }
        None
    }

    /// Turn a joined recipe into display-resolved form.
    fn resolve_recipe(&self, join: &RecipeJoin<'_>) -> ResolvedRecipe {
        let recipe = join.recipe;
        let stations = recipe
            .stations
            .iter()
            .map(|key| station_display_name(key, self.catalog, self.game))
            .collect();
        let materials = recipe
            .materials
            .iter()
            .map(|(key, count)| Material {
                name: material_display_name(key, self.catalog, self.game),
                count: *count,
            })
            .collect();
        let size_materials = join.sizes.as_ref().map(|sizes| {
            sizes
                .combined_materials()
                .into_iter()
                .map(|(key, [small, medium, massive])| SizedMaterial {
                    name: material_display_name(&key, self.catalog, self.game),
                    small,
                    medium,
                    massive,
                })
                .collect()
        });

        ResolvedRecipe {
            recipe_name: recipe.recipe_name.clone(),
            craft_time: recipe.craft_time,
            tier: recipe.tier,
            stations,
            materials,
            size_materials,
            campaign: recipe.campaign.clone(),
            sandbox: recipe.sandbox.clone(),
        }
    }

    fn extract_extras(
        &self,
        category: Category,
        record: &RawRecord,
        tags: &[String],
        imports: &[String],
    ) -> CategoryExtras {
        match category {
            Category::Constructions => {
                CategoryExtras::Construction(self.construction_info(record, tags))
            }
            Category::Weapons | Category::Armor | Category::Tools => {
                CategoryExtras::Gear(self.gear_stats(record, tags))
            }
            Category::Brews | Category::Consumables => {
                CategoryExtras::Edible(self.edible_stats(record, tags, imports))
            }
            _ => CategoryExtras::Stockpile(self.stockpile_info(record, tags)),
        }
    }

    /// Building type/subtype come from `UI.Construction.Category.*` tags,
    /// friendlier names from the catalog when present.
    fn construction_info(&self, record: &RawRecord, tags: &[String]) -> ConstructionInfo {
        let mut info = ConstructionInfo::default();
        for tag in tags {
            let Some(rest) = tag.strip_prefix("UI.Construction.Category.") else {
                continue;
            };
            let mut parts = rest.split('.');
            if let Some(building_type) = parts.next() {
                info.building_type = Some(
                    self.catalog
                        .lookup(&format!("UI.Construction.Category.{building_type}"))
                        .unwrap_or(building_type)
                        .to_string(),
                );
                if let Some(subtype) = parts.next() {
                    info.building_subtype = Some(
                        self.catalog
                            .lookup(&format!(
                                "UI.Construction.Category.{building_type}.{subtype}"
                            ))
                            .unwrap_or(subtype)
                            .to_string(),
                    );
                }
            }
        }
        info
    }

    /// Placement and sandbox-material data live on the construction's
    /// recipe row, not the construction row itself.
    fn fill_placement(&self, info: &mut ConstructionInfo, recipe: &crate::recipe::RecipeRecord) {
        info.build_process = recipe.build_process.clone();
        info.location_requirement = recipe.location_requirement.clone();
        info.placement_type = recipe.placement_type.clone();
        info.monument_type = recipe.monument_type.clone();
        info.on_wall = recipe.on_wall;
        info.on_floor = recipe.on_floor;
        info.on_water = recipe.on_water;
        info.sandbox_materials = recipe
            .sandbox_materials
            .iter()
            .map(|(key, count)| Material {
                name: material_display_name(key, self.catalog, self.game),
                count: *count,
            })
            .collect();
    }

    fn gear_stats(&self, record: &RawRecord, tags: &[String]) -> GearStats {
        let mut stats = GearStats {
            damage: record.f64_property("Damage").unwrap_or(0.0),
            speed: record.f64_property("Speed").unwrap_or(1.0),
            durability: record.u32_property("Durability").unwrap_or(0),
            armor: record.f64_property("Armor").unwrap_or(0.0),
            armor_penetration: record.f64_property("ArmorPenetration").unwrap_or(0.0),
            stamina_cost: record.f64_property("StaminaCost").unwrap_or(0.0),
            energy_cost: record.f64_property("EnergyCost").unwrap_or(0.0),
            block_damage_reduction: record
                .f64_property("BlockDamageReduction")
                .unwrap_or(0.0),
            ..GearStats::default()
        };
        stats.tier = record
            .property("Tier")
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });

        // Damage type rides in a gameplay-tag struct.
        if let Some(damage_tag) = record
            .property("DamageType")
            .and_then(|v| property::value_in(v, "TagName"))
            .and_then(Value::as_str)
        {
            // `Damage.Piercing.Spear` -> `Piercing`.
            stats.damage_type = damage_tag.split('.').nth(1).map(String::from);
        }

        // `UI.Weapon.1h` sets the hand type, `Item.Weapon.Spear` the
        // subtype.
        for tag in tags {
            let parts: Vec<&str> = tag.split('.').collect();
            if parts.len() >= 3 {
                match parts[0] {
                    "UI" => stats.hand_type = Some(parts[2].to_string()),
                    "Item" => stats.sub_type = Some(parts[2].to_string()),
                    _ => {}
                }
            }
        }

        if let Some(entries) = record.property("InitialRepairCost").and_then(Value::as_array) {
            for entry in entries {
                let Some(props) = entry.get("Value") else { continue };
                if let Some(count) = property::value_in(props, "Count").and_then(Value::as_u64) {
                    stats.repair_cost = count as u32;
                }
                if let Some(key) = property::value_in(props, "MaterialHandle")
                    .and_then(property::row_name)
                {
                    stats.repair_material =
                        Some(material_display_name(key, self.catalog, self.game));
                }
            }
        }

        stats
    }

    fn edible_stats(
        &self,
        record: &RawRecord,
        tags: &[String],
        imports: &[String],
    ) -> EdibleStats {
        let mut stats = EdibleStats {
            max_stack_size: record.u32_property("MaxStackSize"),
            hunger_restore: record.f64_property("HungerRestore"),
            health_restore: record.f64_property("HealthRestore"),
            energy_restore: record.f64_property("EnergyRestore"),
            use_effects: use_effect_names(record, imports),
            ..EdibleStats::default()
        };

        for rule in matching_rules(&self.game.consumable_tags, tags, self.game) {
            if let Some(type_name) = &rule.type_name {
                if stats.item_type.is_none() {
                    stats.item_type = Some(type_name.clone());
                }
            }
            if let Some(subtype) = &rule.subtype {
                push_unique(&mut stats.subtypes, subtype);
            }
            for note in &rule.notes {
                push_unique(&mut stats.notes, note);
            }
            for stat in &rule.stats {
                push_unique(&mut stats.stats, stat);
            }
        }

        stats
    }

    fn stockpile_info(&self, record: &RawRecord, tags: &[String]) -> StockpileInfo {
        let mut info = StockpileInfo {
            max_stack_size: record.u32_property("MaxStackSize"),
            slot_size: record.u32_property("SlotSize"),
            base_trade_value: record.f64_property("BaseTradeValue"),
            portability: record.enum_property("Portability").map(String::from),
            inline_materials: crate::recipe::parse_materials(record.property("CraftingMaterials"))
                .into_iter()
                .map(|(key, count)| Material {
                    name: material_display_name(&key, self.catalog, self.game),
                    count,
                })
                .collect(),
            ..StockpileInfo::default()
        };

        for rule in matching_rules(&self.game.item_tags, tags, self.game) {
            if let Some(type_name) = &rule.type_name {
                push_unique(&mut info.item_types, type_name);
            }
            info.gathered |= rule.flags.gathered;
            info.crafting |= rule.flags.crafting;
            info.building |= rule.flags.building;
            info.brewing |= rule.flags.brewing;
            info.cooking |= rule.flags.cooking;
            info.farming |= rule.flags.farming;
        }

        info
    }
}

/// Use-effect references are negative indices into the document's import
/// table; positive indices point at exports and carry no effect names.
fn use_effect_names(record: &RawRecord, imports: &[String]) -> Vec<String> {
    let Some(refs) = record.property("UseEffects").and_then(Value::as_array) else {
        return Vec::new();
    };
    refs.iter()
        .filter_map(|entry| entry.get("Value").and_then(Value::as_i64))
        .filter(|&idx| idx < 0)
        .filter_map(|idx| imports.get((-idx - 1) as usize))
        .map(|object_name| {
            let cleaned = object_name
                .trim_end_matches("_C")
                .trim_start_matches("GE_")
                .replace('_', " ");
            title_case(&cleaned)
        })
        .collect()
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tag rules that apply to a record, in rule-table order, skipping tags
/// the dataset marks as carrying no wiki-facing information.
fn matching_rules<'a>(
    rules: &'a [TagRule],
    tags: &[String],
    game: &GameData,
) -> impl Iterator<Item = &'a TagRule> {
    let tags: Vec<String> = tags
        .iter()
        .filter(|tag| !game.is_ignored_tag(tag))
        .cloned()
        .collect();
    rules
        .iter()
        .filter(move |rule| tags.iter().any(|tag| *tag == rule.tag))
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}

fn exclusion(
    internal_name: String,
    display_name: Option<String>,
    reason: ExclusionReason,
) -> Exclusion {
    Exclusion {
        internal_name,
        display_name,
        reason,
    }
}
