//! Reverse material-usage index.
//!
//! Built once over the finalized entity sets of every category; purely
//! derivative and never mutated afterwards. Building it any earlier would
//! miss consumers, so the pipeline only calls in after all categories
//! have deduplicated.

use std::collections::HashMap;

use serde::Serialize;

use crate::entity::{Category, Entity, Material};

/// One recipe that consumes a material.
#[derive(Debug, Clone, Serialize)]
pub struct ConsumerRef {
    pub display_name: String,
    pub category: Category,
    pub stations: Vec<String>,
    pub materials: Vec<Material>,
}

/// `material display name -> consumers`, for "used in" annotations.
#[derive(Debug, Default, Serialize)]
pub struct UsageIndex {
    buckets: HashMap<String, Vec<ConsumerRef>>,
}

impl UsageIndex {
    /// Index every entity with resolved materials. An entity is never
    /// listed as consuming itself, even when its recipe references its
    /// own display name.
    pub fn build<'a>(entity_sets: impl IntoIterator<Item = &'a [Entity]>) -> Self {
        let mut index = UsageIndex::default();
        for entities in entity_sets {
            for entity in entities {
                index.add_entity(entity);
            }
        }
        index
    }

    fn add_entity(&mut self, entity: &Entity) {
        let Some(recipe) = &entity.recipe else { return };

        // Tiered recipes list their union of materials per size; plain
        // recipes use the flat list.
        let material_names: Vec<&str> = match &recipe.size_materials {
            Some(sized) => sized.iter().map(|m| m.name.as_str()).collect(),
            None => recipe.materials.iter().map(|m| m.name.as_str()).collect(),
        };

        for name in material_names {
            if name == entity.display_name {
                continue;
            }
            self.buckets
                .entry(name.to_string())
                .or_default()
                .push(ConsumerRef {
                    display_name: entity.display_name.clone(),
                    category: entity.category,
                    stations: recipe.stations.clone(),
                    materials: recipe.materials.clone(),
                });
        }
    }

    /// Consumers of a material, in indexing order.
    pub fn consumers(&self, material_display_name: &str) -> &[ConsumerRef] {
        self.buckets
            .get(material_display_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ConsumerRef])> {
        self.buckets
            .iter()
            .map(|(name, consumers)| (name.as_str(), consumers.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{CategoryExtras, ResolvedRecipe, StockpileInfo};
    use crate::provenance::Provenance;

    fn consumer(display: &str, category: Category, materials: &[(&str, u32)]) -> Entity {
        Entity {
            internal_name: display.replace(' ', "_"),
            display_name: display.to_string(),
            category,
            description: None,
            tags: Vec::new(),
            provenance: Provenance::default(),
            recipe: Some(ResolvedRecipe {
                recipe_name: display.replace(' ', "_"),
                stations: vec!["Forge".to_string()],
                materials: materials
                    .iter()
                    .map(|(name, count)| Material {
                        name: name.to_string(),
                        count: *count,
                    })
                    .collect(),
                ..ResolvedRecipe::default()
            }),
            extras: CategoryExtras::Stockpile(StockpileInfo::default()),
            campaign_unlock_override: None,
            sandbox_unlock_override: None,
            disambiguation: None,
            actor_path: None,
            icon_path: None,
        }
    }

    #[test]
    fn indexes_consumers_per_material() {
        let weapons = vec![
            consumer("Iron Sword", Category::Weapons, &[("Iron Ingot", 3)]),
            consumer("Iron Axe", Category::Weapons, &[("Iron Ingot", 2), ("Oak Wood", 1)]),
        ];
        let index = UsageIndex::build([weapons.as_slice()]);

        let ingot_users: Vec<&str> = index
            .consumers("Iron Ingot")
            .iter()
            .map(|c| c.display_name.as_str())
            .collect();
        assert_eq!(ingot_users, vec!["Iron Sword", "Iron Axe"]);
        assert_eq!(index.consumers("Oak Wood").len(), 1);
        assert!(index.consumers("Mithril").is_empty());
    }

    #[test]
    fn self_reference_is_skipped() {
        // A refinement recipe that lists its own product as input must
        // not index itself.
        let items = vec![consumer(
            "Iron Ingot",
            Category::Items,
            &[("Iron Ingot", 1), ("Coal", 2)],
        )];
        let index = UsageIndex::build([items.as_slice()]);

        assert!(index.consumers("Iron Ingot").is_empty());
        assert_eq!(index.consumers("Coal").len(), 1);
    }

    #[test]
    fn recipe_less_entities_contribute_nothing() {
        let mut moss = consumer("Cave Moss", Category::Items, &[]);
        moss.recipe = None;
        let index = UsageIndex::build([std::slice::from_ref(&moss)]);
        assert!(index.is_empty());
    }

    #[test]
    fn spans_multiple_categories() {
        let weapons = vec![consumer("Iron Sword", Category::Weapons, &[("Iron Ingot", 3)])];
        let constructions = vec![consumer(
            "Iron Gate",
            Category::Constructions,
            &[("Iron Ingot", 8)],
        )];
        let index = UsageIndex::build([weapons.as_slice(), constructions.as_slice()]);

        let categories: Vec<Category> = index
            .consumers("Iron Ingot")
            .iter()
            .map(|c| c.category)
            .collect();
        assert!(categories.contains(&Category::Weapons));
        assert!(categories.contains(&Category::Constructions));
    }
}
