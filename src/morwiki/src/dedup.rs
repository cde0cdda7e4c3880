//! Display-name deduplication.
//!
//! Runs strictly after every record of a table has resolved: grouping by
//! display name needs the complete set. Each group collapses to exactly
//! one canonical entity, or to several deliberately renamed ones, with
//! every drop recorded for the audit log.

use std::collections::HashMap;

use crate::entity::{Entity, Exclusion, ExclusionReason};
use crate::gamedata::GameData;

/// Result of deduplicating one category.
#[derive(Debug, Default)]
pub struct DedupOutcome {
    pub canonical: Vec<Entity>,
    pub excluded: Vec<Exclusion>,
}

/// Collapse entities sharing a display name.
///
/// Group rules, in order:
/// - singletons survive, unless recipe-less in a category where that
///   marks an unreachable leftover (`allow_recipeless == false`);
/// - a lone `_V2` member supersedes its siblings (and still needs a
///   recipe itself);
/// - otherwise recipe-less members drop, and if several recipe-bearing
///   members remain they are genuinely distinct objects: each gets the
///   parenthetical suffix its internal-name prefix maps to.
pub fn dedupe(entities: Vec<Entity>, allow_recipeless: bool, game: &GameData) -> DedupOutcome {
    let mut outcome = DedupOutcome::default();

    // Group by display name, preserving first-seen group order.
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<Entity>> = HashMap::new();
    for entity in entities {
        let key = entity.display_name.clone();
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(entity);
    }

    for key in order {
        let Some(group) = groups.remove(&key) else { continue };
        resolve_group(group, allow_recipeless, game, &mut outcome);
    }

    outcome
}

fn resolve_group(
    mut group: Vec<Entity>,
    allow_recipeless: bool,
    game: &GameData,
    outcome: &mut DedupOutcome,
) {
    if group.len() == 1 {
        let entity = group.remove(0);
        keep_if_craftable(entity, allow_recipeless, outcome);
        return;
    }

    let v2_count = group.iter().filter(|e| is_superseding(e)).count();
    if v2_count == 1 {
        for entity in group {
            if is_superseding(&entity) {
                // The superseding member does not get a free pass on the
                // recipe requirement.
                keep_if_craftable(entity, allow_recipeless, outcome);
            } else {
                outcome.excluded.push(Exclusion {
                    internal_name: entity.internal_name,
                    display_name: Some(entity.display_name),
                    reason: ExclusionReason::Superseded,
                });
            }
        }
        return;
    }

    let (with_recipe, without_recipe): (Vec<Entity>, Vec<Entity>) =
        group.into_iter().partition(|e| e.recipe.is_some());
    for entity in without_recipe {
        outcome.excluded.push(Exclusion {
            internal_name: entity.internal_name,
            display_name: Some(entity.display_name),
            reason: ExclusionReason::NoRecipeData,
        });
    }

    if with_recipe.len() > 1 {
        for mut entity in with_recipe {
            if let Some(rule) = game
                .disambiguation
                .iter()
                .find(|rule| rule.matches(&entity.internal_name))
            {
                let suffix = format!(" ({})", rule.label);
                entity.display_name.push_str(&suffix);
                entity.disambiguation = Some(suffix);
            }
            outcome.canonical.push(entity);
        }
    } else {
        outcome.canonical.extend(with_recipe);
    }
}

fn keep_if_craftable(entity: Entity, allow_recipeless: bool, outcome: &mut DedupOutcome) {
    if entity.recipe.is_none() && !allow_recipeless {
        outcome.excluded.push(Exclusion {
            internal_name: entity.internal_name,
            display_name: Some(entity.display_name),
            reason: ExclusionReason::NoRecipeData,
        });
    } else {
        outcome.canonical.push(entity);
    }
}

fn is_superseding(entity: &Entity) -> bool {
    entity.internal_name.contains("_V2")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Category, CategoryExtras, ResolvedRecipe, StockpileInfo};
    use crate::provenance::Provenance;

    fn entity(internal: &str, display: &str, with_recipe: bool) -> Entity {
        Entity {
            internal_name: internal.to_string(),
            display_name: display.to_string(),
            category: Category::Constructions,
            description: None,
            tags: Vec::new(),
            provenance: Provenance::default(),
            recipe: with_recipe.then(ResolvedRecipe::default),
            extras: CategoryExtras::Stockpile(StockpileInfo::default()),
            campaign_unlock_override: None,
            sandbox_unlock_override: None,
            disambiguation: None,
            actor_path: None,
            icon_path: None,
        }
    }

    fn names(outcome: &DedupOutcome) -> Vec<(&str, &str)> {
        outcome
            .canonical
            .iter()
            .map(|e| (e.internal_name.as_str(), e.display_name.as_str()))
            .collect()
    }

    #[test]
    fn singleton_without_recipe_drops_for_buildables() {
        let outcome = dedupe(
            vec![entity("Ruin_Arch", "Broken Arch", false)],
            false,
            GameData::standard(),
        );
        assert!(outcome.canonical.is_empty());
        assert_eq!(outcome.excluded[0].reason, ExclusionReason::NoRecipeData);
    }

    #[test]
    fn singleton_without_recipe_survives_for_gatherables() {
        let outcome = dedupe(
            vec![entity("Moss", "Cave Moss", false)],
            true,
            GameData::standard(),
        );
        assert_eq!(outcome.canonical.len(), 1);
        assert!(outcome.excluded.is_empty());
    }

    #[test]
    fn v2_supersedes_siblings() {
        let outcome = dedupe(
            vec![
                entity("Foo", "Foo Display", true),
                entity("Foo_V2", "Foo Display", true),
            ],
            false,
            GameData::standard(),
        );
        assert_eq!(names(&outcome), vec![("Foo_V2", "Foo Display")]);
        assert_eq!(outcome.excluded.len(), 1);
        assert_eq!(outcome.excluded[0].internal_name, "Foo");
        assert_eq!(outcome.excluded[0].reason, ExclusionReason::Superseded);
    }

    #[test]
    fn v2_without_recipe_still_drops() {
        let outcome = dedupe(
            vec![
                entity("Foo", "Foo Display", true),
                entity("Foo_V2", "Foo Display", false),
            ],
            false,
            GameData::standard(),
        );
        assert!(outcome.canonical.is_empty());
        let reasons: Vec<_> = outcome.excluded.iter().map(|e| &e.reason).collect();
        assert!(reasons.contains(&&ExclusionReason::Superseded));
        assert!(reasons.contains(&&ExclusionReason::NoRecipeData));
    }

    #[test]
    fn distinct_collisions_disambiguate_by_prefix() {
        let outcome = dedupe(
            vec![
                entity("Advanced_Column_X", "Column X", true),
                entity("Fortress_Column_X", "Column X", true),
            ],
            false,
            GameData::standard(),
        );
        let mut resolved = names(&outcome);
        resolved.sort();
        assert_eq!(
            resolved,
            vec![
                ("Advanced_Column_X", "Column X (Advanced)"),
                ("Fortress_Column_X", "Column X (Fortress)"),
            ]
        );
        assert!(outcome.excluded.is_empty());
    }

    #[test]
    fn collision_collapses_to_lone_recipe_bearer() {
        let outcome = dedupe(
            vec![
                entity("Old_Bench", "Bench", false),
                entity("New_Bench", "Bench", true),
            ],
            false,
            GameData::standard(),
        );
        // A single survivor keeps its name unchanged.
        assert_eq!(names(&outcome), vec![("New_Bench", "Bench")]);
        assert_eq!(outcome.excluded[0].internal_name, "Old_Bench");
        assert_eq!(outcome.excluded[0].reason, ExclusionReason::NoRecipeData);
    }

    #[test]
    fn dedup_runs_after_full_grouping() {
        // Three-way group: one V2, one plain, one recipe-less. The V2
        // wins and both others are recorded.
        let outcome = dedupe(
            vec![
                entity("Lamp", "Lamp", true),
                entity("Lamp_V2", "Lamp", true),
                entity("Lamp_Old", "Lamp", false),
            ],
            false,
            GameData::standard(),
        );
        assert_eq!(names(&outcome), vec![("Lamp_V2", "Lamp")]);
        assert_eq!(outcome.excluded.len(), 2);
        assert!(outcome
            .excluded
            .iter()
            .all(|e| e.reason == ExclusionReason::Superseded));
    }
}
