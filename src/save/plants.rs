//! Plant-type naming and template lookup for restoring plants.

use bevy::prelude::*;

use crate::shared::*;

/// Editor-instance name → the plant type stored in a snapshot.
///
/// Strips a trailing `(Clone)`; for ordinary plants also strips a trailing
/// ` (N)` duplicate counter. Talking plant names are kept otherwise intact
/// since each one is unique.
pub fn canonical_plant_type(name: &str) -> String {
    let mut out = name.trim();
    if let Some(stripped) = out.strip_suffix("(Clone)") {
        out = stripped.trim_end();
    }
    if !is_talking_plant(out) {
        out = strip_duplicate_counter(out);
    }
    out.to_string()
}

fn strip_duplicate_counter(name: &str) -> &str {
    let Some(open) = name.rfind(" (") else {
        return name;
    };
    let tail = &name[open + 2..];
    match tail.strip_suffix(')') {
        Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            name[..open].trim_end()
        }
        _ => name,
    }
}

/// Drops the `Plant`, `Prefab` and talking markers so that
/// `"Talking Grape Plant"`, `"GrapePrefab"` and `"Grape"` compare equal.
fn simplify(name: &str) -> String {
    name.replace("Plant", "")
        .replace("Prefab", "")
        .replace(TALKING_MARKER, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// `"Talking Grape Plant"` → `"Grape"`.
fn talking_core_name(plant_type: &str) -> Option<String> {
    if !is_talking_plant(plant_type) {
        return None;
    }
    let core = plant_type
        .replace(TALKING_MARKER, "")
        .replace("Plant", "")
        .trim()
        .to_string();
    (!core.is_empty()).then_some(core)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefabTier {
    Exact,
    Simplified,
    TalkingCore,
    Substring,
    LiveTemplate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefabMatch {
    pub prefab: PlantPrefab,
    pub tier: PrefabTier,
}

/// Find the template to instantiate a persisted plant from.
///
/// Tries, in order: exact registry key, simplified-name equality, the core
/// name of a talking plant, substring either way, and finally a live plant
/// already in the scene (`live_templates`, name and template pairs).
pub fn resolve_prefab(
    registry: &PlantPrefabRegistry,
    plant_type: &str,
    live_templates: &[(String, PlantPrefab)],
) -> Option<PrefabMatch> {
    if let Some(prefab) = registry.get(plant_type) {
        return Some(found(prefab, PrefabTier::Exact));
    }

    // Sorted so ties resolve the same way every run.
    let mut keys: Vec<&String> = registry.prefabs.keys().collect();
    keys.sort();

    let wanted = simplify(plant_type);
    if let Some(key) = keys.iter().find(|k| simplify(k) == wanted) {
        return Some(found(&registry.prefabs[*key], PrefabTier::Simplified));
    }

    if let Some(core) = talking_core_name(plant_type) {
        if let Some(key) = keys.iter().find(|k| k.contains(core.as_str())) {
            return Some(found(&registry.prefabs[*key], PrefabTier::TalkingCore));
        }
    }

    let substring = keys.iter().find(|k| {
        let simple_key = simplify(k);
        k.contains(plant_type)
            || plant_type.contains(k.as_str())
            || (!simple_key.is_empty() && !wanted.is_empty()
                && (simple_key.contains(&wanted) || wanted.contains(&simple_key)))
    });
    if let Some(key) = substring {
        return Some(found(&registry.prefabs[*key], PrefabTier::Substring));
    }

    live_templates
        .iter()
        .find(|(name, _)| name.contains(plant_type) || plant_type.contains(name.as_str()))
        .map(|(_, prefab)| found(prefab, PrefabTier::LiveTemplate))
}

fn found(prefab: &PlantPrefab, tier: PrefabTier) -> PrefabMatch {
    PrefabMatch {
        prefab: prefab.clone(),
        tier,
    }
}

/// Name and template of every live talking plant, for the last lookup tier.
pub fn live_talking_templates(world: &mut World) -> Vec<(String, PlantPrefab)> {
    let mut query = world.query::<(&Name, &GrowingPlant, Option<&HarvestablePlant>)>();
    query
        .iter(world)
        .filter(|(name, _, _)| is_talking_plant(name.as_str()))
        .map(|(name, growing, harvestable)| {
            let plant_type = canonical_plant_type(name.as_str());
            let prefab = PlantPrefab {
                name: plant_type.clone(),
                stage_count: growing.stage_count,
                time_between_stages: growing.time_between_stages,
                harvest_item: harvestable
                    .map(|h| h.harvest_item.clone())
                    .unwrap_or_default(),
                sprite_base: 0,
            };
            (plant_type, prefab)
        })
        .collect()
}
