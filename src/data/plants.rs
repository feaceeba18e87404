use crate::shared::*;

/// Populate the PlantPrefabRegistry with every plant template and the seeds
/// that grow into them.
///
/// Stage counts match the sprite strips in the plant atlas. Talking plants
/// are never grown from seed; they are placed in the farm layout.
pub fn populate_plants(registry: &mut PlantPrefabRegistry) {
    let plants: Vec<(PlantPrefab, Option<&str>)> = vec![
        (
            PlantPrefab {
                name: "Radish".into(),
                stage_count: 4,
                time_between_stages: 5.0,
                harvest_item: "Radish".into(),
                sprite_base: 0,
            },
            Some("Radish Seed"),
        ),
        (
            PlantPrefab {
                name: "Tomato".into(),
                stage_count: 5,
                time_between_stages: 6.0,
                harvest_item: "Tomato".into(),
                sprite_base: 8,
            },
            Some("Tomato Seed"),
        ),
        (
            PlantPrefab {
                name: "Pumpkin".into(),
                stage_count: 5,
                time_between_stages: 8.0,
                harvest_item: "Pumpkin".into(),
                sprite_base: 16,
            },
            Some("Pumpkin Seed"),
        ),
        (
            PlantPrefab {
                name: "Carrot".into(),
                stage_count: 4,
                time_between_stages: 5.0,
                harvest_item: "Carrot".into(),
                sprite_base: 24,
            },
            Some("Carrot Seed"),
        ),
        // ── Talking plants ──────────────────────────────────────────────────
        (
            PlantPrefab {
                name: "Talking Grape Plant".into(),
                stage_count: 4,
                time_between_stages: 7.0,
                harvest_item: "Grape".into(),
                sprite_base: 32,
            },
            None,
        ),
        (
            PlantPrefab {
                name: "Talking Melon Plant".into(),
                stage_count: 5,
                time_between_stages: 9.0,
                harvest_item: "Melon".into(),
                sprite_base: 40,
            },
            None,
        ),
    ];

    for (prefab, seed) in plants {
        if let Some(seed) = seed {
            registry
                .seed_to_plant
                .insert(seed.to_string(), prefab.name.clone());
        }
        registry.insert(prefab);
    }
}
