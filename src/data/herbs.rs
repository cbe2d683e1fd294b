use bevy::prelude::*;

use crate::shared::*;

/// Populate the HerbRegistry with every plant that can grow in a patch.
///
/// `sprite_size` doubles as the visual bounds the collider heuristic reads.
/// Tall herbs (foxglove, mullein) end up with capsule colliders; herbs with
/// no explicit size use the default placeholder and default collider.
pub fn populate_herbs(registry: &mut HerbRegistry) {
    let herbs: Vec<PlantTemplate> = vec![
        PlantTemplate {
            id: "chamomile".into(),
            name: "Chamomile".into(),
            icon_index: 0,
            yield_per_pick: 2,
            stack_size: 99,
            sprite_size: Some(Vec2::new(10.0, 8.0)),
            color: Color::srgb(0.95, 0.95, 0.8),
        },
        PlantTemplate {
            id: "lavender".into(),
            name: "Lavender".into(),
            icon_index: 1,
            yield_per_pick: 1,
            stack_size: 99,
            sprite_size: Some(Vec2::new(8.0, 12.0)),
            color: Color::srgb(0.6, 0.5, 0.85),
        },
        PlantTemplate {
            id: "foxglove".into(),
            name: "Foxglove".into(),
            icon_index: 2,
            yield_per_pick: 1,
            stack_size: 20,
            sprite_size: Some(Vec2::new(6.0, 22.0)),
            color: Color::srgb(0.8, 0.35, 0.65),
        },
        PlantTemplate {
            id: "mullein".into(),
            name: "Mullein".into(),
            icon_index: 3,
            yield_per_pick: 1,
            stack_size: 99,
            sprite_size: Some(Vec2::new(7.0, 24.0)),
            color: Color::srgb(0.85, 0.8, 0.3),
        },
        PlantTemplate {
            id: "nettle".into(),
            name: "Stinging Nettle".into(),
            icon_index: 4,
            yield_per_pick: 3,
            stack_size: 99,
            sprite_size: None,
            color: Color::srgb(0.3, 0.55, 0.25),
        },
        PlantTemplate {
            id: "yarrow".into(),
            name: "Yarrow".into(),
            icon_index: 5,
            yield_per_pick: 1,
            stack_size: 99,
            sprite_size: Some(Vec2::new(12.0, 10.0)),
            color: Color::srgb(0.95, 0.9, 0.85),
        },
        PlantTemplate {
            id: "wild_garlic".into(),
            name: "Wild Garlic".into(),
            icon_index: 6,
            yield_per_pick: 2,
            stack_size: 99,
            sprite_size: None,
            color: Color::srgb(0.45, 0.75, 0.4),
        },
        PlantTemplate {
            id: "feverfew".into(),
            name: "Feverfew".into(),
            icon_index: 7,
            yield_per_pick: 1,
            stack_size: 99,
            sprite_size: Some(Vec2::new(9.0, 9.0)),
            color: Color::srgb(0.9, 0.9, 0.55),
        },
    ];

    for herb in herbs {
        registry.herbs.insert(herb.id.clone(), herb);
    }
}
