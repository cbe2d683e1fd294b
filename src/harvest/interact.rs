use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::{ColliderShape, HarvestPlantEvent, PlantCollider, PlantInstance};

/// System: left-click a plant to pick it.
///
/// Needs a window, a camera and mouse input, so only the game binary
/// registers it.
pub fn pick_plant_under_cursor(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    plants: Query<(Entity, &PlantInstance, &PlantCollider, &GlobalTransform)>,
    mut requests: EventWriter<HarvestPlantEvent>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.get_single() else {
        return;
    };
    let Ok(point) = camera.viewport_to_world_2d(camera_transform, cursor) else {
        return;
    };

    let candidates = plants.iter().map(|(entity, plant, collider, transform)| {
        (entity, plant.patch, collider.0, transform.translation())
    });
    if let Some((instance, patch)) = plant_at(point, candidates) {
        requests.send(HarvestPlantEvent { patch, instance });
    }
}

/// First plant whose collider covers `point` on the plant's own depth plane.
/// Returns `(instance, patch)`.
pub fn plant_at(
    point: Vec2,
    candidates: impl IntoIterator<Item = (Entity, Entity, ColliderShape, Vec3)>,
) -> Option<(Entity, Entity)> {
    candidates
        .into_iter()
        .find(|(_, _, shape, center)| shape.contains(*center, point.extend(center.z)))
        .map(|(instance, patch, _, _)| (instance, patch))
}
