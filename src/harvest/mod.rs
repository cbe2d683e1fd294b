//! Harvest domain plugin for Herbalist.
//!
//! Responsible for:
//! - Placing plant patches from the loaded `PatchLayout`
//! - Routing harvest requests to the owning patch
//! - Ticking patch regrowth against the frame clock
//! - Cleaning up plants whose patch is gone
//! - Releasing plants despawned outside the harvest loop

use bevy::prelude::*;
use std::collections::HashMap;

use crate::data::PatchLayout;
use crate::shared::*;

pub mod collider;
pub mod error;
pub mod interact;
pub mod node;

pub use collider::ColliderShape;
pub use error::HarvestError;
pub use node::{
    next_capacity, CollectOutcome, HarvestNode, HarvestNodeConfig, HarvestSink, NodeStats,
    PatchState, PlantWorld, RegrowthReport,
};

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct HarvestPlugin;

impl Plugin for HarvestPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PatchStats>()
            .add_event::<HarvestPlantEvent>()
            .add_event::<PatchRegrownEvent>()
            .add_systems(OnEnter(GameState::Playing), spawn_layout_patches)
            // Scene reload: tear down before the layout is placed again.
            .add_systems(OnEnter(GameState::Loading), despawn_patches)
            // Paused keeps patches alive but freezes their timers.
            .add_systems(
                Update,
                (
                    handle_harvest_requests,
                    tick_patch_regrowth,
                    track_patch_stats,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            // Ungated: removals are only readable for a couple of frames.
            .add_systems(Update, (release_removed_plants, despawn_orphaned_plants));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// COMPONENTS & EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// One harvest patch in the world.
#[derive(Component, Debug)]
pub struct PlantPatch {
    pub herb_id: ItemId,
    pub node: HarvestNode<Entity>,
}

/// A pickable plant and the patch that owns it.
#[derive(Component, Debug, Clone)]
pub struct PlantInstance {
    pub patch: Entity,
    pub item_id: ItemId,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PlantCollider(pub ColliderShape);

/// Request to pick `instance` from `patch`.
#[derive(Event, Debug, Clone)]
pub struct HarvestPlantEvent {
    pub patch: Entity,
    pub instance: Entity,
}

#[derive(Event, Debug, Clone)]
pub struct PatchRegrownEvent {
    pub patch: Entity,
    pub herb_id: ItemId,
    pub previous_capacity: u32,
    pub capacity: u32,
    pub harvested: u32,
    pub overharvested: bool,
}

/// Accumulated statistics about patch regrowth across the session.
#[derive(Resource, Debug, Clone, Default)]
pub struct PatchStats {
    pub regrowths: u32,
    pub overharvests: u32,
    /// Key = herb id, Value = plants picked in completed cycles.
    pub picked: HashMap<ItemId, u32>,
}

// ═══════════════════════════════════════════════════════════════════════
// COMMANDS-BACKED PLANT WORLD
// ═══════════════════════════════════════════════════════════════════════

/// Spawns plants as sprite entities through `Commands`.
///
/// Bounds come from the template's sprite size; plants without one report no
/// bounds and get the default collider.
pub struct CommandsWorld<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    patch: Entity,
    bounds: HashMap<Entity, Vec3>,
}

impl<'a, 'w, 's> CommandsWorld<'a, 'w, 's> {
    pub fn new(commands: &'a mut Commands<'w, 's>, patch: Entity) -> Self {
        Self {
            commands,
            patch,
            bounds: HashMap::new(),
        }
    }
}

impl PlantWorld for CommandsWorld<'_, '_, '_> {
    type Instance = Entity;

    fn materialize(&mut self, template: &PlantTemplate, position: Vec3) -> Entity {
        let size = template
            .sprite_size
            .unwrap_or(Vec2::splat(DEFAULT_PLANT_SPRITE_SIZE));
        let entity = self
            .commands
            .spawn((
                Sprite {
                    color: template.color,
                    custom_size: Some(size),
                    ..default()
                },
                Transform::from_translation(position),
                PlantInstance {
                    patch: self.patch,
                    item_id: template.id.clone(),
                },
            ))
            .id();
        if let Some(size) = template.sprite_size {
            self.bounds.insert(entity, size.extend(0.0));
        }
        entity
    }

    fn bounds(&self, instance: Entity) -> Option<Vec3> {
        self.bounds.get(&instance).copied()
    }

    fn attach_collider(&mut self, instance: Entity, shape: ColliderShape) {
        self.commands.entity(instance).insert(PlantCollider(shape));
    }

    fn destroy(&mut self, instance: Entity) {
        if let Some(mut entity) = self.commands.get_entity(instance) {
            entity.despawn();
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Place one patch per layout entry. Skipped if patches already exist, so
/// resuming from pause does not duplicate them.
pub fn spawn_layout_patches(
    mut commands: Commands,
    layout: Res<PatchLayout>,
    herbs: Res<HerbRegistry>,
    existing: Query<(), With<PlantPatch>>,
) {
    if !existing.is_empty() {
        return;
    }

    for (index, def) in layout.patches.iter().enumerate() {
        let template = herbs.get(&def.herb_id).cloned();
        if template.is_none() {
            warn!("[Harvest] Patch herb '{}' is not registered", def.herb_id);
        }
        let config = match def.node_config(index, template) {
            Ok(config) => config,
            Err(err) => {
                warn!("[Harvest] Skipping patch: {}", err);
                continue;
            }
        };

        let patch = commands.spawn_empty().id();
        let mut world = CommandsWorld::new(&mut commands, patch);
        let node = HarvestNode::initialize(config, &mut world);
        info!(
            "[Harvest] Placed {} patch at {:?} with {} plants",
            def.herb_id,
            node.origin(),
            node.pool_len()
        );

        commands.entity(patch).insert((
            Transform::from_translation(node.origin()),
            PlantPatch {
                herb_id: def.herb_id.clone(),
                node,
            },
        ));
    }
}

/// Route harvest requests to the owning patch. Picked items go to the
/// `ItemPickupEvent` queue when one is registered.
pub fn handle_harvest_requests(
    mut commands: Commands,
    mut requests: EventReader<HarvestPlantEvent>,
    mut patches: Query<&mut PlantPatch>,
    mut pickups: Option<ResMut<Events<ItemPickupEvent>>>,
) {
    for request in requests.read() {
        let Ok(mut patch) = patches.get_mut(request.patch) else {
            warn!(
                "[Harvest] Harvest request for {:?} names unknown patch {:?}",
                request.instance, request.patch
            );
            continue;
        };

        let mut world = CommandsWorld::new(&mut commands, request.patch);
        let sink = pickups
            .as_deref_mut()
            .map(|events| events as &mut dyn HarvestSink);
        patch.node.collect(request.instance, &mut world, sink);
    }
}

/// Advance every patch's regrowth timer by this frame's delta.
pub fn tick_patch_regrowth(
    mut commands: Commands,
    time: Res<Time>,
    mut patches: Query<(Entity, &mut PlantPatch)>,
    mut regrown: EventWriter<PatchRegrownEvent>,
) {
    for (entity, mut patch) in patches.iter_mut() {
        let mut world = CommandsWorld::new(&mut commands, entity);
        let Some(report) = patch.node.tick(time.delta(), &mut world) else {
            continue;
        };

        info!(
            "[Harvest] {} patch regrew: capacity {} -> {} ({} picked{})",
            patch.herb_id,
            report.previous_capacity,
            report.capacity,
            report.harvested,
            if report.overharvested { ", overharvested" } else { "" }
        );
        regrown.send(PatchRegrownEvent {
            patch: entity,
            herb_id: patch.herb_id.clone(),
            previous_capacity: report.previous_capacity,
            capacity: report.capacity,
            harvested: report.harvested,
            overharvested: report.overharvested,
        });
    }
}

/// Reads `PatchRegrownEvent` and updates `PatchStats`.
pub fn track_patch_stats(
    mut events: EventReader<PatchRegrownEvent>,
    mut stats: ResMut<PatchStats>,
) {
    for ev in events.read() {
        stats.regrowths += 1;
        if ev.overharvested {
            stats.overharvests += 1;
        }
        *stats.picked.entry(ev.herb_id.clone()).or_insert(0) += ev.harvested;
    }
}

/// Forget plants that were despawned by anything other than their patch, so
/// a patch emptied that way still regrows.
pub fn release_removed_plants(
    mut removed: RemovedComponents<PlantInstance>,
    mut patches: Query<(Entity, &mut PlantPatch)>,
) {
    for instance in removed.read() {
        for (entity, mut patch) in patches.iter_mut() {
            if !patch.node.release(instance) {
                continue;
            }
            debug!(
                "[Harvest] Plant {:?} of patch {:?} was removed externally",
                instance, entity
            );
            if patch.node.is_regrowing() {
                info!("[Harvest] {} patch emptied externally; regrowing", patch.herb_id);
            }
            break;
        }
    }
}

/// Plants outlive their patch only until the next frame.
pub fn despawn_orphaned_plants(
    mut commands: Commands,
    plants: Query<(Entity, &PlantInstance)>,
    patches: Query<(), With<PlantPatch>>,
) {
    for (entity, plant) in plants.iter() {
        if patches.get(plant.patch).is_err() {
            commands.entity(entity).despawn();
        }
    }
}

/// Tear down every patch, cancelling pending regrowth.
pub fn despawn_patches(mut commands: Commands, mut patches: Query<(Entity, &mut PlantPatch)>) {
    for (entity, mut patch) in patches.iter_mut() {
        let mut world = CommandsWorld::new(&mut commands, entity);
        patch.node.teardown(&mut world);
        commands.entity(entity).despawn();
    }
}
