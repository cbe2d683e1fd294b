//! Inventory domain plugin: turns item pickups into inventory contents.

use bevy::prelude::*;

use crate::shared::*;

pub struct InventoryPlugin;

impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, apply_item_pickups);
    }
}

/// Adds every `ItemPickupEvent` to the player's inventory.
///
/// Stack size comes from the herb registry; unknown items stack to
/// `DEFAULT_STACK_SIZE`. Whatever doesn't fit is lost.
pub fn apply_item_pickups(
    mut events: EventReader<ItemPickupEvent>,
    mut inventory: ResMut<Inventory>,
    herbs: Res<HerbRegistry>,
) {
    for ev in events.read() {
        let max_stack = herbs
            .get(&ev.item_id)
            .map(|def| def.stack_size)
            .unwrap_or(DEFAULT_STACK_SIZE);

        let overflow = inventory.try_add(&ev.item_id, ev.quantity, max_stack);
        if overflow > 0 {
            warn!(
                "[Inventory] No room for {} x {}; dropped",
                overflow, ev.item_name
            );
        } else {
            info!("[Inventory] Picked up {} x {}", ev.quantity, ev.item_name);
        }
    }
}
