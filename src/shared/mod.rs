//! Shared components, resources, events, and states for Herbalist.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    Paused,
}

// ═══════════════════════════════════════════════════════════════════════
// INVENTORY
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for every item type in the game.
/// Using string IDs for data-driven flexibility.
pub type ItemId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySlot {
    pub item_id: ItemId,
    pub quantity: u8,
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    /// 36 slots: 0-11 = hotbar, 12-35 = backpack
    pub slots: Vec<Option<InventorySlot>>,
    pub selected_slot: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            slots: vec![None; TOTAL_INVENTORY_SLOTS],
            selected_slot: 0,
        }
    }
}

impl Inventory {
    /// Try to add an item. Returns the quantity that couldn't fit.
    pub fn try_add(&mut self, item_id: &str, quantity: u8, max_stack: u8) -> u8 {
        let mut remaining = quantity;

        // Stack onto existing slots first, then spill into empty ones.
        for slot in self.slots.iter_mut().flatten() {
            if remaining == 0 {
                break;
            }
            if slot.item_id == item_id && slot.quantity < max_stack {
                let add = remaining.min(max_stack - slot.quantity);
                slot.quantity += add;
                remaining -= add;
            }
        }

        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if slot.is_none() {
                let add = remaining.min(max_stack);
                *slot = Some(InventorySlot {
                    item_id: item_id.to_string(),
                    quantity: add,
                });
                remaining -= add;
            }
        }

        remaining
    }

    /// Remove quantity of an item. Returns how many were actually removed.
    pub fn try_remove(&mut self, item_id: &str, quantity: u8) -> u8 {
        let mut remaining = quantity;
        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if let Some(ref mut s) = slot {
                if s.item_id == item_id {
                    let remove = remaining.min(s.quantity);
                    s.quantity -= remove;
                    remaining -= remove;
                    if s.quantity == 0 {
                        *slot = None;
                    }
                }
            }
        }
        quantity - remaining
    }

    pub fn count(&self, item_id: &str) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|s| s.item_id == item_id)
            .map(|s| s.quantity as u32)
            .sum()
    }

    pub fn has(&self, item_id: &str, quantity: u8) -> bool {
        self.count(item_id) >= quantity as u32
    }
}

// ═══════════════════════════════════════════════════════════════════════
// HERBS — plant templates loaded from data
// ═══════════════════════════════════════════════════════════════════════

/// Everything needed to grow one kind of plant in a patch and hand it to the
/// player once picked.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantTemplate {
    pub id: ItemId,
    pub name: String,
    pub icon_index: u32,
    /// Items granted per pick.
    pub yield_per_pick: u8,
    pub stack_size: u8,
    /// Visual bounds of the placeholder sprite. `None` = unknown bounds.
    pub sprite_size: Option<Vec2>,
    pub color: Color,
}

impl PlantTemplate {
    /// The pickup a single harvest of this plant produces.
    pub fn pickup_event(&self) -> ItemPickupEvent {
        ItemPickupEvent {
            item_id: self.id.clone(),
            item_name: self.name.clone(),
            icon_index: self.icon_index,
            quantity: self.yield_per_pick,
        }
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct HerbRegistry {
    pub herbs: HashMap<ItemId, PlantTemplate>,
}

impl HerbRegistry {
    pub fn get(&self, id: &str) -> Option<&PlantTemplate> {
        self.herbs.get(id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

#[derive(Event, Debug, Clone, PartialEq)]
pub struct ItemPickupEvent {
    pub item_id: ItemId,
    pub item_name: String,
    pub icon_index: u32,
    pub quantity: u8,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const TILE_SIZE: f32 = 16.0;
pub const PIXEL_SCALE: f32 = 3.0; // render scale (16px × 3 = 48px on screen)
pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 540.0;

pub const HOTBAR_SLOTS: usize = 12;
pub const BACKPACK_SLOTS: usize = 24;
pub const TOTAL_INVENTORY_SLOTS: usize = HOTBAR_SLOTS + BACKPACK_SLOTS;
pub const DEFAULT_STACK_SIZE: u8 = 99;

/// Population bounds for a single harvest patch.
pub const MIN_PATCH_CAPACITY: u32 = 1;
pub const MAX_PATCH_CAPACITY: u32 = 10;

/// Collider radius used when a plant has no visual bounds to size from.
pub const DEFAULT_COLLIDER_RADIUS: f32 = TILE_SIZE * 0.35;
/// Placeholder sprite edge for plants without an explicit size.
pub const DEFAULT_PLANT_SPRITE_SIZE: f32 = TILE_SIZE * 0.7;

pub const Z_PLANT: f32 = 5.0;
