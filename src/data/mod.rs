//! Data layer — populates the herb registry and patch layout at startup.
//!
//! This plugin runs in OnEnter(GameState::Loading), fills `HerbRegistry` from
//! the hard-coded herb definitions, parses the embedded RON patch layout
//! against it, then transitions the game into GameState::Playing.
//!
//! Bad layout entries are logged and skipped; the rest of the layout still
//! loads.

mod herbs;
mod patches;

use bevy::prelude::*;
use crate::shared::*;

pub use herbs::populate_herbs;
pub use patches::{parse_patch_layout, DataError, PatchDef, PatchLayout};

/// The patch layout shipped with the game.
pub const DEFAULT_PATCH_LAYOUT: &str = include_str!("patches.ron");

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Single system that populates every registry and then transitions to Playing.
fn load_all_data(
    mut herb_registry: ResMut<HerbRegistry>,
    mut layout: ResMut<PatchLayout>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("DataPlugin: populating registries…");

    populate_herbs(&mut herb_registry);
    info!("  Herbs loaded: {}", herb_registry.herbs.len());

    match parse_patch_layout(DEFAULT_PATCH_LAYOUT, &herb_registry) {
        Ok((parsed, rejected)) => {
            for err in &rejected {
                warn!("[Data] Skipping patch: {}", err);
            }
            *layout = parsed;
            info!(
                "  Patches loaded: {} ({} rejected)",
                layout.patches.len(),
                rejected.len()
            );
        }
        Err(err) => {
            error!("[Data] {}", err);
            *layout = PatchLayout::default();
        }
    }

    next_state.set(GameState::Playing);
}
