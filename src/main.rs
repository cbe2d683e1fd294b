mod shared;
mod harvest;
mod inventory;
mod data;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Herbalist".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<Inventory>()
        .init_resource::<HerbRegistry>()
        .init_resource::<data::PatchLayout>()
        // Events
        .add_event::<ItemPickupEvent>()
        // Domain plugins
        .add_plugins(harvest::HarvestPlugin)
        .add_plugins(inventory::InventoryPlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        // Input
        .add_systems(
            Update,
            harvest::interact::pick_plant_under_cursor.run_if(in_state(GameState::Playing)),
        )
        .add_systems(Update, toggle_pause)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_scale(Vec3::splat(1.0 / PIXEL_SCALE)),
    ));
}

/// Escape pauses and resumes; patch regrowth freezes while paused.
fn toggle_pause(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !keys.just_pressed(KeyCode::Escape) {
        return;
    }
    match state.get() {
        GameState::Playing => next_state.set(GameState::Paused),
        GameState::Paused => next_state.set(GameState::Playing),
        GameState::Loading => {}
    }
}
