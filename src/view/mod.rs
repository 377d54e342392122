//! View container
//!
//! Owns the view-mode state machine. Child views send `ViewCommand`
//! messages; this module applies them to `ViewState` and mirrors the mode
//! into `State<ViewMode>` so the scene can mount and unmount sub-scenes.

use bevy::prelude::*;

pub mod nav;
pub mod state;
pub mod systems;
pub mod viewport;

pub use state::{ActiveSystem, SystemSource, ViewCommand, ViewMode, ViewState, planet_info_for};
pub use viewport::ViewportSize;

/// Plugin for the view container and its UI.
pub struct ViewPlugin;

impl Plugin for ViewPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<ViewMode>()
            .init_resource::<ViewState>()
            .init_resource::<ViewportSize>()
            .add_message::<ViewCommand>()
            .add_systems(
                PreStartup,
                (systems::resolve_initial_view, viewport::seed_viewport_size),
            )
            .add_systems(Startup, (nav::spawn_nav_bar, nav::spawn_planet_label))
            .add_systems(
                Update,
                (
                    viewport::track_viewport_size,
                    systems::escape_to_system_view,
                    systems::apply_view_commands,
                    systems::sync_view_mode,
                    nav::update_planet_label,
                )
                    .chain(),
            );
    }
}
