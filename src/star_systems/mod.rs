//! Remote star systems store.
//!
//! Fetches `/api/systems/` on a background worker and replaces the
//! `SystemsStore` snapshot with each newer result.

use bevy::prelude::*;

pub mod fetcher;
pub mod systems;
pub mod types;

pub use systems::{apply_systems_results, handle_systems_commands};
pub use types::{
    FetchGate, PlanetRecord, StarDescriptor, SystemRecord, SystemsCommand, SystemsStore,
    parse_color,
};

/// Plugin for star systems data management.
pub struct StarSystemsPlugin;

impl Plugin for StarSystemsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SystemsStore>()
            .init_resource::<FetchGate>()
            .add_message::<SystemsCommand>()
            .add_systems(Startup, systems::setup_systems_worker)
            .add_systems(
                Update,
                (handle_systems_commands, apply_systems_results).chain(),
            );
    }
}
