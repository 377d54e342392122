//! Scene composer
//!
//! Starfield, lights, camera rig and post-processing are always present.
//! Exactly one sub-scene is mounted at a time, chosen by `ViewMode`:
//! the full system or the single-planet close-up.

use bevy::prelude::*;

pub mod camera;
pub mod lighting;
pub mod materials;
pub mod planet;
pub mod solar_system;
pub mod starfield;

pub use camera::{CameraRigConfig, MainCamera, OrbitControlsRegistry};
pub use materials::PlanetMaterialsPlugin;
pub use solar_system::SystemScenePlugin;
pub use starfield::StarfieldConfig;

use crate::view::ViewMode;

/// Plugin for scene composition
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PlanetMaterialsPlugin)
            .init_resource::<CameraRigConfig>()
            .init_resource::<StarfieldConfig>()
            .init_resource::<OrbitControlsRegistry>()
            // The initial OnEnter runs before Startup and needs the camera and light.
            .add_systems(
                PreStartup,
                (camera::spawn_camera_rig, lighting::setup_lighting),
            )
            .add_systems(Startup, starfield::spawn_starfield);

        for mode in [ViewMode::SystemView, ViewMode::SinglePlanetView] {
            app.add_systems(
                OnEnter(mode),
                (camera::attach_orbit_controls, lighting::place_scene_light),
            )
            .add_systems(OnExit(mode), camera::detach_orbit_controls);
        }

        app.add_plugins(SystemScenePlugin)
            .add_systems(OnEnter(ViewMode::SinglePlanetView), planet::spawn_planet_scene)
            .add_systems(OnExit(ViewMode::SinglePlanetView), planet::despawn_planet_scene)
            .add_systems(
                Update,
                (
                    starfield::rotate_starfield,
                    (solar_system::animate_planets, solar_system::draw_orbits)
                        .run_if(in_state(ViewMode::SystemView)),
                    planet::spin_globe.run_if(in_state(ViewMode::SinglePlanetView)),
                ),
            );
    }
}
