//! Single-planet close-up: a shaded globe wrapped in an atmosphere shell.

use bevy::picking::Pickable;
use bevy::prelude::*;

use crate::scene::lighting::PLANET_VIEW_LIGHT_POSITION;
use crate::scene::materials::{
    ATMOSPHERE_SCALE, AtmosphereMaterial, GlobeMaterial, atmosphere_material, globe_material,
};
use crate::star_systems::parse_color;
use crate::view::ViewState;

/// Globe radius in the close-up, independent of the planet's system-view size.
pub const PLANET_CLOSEUP_RADIUS: f32 = 10.0;
const SPIN_RAD_PER_SEC: f32 = 0.08;

/// Root of the single-planet sub-scene.
#[derive(Component)]
pub struct PlanetScene;

#[derive(Component)]
pub struct Globe;

/// Shown instead of a globe when the selected key has no planet record.
#[derive(Component)]
pub struct MissingPlanet;

pub fn spawn_planet_scene(
    mut commands: Commands,
    state: Res<ViewState>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut globes: ResMut<Assets<GlobeMaterial>>,
    mut atmospheres: ResMut<Assets<AtmosphereMaterial>>,
    mut standard: ResMut<Assets<StandardMaterial>>,
) {
    let sphere = meshes.add(Sphere::new(PLANET_CLOSEUP_RADIUS).mesh().uv(96, 48));

    let Some(planet) = state.current_planet() else {
        warn!(
            "[SCENE] no planet info for key {} ({} known), showing placeholder",
            state.planet_key,
            state.planet_info.len()
        );
        commands.spawn((
            Mesh3d(sphere),
            MeshMaterial3d(standard.add(StandardMaterial {
                base_color: Color::srgba(0.3, 0.3, 0.35, 0.4),
                alpha_mode: AlphaMode::Blend,
                ..default()
            })),
            Transform::default(),
            PlanetScene,
            MissingPlanet,
            Name::new("Missing Planet"),
        ));
        return;
    };

    let color = parse_color(&planet.color);
    let texture = planet
        .texture
        .as_ref()
        .map(|path| asset_server.load(path.clone()));

    commands
        .spawn((
            Transform::default(),
            Visibility::default(),
            PlanetScene,
            Name::new(format!("Planet: {}", planet.name)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(sphere.clone()),
                MeshMaterial3d(globes.add(globe_material(
                    color,
                    PLANET_VIEW_LIGHT_POSITION,
                    texture,
                ))),
                Transform::default(),
                Globe,
            ));
            parent.spawn((
                Mesh3d(sphere),
                MeshMaterial3d(atmospheres.add(atmosphere_material(color))),
                Transform::from_scale(Vec3::splat(ATMOSPHERE_SCALE)),
                Pickable::IGNORE,
            ));
        });

    info!("[SCENE] close-up of '{}'", planet.name);
}

pub fn despawn_planet_scene(mut commands: Commands, scenes: Query<Entity, With<PlanetScene>>) {
    for entity in &scenes {
        commands.entity(entity).despawn();
    }
}

pub fn spin_globe(time: Res<Time>, mut globes: Query<&mut Transform, With<Globe>>) {
    for mut transform in &mut globes {
        transform.rotate_y(SPIN_RAD_PER_SEC * time.delta_secs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::star_systems::PlanetRecord;
    use crate::view::ViewCommand;
    use std::collections::HashMap;

    fn planet_app(state: ViewState) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<Image>()
            .init_asset::<StandardMaterial>()
            .init_asset::<GlobeMaterial>()
            .init_asset::<AtmosphereMaterial>()
            .insert_resource(state)
            .add_systems(Update, spawn_planet_scene);
        app
    }

    #[test]
    fn missing_entry_spawns_placeholder_instead_of_faulting() {
        let mut state = ViewState::default();
        state.apply(ViewCommand::SetPlanetKey(3));
        state.apply(ViewCommand::SetPlanetView);
        let mut app = planet_app(state);

        app.update();

        let world = app.world_mut();
        assert_eq!(world.query::<&MissingPlanet>().iter(world).count(), 1);
        assert_eq!(world.query::<&Globe>().iter(world).count(), 0);
    }

    #[test]
    fn known_planet_spawns_globe() {
        let mut state = ViewState::default();
        state.apply(ViewCommand::SetPlanetInfo(HashMap::from([(
            0,
            PlanetRecord::named("Earth"),
        )])));
        state.apply(ViewCommand::SetPlanetView);
        let mut app = planet_app(state);

        app.update();

        let world = app.world_mut();
        assert_eq!(world.query::<&Globe>().iter(world).count(), 1);
        assert_eq!(world.query::<&MissingPlanet>().iter(world).count(), 0);
        assert_eq!(world.query::<&PlanetScene>().iter(world).count(), 1);
    }
}
