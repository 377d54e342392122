//! Full-system sub-scene: the star, its planets on inclined circular orbits,
//! and click-to-select.

use bevy::prelude::*;
use std::f32::consts::{FRAC_PI_2, TAU};

use crate::star_systems::{PlanetRecord, SystemRecord, handle_systems_commands, parse_color};
use crate::view::{ActiveSystem, ViewCommand, ViewMode, planet_info_for};

/// Offsets each planet's starting angle so they don't line up.
const GOLDEN_ANGLE_RAD: f32 = 2.399_963;
const SUN_EMISSIVE_GAIN: f32 = 8.0;

/// Root of the full-system sub-scene.
#[derive(Component)]
pub struct SystemScene;

#[derive(Component, Debug, Clone)]
pub struct PlanetBody {
    pub key: usize,
    pub planet: PlanetRecord,
}

/// Position on an inclined circular orbit after `elapsed_secs`.
pub fn orbit_position(planet: &PlanetRecord, key: usize, elapsed_secs: f32) -> Vec3 {
    let period = planet.orbital_period.abs().max(f32::EPSILON);
    let angle = key as f32 * GOLDEN_ANGLE_RAD + elapsed_secs / period * TAU;
    let flat = Vec3::new(angle.cos(), 0.0, -angle.sin()) * planet.orbit_radius;
    orbit_tilt(planet) * flat
}

fn orbit_tilt(planet: &PlanetRecord) -> Quat {
    Quat::from_rotation_x(planet.inclination.to_radians())
}

/// Messages sent when a planet is picked, in dispatch order.
pub fn selection_commands(system: &SystemRecord, key: usize) -> [ViewCommand; 3] {
    [
        ViewCommand::SetPlanetInfo(planet_info_for(system)),
        ViewCommand::SetPlanetKey(key),
        ViewCommand::SetPlanetView,
    ]
}

pub fn spawn_system_scene(
    mut commands: Commands,
    active: Res<ActiveSystem>,
    time: Res<Time>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let system = &active.record;
    let sphere = meshes.add(Sphere::new(1.0).mesh().uv(48, 24));
    let star_color = parse_color(&system.star.color);

    let star_material = materials.add(StandardMaterial {
        base_color: star_color,
        emissive: LinearRgba::from(star_color) * SUN_EMISSIVE_GAIN,
        ..default()
    });

    let planets: Vec<_> = system
        .planets
        .iter()
        .enumerate()
        .map(|(key, planet)| {
            let material = materials.add(StandardMaterial {
                base_color: parse_color(&planet.color),
                base_color_texture: planet
                    .texture
                    .as_ref()
                    .map(|path| asset_server.load(path.clone())),
                perceptual_roughness: 0.9,
                ..default()
            });
            (key, planet.clone(), material)
        })
        .collect();

    let elapsed = time.elapsed_secs();
    commands
        .spawn((
            Transform::default(),
            Visibility::default(),
            SystemScene,
            Name::new(format!("System: {}", system.name)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(sphere.clone()),
                MeshMaterial3d(star_material),
                Transform::from_scale(Vec3::splat(system.star.radius)),
                Name::new(system.star.name.clone()),
            ));

            for (key, planet, material) in planets {
                parent
                    .spawn((
                        Mesh3d(sphere.clone()),
                        MeshMaterial3d(material),
                        Transform::from_translation(orbit_position(&planet, key, elapsed))
                            .with_scale(Vec3::splat(planet.size)),
                        Name::new(planet.name.clone()),
                        PlanetBody { key, planet },
                    ))
                    .observe(
                        move |mut click: On<Pointer<Click>>,
                              active: Res<ActiveSystem>,
                              mut writer: MessageWriter<ViewCommand>| {
                            info!("[VIEW] selected planet {}", key);
                            writer.write_batch(selection_commands(&active.record, key));
                            click.propagate(false);
                        },
                    );
            }
        });

    info!(
        "[SCENE] system '{}' with {} planets",
        system.name,
        system.planets.len()
    );
}

pub fn despawn_system_scene(mut commands: Commands, scenes: Query<Entity, With<SystemScene>>) {
    for entity in &scenes {
        commands.entity(entity).despawn();
    }
}

/// True on frames where an adopted system replaced the one on screen.
pub fn active_system_replaced(active: Res<ActiveSystem>, mode: Res<State<ViewMode>>) -> bool {
    active.is_changed() && !active.is_added() && *mode.get() == ViewMode::SystemView
}

/// Mounts the system sub-scene in `SystemView` and rebuilds it when a system is adopted.
pub struct SystemScenePlugin;

impl Plugin for SystemScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(ViewMode::SystemView), spawn_system_scene)
            .add_systems(OnExit(ViewMode::SystemView), despawn_system_scene)
            .add_systems(
                Update,
                (despawn_system_scene, spawn_system_scene)
                    .chain()
                    .run_if(active_system_replaced)
                    .after(handle_systems_commands),
            );
    }
}

pub fn animate_planets(time: Res<Time>, mut planets: Query<(&PlanetBody, &mut Transform)>) {
    let elapsed = time.elapsed_secs();
    for (body, mut transform) in &mut planets {
        transform.translation = orbit_position(&body.planet, body.key, elapsed);
    }
}

pub fn draw_orbits(mut gizmos: Gizmos, planets: Query<&PlanetBody>) {
    for body in &planets {
        let rotation = orbit_tilt(&body.planet) * Quat::from_rotation_x(FRAC_PI_2);
        gizmos
            .circle(
                Isometry3d::new(Vec3::ZERO, rotation),
                body.planet.orbit_radius,
                Color::srgba(0.5, 0.6, 0.8, 0.25),
            )
            .resolution(128);
    }
}
