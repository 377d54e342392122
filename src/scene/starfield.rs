//! Background starfield
//!
//! Stars are scattered on a spherical shell `[radius, radius + depth]` around
//! the origin. Stars deeper in the shell are smaller and dimmer when `fade`
//! is on. The whole field turns slowly about Y at a rate set by `speed`.

use bevy::picking::Pickable;
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Resource, Debug, Clone)]
pub struct StarfieldConfig {
    pub radius: f32,
    pub depth: f32,
    pub count: usize,
    /// Size multiplier.
    pub factor: f32,
    /// 0 renders every star white; 1 allows fully tinted stars.
    pub saturation: f32,
    pub fade: bool,
    pub speed: f32,
    pub seed: u64,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            radius: 4000.0,
            depth: 320.0,
            count: 6000,
            factor: 4.0,
            saturation: 0.0,
            fade: true,
            speed: 1.0,
            seed: 0x5eed_57a2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: Vec3,
    pub size: f32,
    /// 0..=1
    pub brightness: f32,
    pub hue: f32,
}

#[derive(Component)]
pub struct Starfield;

const BRIGHTNESS_BUCKETS: usize = 4;
const ROTATION_RAD_PER_SPEED: f32 = 0.002;

pub fn generate_stars(config: &StarfieldConfig) -> Vec<Star> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    (0..config.count)
        .map(|_| {
            // Uniform direction on the unit sphere.
            let z = rng.random::<f32>() * 2.0 - 1.0;
            let theta = rng.random::<f32>() * std::f32::consts::TAU;
            let r_xy = (1.0 - z * z).max(0.0).sqrt();
            let dir = Vec3::new(r_xy * theta.cos(), z, r_xy * theta.sin());

            let depth_t = rng.random::<f32>();
            let distance = config.radius + depth_t * config.depth;
            let brightness = if config.fade {
                1.0 - 0.6 * depth_t
            } else {
                1.0
            };
            let size = config.factor * (0.15 + 0.35 * rng.random::<f32>()) * brightness;

            Star {
                position: dir * distance,
                size,
                brightness,
                hue: rng.random::<f32>() * 360.0,
            }
        })
        .collect()
}

fn star_color(brightness: f32, hue: f32, saturation: f32) -> Color {
    Color::hsl(
        hue,
        saturation.clamp(0.0, 1.0),
        0.35 + 0.65 * brightness.clamp(0.0, 1.0),
    )
}

pub fn spawn_starfield(
    mut commands: Commands,
    config: Res<StarfieldConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let stars = generate_stars(&config);
    let mesh = meshes.add(Sphere::new(1.0).mesh().ico(1).unwrap_or_else(|_| {
        Sphere::new(1.0).mesh().uv(8, 6)
    }));

    // Shared materials bucketed by brightness keep draw calls batched.
    let buckets: Vec<Handle<StandardMaterial>> = (0..BRIGHTNESS_BUCKETS)
        .map(|i| {
            let brightness = (i + 1) as f32 / BRIGHTNESS_BUCKETS as f32;
            let color = star_color(brightness, 210.0, config.saturation);
            materials.add(StandardMaterial {
                base_color: color,
                emissive: LinearRgba::from(color) * (2.0 * brightness),
                unlit: true,
                ..default()
            })
        })
        .collect();

    commands
        .spawn((
            Transform::default(),
            Visibility::default(),
            Starfield,
            Pickable::IGNORE,
            Name::new("Starfield"),
        ))
        .with_children(|parent| {
            for star in &stars {
                let bucket = ((star.brightness * BRIGHTNESS_BUCKETS as f32).ceil() as usize)
                    .clamp(1, BRIGHTNESS_BUCKETS)
                    - 1;
                parent.spawn((
                    Mesh3d(mesh.clone()),
                    MeshMaterial3d(buckets[bucket].clone()),
                    Transform::from_translation(star.position).with_scale(Vec3::splat(star.size)),
                    Pickable::IGNORE,
                ));
            }
        });

    info!("[STARFIELD] {} stars", stars.len());
}

pub fn rotate_starfield(
    time: Res<Time>,
    config: Res<StarfieldConfig>,
    mut fields: Query<&mut Transform, With<Starfield>>,
) {
    let angle = config.speed * ROTATION_RAD_PER_SPEED * time.delta_secs();
    for mut transform in &mut fields {
        transform.rotate_y(angle);
    }
}
