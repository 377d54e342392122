//! Camera rig and orbit controls lifecycle
//!
//! The camera is spawned once with its starting pose, field of view and far
//! plane. Orbit controls (`PanOrbitCamera`) are a per-view resource: attached
//! on entering a view mode with that mode's zoom clamp, disposed on exit.

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::post_process::bloom::{Bloom, BloomPrefilter};
use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;

use crate::config::ViewerConfig;
use crate::view::ViewMode;

#[derive(Component)]
pub struct MainCamera;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomClamp {
    pub min: f32,
    pub max: f32,
}

#[derive(Resource, Debug, Clone)]
pub struct CameraRigConfig {
    pub position: Vec3,
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub system_clamp: ZoomClamp,
    /// Tighter than `system_clamp`; the close-up globe has radius `PLANET_CLOSEUP_RADIUS`.
    pub planet_clamp: ZoomClamp,
    pub planet_distance: f32,
}

impl Default for CameraRigConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 220.0, 520.0),
            fov_deg: 75.0,
            near: 0.1,
            far: 20_000.0,
            system_clamp: ZoomClamp {
                min: 40.0,
                max: 6_000.0,
            },
            planet_clamp: ZoomClamp {
                min: 14.0,
                max: 200.0,
            },
            planet_distance: 45.0,
        }
    }
}

impl CameraRigConfig {
    pub fn clamp_for(&self, mode: ViewMode) -> ZoomClamp {
        match mode {
            ViewMode::SystemView => self.system_clamp,
            ViewMode::SinglePlanetView => self.planet_clamp,
        }
    }

    /// Orbit controls for `mode`, starting from `camera_position` pulled into the clamp.
    pub fn controls_for(&self, mode: ViewMode, camera_position: Vec3) -> PanOrbitCamera {
        let clamp = self.clamp_for(mode);
        let radius = match mode {
            ViewMode::SystemView => camera_position.length(),
            ViewMode::SinglePlanetView => self.planet_distance,
        }
        .clamp(clamp.min, clamp.max);

        PanOrbitCamera {
            focus: Vec3::ZERO,
            radius: Some(radius),
            zoom_lower_limit: clamp.min,
            zoom_upper_limit: Some(clamp.max),
            force_update: true,
            ..default()
        }
    }
}

/// Identifies one attached orbit-controls instance.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrbitControlsId(pub u64);

/// Ledger of orbit-controls instances; every attach must be matched by one dispose.
#[derive(Resource, Debug, Default)]
pub struct OrbitControlsRegistry {
    next_id: u64,
    active: Option<OrbitControlsId>,
    attached: u32,
    disposed: u32,
}

impl OrbitControlsRegistry {
    pub fn attach(&mut self) -> OrbitControlsId {
        if let Some(stale) = self.active {
            warn!("[ORBIT CONTROLS] #{} still active on attach", stale.0);
        }
        self.next_id += 1;
        let id = OrbitControlsId(self.next_id);
        self.active = Some(id);
        self.attached += 1;
        id
    }

    /// Returns false if `id` is not the active instance.
    pub fn dispose(&mut self, id: OrbitControlsId) -> bool {
        if self.active != Some(id) {
            return false;
        }
        self.active = None;
        self.disposed += 1;
        true
    }

    pub fn active(&self) -> Option<OrbitControlsId> {
        self.active
    }

    pub fn attached(&self) -> u32 {
        self.attached
    }

    pub fn disposed(&self) -> u32 {
        self.disposed
    }
}

pub fn spawn_camera_rig(
    mut commands: Commands,
    rig: Res<CameraRigConfig>,
    config: Res<ViewerConfig>,
) {
    let mut camera = commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: rig.fov_deg.to_radians(),
            near: rig.near,
            far: rig.far,
            ..default()
        }),
        Camera {
            order: 0,
            clear_color: ClearColorConfig::Custom(Color::BLACK),
            ..default()
        },
        Tonemapping::TonyMcMapface,
        MainCamera,
        Transform::from_translation(rig.position).looking_at(Vec3::ZERO, Vec3::Y),
        Name::new("Main Camera"),
    ));

    if config.bloom {
        camera.insert(Bloom {
            prefilter: BloomPrefilter {
                threshold: 0.0,
                threshold_softness: 1.0,
            },
            ..Bloom::NATURAL
        });
    }
}

pub fn attach_orbit_controls(
    mut commands: Commands,
    mode: Res<State<ViewMode>>,
    rig: Res<CameraRigConfig>,
    mut registry: ResMut<OrbitControlsRegistry>,
    camera: Query<(Entity, &Transform), With<MainCamera>>,
) {
    let Ok((entity, transform)) = camera.single() else {
        warn!("[ORBIT CONTROLS] main camera not found");
        return;
    };
    let mode = *mode.get();
    let id = registry.attach();
    commands
        .entity(entity)
        .insert((rig.controls_for(mode, transform.translation), id));
    info!("[ORBIT CONTROLS] attached #{} for {:?}", id.0, mode);
}

pub fn detach_orbit_controls(
    mut commands: Commands,
    mut registry: ResMut<OrbitControlsRegistry>,
    camera: Query<(Entity, &OrbitControlsId), With<MainCamera>>,
) {
    for (entity, id) in &camera {
        if !registry.dispose(*id) {
            warn!("[ORBIT CONTROLS] #{} was not the active instance", id.0);
        }
        commands
            .entity(entity)
            .remove::<(PanOrbitCamera, OrbitControlsId)>();
        info!("[ORBIT CONTROLS] disposed #{}", id.0);
    }
}
