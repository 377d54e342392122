//! Scene lighting

use bevy::light::GlobalAmbientLight;
use bevy::prelude::*;

use crate::view::ViewMode;

/// Point light position for the single-planet close-up.
pub const PLANET_VIEW_LIGHT_POSITION: Vec3 = Vec3::new(-700.0, 700.0, 90.0);

/// Marker component for the scene's point light
#[derive(Component)]
pub struct SceneLight;

pub fn light_position(mode: ViewMode) -> Vec3 {
    match mode {
        ViewMode::SinglePlanetView => PLANET_VIEW_LIGHT_POSITION,
        ViewMode::SystemView => Vec3::ZERO,
    }
}

pub fn setup_lighting(mut commands: Commands) {
    commands.insert_resource(GlobalAmbientLight {
        brightness: 30.0,
        ..default()
    });

    commands.spawn((
        PointLight {
            intensity: 4.0e9,
            range: 20_000.0,
            radius: 0.0,
            shadows_enabled: false,
            ..default()
        },
        SceneLight,
        Transform::from_translation(light_position(ViewMode::default())),
        Name::new("Scene Light"),
    ));
}

pub fn place_scene_light(
    mode: Res<State<ViewMode>>,
    mut lights: Query<&mut Transform, With<SceneLight>>,
) {
    let position = light_position(*mode.get());
    for mut transform in &mut lights {
        transform.translation = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_moves_with_mode() {
        assert_eq!(light_position(ViewMode::SystemView), Vec3::ZERO);
        assert_eq!(
            light_position(ViewMode::SinglePlanetView),
            Vec3::new(-700.0, 700.0, 90.0)
        );
    }
}
