use bevy::picking::prelude::*;
use bevy::prelude::*;
use bevy::render::RenderPlugin;
use bevy::render::settings::{RenderCreation, WgpuSettings};
use bevy::window::{PresentMode, Window, WindowPlugin};

use bevy_feathers::FeathersPlugins;
use bevy_feathers::dark_theme::create_dark_theme;
use bevy_feathers::palette;
use bevy_feathers::theme::UiTheme;
use bevy_input_focus::directional_navigation::DirectionalNavigationPlugin;
use bevy_panorbit_camera::PanOrbitCameraPlugin;

#[cfg(feature = "dev_camera")]
use bevy::camera_controller::free_camera::{FreeCamera, FreeCameraPlugin};
#[cfg(feature = "dev")]
use bevy::dev_tools::fps_overlay::FpsOverlayPlugin;

mod catalog;
mod config;
mod scene;
mod star_systems;
mod view;

use config::ViewerConfig;
use scene::ScenePlugin;
use star_systems::StarSystemsPlugin;
use view::ViewPlugin;

#[cfg(feature = "dev_camera")]
use scene::MainCamera;

#[cfg(feature = "dev_camera")]
#[derive(Component)]
struct DevCamera;

#[cfg(feature = "dev_camera")]
fn setup_dev_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            near: 0.1,
            far: 20_000.0,
            ..default()
        }),
        Camera {
            order: 2,
            is_active: false,
            ..default()
        },
        Transform::from_xyz(0.0, 600.0, 900.0).looking_at(Vec3::ZERO, Vec3::Y),
        FreeCamera::default(),
        DevCamera,
    ));
}

#[cfg(feature = "dev_camera")]
fn toggle_dev_camera(
    input: Res<ButtonInput<KeyCode>>,
    mut main_camera: Query<&mut Camera, (With<MainCamera>, Without<DevCamera>)>,
    mut dev_camera: Query<&mut Camera, With<DevCamera>>,
) {
    if !input.just_pressed(KeyCode::F2) {
        return;
    }

    if let Ok(mut main) = main_camera.single_mut()
        && let Ok(mut dev) = dev_camera.single_mut()
    {
        let dev_active = dev.is_active;
        dev.is_active = !dev_active;
        main.is_active = dev_active;
    }
}

fn ui_theme() -> UiTheme {
    // Feathers initializes `UiTheme` but does not populate it by default.
    let mut theme = UiTheme(create_dark_theme());
    theme.set_color("feathers.text.main", palette::LIGHT_GRAY_1);
    theme.set_color("feathers.text.dim", palette::LIGHT_GRAY_2);
    theme.set_color("feathers.focus", palette::ACCENT);
    theme.set_color("feathers.button.bg", Color::srgba(0.05, 0.06, 0.12, 0.85));
    theme.set_color(
        "feathers.button.bg.hover",
        Color::srgba(0.1, 0.12, 0.24, 0.92),
    );
    theme.set_color(
        "feathers.button.bg.pressed",
        Color::srgba(0.14, 0.16, 0.3, 0.95),
    );
    theme.set_color("feathers.button.txt", Color::srgba(0.85, 0.88, 1.0, 1.0));
    theme.set_color(
        "feathers.button.primary.bg",
        Color::srgba(0.22, 0.16, 0.06, 0.92),
    );
    theme.set_color(
        "feathers.button.primary.bg.hover",
        Color::srgba(0.32, 0.22, 0.08, 0.96),
    );
    theme.set_color(
        "feathers.button.primary.bg.pressed",
        Color::srgba(0.4, 0.28, 0.1, 0.98),
    );
    theme.set_color(
        "feathers.button.primary.txt",
        Color::srgba(1.0, 0.9, 0.65, 1.0),
    );
    theme
}

fn main() {
    let config = ViewerConfig::load();
    let mut app = App::new();

    app.insert_resource(config).add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Solar System Viewer".to_string(),
                    present_mode: PresentMode::AutoVsync,
                    ..default()
                }),
                ..default()
            })
            .set(RenderPlugin {
                render_creation: RenderCreation::Automatic(WgpuSettings { ..default() }),
                ..default()
            }),
    );

    #[cfg(feature = "dev")]
    app.add_plugins(FpsOverlayPlugin::default());

    app.insert_resource(ui_theme());
    app.add_plugins(FeathersPlugins);
    app.add_plugins(DirectionalNavigationPlugin);

    #[cfg(feature = "dev_camera")]
    app.add_plugins(FreeCameraPlugin);

    app.add_plugins(PanOrbitCameraPlugin);
    app.add_plugins(MeshPickingPlugin);

    app.add_plugins(ViewPlugin);
    app.add_plugins(StarSystemsPlugin);
    app.add_plugins(ScenePlugin);

    #[cfg(feature = "dev_camera")]
    {
        app.add_systems(Startup, setup_dev_camera);
        app.add_systems(Update, toggle_dev_camera);
    }

    app.run();
}
