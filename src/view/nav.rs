//! Navigation bar and planet name label

use bevy::picking::Pickable;
use bevy::prelude::*;
use bevy_feathers::controls::{ButtonProps, ButtonVariant, button};
use bevy_feathers::theme::ThemedText;
use bevy_ui_widgets::{Activate, observe};

use crate::star_systems::SystemsCommand;
use crate::view::state::{ViewCommand, ViewMode, ViewState};
use crate::view::viewport::ViewportSize;

pub const UNKNOWN_PLANET: &str = "Unknown planet";

#[derive(Component)]
pub struct PlanetLabel;

pub fn spawn_nav_bar(mut commands: Commands) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            flex_direction: FlexDirection::Row,
            column_gap: Val::Px(8.0),
            ..default()
        },
        Name::new("Nav Bar"),
        children![
            button(
                ButtonProps {
                    variant: ButtonVariant::Primary,
                    ..default()
                },
                observe(
                    |_activate: On<Activate>, mut writer: MessageWriter<ViewCommand>| {
                        writer.write(ViewCommand::SetStarSystemView);
                    }
                ),
                Spawn((Text::new("Solar System"), ThemedText)),
            ),
            button(
                ButtonProps::default(),
                observe(
                    |_activate: On<Activate>, mut writer: MessageWriter<SystemsCommand>| {
                        writer.write(SystemsCommand::Load);
                    }
                ),
                Spawn((Text::new("Fetch Systems"), ThemedText)),
            ),
            button(
                ButtonProps::default(),
                observe(
                    |_activate: On<Activate>, mut writer: MessageWriter<SystemsCommand>| {
                        writer.write(SystemsCommand::AdoptNext);
                    }
                ),
                Spawn((Text::new("Next System"), ThemedText)),
            ),
        ],
    ));
}

pub fn spawn_planet_label(mut commands: Commands, viewport: Res<ViewportSize>) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(64.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            ..default()
        },
        Pickable::IGNORE,
        Name::new("Planet Label Row"),
        children![(
            Text::new(""),
            TextFont {
                font_size: viewport.label_font_size(),
                ..default()
            },
            TextColor(Color::srgba(0.85, 0.95, 1.0, 0.95)),
            Visibility::Hidden,
            PlanetLabel,
        )],
    ));
}

pub fn planet_label_text(state: &ViewState) -> String {
    state
        .current_planet()
        .map(|planet| planet.name.clone())
        .unwrap_or_else(|| UNKNOWN_PLANET.to_string())
}

pub fn update_planet_label(
    state: Res<ViewState>,
    viewport: Res<ViewportSize>,
    mut labels: Query<(&mut Text, &mut TextFont, &mut Visibility), With<PlanetLabel>>,
) {
    if !state.is_changed() && !viewport.is_changed() {
        return;
    }

    for (mut text, mut font, mut visibility) in &mut labels {
        font.font_size = viewport.label_font_size();
        match state.mode {
            ViewMode::SystemView => *visibility = Visibility::Hidden,
            ViewMode::SinglePlanetView => {
                *visibility = Visibility::Inherited;
                text.0 = planet_label_text(&state);
            }
        }
    }
}
