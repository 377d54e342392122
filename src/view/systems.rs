//! View container systems

use bevy::prelude::*;

use crate::config::ViewerConfig;
use crate::view::state::{ViewCommand, ViewMode, ViewState, resolve_initial};

/// Resolves the starting view exactly once; later config changes are not observed.
pub fn resolve_initial_view(
    mut commands: Commands,
    config: Res<ViewerConfig>,
    mut next_mode: ResMut<NextState<ViewMode>>,
) {
    let (state, active) = resolve_initial(config.initial.as_ref());
    info!(
        "[VIEW] starting in {:?} with '{}' ({:?})",
        state.mode, active.record.name, active.source
    );
    if state.mode != ViewMode::default() {
        next_mode.set(state.mode);
    }
    commands.insert_resource(state);
    commands.insert_resource(active);
}

pub fn apply_view_commands(mut reader: MessageReader<ViewCommand>, mut state: ResMut<ViewState>) {
    for cmd in reader.read() {
        debug!("[VIEW] {:?}", cmd);
        state.apply(cmd.clone());
    }
}

/// Mirrors `ViewState::mode` into the Bevy state so scenes can mount on enter/exit.
pub fn sync_view_mode(
    state: Res<ViewState>,
    current: Res<State<ViewMode>>,
    mut next_mode: ResMut<NextState<ViewMode>>,
) {
    if state.mode != *current.get() {
        next_mode.set(state.mode);
    }
}

pub fn escape_to_system_view(
    input: Res<ButtonInput<KeyCode>>,
    mode: Res<State<ViewMode>>,
    mut writer: MessageWriter<ViewCommand>,
) {
    if input.just_pressed(KeyCode::Escape) && *mode.get() == ViewMode::SinglePlanetView {
        writer.write(ViewCommand::SetStarSystemView);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::star_systems::PlanetRecord;
    use bevy::state::app::StatesPlugin;
    use std::collections::HashMap;

    fn view_app() -> App {
        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .init_state::<ViewMode>()
            .add_message::<ViewCommand>()
            .init_resource::<ViewState>()
            .add_systems(Update, (apply_view_commands, sync_view_mode).chain());
        app
    }

    fn current_mode(app: &App) -> ViewMode {
        *app.world().resource::<State<ViewMode>>().get()
    }

    #[test]
    fn commands_drive_bevy_state() {
        let mut app = view_app();
        app.update();
        assert_eq!(current_mode(&app), ViewMode::SystemView);

        app.world_mut().write_message(ViewCommand::SetPlanetInfo(HashMap::from([(
            0,
            PlanetRecord::named("Earth"),
        )])));
        app.world_mut().write_message(ViewCommand::SetPlanetKey(0));
        app.world_mut().write_message(ViewCommand::SetPlanetView);
        app.update();
        app.update();

        assert_eq!(current_mode(&app), ViewMode::SinglePlanetView);
        let state = app.world().resource::<ViewState>();
        assert_eq!(state.current_planet().map(|p| p.name.as_str()), Some("Earth"));

        app.world_mut().write_message(ViewCommand::SetStarSystemView);
        app.update();
        app.update();
        assert_eq!(current_mode(&app), ViewMode::SystemView);
    }

    #[test]
    fn last_mode_command_in_a_frame_wins() {
        let mut app = view_app();

        app.world_mut().write_message(ViewCommand::SetPlanetView);
        app.world_mut().write_message(ViewCommand::SetStarSystemView);
        app.world_mut().write_message(ViewCommand::SetPlanetView);
        app.update();
        app.update();

        assert_eq!(current_mode(&app), ViewMode::SinglePlanetView);
    }

    #[test]
    fn initial_view_without_config_is_system_view() {
        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .init_state::<ViewMode>()
            .insert_resource(ViewerConfig::default())
            .add_systems(Startup, resolve_initial_view);
        app.update();

        assert_eq!(current_mode(&app), ViewMode::SystemView);
        assert_eq!(app.world().resource::<ViewState>(), &ViewState::default());
        assert_eq!(
            app.world().resource::<crate::view::ActiveSystem>().source,
            crate::view::SystemSource::Catalog
        );
    }
}
