//! View state machine

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::catalog;
use crate::config::InitialView;
use crate::star_systems::{PlanetRecord, SystemRecord};

#[derive(States, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    #[default]
    SystemView,
    SinglePlanetView,
}

/// Requests from child views; the only way view state changes.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum ViewCommand {
    SetPlanetView,
    SetStarSystemView,
    SetPlanetInfo(HashMap<usize, PlanetRecord>),
    SetPlanetKey(usize),
}

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub mode: ViewMode,
    pub planet_key: usize,
    pub planet_info: HashMap<usize, PlanetRecord>,
}

impl ViewState {
    /// Transitions never check preconditions; an empty `planet_info` is accepted here.
    pub fn apply(&mut self, command: ViewCommand) {
        match command {
            ViewCommand::SetPlanetView => self.mode = ViewMode::SinglePlanetView,
            ViewCommand::SetStarSystemView => self.mode = ViewMode::SystemView,
            ViewCommand::SetPlanetInfo(info) => self.planet_info = info,
            ViewCommand::SetPlanetKey(key) => self.planet_key = key,
        }
    }

    pub fn current_planet(&self) -> Option<&PlanetRecord> {
        self.planet_info.get(&self.planet_key)
    }
}

/// Where the rendered system came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemSource {
    Catalog,
    Config,
    Store(usize),
}

/// System rendered in system view. Set once at startup, then only by explicit adoption.
#[derive(Resource, Debug, Clone)]
pub struct ActiveSystem {
    pub record: SystemRecord,
    pub source: SystemSource,
}

/// Resolves the starting view from inbound configuration, falling back to the static catalog.
pub fn resolve_initial(initial: Option<&InitialView>) -> (ViewState, ActiveSystem) {
    let Some(initial) = initial else {
        return (
            ViewState::default(),
            ActiveSystem {
                record: catalog::solar_system(),
                source: SystemSource::Catalog,
            },
        );
    };

    let state = ViewState {
        mode: initial.mode.unwrap_or_default(),
        planet_key: initial.planet_key.unwrap_or_default(),
        planet_info: initial.planet_info.clone().unwrap_or_default(),
    };
    let active = match &initial.system {
        Some(record) => ActiveSystem {
            record: record.clone(),
            source: SystemSource::Config,
        },
        None => ActiveSystem {
            record: catalog::solar_system(),
            source: SystemSource::Catalog,
        },
    };
    (state, active)
}

/// Map from planet key to record for every planet of `system`.
pub fn planet_info_for(system: &SystemRecord) -> HashMap<usize, PlanetRecord> {
    system.planets.iter().cloned().enumerate().collect()
}
