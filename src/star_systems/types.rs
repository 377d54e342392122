use bevy::prelude::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{
    Arc, Mutex,
    mpsc::{Receiver, Sender},
};

/// A star plus its planets, as served by `/api/systems/`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SystemRecord {
    pub id: i64,
    pub name: String,
    pub star: StarDescriptor,
    pub planets: Vec<PlanetRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StarDescriptor {
    pub name: String,
    pub radius: f32,
    pub color: String,
}

impl Default for StarDescriptor {
    fn default() -> Self {
        Self {
            name: "Star".to_string(),
            radius: 20.0,
            color: "#ffd27f".to_string(),
        }
    }
}

/// One planet, keyed by its index in the parent system's `planets`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanetRecord {
    pub name: String,
    /// Distance from the star in scene units.
    pub orbit_radius: f32,
    /// Seconds per revolution.
    pub orbital_period: f32,
    /// Orbit tilt in degrees.
    pub inclination: f32,
    pub size: f32,
    pub color: String,
    /// Optional asset path of a surface texture.
    pub texture: Option<String>,
}

impl Default for PlanetRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            orbit_radius: 50.0,
            orbital_period: 60.0,
            inclination: 0.0,
            size: 2.0,
            color: "#9a9a9a".to_string(),
            texture: None,
        }
    }
}

impl PlanetRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..default()
        }
    }
}

/// Parses a `#rrggbb` string, falling back to grey on malformed input.
pub fn parse_color(hex: &str) -> Color {
    Srgba::hex(hex)
        .map(Color::from)
        .unwrap_or(Color::srgb(0.6, 0.6, 0.6))
}

/// Snapshot of the fetched systems. Replaced wholesale, never merged.
#[derive(Resource, Debug, Default)]
pub struct SystemsStore {
    pub systems: Vec<SystemRecord>,
    /// Sequence number of the fetch whose result is currently held.
    pub applied_seq: u64,
    pub last_update: Option<DateTime<Utc>>,
    /// Failed fetches so far; the collection is untouched by each of them.
    pub failed_fetches: u32,
    pub last_error: Option<String>,
}

/// What applying a worker result did to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreUpdate {
    Replaced { count: usize },
    Stale { seq: u64, applied_seq: u64 },
    Failed { error: String },
}

impl SystemsStore {
    pub fn apply(&mut self, result: SystemsResult) -> StoreUpdate {
        match result {
            SystemsResult::Loaded { seq, systems } => {
                if seq <= self.applied_seq {
                    return StoreUpdate::Stale {
                        seq,
                        applied_seq: self.applied_seq,
                    };
                }
                let count = systems.len();
                self.systems = systems;
                self.applied_seq = seq;
                self.last_update = Some(Utc::now());
                StoreUpdate::Replaced { count }
            }
            SystemsResult::Failed { error, .. } => {
                self.failed_fetches += 1;
                self.last_error = Some(error.clone());
                StoreUpdate::Failed { error }
            }
        }
    }
}

/// Keeps at most one fetch in flight; extra loads collapse into one follow-up.
#[derive(Resource, Debug, Default)]
pub struct FetchGate {
    next_seq: u64,
    in_flight: Option<u64>,
    reload_pending: bool,
}

impl FetchGate {
    /// Returns the sequence number to fetch with, or `None` if coalesced.
    pub fn request(&mut self) -> Option<u64> {
        if self.in_flight.is_some() {
            self.reload_pending = true;
            return None;
        }
        self.next_seq += 1;
        self.in_flight = Some(self.next_seq);
        Some(self.next_seq)
    }

    /// Marks `seq` finished and returns the follow-up sequence, if one was queued.
    pub fn complete(&mut self, seq: u64) -> Option<u64> {
        if self.in_flight != Some(seq) {
            return None;
        }
        self.in_flight = None;
        if std::mem::take(&mut self.reload_pending) {
            self.request()
        } else {
            None
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }
}

#[derive(Resource, Debug)]
pub struct SystemsConfig {
    pub url: String,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemsCommand {
    Load,
    /// Make `store.systems[index]` the active system.
    Adopt(usize),
    AdoptNext,
}

#[derive(Resource)]
pub struct SystemsChannels {
    pub cmd_tx: Sender<FetchRequest>,
    pub res_rx: Arc<Mutex<Receiver<SystemsResult>>>,
}

#[derive(Debug)]
pub struct FetchRequest {
    pub seq: u64,
    pub url: String,
}

#[derive(Debug)]
pub enum SystemsResult {
    Loaded { seq: u64, systems: Vec<SystemRecord> },
    Failed { seq: u64, error: String },
}

impl SystemsResult {
    pub fn seq(&self) -> u64 {
        match self {
            SystemsResult::Loaded { seq, .. } | SystemsResult::Failed { seq, .. } => *seq,
        }
    }
}
